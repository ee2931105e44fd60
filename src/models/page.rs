use serde::Serialize;
use std::collections::BTreeMap;

use crate::models::question::Question;
use crate::models::rows::SpeedPageRow;

/// 页码 → 页面，按页码升序
pub type PageMap = BTreeMap<i64, Page>;

/// 页面停留时长统计
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct DurationStats {
    pub mean: Option<f64>,
    pub sd: Option<f64>,
    pub q10: Option<f64>,
    pub q25: Option<f64>,
    pub q50: Option<f64>,
    pub q75: Option<f64>,
    pub q90: Option<f64>,
}

/// 试卷中的一页，独占其题目
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Page {
    pub page_number: i64,
    pub has_instruction: bool,
    pub duration: DurationStats,
    pub questions: Vec<Question>,
}

impl Page {
    /// 用耗时统计行创建页面，题目列表为空
    pub fn from_row(page_number: i64, row: &SpeedPageRow) -> Self {
        Self {
            page_number,
            has_instruction: row.instruction,
            duration: DurationStats {
                mean: row.duration_mean,
                sd: row.duration_sd,
                q10: row.duration_q10,
                q25: row.duration_q25,
                q50: row.duration_q50,
                q75: row.duration_q75,
                q90: row.duration_q90,
            },
            questions: Vec::new(),
        }
    }
}
