use serde::Serialize;

use crate::models::alternative::Alternative;
use crate::models::rows::QuestionRow;

/// 题目（某一页上、某一文凭群体的一道题）
///
/// 同一页内以 (item_rank, diploma_code) 作为复合键识别，
/// 因为同一个 item_rank 会按文凭群体各出现一次。
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Question {
    pub test_code: Option<String>,
    pub diploma_code: Option<String>,
    pub candidate_count: Option<i64>,
    pub procedure_count: Option<i64>,
    pub page_number: Option<i64>,
    pub item_rank: Option<i64>,
    pub correct_pct: Option<f64>,
    pub incorrect_pct: Option<f64>,
    pub empty_pct: Option<f64>,
    pub not_seen_pct: Option<f64>,
    pub answered_pct: Option<f64>,
    pub difficulty: Option<f64>,
    pub discr_comp: Option<f64>,
    pub discr_test: Option<f64>,
    pub d_index_comp: Option<f64>,
    pub d_index_test: Option<f64>,
    pub alpha_drop_test: Option<f64>,
    pub alternatives: Vec<Alternative>,
}

impl Question {
    /// 是否匹配复合键 (item_rank, diploma_code)
    pub fn matches_key(&self, item_rank: Option<i64>, diploma_code: Option<&str>) -> bool {
        self.item_rank == item_rank && self.diploma_code.as_deref() == diploma_code
    }

    /// 正确选项
    pub fn correct_alternatives(&self) -> impl Iterator<Item = &Alternative> {
        self.alternatives.iter().filter(|a| a.is_correct)
    }
}

impl From<&QuestionRow> for Question {
    fn from(row: &QuestionRow) -> Self {
        Self {
            test_code: row.test_code.clone(),
            diploma_code: row.diploma_code.clone(),
            candidate_count: row.candidate_count,
            procedure_count: row.procedure_count,
            page_number: row.page,
            item_rank: row.item_rank,
            correct_pct: row.correct_pct,
            incorrect_pct: row.incorrect_pct,
            empty_pct: row.empty_pct,
            not_seen_pct: row.not_seen_pct,
            answered_pct: row.answered_pct,
            difficulty: row.difficulty,
            discr_comp: row.discr_comp,
            discr_test: row.discr_test,
            d_index_comp: row.d_index_comp,
            d_index_test: row.d_index_test,
            alpha_drop_test: row.alpha_drop_test,
            alternatives: Vec::new(),
        }
    }
}
