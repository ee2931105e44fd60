use serde::{Deserialize, Serialize};
use std::path::Path;
use tokio::fs;

use crate::error::{AppError, AppResult, ConfigError};

/// xlsx 文件的 MIME 类型
pub const XLSX_CONTENT_TYPE: &str =
    "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet";

/// 选项归属策略（同一页上出现重复的 (itemRank, diplomaCode) 时使用）
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AlternativeRouting {
    /// 先取第一个匹配；若其选项已超过 3 个，则改取最后一个匹配
    #[default]
    FirstThenLast,
    /// 按出现顺序取第一个未满 4 个选项的题目，全部已满时取最后一个
    OccurrenceCursor,
}

impl AlternativeRouting {
    fn parse(value: &str) -> Option<Self> {
        match value {
            "first_then_last" => Some(Self::FirstThenLast),
            "occurrence_cursor" => Some(Self::OccurrenceCursor),
            _ => None,
        }
    }
}

/// 程序配置
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// 允许导入的文件类型
    pub expected_content_type: String,
    /// 页面耗时统计工作表名
    pub speed_pages_sheet: String,
    /// 题目工作表名
    pub questions_sheet: String,
    /// 选项工作表名
    pub alternatives_sheet: String,
    /// 选项归属策略
    pub alternative_routing: AlternativeRouting,
    /// 是否显示详细日志
    pub verbose_logging: bool,
    /// 导出 JSON 的文件路径（为空则不导出）
    pub output_json_file: Option<String>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            expected_content_type: XLSX_CONTENT_TYPE.to_string(),
            speed_pages_sheet: "Speed_Pages".to_string(),
            questions_sheet: "Questions".to_string(),
            alternatives_sheet: "Alternatives".to_string(),
            alternative_routing: AlternativeRouting::default(),
            verbose_logging: false,
            output_json_file: None,
        }
    }
}

impl Config {
    pub fn from_env() -> Self {
        let default = Self::default();
        Self {
            expected_content_type: std::env::var("EXPECTED_CONTENT_TYPE").unwrap_or(default.expected_content_type),
            speed_pages_sheet: std::env::var("SPEED_PAGES_SHEET").unwrap_or(default.speed_pages_sheet),
            questions_sheet: std::env::var("QUESTIONS_SHEET").unwrap_or(default.questions_sheet),
            alternatives_sheet: std::env::var("ALTERNATIVES_SHEET").unwrap_or(default.alternatives_sheet),
            alternative_routing: std::env::var("ALTERNATIVE_ROUTING").ok().and_then(|v| AlternativeRouting::parse(&v)).unwrap_or(default.alternative_routing),
            verbose_logging: std::env::var("VERBOSE_LOGGING").ok().and_then(|v| v.parse().ok()).unwrap_or(default.verbose_logging),
            output_json_file: std::env::var("OUTPUT_JSON_FILE").ok().or(default.output_json_file),
        }
    }

    /// 从 TOML 文件加载配置，缺省字段使用默认值
    pub async fn from_toml_file(path: &Path) -> AppResult<Self> {
        let content = fs::read_to_string(path)
            .await
            .map_err(|e| AppError::file_read_failed(path.display().to_string(), e))?;

        toml::from_str(&content).map_err(|source| {
            ConfigError::TomlParseFailed {
                path: path.display().to_string(),
                source,
            }
            .into()
        })
    }

    /// 加载配置：设置了 `EXAM_STATS_CONFIG` 时读取该 TOML 文件，否则读取环境变量
    pub async fn load() -> AppResult<Self> {
        match std::env::var("EXAM_STATS_CONFIG") {
            Ok(path) => Self::from_toml_file(Path::new(&path)).await,
            Err(_) => Ok(Self::from_env()),
        }
    }
}
