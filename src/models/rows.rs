//! 工作表行记录
//!
//! 解码器为每个工作表产出的是松散类型的记录（表头 → 单元格值），
//! 这里把它们反序列化成带类型的行结构。字段缺失或无法识别时保持为 `None`，
//! 不做校验也不做强制转换。

use serde::de::{DeserializeOwned, Visitor};
use serde::{Deserialize, Deserializer};
use serde_json::{Map, Value as JsonValue};
use std::fmt;

/// 单行原始记录：表头文本 → 单元格值
pub type RawRow = Map<String, JsonValue>;

/// `Speed_Pages` 工作表的一行
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct SpeedPageRow {
    #[serde(rename = "Page", default, deserialize_with = "loose_i64")]
    pub page: Option<i64>,
    #[serde(rename = "Instruction", default, deserialize_with = "true_flag")]
    pub instruction: bool,
    #[serde(default, deserialize_with = "loose_f64")]
    pub duration_mean: Option<f64>,
    #[serde(default, deserialize_with = "loose_f64")]
    pub duration_sd: Option<f64>,
    #[serde(rename = "duration_Q10", default, deserialize_with = "loose_f64")]
    pub duration_q10: Option<f64>,
    #[serde(rename = "duration_Q25", default, deserialize_with = "loose_f64")]
    pub duration_q25: Option<f64>,
    #[serde(rename = "duration_Q50", default, deserialize_with = "loose_f64")]
    pub duration_q50: Option<f64>,
    #[serde(rename = "duration_Q75", default, deserialize_with = "loose_f64")]
    pub duration_q75: Option<f64>,
    #[serde(rename = "duration_Q90", default, deserialize_with = "loose_f64")]
    pub duration_q90: Option<f64>,
}

/// `Questions` 工作表的一行
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct QuestionRow {
    #[serde(rename = "TestCode", default, deserialize_with = "loose_string")]
    pub test_code: Option<String>,
    #[serde(rename = "Diplome", default, deserialize_with = "loose_string")]
    pub diploma_code: Option<String>,
    #[serde(rename = "nCandidates", default, deserialize_with = "loose_i64")]
    pub candidate_count: Option<i64>,
    #[serde(rename = "nProcedures", default, deserialize_with = "loose_i64")]
    pub procedure_count: Option<i64>,
    #[serde(rename = "Page", default, deserialize_with = "loose_i64")]
    pub page: Option<i64>,
    #[serde(rename = "ItemRank", default, deserialize_with = "loose_i64")]
    pub item_rank: Option<i64>,
    #[serde(default, deserialize_with = "loose_f64")]
    pub correct_pct: Option<f64>,
    #[serde(default, deserialize_with = "loose_f64")]
    pub incorrect_pct: Option<f64>,
    #[serde(default, deserialize_with = "loose_f64")]
    pub empty_pct: Option<f64>,
    #[serde(default, deserialize_with = "loose_f64")]
    pub not_seen_pct: Option<f64>,
    #[serde(default, deserialize_with = "loose_f64")]
    pub answered_pct: Option<f64>,
    #[serde(default, deserialize_with = "loose_f64")]
    pub difficulty: Option<f64>,
    #[serde(default, deserialize_with = "loose_f64")]
    pub discr_comp: Option<f64>,
    #[serde(default, deserialize_with = "loose_f64")]
    pub discr_test: Option<f64>,
    #[serde(default, deserialize_with = "loose_f64")]
    pub d_index_comp: Option<f64>,
    #[serde(default, deserialize_with = "loose_f64")]
    pub d_index_test: Option<f64>,
    #[serde(default, deserialize_with = "loose_f64")]
    pub alpha_drop_test: Option<f64>,
}

/// `Alternatives` 工作表的一行
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct AlternativeRow {
    #[serde(rename = "TestCode", default, deserialize_with = "loose_string")]
    pub test_code: Option<String>,
    #[serde(rename = "Diplome", default, deserialize_with = "loose_string")]
    pub diploma_code: Option<String>,
    #[serde(rename = "nCandidates", default, deserialize_with = "loose_i64")]
    pub candidate_count: Option<i64>,
    #[serde(rename = "Page", default, deserialize_with = "loose_i64")]
    pub page: Option<i64>,
    #[serde(rename = "ItemRank", default, deserialize_with = "loose_i64")]
    pub item_rank: Option<i64>,
    #[serde(rename = "Inter_type", default, deserialize_with = "loose_string")]
    pub interaction_type: Option<String>,
    #[serde(rename = "cardinality", default, deserialize_with = "loose_string")]
    pub interaction_mode: Option<String>,
    #[serde(rename = "answer_Id", default, deserialize_with = "loose_string")]
    pub choice_id: Option<String>,
    #[serde(rename = "Answer", default, deserialize_with = "loose_string")]
    pub text: Option<String>,
    #[serde(rename = "correct", default, deserialize_with = "true_flag")]
    pub is_correct: bool,
    #[serde(rename = "chosen_pct", default, deserialize_with = "loose_f64")]
    pub chosen_pct: Option<f64>,
    #[serde(rename = "nAnswers", default, deserialize_with = "loose_i64")]
    pub answer_count: Option<i64>,
    #[serde(rename = "chosen_n", default, deserialize_with = "loose_i64")]
    pub chosen_count: Option<i64>,
    #[serde(default, deserialize_with = "loose_f64")]
    pub discr_comp: Option<f64>,
    #[serde(default, deserialize_with = "loose_f64")]
    pub discr_test: Option<f64>,
}

/// 批量转换原始记录
///
/// # 返回
/// 返回 (成功转换的行, 转换失败被跳过的行数)，成功的行保持原有顺序
pub fn parse_rows<T: DeserializeOwned>(rows: Vec<RawRow>) -> (Vec<T>, usize) {
    let mut parsed = Vec::with_capacity(rows.len());
    let mut skipped = 0;

    for row in rows {
        match serde_json::from_value(JsonValue::Object(row)) {
            Ok(typed) => parsed.push(typed),
            Err(e) => {
                tracing::debug!("跳过无法解析的行: {}", e);
                skipped += 1;
            }
        }
    }

    (parsed, skipped)
}

// ========== 宽松反序列化 ==========

/// 整数：接受整数、整数值的浮点数以及数字字符串
fn loose_i64<'de, D>(deserializer: D) -> Result<Option<i64>, D::Error>
where
    D: Deserializer<'de>,
{
    struct IntVisitor;

    impl<'de> Visitor<'de> for IntVisitor {
        type Value = Option<i64>;

        fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
            formatter.write_str("an integer, an integral float or a numeric string")
        }

        fn visit_i64<E>(self, value: i64) -> Result<Self::Value, E> {
            Ok(Some(value))
        }

        fn visit_u64<E>(self, value: u64) -> Result<Self::Value, E> {
            Ok(i64::try_from(value).ok())
        }

        fn visit_f64<E>(self, value: f64) -> Result<Self::Value, E> {
            Ok(integral(value))
        }

        fn visit_str<E>(self, value: &str) -> Result<Self::Value, E> {
            let trimmed = value.trim();
            Ok(trimmed
                .parse::<i64>()
                .ok()
                .or_else(|| trimmed.parse::<f64>().ok().and_then(integral)))
        }

        fn visit_bool<E>(self, _value: bool) -> Result<Self::Value, E> {
            Ok(None)
        }

        fn visit_unit<E>(self) -> Result<Self::Value, E> {
            Ok(None)
        }

        fn visit_none<E>(self) -> Result<Self::Value, E> {
            Ok(None)
        }
    }

    deserializer.deserialize_any(IntVisitor)
}

/// 浮点数：接受任意数字以及数字字符串
fn loose_f64<'de, D>(deserializer: D) -> Result<Option<f64>, D::Error>
where
    D: Deserializer<'de>,
{
    struct FloatVisitor;

    impl<'de> Visitor<'de> for FloatVisitor {
        type Value = Option<f64>;

        fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
            formatter.write_str("a number or a numeric string")
        }

        fn visit_i64<E>(self, value: i64) -> Result<Self::Value, E> {
            Ok(Some(value as f64))
        }

        fn visit_u64<E>(self, value: u64) -> Result<Self::Value, E> {
            Ok(Some(value as f64))
        }

        fn visit_f64<E>(self, value: f64) -> Result<Self::Value, E> {
            Ok(Some(value))
        }

        fn visit_str<E>(self, value: &str) -> Result<Self::Value, E> {
            Ok(value.trim().parse::<f64>().ok())
        }

        fn visit_bool<E>(self, _value: bool) -> Result<Self::Value, E> {
            Ok(None)
        }

        fn visit_unit<E>(self) -> Result<Self::Value, E> {
            Ok(None)
        }

        fn visit_none<E>(self) -> Result<Self::Value, E> {
            Ok(None)
        }
    }

    deserializer.deserialize_any(FloatVisitor)
}

/// 字符串：数字和布尔值按文本保留，保证编码在表格里被存成数字时也能一致比较
fn loose_string<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    struct TextVisitor;

    impl<'de> Visitor<'de> for TextVisitor {
        type Value = Option<String>;

        fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
            formatter.write_str("a string, a number or a boolean")
        }

        fn visit_str<E>(self, value: &str) -> Result<Self::Value, E> {
            Ok(Some(value.to_string()))
        }

        fn visit_i64<E>(self, value: i64) -> Result<Self::Value, E> {
            Ok(Some(value.to_string()))
        }

        fn visit_u64<E>(self, value: u64) -> Result<Self::Value, E> {
            Ok(Some(value.to_string()))
        }

        fn visit_f64<E>(self, value: f64) -> Result<Self::Value, E> {
            Ok(Some(match integral(value) {
                Some(int) => int.to_string(),
                None => value.to_string(),
            }))
        }

        fn visit_bool<E>(self, value: bool) -> Result<Self::Value, E> {
            Ok(Some(if value { "TRUE" } else { "FALSE" }.to_string()))
        }

        fn visit_unit<E>(self) -> Result<Self::Value, E> {
            Ok(None)
        }

        fn visit_none<E>(self) -> Result<Self::Value, E> {
            Ok(None)
        }
    }

    deserializer.deserialize_any(TextVisitor)
}

/// 标志位：只有字面量 "TRUE" 视为真
fn true_flag<'de, D>(deserializer: D) -> Result<bool, D::Error>
where
    D: Deserializer<'de>,
{
    let value = JsonValue::deserialize(deserializer)?;
    Ok(value.as_str() == Some("TRUE"))
}

fn integral(value: f64) -> Option<i64> {
    if value.is_finite() && value.fract() == 0.0 && value.abs() < 9.0e15 {
        Some(value as i64)
    } else {
        None
    }
}
