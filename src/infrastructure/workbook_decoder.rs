//! 工作簿解码器 - 基础设施层
//!
//! 把 xlsx 字节解码为三张工作表的有序行记录，只暴露"解码"能力，
//! 不认识页面 / 题目

use calamine::{Data, Range, Reader, Xlsx};
use serde_json::{Number, Value as JsonValue};
use std::io::Cursor;
use tracing::{debug, warn};

use crate::config::Config;
use crate::error::{AppError, AppResult};
use crate::models::RawRow;

/// 三张工作表解码后的原始行
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SheetRows {
    pub speed_pages: Vec<RawRow>,
    pub questions: Vec<RawRow>,
    pub alternatives: Vec<RawRow>,
}

impl SheetRows {
    pub fn total(&self) -> usize {
        self.speed_pages.len() + self.questions.len() + self.alternatives.len()
    }
}

/// 解码器边界：字节 → 各工作表的有序行
pub trait WorkbookDecoder: Send + Sync {
    fn decode(&self, bytes: &[u8]) -> AppResult<SheetRows>;
}

/// 基于 calamine 的 xlsx 解码器
#[derive(Debug, Clone)]
pub struct CalamineDecoder {
    speed_pages_sheet: String,
    questions_sheet: String,
    alternatives_sheet: String,
}

impl CalamineDecoder {
    pub fn new(config: &Config) -> Self {
        Self {
            speed_pages_sheet: config.speed_pages_sheet.clone(),
            questions_sheet: config.questions_sheet.clone(),
            alternatives_sheet: config.alternatives_sheet.clone(),
        }
    }

    /// 读取一张工作表；工作表不存在时返回空列表
    fn read_sheet<RS>(&self, workbook: &mut Xlsx<RS>, sheet: &str) -> AppResult<Vec<RawRow>>
    where
        RS: std::io::Read + std::io::Seek,
    {
        if !workbook.sheet_names().iter().any(|name| name == sheet) {
            warn!("⚠️ 工作簿中没有工作表 '{}'，按空表处理", sheet);
            return Ok(Vec::new());
        }

        let range = workbook
            .worksheet_range(sheet)
            .map_err(|e| AppError::sheet_read_failed(sheet, e))?;

        let rows = range_to_rows(&range);
        debug!("工作表 '{}' 解码完成: {} 行", sheet, rows.len());
        Ok(rows)
    }
}

impl WorkbookDecoder for CalamineDecoder {
    fn decode(&self, bytes: &[u8]) -> AppResult<SheetRows> {
        let mut workbook: Xlsx<_> = Xlsx::new(Cursor::new(bytes))?;

        Ok(SheetRows {
            speed_pages: self.read_sheet(&mut workbook, &self.speed_pages_sheet)?,
            questions: self.read_sheet(&mut workbook, &self.questions_sheet)?,
            alternatives: self.read_sheet(&mut workbook, &self.alternatives_sheet)?,
        })
    }
}

/// 第一行为表头，之后每行转成 表头 → 值 的记录；空行跳过
fn range_to_rows(range: &Range<Data>) -> Vec<RawRow> {
    let mut rows = range.rows();

    let Some(header_row) = rows.next() else {
        return Vec::new();
    };
    let headers = unique_headers(header_row);

    rows.filter_map(|cells| {
        let record: RawRow = headers
            .iter()
            .zip(cells.iter())
            .filter_map(|(header, cell)| {
                let header = header.as_ref()?;
                cell_to_json(cell).map(|value| (header.clone(), value))
            })
            .collect();

        (!record.is_empty()).then_some(record)
    })
    .collect()
}

/// 表头文本；重复的表头追加 `_1`、`_2` 后缀，空表头对应的列被忽略
fn unique_headers(cells: &[Data]) -> Vec<Option<String>> {
    let mut seen: Vec<String> = Vec::with_capacity(cells.len());

    cells
        .iter()
        .map(|cell| {
            let base = match cell_to_json(cell)? {
                JsonValue::String(s) => s,
                other => other.to_string(),
            };

            let mut name = base.clone();
            let mut suffix = 0;
            while seen.contains(&name) {
                suffix += 1;
                name = format!("{}_{}", base, suffix);
            }
            seen.push(name.clone());
            Some(name)
        })
        .collect()
}

/// 单元格 → JSON 值；空单元格和错误单元格返回 `None`
fn cell_to_json(cell: &Data) -> Option<JsonValue> {
    match cell {
        Data::Empty => None,
        Data::String(s) => {
            if s.is_empty() {
                None
            } else {
                Some(JsonValue::String(s.clone()))
            }
        }
        Data::Int(n) => Some(JsonValue::from(*n)),
        Data::Float(n) => Number::from_f64(*n).map(JsonValue::Number),
        Data::Bool(b) => Some(JsonValue::Bool(*b)),
        Data::DateTime(dt) => Number::from_f64(dt.as_f64()).map(JsonValue::Number),
        Data::DateTimeIso(s) | Data::DurationIso(s) => Some(JsonValue::String(s.clone())),
        Data::Error(e) => {
            debug!("忽略错误单元格: {:?}", e);
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{parse_rows, AlternativeRow};

    #[test]
    fn test_range_to_rows_uses_header_and_skips_blank_rows() {
        let mut range: Range<Data> = Range::new((0, 0), (3, 2));
        range.set_value((0, 0), Data::String("Page".to_string()));
        range.set_value((0, 1), Data::String("Instruction".to_string()));
        range.set_value((0, 2), Data::String("duration_mean".to_string()));
        range.set_value((1, 0), Data::Float(1.0));
        range.set_value((1, 1), Data::Bool(true));
        range.set_value((1, 2), Data::Float(12.5));
        range.set_value((3, 0), Data::Int(2));

        let rows = range_to_rows(&range);

        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0]["Page"], JsonValue::from(1.0));
        assert_eq!(rows[0]["Instruction"], JsonValue::Bool(true));
        assert_eq!(rows[0]["duration_mean"], JsonValue::from(12.5));
        assert_eq!(rows[1]["Page"], JsonValue::from(2));
        assert!(!rows[1].contains_key("duration_mean"));
    }

    #[test]
    fn test_bool_cell_is_not_a_true_flag() {
        let mut range: Range<Data> = Range::new((0, 0), (2, 1));
        range.set_value((0, 0), Data::String("answer_Id".to_string()));
        range.set_value((0, 1), Data::String("correct".to_string()));
        range.set_value((1, 0), Data::String("a".to_string()));
        range.set_value((1, 1), Data::Bool(true));
        range.set_value((2, 0), Data::String("b".to_string()));
        range.set_value((2, 1), Data::String("TRUE".to_string()));

        let (rows, skipped) = parse_rows::<AlternativeRow>(range_to_rows(&range));

        assert_eq!(skipped, 0);
        assert!(!rows[0].is_correct);
        assert!(rows[1].is_correct);
    }

    #[test]
    fn test_duplicate_headers_get_suffix() {
        let headers = unique_headers(&[
            Data::String("discr_comp".to_string()),
            Data::Empty,
            Data::String("discr_comp".to_string()),
        ]);

        assert_eq!(
            headers,
            vec![
                Some("discr_comp".to_string()),
                None,
                Some("discr_comp_1".to_string()),
            ]
        );
    }

    #[test]
    fn test_garbage_bytes_fail_to_open() {
        let decoder = CalamineDecoder::new(&Config::default());
        let result = decoder.decode(b"definitely not a zip archive");

        assert!(matches!(result, Err(AppError::Decode(_))));
    }
}
