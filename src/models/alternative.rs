use serde::Serialize;

use crate::models::rows::AlternativeRow;

/// 答案选项
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Alternative {
    pub test_code: Option<String>,
    pub diploma_code: Option<String>,
    pub candidate_count: Option<i64>,
    pub page_number: Option<i64>,
    pub item_rank: Option<i64>,
    pub interaction_type: Option<String>,
    pub interaction_mode: Option<String>,
    pub choice_id: Option<String>,
    pub text: Option<String>,
    pub is_correct: bool,
    pub chosen_pct: Option<f64>,
    pub answer_count: Option<i64>,
    pub chosen_count: Option<i64>,
    pub discr_comp: Option<f64>,
    pub discr_test: Option<f64>,
}

impl From<&AlternativeRow> for Alternative {
    fn from(row: &AlternativeRow) -> Self {
        Self {
            test_code: row.test_code.clone(),
            diploma_code: row.diploma_code.clone(),
            candidate_count: row.candidate_count,
            page_number: row.page,
            item_rank: row.item_rank,
            interaction_type: row.interaction_type.clone(),
            interaction_mode: row.interaction_mode.clone(),
            choice_id: row.choice_id.clone(),
            text: row.text.clone(),
            is_correct: row.is_correct,
            chosen_pct: row.chosen_pct,
            answer_count: row.answer_count,
            chosen_count: row.chosen_count,
            discr_comp: row.discr_comp,
            discr_test: row.discr_test,
        }
    }
}
