//! 选项对账 - 业务能力层
//!
//! 每一行选项通过复合键 (item_rank, diploma_code) 在所属页面内找到题目。
//! 上游数据重复时同一页可能出现多道同键题目，此时按 [`AlternativeRouting`]
//! 决定选项归属。

use crate::config::AlternativeRouting;
use crate::models::{Alternative, AlternativeRow, Page, PageMap, Question};

/// 选项数达到该值时按正确性排序一次，之后不再排序
pub const SORT_TRIGGER_LEN: usize = 4;

/// 首个匹配题目的选项数超过该值时改投最后一个匹配
const FALLBACK_THRESHOLD: usize = 3;

/// 单行对账结果
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AttachOutcome {
    /// 已挂到题目上；`rerouted` 表示没有挂到第一个同键题目
    Attached { rerouted: bool },
    /// 页面不存在
    OrphanPage,
    /// 页面上没有同键题目
    OrphanQuestion,
}

/// 把一行选项挂到所属题目
pub fn attach_alternative(
    mut pages: PageMap,
    row: &AlternativeRow,
    routing: AlternativeRouting,
) -> (PageMap, AttachOutcome) {
    let outcome = match row.page.and_then(|n| pages.get_mut(&n)) {
        Some(page) => attach_to_page(page, row, routing),
        None => AttachOutcome::OrphanPage,
    };

    (pages, outcome)
}

fn attach_to_page(page: &mut Page, row: &AlternativeRow, routing: AlternativeRouting) -> AttachOutcome {
    let Some((index, rerouted)) = route(
        &page.questions,
        row.item_rank,
        row.diploma_code.as_deref(),
        routing,
    ) else {
        return AttachOutcome::OrphanQuestion;
    };

    let question = &mut page.questions[index];
    question.alternatives.push(Alternative::from(row));

    if question.alternatives.len() == SORT_TRIGGER_LEN {
        // 稳定排序：正确选项在前，同类保持插入顺序
        question.alternatives.sort_by_key(|a| !a.is_correct);
    }

    AttachOutcome::Attached { rerouted }
}

/// 找到选项应归属的题目下标
///
/// # 返回
/// 返回 (题目下标, 是否偏离了第一个匹配)；没有同键题目时返回 `None`
fn route(
    questions: &[Question],
    item_rank: Option<i64>,
    diploma_code: Option<&str>,
    routing: AlternativeRouting,
) -> Option<(usize, bool)> {
    let matches = |q: &Question| q.matches_key(item_rank, diploma_code);
    let first = questions.iter().position(matches)?;

    let chosen = match routing {
        AlternativeRouting::FirstThenLast => {
            if questions[first].alternatives.len() > FALLBACK_THRESHOLD {
                questions.iter().rposition(matches).unwrap_or(first)
            } else {
                first
            }
        }
        AlternativeRouting::OccurrenceCursor => {
            let mut candidates = questions
                .iter()
                .enumerate()
                .filter(|(_, q)| q.matches_key(item_rank, diploma_code))
                .map(|(i, q)| (i, q.alternatives.len()));

            let mut last = first;
            loop {
                match candidates.next() {
                    Some((i, len)) if len < SORT_TRIGGER_LEN => break i,
                    Some((i, _)) => last = i,
                    None => break last,
                }
            }
        }
    };

    Some((chosen, chosen != first))
}
