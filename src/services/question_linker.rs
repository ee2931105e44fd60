//! 题目挂载 - 业务能力层
//!
//! 耗时统计表是页面是否存在的唯一依据：找不到页面的题目行直接丢弃

use crate::models::{PageMap, Question, QuestionRow};

/// 单行挂载结果
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LinkOutcome {
    Linked,
    /// 页面不存在
    OrphanPage,
}

/// 把一行题目追加到所属页面，保持原始行顺序
pub fn link_question(mut pages: PageMap, row: &QuestionRow) -> (PageMap, LinkOutcome) {
    let outcome = match row.page.and_then(|n| pages.get_mut(&n)) {
        Some(page) => {
            page.questions.push(Question::from(row));
            LinkOutcome::Linked
        }
        None => LinkOutcome::OrphanPage,
    };

    (pages, outcome)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Page, SpeedPageRow};

    fn pages_with(numbers: &[i64]) -> PageMap {
        numbers
            .iter()
            .map(|&n| (n, Page::from_row(n, &SpeedPageRow::default())))
            .collect()
    }

    fn question(page: Option<i64>, rank: i64, diploma: &str) -> QuestionRow {
        QuestionRow {
            page,
            item_rank: Some(rank),
            diploma_code: Some(diploma.to_string()),
            ..Default::default()
        }
    }

    #[test]
    fn test_questions_keep_row_order() {
        let rows = vec![
            question(Some(1), 2, "A"),
            question(Some(1), 1, "A"),
            question(Some(1), 2, "B"),
        ];
        let pages = rows
            .iter()
            .fold(pages_with(&[1]), |pages, r| link_question(pages, r).0);

        let ranks: Vec<_> = pages[&1]
            .questions
            .iter()
            .map(|q| (q.item_rank, q.diploma_code.clone()))
            .collect();
        assert_eq!(
            ranks,
            vec![
                (Some(2), Some("A".to_string())),
                (Some(1), Some("A".to_string())),
                (Some(2), Some("B".to_string())),
            ]
        );
    }

    #[test]
    fn test_question_on_unknown_page_is_dropped() {
        let (pages, outcome) = link_question(pages_with(&[1, 2]), &question(Some(9), 1, "A"));

        assert_eq!(outcome, LinkOutcome::OrphanPage);
        assert!(pages
            .values()
            .flat_map(|p| p.questions.iter())
            .all(|q| q.page_number != Some(9)));
    }

    #[test]
    fn test_question_without_page_is_dropped() {
        let (pages, outcome) = link_question(pages_with(&[1]), &question(None, 1, "A"));

        assert_eq!(outcome, LinkOutcome::OrphanPage);
        assert!(pages[&1].questions.is_empty());
    }
}
