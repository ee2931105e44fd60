use serde::Serialize;

use crate::models::page::{Page, PageMap};
use crate::models::question::Question;
use crate::models::stats::ReconcileStats;
use crate::models::test_summary::TestSummary;

/// 对账结果：页面树和考试汇总总是一起发布
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ExamModel {
    pub pages: PageMap,
    pub tests: Vec<TestSummary>,
    pub stats: ReconcileStats,
}

impl ExamModel {
    pub fn page(&self, page_number: i64) -> Option<&Page> {
        self.pages.get(&page_number)
    }

    /// 按页码升序遍历
    pub fn pages(&self) -> impl Iterator<Item = &Page> {
        self.pages.values()
    }

    /// 所有题目，按页码再按行顺序
    pub fn questions(&self) -> impl Iterator<Item = &Question> {
        self.pages.values().flat_map(|p| p.questions.iter())
    }

    pub fn questions_for_test<'a>(&'a self, test_code: &'a str) -> impl Iterator<Item = &'a Question> {
        self.questions()
            .filter(move |q| q.test_code.as_deref() == Some(test_code))
    }

    pub fn test(&self, test_code: &str) -> Option<&TestSummary> {
        self.tests
            .iter()
            .find(|t| t.test_code.as_deref() == Some(test_code))
    }

    pub fn question_count(&self) -> usize {
        self.pages.values().map(|p| p.questions.len()).sum()
    }

    pub fn alternative_count(&self) -> usize {
        self.questions().map(|q| q.alternatives.len()).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.pages.is_empty() && self.tests.is_empty()
    }
}
