use serde::Serialize;

/// 某一考试下的文凭群体
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Cohort {
    pub diploma_code: Option<String>,
    /// 取该群体第一次出现时的考生人数
    pub candidate_count: Option<i64>,
    pub question_count: usize,
}

/// 单个考试的汇总，只由题目行推导，不引用页面或题目对象
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TestSummary {
    pub test_code: Option<String>,
    /// 按首次出现顺序排列
    pub cohorts: Vec<Cohort>,
    /// 各行中最小的页码，与 `min_item_rank` 分别独立统计
    pub min_page: Option<i64>,
    pub min_item_rank: Option<i64>,
}

impl TestSummary {
    pub fn cohort(&self, diploma_code: &str) -> Option<&Cohort> {
        self.cohorts
            .iter()
            .find(|c| c.diploma_code.as_deref() == Some(diploma_code))
    }

    /// 所有群体的题目总数
    pub fn question_count(&self) -> usize {
        self.cohorts.iter().map(|c| c.question_count).sum()
    }
}
