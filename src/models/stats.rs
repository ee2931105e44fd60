use serde::Serialize;

/// 一次对账的汇总计数（不逐行报告被丢弃的记录）
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ReconcileStats {
    pub pages_built: usize,
    pub duplicate_page_rows: usize,
    pub page_rows_without_number: usize,
    pub questions_linked: usize,
    pub orphan_question_rows: usize,
    pub alternatives_attached: usize,
    pub orphan_alternative_rows: usize,
    /// 因首个匹配题目已满而改投其他同键题目的选项数
    pub rerouted_alternatives: usize,
    pub unparseable_rows: usize,
}

impl ReconcileStats {
    /// 被丢弃的行总数
    pub fn dropped(&self) -> usize {
        self.duplicate_page_rows
            + self.page_rows_without_number
            + self.orphan_question_rows
            + self.orphan_alternative_rows
            + self.unparseable_rows
    }
}
