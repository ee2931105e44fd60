//! 考试汇总 - 业务能力层
//!
//! 独立于页面树，只用题目行统计每个考试的文凭群体、考生数和最早的页码/题号

use std::collections::HashMap;

use crate::models::{Cohort, QuestionRow, TestSummary};

/// 单个考试的累加状态
#[derive(Debug, Clone, Default)]
struct TestEntry {
    test_code: Option<String>,
    cohorts: Vec<Cohort>,
    cohort_index: HashMap<Option<String>, usize>,
    min_page: Option<i64>,
    min_item_rank: Option<i64>,
}

/// 考试汇总累加器，保持考试和群体的首次出现顺序
#[derive(Debug, Clone, Default)]
pub struct TestAccumulator {
    entries: Vec<TestEntry>,
    index: HashMap<Option<String>, usize>,
}

impl TestAccumulator {
    /// 生成最终的考试汇总列表
    pub fn finish(self) -> Vec<TestSummary> {
        self.entries
            .into_iter()
            .map(|entry| TestSummary {
                test_code: entry.test_code,
                cohorts: entry.cohorts,
                min_page: entry.min_page,
                min_item_rank: entry.min_item_rank,
            })
            .collect()
    }
}

/// 折叠一行题目
///
/// - 考试第一次出现时用本行的页码/题号作为初始最小值
/// - 群体第一次出现时记录本行的考生数，之后不再校验
/// - 页码和题号的最小值各自独立更新，不一定来自同一行
pub fn accumulate_test(mut acc: TestAccumulator, row: &QuestionRow) -> TestAccumulator {
    let slot = match acc.index.get(&row.test_code) {
        Some(&slot) => slot,
        None => {
            acc.entries.push(TestEntry {
                test_code: row.test_code.clone(),
                min_page: row.page,
                min_item_rank: row.item_rank,
                ..Default::default()
            });
            acc.index.insert(row.test_code.clone(), acc.entries.len() - 1);
            acc.entries.len() - 1
        }
    };

    let entry = &mut acc.entries[slot];

    let cohort_slot = match entry.cohort_index.get(&row.diploma_code) {
        Some(&cohort_slot) => cohort_slot,
        None => {
            entry.cohorts.push(Cohort {
                diploma_code: row.diploma_code.clone(),
                candidate_count: row.candidate_count,
                question_count: 0,
            });
            entry
                .cohort_index
                .insert(row.diploma_code.clone(), entry.cohorts.len() - 1);
            entry.cohorts.len() - 1
        }
    };
    entry.cohorts[cohort_slot].question_count += 1;

    entry.min_page = min_present(entry.min_page, row.page);
    entry.min_item_rank = min_present(entry.min_item_rank, row.item_rank);

    acc
}

/// 两者都存在时取较小值；初始值缺失时保持缺失
fn min_present(current: Option<i64>, candidate: Option<i64>) -> Option<i64> {
    match (current, candidate) {
        (Some(a), Some(b)) => Some(a.min(b)),
        _ => current,
    }
}
