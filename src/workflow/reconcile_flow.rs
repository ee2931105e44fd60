//! 对账流程 - 流程层
//!
//! 核心职责：定义"一个工作簿"的完整对账流程
//!
//! 流程顺序：
//! 1. 耗时统计行 → 页面
//! 2. 题目行 → 挂到页面
//! 3. 选项行 → 挂到题目（复合键 + 归属策略）
//! 4. 题目行 → 考试汇总（与 1-3 相互独立）
//!
//! 每一步都是纯折叠函数，流程只负责串联和统计，不向外暴露中间状态。

use tracing::{debug, info};

use crate::config::{AlternativeRouting, Config};
use crate::infrastructure::SheetRows;
use crate::models::{
    parse_rows, AlternativeRow, ExamModel, PageMap, QuestionRow, ReconcileStats, SpeedPageRow,
};
use crate::services::{
    accumulate_test, attach_alternative, fold_page, link_question, AttachOutcome, LinkOutcome,
    PageOutcome, TestAccumulator,
};
use crate::workflow::selection_ctx::SelectionCtx;

/// 工作簿对账流程
///
/// - 不持有任何资源
/// - 一次调用处理完整个工作簿，中途不挂起
pub struct ReconcileFlow {
    routing: AlternativeRouting,
    verbose_logging: bool,
}

impl ReconcileFlow {
    /// 创建新的对账流程
    pub fn new(config: &Config) -> Self {
        Self {
            routing: config.alternative_routing,
            verbose_logging: config.verbose_logging,
        }
    }

    pub fn run(&self, sheets: SheetRows, ctx: &SelectionCtx) -> ExamModel {
        let mut stats = ReconcileStats::default();

        let (speed_rows, skipped) = parse_rows::<SpeedPageRow>(sheets.speed_pages);
        stats.unparseable_rows += skipped;
        let (question_rows, skipped) = parse_rows::<QuestionRow>(sheets.questions);
        stats.unparseable_rows += skipped;
        let (alternative_rows, skipped) = parse_rows::<AlternativeRow>(sheets.alternatives);
        stats.unparseable_rows += skipped;

        debug!(
            "{} 行数: 页面 {}, 题目 {}, 选项 {}",
            ctx,
            speed_rows.len(),
            question_rows.len(),
            alternative_rows.len()
        );

        // ========== 步骤 1: 页面 ==========
        let pages = speed_rows.iter().fold(PageMap::new(), |pages, row| {
            let (pages, outcome) = fold_page(pages, row);
            match outcome {
                PageOutcome::Created => stats.pages_built += 1,
                PageOutcome::Duplicate => stats.duplicate_page_rows += 1,
                PageOutcome::MissingPageNumber => stats.page_rows_without_number += 1,
            }
            pages
        });

        // ========== 步骤 2: 题目 ==========
        let pages = question_rows.iter().fold(pages, |pages, row| {
            let (pages, outcome) = link_question(pages, row);
            match outcome {
                LinkOutcome::Linked => stats.questions_linked += 1,
                LinkOutcome::OrphanPage => stats.orphan_question_rows += 1,
            }
            pages
        });

        // ========== 步骤 3: 选项 ==========
        let pages = alternative_rows.iter().fold(pages, |pages, row| {
            let (pages, outcome) = attach_alternative(pages, row, self.routing);
            match outcome {
                AttachOutcome::Attached { rerouted } => {
                    stats.alternatives_attached += 1;
                    if rerouted {
                        stats.rerouted_alternatives += 1;
                    }
                }
                AttachOutcome::OrphanPage | AttachOutcome::OrphanQuestion => {
                    stats.orphan_alternative_rows += 1
                }
            }
            pages
        });

        // ========== 步骤 4: 考试汇总 ==========
        let tests = question_rows
            .iter()
            .fold(TestAccumulator::default(), accumulate_test)
            .finish();

        self.log_stats(ctx, &stats);

        ExamModel {
            pages,
            tests,
            stats,
        }
    }

    // ========== 日志辅助方法 ==========

    fn log_stats(&self, ctx: &SelectionCtx, stats: &ReconcileStats) {
        info!(
            "{} ✓ 对账完成: 页面 {}, 题目 {}, 选项 {}, 丢弃 {} 行",
            ctx,
            stats.pages_built,
            stats.questions_linked,
            stats.alternatives_attached,
            stats.dropped()
        );

        if self.verbose_logging {
            info!(
                "{}   重复页面 {}, 无页码 {}, 孤立题目 {}, 孤立选项 {}, 改投选项 {}, 无法解析 {}",
                ctx,
                stats.duplicate_page_rows,
                stats.page_rows_without_number,
                stats.orphan_question_rows,
                stats.orphan_alternative_rows,
                stats.rerouted_alternatives,
                stats.unparseable_rows
            );
        }
    }
}
