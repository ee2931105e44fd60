/// 日志工具模块
///
/// 提供日志初始化以及格式化输出的辅助函数
use tracing::info;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{fmt, EnvFilter};

use crate::config::Config;
use crate::models::ExamModel;
use crate::utils::notice::NoticeBoard;

fn env_filter(verbose: bool) -> EnvFilter {
    let default_level = if verbose { "debug" } else { "info" };
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level))
}

/// 初始化控制台日志
///
/// `RUST_LOG` 优先；否则默认 `info`，`verbose` 时为 `debug`
pub fn init(verbose: bool) {
    let _ = fmt().with_env_filter(env_filter(verbose)).with_target(false).try_init();
}

/// 初始化控制台日志，同时把每条日志记录到通知板
pub fn init_with_notices(verbose: bool, board: &NoticeBoard) {
    let _ = tracing_subscriber::registry()
        .with(env_filter(verbose))
        .with(fmt::layer().with_target(false))
        .with(board.clone())
        .try_init();
}

/// 记录程序启动信息
pub fn log_startup(config: &Config, file_count: usize) {
    info!("{}", "=".repeat(60));
    info!("🚀 程序启动 - 考试统计工作簿对账");
    info!(
        "📄 工作表: {} / {} / {}",
        config.speed_pages_sheet, config.questions_sheet, config.alternatives_sheet
    );
    info!("🔀 选项归属策略: {:?}", config.alternative_routing);
    info!("📁 待导入文件: {}", file_count);
    info!("{}", "=".repeat(60));
}

/// 记录已发布模型的概要
pub fn log_model_summary(model: &ExamModel) {
    info!("\n{}", "─".repeat(60));
    info!(
        "📊 页面 {} | 题目 {} | 选项 {}",
        model.pages.len(),
        model.question_count(),
        model.alternative_count()
    );

    for test in &model.tests {
        info!(
            "🧪 考试 {}: 起始页 {:?}, 起始题号 {:?}",
            test.test_code.as_deref().unwrap_or("-"),
            test.min_page,
            test.min_item_rank
        );
        for cohort in &test.cohorts {
            info!(
                "    文凭 {}: 考生 {:?}, 题目 {}",
                cohort.diploma_code.as_deref().unwrap_or("-"),
                cohort.candidate_count,
                cohort.question_count
            );
        }
    }
    info!("{}", "─".repeat(60));
}

/// 打印最终统计信息
///
/// # 参数
/// - `published`: 成功发布的选择数
/// - `superseded`: 被更新的选择取代的数量
/// - `failed`: 失败（含被拒绝）的数量
/// - `error_notices`: 通知板上的错误条数
pub fn print_final_stats(published: usize, superseded: usize, failed: usize, error_notices: usize) {
    info!("\n{}", "=".repeat(60));
    info!("📊 全部处理完成统计");
    info!(
        "完成时间: {}",
        chrono::Local::now().format("%Y-%m-%d %H:%M:%S")
    );
    info!("{}", "=".repeat(60));
    info!("✅ 已发布: {}", published);
    info!("⏭️ 被取代: {}", superseded);
    info!("❌ 失败: {}", failed);
    info!("⚠️ 错误通知: {}", error_notices);
    info!("{}", "=".repeat(60));
}
