//! 命令行应用 - 编排层
//!
//! 依次选择命令行给出的每个工作簿（后一个取代前一个），等待全部任务结束，
//! 输出模型概要，并按配置导出 JSON

use anyhow::Result;
use std::path::{Path, PathBuf};
use tracing::{info, warn};

use crate::config::Config;
use crate::error::{AppError, AppResult};
use crate::infrastructure::SelectedFile;
use crate::models::ExamModel;
use crate::orchestrator::session::{DashboardSession, LoadOutcome};
use crate::utils::logging::{log_model_summary, log_startup, print_final_stats};
use crate::utils::NoticeBoard;

/// 应用主结构
pub struct App {
    config: Config,
    session: DashboardSession,
    notices: NoticeBoard,
}

/// 处理统计
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct ProcessingStats {
    pub published: usize,
    pub superseded: usize,
    pub failed: usize,
    /// 文件类型不符被拒绝的数量
    pub rejected: usize,
}

impl App {
    pub fn new(config: Config, notices: NoticeBoard) -> Self {
        let session = DashboardSession::new(&config);
        Self {
            config,
            session,
            notices,
        }
    }

    pub fn session(&self) -> &DashboardSession {
        &self.session
    }

    /// 运行应用主逻辑
    pub async fn run(&self, paths: &[PathBuf]) -> Result<ProcessingStats> {
        log_startup(&self.config, paths.len());

        let mut stats = ProcessingStats::default();
        if paths.is_empty() {
            warn!("⚠️ 没有指定工作簿文件，程序结束");
            return Ok(stats);
        }

        let mut tasks = Vec::with_capacity(paths.len());
        for path in paths {
            match self.session.select(Some(SelectedFile::from_path(path))) {
                Ok(Some(task)) => tasks.push(task),
                Ok(None) => {}
                Err(_) => stats.rejected += 1,
            }
        }

        for task in tasks {
            match task.wait().await {
                LoadOutcome::Published => stats.published += 1,
                LoadOutcome::Superseded => stats.superseded += 1,
                LoadOutcome::Failed => stats.failed += 1,
            }
        }

        match self.session.snapshot() {
            Some(model) => {
                log_model_summary(&model);
                if let Some(path) = &self.config.output_json_file {
                    export_json(&model, Path::new(path)).await?;
                    info!("💾 模型已导出至: {}", path);
                }
            }
            None => warn!("⚠️ 没有可用的模型"),
        }

        print_final_stats(
            stats.published,
            stats.superseded,
            stats.failed + stats.rejected,
            self.notices.errors().len(),
        );

        Ok(stats)
    }
}

/// 把模型写成格式化的 JSON
async fn export_json(model: &ExamModel, path: &Path) -> AppResult<()> {
    let json = serde_json::to_string_pretty(model)
        .map_err(|e| AppError::Other(format!("模型序列化失败: {}", e)))?;

    tokio::fs::write(path, json)
        .await
        .map_err(|e| AppError::file_write_failed(path.display().to_string(), e))
}
