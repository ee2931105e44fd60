//! # Exam Stats
//!
//! 把考试统计工作簿（页面耗时、题目、选项三张表）对账成
//! 页面 → 题目 → 选项 的嵌套模型，并按考试汇总各文凭的考生与题目数
//!
//! ## 架构设计
//!
//! 本系统采用严格的四层架构：
//!
//! ### ① 基础设施层（Infrastructure）
//! - `infrastructure/` - 读取文件字节、解码工作簿，只暴露能力
//! - `WorkbookDecoder` - 字节 → 各工作表的有序行
//! - `SelectedFile` - 被选中的文件，读取时唯一的挂起点
//!
//! ### ② 业务能力层（Services）
//! - `services/` - 纯折叠函数，每次只处理一行
//! - `fold_page` / `link_question` / `attach_alternative` / `accumulate_test`
//!
//! ### ③ 流程层（Workflow）
//! - `workflow/` - 定义"一个工作簿"的完整对账流程
//! - `SelectionCtx` - 上下文封装（选择序号 + 文件名）
//! - `ReconcileFlow` - 流程编排（页面 → 题目 → 选项，独立汇总）
//!
//! ### ④ 编排层（Orchestration）
//! - `orchestrator/session` - 已发布模型的唯一写入者，按序号丢弃过期结果
//! - `orchestrator/cli_app` - 命令行驱动
//!
//! ## 模块结构

pub mod config;
pub mod error;
pub mod infrastructure;

pub mod models;
pub mod orchestrator;
pub mod services;
pub mod utils;
pub mod workflow;

// 重新导出常用类型
pub use config::{AlternativeRouting, Config};
pub use error::{AppError, AppResult};
pub use infrastructure::{CalamineDecoder, SelectedFile, SheetRows, WorkbookDecoder};
pub use models::{Alternative, ExamModel, Page, Question, TestSummary};
pub use orchestrator::{App, DashboardSession, LoadOutcome, Published};
pub use workflow::{ReconcileFlow, SelectionCtx};
