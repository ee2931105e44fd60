//! 编排层（Orchestration Layer）
//!
//! ## 模块划分
//!
//! ### `session` - 看板会话
//! - 已发布模型的唯一写入者（`watch` 通道）
//! - 分配选择序号，丢弃过期的加载结果
//! - 拒绝类型不符的文件
//!
//! ### `cli_app` - 命令行应用
//! - 依次选择命令行给出的工作簿
//! - 输出模型概要和最终统计，按配置导出 JSON
//!
//! ## 层次关系
//!
//! ```text
//! cli_app (处理 Vec<文件>)
//!     ↓
//! session (处理单次选择：序号 + 发布)
//!     ↓
//! workflow::ReconcileFlow (处理单个工作簿)
//!     ↓
//! services (能力层：页面 / 题目 / 选项 / 汇总)
//!     ↓
//! infrastructure (基础设施：文件读取、工作簿解码)
//! ```

pub mod cli_app;
pub mod session;

pub use cli_app::{App, ProcessingStats};
pub use session::{DashboardSession, LoadOutcome, LoadTask, Published};
