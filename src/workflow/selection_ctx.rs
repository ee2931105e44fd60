//! 文件选择上下文
//!
//! 封装"这是第几次选择、选中了哪个文件"这一信息

use std::fmt::Display;

/// 文件选择上下文
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelectionCtx {
    /// 选择序号，单调递增；只有最新序号的结果可以发布
    pub seq: u64,

    /// 文件名（仅用于日志显示）
    pub file_name: String,
}

impl SelectionCtx {
    /// 创建新的选择上下文
    pub fn new(seq: u64, file_name: impl Into<String>) -> Self {
        Self {
            seq,
            file_name: file_name.into(),
        }
    }
}

impl Display for SelectionCtx {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[选择 #{} {}]", self.seq, self.file_name)
    }
}
