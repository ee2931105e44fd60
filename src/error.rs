use thiserror::Error;

/// 应用程序错误类型
#[derive(Debug, Error)]
pub enum AppError {
    /// 输入文件被拒绝
    #[error("输入错误: {0}")]
    Input(#[from] InputError),
    /// 工作簿解码错误
    #[error("解码错误: {0}")]
    Decode(#[from] DecodeError),
    /// 文件操作错误
    #[error("文件错误: {0}")]
    File(#[from] FileError),
    /// 配置错误
    #[error("配置错误: {0}")]
    Config(#[from] ConfigError),
    /// 其他错误
    #[error("错误: {0}")]
    Other(String),
}

/// 输入文件错误
#[derive(Debug, Error)]
pub enum InputError {
    /// 文件类型不是期望的电子表格格式
    #[error("文件 {file_name} 的类型 '{actual}' 不是期望的 '{expected}'")]
    ContentTypeMismatch {
        file_name: String,
        expected: String,
        actual: String,
    },
}

/// 工作簿解码错误
#[derive(Debug, Error)]
pub enum DecodeError {
    /// 无法打开工作簿
    #[error("无法打开工作簿: {source}")]
    OpenFailed {
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },
    /// 读取工作表失败
    #[error("读取工作表 '{sheet}' 失败: {source}")]
    SheetReadFailed {
        sheet: String,
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },
}

/// 文件操作错误
#[derive(Debug, Error)]
pub enum FileError {
    /// 文件不存在
    #[error("文件不存在: {path}")]
    NotFound { path: String },
    /// 读取文件失败
    #[error("读取文件失败 ({path}): {source}")]
    ReadFailed {
        path: String,
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },
    /// 写入文件失败
    #[error("写入文件失败 ({path}): {source}")]
    WriteFailed {
        path: String,
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },
}

/// 配置错误
#[derive(Debug, Error)]
pub enum ConfigError {
    /// TOML 解析失败
    #[error("TOML解析失败 ({path}): {source}")]
    TomlParseFailed {
        path: String,
        #[source]
        source: toml::de::Error,
    },
}

// ========== 从常见错误类型转换 ==========

impl From<calamine::XlsxError> for AppError {
    fn from(err: calamine::XlsxError) -> Self {
        AppError::Decode(DecodeError::OpenFailed {
            source: Box::new(err),
        })
    }
}

// ========== 便捷构造函数 ==========

impl AppError {
    /// 创建文件类型不匹配错误
    pub fn content_type_mismatch(
        file_name: impl Into<String>,
        expected: impl Into<String>,
        actual: impl Into<String>,
    ) -> Self {
        AppError::Input(InputError::ContentTypeMismatch {
            file_name: file_name.into(),
            expected: expected.into(),
            actual: actual.into(),
        })
    }

    /// 创建文件读取错误
    pub fn file_read_failed(
        path: impl Into<String>,
        source: impl std::error::Error + Send + Sync + 'static,
    ) -> Self {
        AppError::File(FileError::ReadFailed {
            path: path.into(),
            source: Box::new(source),
        })
    }

    /// 创建文件写入错误
    pub fn file_write_failed(
        path: impl Into<String>,
        source: impl std::error::Error + Send + Sync + 'static,
    ) -> Self {
        AppError::File(FileError::WriteFailed {
            path: path.into(),
            source: Box::new(source),
        })
    }

    /// 创建工作表读取错误
    pub fn sheet_read_failed(
        sheet: impl Into<String>,
        source: impl std::error::Error + Send + Sync + 'static,
    ) -> Self {
        AppError::Decode(DecodeError::SheetReadFailed {
            sheet: sheet.into(),
            source: Box::new(source),
        })
    }

    /// 是否为输入被拒绝（文件类型不符）
    pub fn is_rejection(&self) -> bool {
        matches!(self, AppError::Input(_))
    }
}

// ========== Result 类型别名 ==========

/// 应用程序结果类型
pub type AppResult<T> = Result<T, AppError>;
