//! 文件来源 - 基础设施层
//!
//! 被选中的文件只在读取完整字节时挂起一次，读取方式由 [`FileReader`] 决定

use futures::future::BoxFuture;
use futures::FutureExt;
use phf::phf_map;
use std::fmt;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tokio::fs;

use crate::error::{AppError, AppResult, FileError};

/// 按扩展名推断文件类型
static CONTENT_TYPES: phf::Map<&'static str, &'static str> = phf_map! {
    "xlsx" => "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet",
    "xls" => "application/vnd.ms-excel",
    "csv" => "text/csv",
    "json" => "application/json",
    "txt" => "text/plain",
};

const FALLBACK_CONTENT_TYPE: &str = "application/octet-stream";

/// 根据扩展名返回文件类型，未知扩展名返回 `application/octet-stream`
pub fn content_type_for(path: &Path) -> &'static str {
    path.extension()
        .and_then(|ext| ext.to_str())
        .and_then(|ext| CONTENT_TYPES.get(ext.to_ascii_lowercase().as_str()).copied())
        .unwrap_or(FALLBACK_CONTENT_TYPE)
}

/// 读取文件全部字节的能力
pub trait FileReader: Send + Sync {
    fn read(&self) -> BoxFuture<'static, AppResult<Vec<u8>>>;
}

/// 从磁盘读取
#[derive(Debug, Clone)]
pub struct PathReader {
    path: PathBuf,
}

impl PathReader {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl FileReader for PathReader {
    fn read(&self) -> BoxFuture<'static, AppResult<Vec<u8>>> {
        let path = self.path.clone();
        async move {
            fs::read(&path).await.map_err(|e| match e.kind() {
                ErrorKind::NotFound => AppError::File(FileError::NotFound {
                    path: path.display().to_string(),
                }),
                _ => AppError::file_read_failed(path.display().to_string(), e),
            })
        }
        .boxed()
    }
}

/// 已在内存中的字节
#[derive(Debug, Clone)]
pub struct MemoryReader {
    bytes: Arc<Vec<u8>>,
}

impl MemoryReader {
    pub fn new(bytes: Vec<u8>) -> Self {
        Self {
            bytes: Arc::new(bytes),
        }
    }
}

impl FileReader for MemoryReader {
    fn read(&self) -> BoxFuture<'static, AppResult<Vec<u8>>> {
        let bytes = Arc::clone(&self.bytes);
        async move { Ok(bytes.as_ref().clone()) }.boxed()
    }
}

/// 用户选中的文件
#[derive(Clone)]
pub struct SelectedFile {
    pub name: String,
    /// 声明的文件类型
    pub content_type: String,
    reader: Arc<dyn FileReader>,
}

impl SelectedFile {
    pub fn new(
        name: impl Into<String>,
        content_type: impl Into<String>,
        reader: impl FileReader + 'static,
    ) -> Self {
        Self {
            name: name.into(),
            content_type: content_type.into(),
            reader: Arc::new(reader),
        }
    }

    /// 磁盘文件，文件类型由扩展名推断
    pub fn from_path(path: &Path) -> Self {
        let name = path
            .file_name()
            .unwrap_or_default()
            .to_string_lossy()
            .to_string();
        Self::new(name, content_type_for(path), PathReader::new(path))
    }

    /// 内存中的文件
    pub fn from_bytes(
        name: impl Into<String>,
        content_type: impl Into<String>,
        bytes: Vec<u8>,
    ) -> Self {
        Self::new(name, content_type, MemoryReader::new(bytes))
    }

    /// 读取全部字节
    pub async fn read_bytes(&self) -> AppResult<Vec<u8>> {
        self.reader.read().await
    }
}

impl fmt::Debug for SelectedFile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SelectedFile")
            .field("name", &self.name)
            .field("content_type", &self.content_type)
            .finish_non_exhaustive()
    }
}
