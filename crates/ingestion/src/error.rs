//! Ingestion 错误类型

use contracts::ContractError;
use thiserror::Error;

/// Ingestion 错误
#[derive(Debug, Error)]
pub enum IngestionError {
    /// 数据源无法打开
    #[error("failed to open source {path}: {message}")]
    OpenFailed {
        /// 文件路径
        path: String,
        /// 错误消息
        message: String,
    },

    /// 工作簿中没有工作表
    #[error("workbook {path} has no sheets")]
    NoSheets {
        /// 文件路径
        path: String,
    },

    /// 指定的工作表不存在
    #[error("sheet '{sheet}' not found in {path}")]
    SheetNotFound {
        /// 文件路径
        path: String,
        /// 工作表名称
        sheet: String,
    },

    /// 内容解码失败
    #[error("failed to decode {path}: {message}")]
    DecodeFailed {
        /// 文件路径
        path: String,
        /// 错误消息
        message: String,
    },

    /// 不支持的数据源格式
    #[error("unsupported source format: {path}")]
    UnsupportedFormat {
        /// 文件路径
        path: String,
    },
}

impl IngestionError {
    /// 出错的数据源路径
    pub fn path(&self) -> &str {
        match self {
            Self::OpenFailed { path, .. }
            | Self::NoSheets { path }
            | Self::SheetNotFound { path, .. }
            | Self::DecodeFailed { path, .. }
            | Self::UnsupportedFormat { path } => path,
        }
    }
}

impl From<IngestionError> for ContractError {
    fn from(err: IngestionError) -> Self {
        ContractError::source_unreadable(err.path().to_string(), err.to_string())
    }
}

/// Ingestion Result 类型别名
pub type Result<T> = std::result::Result<T, IngestionError>;
