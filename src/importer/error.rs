// ==========================================
// 企业名录系统 - 导入模块错误类型
// ==========================================
// 工具: thiserror 派生宏
// 说明: 只有整批级别的问题才成为错误；单条记录问题在管道内被吸收
// ==========================================

use crate::domain::EntityKind;
use crate::repository::RepositoryError;
use thiserror::Error;

/// 导入模块错误类型（均为致命错误）
#[derive(Error, Debug)]
pub enum ImportError {
    // ===== 输入格式错误 =====
    #[error("unsupported format: {0} (only text/csv and application/json are accepted)")]
    UnsupportedFormat(String),

    #[error("unknown entity kind: {0} (expected companies or people)")]
    UnknownEntityKind(String),

    #[error("staged file could not be read: {0}")]
    FileReadError(String),

    #[error("parse error: {0}")]
    ParseError(String),

    // ===== 数据内容错误 =====
    #[error("no valid {} data found in the file", .0.label())]
    NoValidRecords(EntityKind),

    // ===== 存储错误 =====
    #[error("store unavailable: {0}")]
    StoreUnavailable(String),

    #[error("store error: {0}")]
    StoreError(String),

    // ===== 通用错误 =====
    #[error("internal error: {0}")]
    InternalError(String),
}

/// 对调用方可见的失败分类
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailureKind {
    /// 输入文件/参数有问题
    BadInput,
    /// 没有可导入的有效记录
    NothingToImport,
    /// 存储不可用或整批写入失败
    StoreFailure,
}

impl ImportError {
    pub fn failure_kind(&self) -> FailureKind {
        match self {
            ImportError::UnsupportedFormat(_)
            | ImportError::UnknownEntityKind(_)
            | ImportError::FileReadError(_)
            | ImportError::ParseError(_) => FailureKind::BadInput,
            ImportError::NoValidRecords(_) => FailureKind::NothingToImport,
            ImportError::StoreUnavailable(_)
            | ImportError::StoreError(_)
            | ImportError::InternalError(_) => FailureKind::StoreFailure,
        }
    }
}

// 实现 From<std::io::Error>
impl From<std::io::Error> for ImportError {
    fn from(err: std::io::Error) -> Self {
        ImportError::FileReadError(err.to_string())
    }
}

// 实现 From<csv::Error>
impl From<csv::Error> for ImportError {
    fn from(err: csv::Error) -> Self {
        ImportError::ParseError(format!("invalid CSV: {}", err))
    }
}

// 实现 From<serde_json::Error>
impl From<serde_json::Error> for ImportError {
    fn from(err: serde_json::Error) -> Self {
        ImportError::ParseError(format!("invalid JSON: {}", err))
    }
}

// 实现 From<RepositoryError>
impl From<RepositoryError> for ImportError {
    fn from(err: RepositoryError) -> Self {
        if err.is_unavailable() {
            ImportError::StoreUnavailable(err.to_string())
        } else {
            ImportError::StoreError(err.to_string())
        }
    }
}

/// Result 类型别名
pub type PipelineResult<T> = Result<T, ImportError>;
