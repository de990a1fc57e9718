// ==========================================
// 企业名录系统 - 仓储层错误类型
// ==========================================
// 工具: thiserror 派生宏
// ==========================================

use thiserror::Error;

/// 仓储层错误类型
#[derive(Error, Debug)]
pub enum RepositoryError {
    // ===== 连接/资源错误（整体不可用）=====
    #[error("database connection failed: {0}")]
    DatabaseConnectionError(String),

    #[error("database lock unavailable: {0}")]
    LockError(String),

    // ===== 数据库错误 =====
    #[error("database transaction failed: {0}")]
    DatabaseTransactionError(String),

    #[error("database query failed: {0}")]
    DatabaseQueryError(String),

    // ===== 约束错误（单条记录级别）=====
    #[error("unique constraint violated: {0}")]
    UniqueConstraintViolation(String),

    #[error("foreign key constraint violated: {0}")]
    ForeignKeyViolation(String),

    #[error("constraint violated: {0}")]
    ConstraintViolation(String),
}

impl RepositoryError {
    /// 单条记录被存储拒绝（批量写入中可跳过，不影响其他记录）
    pub fn is_constraint_violation(&self) -> bool {
        matches!(
            self,
            RepositoryError::UniqueConstraintViolation(_)
                | RepositoryError::ForeignKeyViolation(_)
                | RepositoryError::ConstraintViolation(_)
        )
    }

    /// 存储整体不可达（连接/锁）
    pub fn is_unavailable(&self) -> bool {
        matches!(
            self,
            RepositoryError::DatabaseConnectionError(_) | RepositoryError::LockError(_)
        )
    }
}

// 实现 From<rusqlite::Error>
impl From<rusqlite::Error> for RepositoryError {
    fn from(err: rusqlite::Error) -> Self {
        match err {
            rusqlite::Error::SqliteFailure(code, msg) => {
                let message = msg.unwrap_or_else(|| code.to_string());
                match code.code {
                    rusqlite::ErrorCode::ConstraintViolation => {
                        if message.contains("UNIQUE") {
                            RepositoryError::UniqueConstraintViolation(message)
                        } else if message.contains("FOREIGN KEY") {
                            RepositoryError::ForeignKeyViolation(message)
                        } else {
                            RepositoryError::ConstraintViolation(message)
                        }
                    }
                    rusqlite::ErrorCode::CannotOpen
                    | rusqlite::ErrorCode::DatabaseBusy
                    | rusqlite::ErrorCode::DatabaseLocked
                    | rusqlite::ErrorCode::NotADatabase => {
                        RepositoryError::DatabaseConnectionError(message)
                    }
                    _ => RepositoryError::DatabaseQueryError(message),
                }
            }
            _ => RepositoryError::DatabaseQueryError(err.to_string()),
        }
    }
}

/// Result 类型别名
pub type RepositoryResult<T> = Result<T, RepositoryError>;
