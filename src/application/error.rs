//! 应用层错误定义
//!
//! 统一的命令/查询错误类型

use thiserror::Error;

use crate::application::ports::{RepositoryError, StoreError};
use crate::domain::book::BookError;
use crate::domain::settings::SettingsError;

/// 应用层错误
#[derive(Debug, Error)]
pub enum ApplicationError {
    /// 资源未找到
    #[error("{resource_type} not found: {id}")]
    NotFound {
        resource_type: &'static str,
        id: String,
    },

    /// 验证错误
    #[error("Validation error: {0}")]
    ValidationError(String),

    /// 业务规则违反
    #[error("Business rule violation: {0}")]
    BusinessRuleViolation(String),

    /// 状态无效
    #[error("Invalid state: {0}")]
    InvalidState(String),

    /// 仓储错误（数据访问失败）
    #[error("Repository error: {0}")]
    RepositoryError(String),

    /// 存储错误
    #[error("Store error: {0}")]
    StoreError(#[from] StoreError),

    /// 内部错误
    #[error("Internal error: {0}")]
    InternalError(String),
}

impl ApplicationError {
    /// 创建 NotFound 错误
    pub fn not_found(resource_type: &'static str, id: impl ToString) -> Self {
        Self::NotFound {
            resource_type,
            id: id.to_string(),
        }
    }

    /// 创建验证错误
    pub fn validation(message: impl Into<String>) -> Self {
        Self::ValidationError(message.into())
    }

    /// 创建业务规则违反错误
    pub fn business_rule(message: impl Into<String>) -> Self {
        Self::BusinessRuleViolation(message.into())
    }

    /// 创建状态无效错误
    pub fn invalid_state(message: impl Into<String>) -> Self {
        Self::InvalidState(message.into())
    }

    /// 创建内部错误
    pub fn internal(message: impl Into<String>) -> Self {
        Self::InternalError(message.into())
    }
}

impl From<RepositoryError> for ApplicationError {
    fn from(err: RepositoryError) -> Self {
        Self::RepositoryError(err.to_string())
    }
}

impl From<BookError> for ApplicationError {
    fn from(err: BookError) -> Self {
        match err {
            BookError::NotFound(id) => Self::not_found("Book", id),
            BookError::ChapterNotFound(id) => Self::not_found("Chapter", id),
            BookError::InvalidChapterOrder(_) => Self::ValidationError(err.to_string()),
            BookError::SnapshotReadOnly(_) | BookError::LastChapter(_) => {
                Self::BusinessRuleViolation(err.to_string())
            }
        }
    }
}

impl From<SettingsError> for ApplicationError {
    fn from(err: SettingsError) -> Self {
        Self::ValidationError(err.to_string())
    }
}
