//! Settings Context - Errors

use thiserror::Error;

#[derive(Debug, Error, PartialEq)]
pub enum SettingsError {
    #[error("无效的设置 {field}: {reason}")]
    InvalidValue { field: &'static str, reason: String },
}

impl SettingsError {
    pub fn invalid(field: &'static str, reason: impl Into<String>) -> Self {
        Self::InvalidValue {
            field,
            reason: reason.into(),
        }
    }
}
