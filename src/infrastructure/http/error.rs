//! HTTP Error Handling
//!
//! 统一 JSON 信封 `{errno, error, data}`，同时返回真实的 HTTP 状态码，
//! 浏览器端的失败回调才能触发。非 AJAX 请求由生命周期中间件改写为错误页。

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;

use crate::application::{ApplicationError, RepositoryError, StoreError};

/// 统一错误响应格式
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub errno: i32,
    pub error: String,
    pub data: Option<()>,
}

impl ErrorResponse {
    pub fn new(errno: i32, error: impl Into<String>) -> Self {
        Self {
            errno,
            error: error.into(),
            data: None,
        }
    }
}

/// 错误码定义
pub mod errno {
    pub const BAD_REQUEST: i32 = 400;
    pub const NOT_FOUND: i32 = 404;
    pub const CONFLICT: i32 = 409;
    pub const UNPROCESSABLE: i32 = 422;
    pub const INTERNAL_ERROR: i32 = 500;
}

/// 附在错误响应上的信息，供中间件渲染错误页
#[derive(Debug, Clone)]
pub struct ApiErrorInfo {
    pub status: StatusCode,
    pub message: String,
}

/// API 错误
#[derive(Debug)]
pub enum ApiError {
    NotFound(String),
    BadRequest(String),
    Conflict(String),
    Unprocessable(String),
    Internal(String),
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::BadRequest(_) => StatusCode::BAD_REQUEST,
            ApiError::Conflict(_) => StatusCode::CONFLICT,
            ApiError::Unprocessable(_) => StatusCode::UNPROCESSABLE_ENTITY,
            ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    pub fn message(&self) -> &str {
        match self {
            ApiError::NotFound(msg)
            | ApiError::BadRequest(msg)
            | ApiError::Conflict(msg)
            | ApiError::Unprocessable(msg)
            | ApiError::Internal(msg) => msg,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        let errno = match &self {
            ApiError::NotFound(_) => errno::NOT_FOUND,
            ApiError::BadRequest(_) => errno::BAD_REQUEST,
            ApiError::Conflict(_) => errno::CONFLICT,
            ApiError::Unprocessable(_) => errno::UNPROCESSABLE,
            ApiError::Internal(_) => errno::INTERNAL_ERROR,
        };

        if status.is_server_error() {
            tracing::error!(errno, error = %self.message(), "Internal server error");
        } else {
            tracing::warn!(errno, error = %self.message(), "Request rejected");
        }

        let info = ApiErrorInfo {
            status,
            message: self.message().to_string(),
        };
        let body = ErrorResponse::new(errno, info.message.clone());
        let mut response = (status, Json(body)).into_response();
        response.extensions_mut().insert(info);
        response
    }
}

impl From<RepositoryError> for ApiError {
    fn from(e: RepositoryError) -> Self {
        match e {
            RepositoryError::NotFound(msg) => ApiError::NotFound(msg),
            _ => ApiError::Internal(e.to_string()),
        }
    }
}

impl From<StoreError> for ApiError {
    fn from(e: StoreError) -> Self {
        match e {
            StoreError::AlreadyExists(_) => ApiError::Conflict(e.to_string()),
            StoreError::NotFound(_) => ApiError::NotFound(e.to_string()),
            _ => ApiError::Internal(e.to_string()),
        }
    }
}

impl From<askama::Error> for ApiError {
    fn from(e: askama::Error) -> Self {
        ApiError::Internal(format!("Failed to render template: {}", e))
    }
}

impl From<ApplicationError> for ApiError {
    fn from(e: ApplicationError) -> Self {
        match e {
            ApplicationError::NotFound { resource_type, id } => {
                ApiError::NotFound(format!("{} not found: {}", resource_type, id))
            }
            ApplicationError::ValidationError(msg) => ApiError::Unprocessable(msg),
            ApplicationError::BusinessRuleViolation(msg) => ApiError::Conflict(msg),
            ApplicationError::InvalidState(msg) => ApiError::Internal(msg),
            ApplicationError::RepositoryError(msg) => ApiError::Internal(msg),
            ApplicationError::StoreError(e) => ApiError::from(e),
            ApplicationError::InternalError(msg) => ApiError::Internal(msg),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_application_errors_map_to_status() {
        let cases = [
            (ApplicationError::not_found("Book", 9), StatusCode::NOT_FOUND),
            (ApplicationError::validation("bad"), StatusCode::UNPROCESSABLE_ENTITY),
            (ApplicationError::business_rule("no"), StatusCode::CONFLICT),
            (ApplicationError::internal("boom"), StatusCode::INTERNAL_SERVER_ERROR),
        ];

        for (error, status) in cases {
            assert_eq!(ApiError::from(error).status(), status);
        }
    }

    #[test]
    fn test_render_error_is_internal() {
        let error = ApiError::from(askama::Error::from(std::fmt::Error));

        assert_eq!(error.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert!(error.message().starts_with("Failed to render template"));
    }

    #[test]
    fn test_response_carries_error_info() {
        let response = ApiError::NotFound("Book not found: 9".to_string()).into_response();

        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        let info = response.extensions().get::<ApiErrorInfo>().unwrap();
        assert_eq!(info.message, "Book not found: 9");
    }
}
