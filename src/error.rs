//! Application error types and HTTP response conversion.
//!
//! This module defines the error types used throughout the dispatcher
//! and implements conversion to HTTP responses with consistent JSON format.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;

/// Error codes matching the external error taxonomy.
pub mod codes {
    pub const VALIDATION_ERROR: &str = "VALIDATION_ERROR";
    pub const AUTHENTICATION: &str = "AUTHENTICATION";
    pub const FORBIDDEN: &str = "FORBIDDEN";
    pub const NOT_FOUND: &str = "NOT_FOUND";
    pub const CONFLICT: &str = "CONFLICT";
    pub const GONE: &str = "GONE";
    pub const RATE_LIMITED: &str = "RATE_LIMITED";
    pub const TIMEOUT: &str = "TIMEOUT";
    pub const UNAVAILABLE: &str = "UNAVAILABLE";
    pub const PAYLOAD_TOO_LARGE: &str = "PAYLOAD_TOO_LARGE";
    pub const SERVER_ERROR: &str = "SERVER_ERROR";
}

/// One field-level validation failure.
#[derive(Debug, Clone, Serialize)]
pub struct FieldError {
    pub field: String,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub value: Option<String>,
}

impl FieldError {
    pub fn new(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            message: message.into(),
            value: None,
        }
    }

    pub fn with_value(mut self, value: impl Into<String>) -> Self {
        self.value = Some(value.into());
        self
    }
}

/// Error detail in API response.
#[derive(Debug, Clone, Serialize)]
pub struct ErrorDetail {
    pub code: &'static str,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<Vec<FieldError>>,
}

/// Application errors that can be returned from handlers.
///
/// Every kind maps to exactly one of the HTTP status codes the
/// external error taxonomy defines (400/401/403/404/409/410/429/
/// 500/503/408).
#[derive(Debug)]
pub enum AppError {
    /// Malformed or semantically invalid request (400).
    Validation(String, Vec<FieldError>),
    /// Principal could not be authenticated (401).
    Authentication(String),
    /// Principal authenticated but not permitted (403).
    Forbidden(String),
    /// Resource not found (404).
    NotFound(String),
    /// A concurrent write invalidated this operation (409).
    Conflict(String),
    /// Resource existed but is no longer valid/reachable (410).
    Gone(String),
    /// Caller exceeded its request quota (429).
    RateLimited(String),
    /// Operation did not complete before its deadline (408).
    Timeout(String),
    /// A dependency (store, routing target) is unavailable (503).
    Unavailable(String),
    /// Unexpected internal failure (500).
    Internal(String),
}

impl AppError {
    pub fn code(&self) -> &'static str {
        match self {
            AppError::Validation(..) => codes::VALIDATION_ERROR,
            AppError::Authentication(_) => codes::AUTHENTICATION,
            AppError::Forbidden(_) => codes::FORBIDDEN,
            AppError::NotFound(_) => codes::NOT_FOUND,
            AppError::Conflict(_) => codes::CONFLICT,
            AppError::Gone(_) => codes::GONE,
            AppError::RateLimited(_) => codes::RATE_LIMITED,
            AppError::Timeout(_) => codes::TIMEOUT,
            AppError::Unavailable(_) => codes::UNAVAILABLE,
            AppError::Internal(_) => codes::SERVER_ERROR,
        }
    }

    pub fn status_code(&self) -> StatusCode {
        match self {
            AppError::Validation(..) => StatusCode::BAD_REQUEST,
            AppError::Authentication(_) => StatusCode::UNAUTHORIZED,
            AppError::Forbidden(_) => StatusCode::FORBIDDEN,
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::Conflict(_) => StatusCode::CONFLICT,
            AppError::Gone(_) => StatusCode::GONE,
            AppError::RateLimited(_) => StatusCode::TOO_MANY_REQUESTS,
            AppError::Timeout(_) => StatusCode::REQUEST_TIMEOUT,
            AppError::Unavailable(_) => StatusCode::SERVICE_UNAVAILABLE,
            AppError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    pub fn message(&self) -> &str {
        match self {
            AppError::Validation(msg, _)
            | AppError::Authentication(msg)
            | AppError::Forbidden(msg)
            | AppError::NotFound(msg)
            | AppError::Conflict(msg)
            | AppError::Gone(msg)
            | AppError::RateLimited(msg)
            | AppError::Timeout(msg)
            | AppError::Unavailable(msg)
            | AppError::Internal(msg) => msg,
        }
    }

    pub fn validation(message: impl Into<String>) -> Self {
        AppError::Validation(message.into(), Vec::new())
    }

    pub fn validation_fields(message: impl Into<String>, fields: Vec<FieldError>) -> Self {
        AppError::Validation(message.into(), fields)
    }

    pub fn authentication(message: impl Into<String>) -> Self {
        AppError::Authentication(message.into())
    }

    pub fn forbidden(message: impl Into<String>) -> Self {
        AppError::Forbidden(message.into())
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        AppError::NotFound(message.into())
    }

    pub fn conflict(message: impl Into<String>) -> Self {
        AppError::Conflict(message.into())
    }

    pub fn gone(message: impl Into<String>) -> Self {
        AppError::Gone(message.into())
    }

    pub fn rate_limited(message: impl Into<String>) -> Self {
        AppError::RateLimited(message.into())
    }

    pub fn timeout(message: impl Into<String>) -> Self {
        AppError::Timeout(message.into())
    }

    pub fn unavailable(message: impl Into<String>) -> Self {
        AppError::Unavailable(message.into())
    }

    pub fn internal(message: impl Into<String>) -> Self {
        AppError::Internal(message.into())
    }
}

impl std::fmt::Display for AppError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{}] {}", self.code(), self.message())
    }
}

impl std::error::Error for AppError {}

/// Error response format matching the external API contract.
#[derive(Serialize)]
struct ErrorResponse {
    data: Option<()>,
    error: ErrorDetail,
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let details = match &self {
            AppError::Validation(_, fields) if !fields.is_empty() => Some(fields.clone()),
            _ => None,
        };

        let error_response = ErrorResponse {
            data: None,
            error: ErrorDetail {
                code: self.code(),
                message: self.message().to_string(),
                details,
            },
        };

        (self.status_code(), Json(error_response)).into_response()
    }
}

/// Convert from sqlx errors to AppError.
///
/// Row-lock contention surfaces from Postgres as a serialization failure
/// (SQLSTATE 40001) or deadlock (40P01); both become `Conflict` so the
/// dispatcher's bounded CAS retry (see `dispatcher::retry`) can react.
impl From<sqlx::Error> for AppError {
    fn from(err: sqlx::Error) -> Self {
        tracing::error!("Database error: {:?}", err);
        match &err {
            sqlx::Error::RowNotFound => AppError::not_found("Resource not found"),
            sqlx::Error::Database(db_err) => match db_err.code().as_deref() {
                Some("40001") | Some("40P01") => {
                    AppError::conflict("Concurrent update conflict, please retry")
                }
                Some("23505") => AppError::conflict("Duplicate value violates a uniqueness constraint"),
                _ => AppError::internal("Database error"),
            },
            sqlx::Error::PoolTimedOut | sqlx::Error::Io(_) => {
                AppError::unavailable("Database unavailable")
            }
            _ => AppError::internal("Database error"),
        }
    }
}

/// Convert from HashError to AppError.
impl From<crate::auth::HashError> for AppError {
    fn from(err: crate::auth::HashError) -> Self {
        tracing::error!("Hash error: {:?}", err);
        AppError::internal("Password hashing error")
    }
}

impl From<tokio::time::error::Elapsed> for AppError {
    fn from(_: tokio::time::error::Elapsed) -> Self {
        AppError::timeout("Request exceeded its deadline")
    }
}
