//! User-related error types

use actix_web::http::StatusCode;
use actix_web::{HttpResponse, ResponseError};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Standard error response format
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub status: u16,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub code: Option<String>,
}

/// Errors raised while checking or applying user-management payloads
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum UserError {
    #[error("Validation error: {0}")]
    ValidationError(String),

    #[error("Invalid email format: {0}")]
    InvalidEmail(String),

    #[error("Password confirmation does not match")]
    PasswordMismatch,

    #[error("Password must be at least {0} characters long")]
    PasswordTooShort(usize),

    #[error("The new password must differ from the current one")]
    PasswordUnchanged,

    #[error("Forbidden: {0}")]
    Forbidden(String),

    #[error("Bulk action requires at least one user id")]
    EmptyBulkAction,

    #[error("Invalid pagination: {0}")]
    InvalidPagination(String),

    #[error("Invalid timestamps: {0}")]
    InvalidTimestamps(String),

    #[error("Request targets user {requested} but was applied to {actual}")]
    UserMismatch {
        requested: String,
        actual: String,
    },

    #[error("Unsupported media type: {0}")]
    UnsupportedMediaType(String),

    #[error("File too large: {size} bytes (max {max})")]
    FileTooLarge {
        size: u64,
        max: u64,
    },
}

impl UserError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            UserError::ValidationError(_)
            | UserError::InvalidEmail(_)
            | UserError::PasswordTooShort(_) => StatusCode::UNPROCESSABLE_ENTITY,
            UserError::PasswordMismatch
            | UserError::PasswordUnchanged
            | UserError::EmptyBulkAction
            | UserError::InvalidPagination(_)
            | UserError::UserMismatch {
                ..
            } => StatusCode::BAD_REQUEST,
            UserError::Forbidden(_) => StatusCode::FORBIDDEN,
            UserError::InvalidTimestamps(_) => StatusCode::INTERNAL_SERVER_ERROR,
            UserError::UnsupportedMediaType(_) => StatusCode::UNSUPPORTED_MEDIA_TYPE,
            UserError::FileTooLarge {
                ..
            } => StatusCode::PAYLOAD_TOO_LARGE,
        }
    }

    pub fn error_code(&self) -> Option<String> {
        let code = match self {
            UserError::ValidationError(_) => "VALIDATION_ERROR",
            UserError::InvalidEmail(_) => "INVALID_EMAIL",
            UserError::PasswordMismatch => "PASSWORD_MISMATCH",
            UserError::PasswordTooShort(_) => "PASSWORD_TOO_SHORT",
            UserError::PasswordUnchanged => "PASSWORD_UNCHANGED",
            UserError::Forbidden(_) => "FORBIDDEN",
            UserError::EmptyBulkAction => "EMPTY_BULK_ACTION",
            UserError::InvalidPagination(_) => "INVALID_PAGINATION",
            UserError::InvalidTimestamps(_) => "INVALID_TIMESTAMPS",
            UserError::UserMismatch {
                ..
            } => "USER_MISMATCH",
            UserError::UnsupportedMediaType(_) => "UNSUPPORTED_MEDIA_TYPE",
            UserError::FileTooLarge {
                ..
            } => "FILE_TOO_LARGE",
        };
        Some(code.to_string())
    }

    pub fn to_response(&self) -> ErrorResponse {
        ErrorResponse {
            status: self.status_code().as_u16(),
            message: self.to_string(),
            code: self.error_code(),
        }
    }
}

impl ResponseError for UserError {
    fn status_code(&self) -> StatusCode {
        UserError::status_code(self)
    }

    fn error_response(&self) -> HttpResponse {
        HttpResponse::build(UserError::status_code(self)).json(self.to_response())
    }
}
