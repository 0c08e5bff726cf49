//! Auth Error Types
//!
//! Auth-specific error variants that integrate with the unified
//! `kernel::error::AppError` response body.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use kernel::error::{app_error::AppError, kind::ErrorKind};
use thiserror::Error;

/// Auth-specific result type alias
pub type AuthResult<T> = Result<T, AuthError>;

/// Message returned by the admin gate
pub const ADMIN_REQUIRED_MESSAGE: &str = "Access denied: administrators only";

#[derive(Debug, Error)]
pub enum AuthError {
    /// Malformed input (national id, password length, age, length caps)
    #[error("{message}")]
    Validation {
        message: String,
        field: Option<&'static str>,
    },

    /// National id or email already registered
    #[error("National ID or email already registered")]
    Conflict,

    /// Email taken by another account during a profile update
    #[error("This email is already in use")]
    EmailTaken,

    /// No account for the given national id
    #[error("National ID not registered")]
    AccountNotFound,

    /// Password does not match the stored hash
    #[error("Incorrect password")]
    InvalidPassword,

    /// Current password does not match during a password change
    #[error("Current password is incorrect")]
    WrongCurrentPassword,

    /// Reset token missing, expired or already used
    #[error("Invalid or expired reset token")]
    TokenInvalid,

    /// Session not found or expired
    #[error("Session not found or expired")]
    SessionInvalid,

    /// Signed in but not an administrator
    #[error("Access denied: administrators only")]
    AdminRequired,

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl AuthError {
    /// Get the HTTP status code for this error
    pub fn status_code(&self) -> StatusCode {
        StatusCode::from_u16(self.kind().status_code())
            .unwrap_or(StatusCode::INTERNAL_SERVER_ERROR)
    }

    pub fn kind(&self) -> ErrorKind {
        match self {
            AuthError::Validation { .. } | AuthError::TokenInvalid => ErrorKind::BadRequest,
            AuthError::Conflict | AuthError::EmailTaken => ErrorKind::Conflict,
            AuthError::AccountNotFound
            | AuthError::InvalidPassword
            | AuthError::WrongCurrentPassword
            | AuthError::SessionInvalid => ErrorKind::Unauthorized,
            AuthError::AdminRequired => ErrorKind::Forbidden,
            AuthError::Database(_) | AuthError::Internal(_) => ErrorKind::InternalServerError,
        }
    }

    /// Machine-readable code for clients that branch on the failure
    pub fn code(&self) -> Option<&'static str> {
        match self {
            AuthError::AccountNotFound => Some("not_found"),
            AuthError::InvalidPassword => Some("bad_password"),
            AuthError::WrongCurrentPassword => Some("wrong_current_password"),
            AuthError::TokenInvalid => Some("invalid_token"),
            AuthError::AdminRequired => Some("admin_required"),
            _ => None,
        }
    }

    pub fn field(&self) -> Option<&'static str> {
        match self {
            AuthError::Validation { field, .. } => *field,
            AuthError::AccountNotFound => Some("national_id"),
            AuthError::InvalidPassword => Some("password"),
            AuthError::WrongCurrentPassword => Some("current_password"),
            AuthError::EmailTaken => Some("email"),
            _ => None,
        }
    }

    /// Convert to AppError; server-side failures get a generic message
    pub fn to_app_error(&self) -> AppError {
        let err = match self {
            AuthError::Database(_) | AuthError::Internal(_) => {
                AppError::internal("Internal server error")
            }
            _ => AppError::new(self.kind(), self.to_string()),
        };
        let err = match self.code() {
            Some(code) => err.with_code(code),
            None => err,
        };
        match self.field() {
            Some(field) => err.with_field(field),
            None => err,
        }
    }

    /// Log the error with appropriate level
    pub(crate) fn log(&self) {
        match self {
            AuthError::Database(e) => {
                tracing::error!(error = %e, "Auth database error");
            }
            AuthError::Internal(msg) => {
                tracing::error!(message = %msg, "Auth internal error");
            }
            AuthError::AccountNotFound | AuthError::InvalidPassword => {
                tracing::warn!(code = ?self.code(), "Failed login attempt");
            }
            AuthError::AdminRequired => {
                tracing::warn!("Non-admin request to an admin route");
            }
            _ => {
                tracing::debug!(error = %self, "Auth error");
            }
        }
    }
}

impl IntoResponse for AuthError {
    fn into_response(self) -> Response {
        self.log();
        self.to_app_error().into_response()
    }
}

/// Value objects report through `AppError`; bad input stays a validation error
impl From<AppError> for AuthError {
    fn from(err: AppError) -> Self {
        match err.kind() {
            ErrorKind::BadRequest | ErrorKind::UnprocessableEntity => AuthError::Validation {
                message: err.message().to_string(),
                field: err.field(),
            },
            _ => AuthError::Internal(err.to_string()),
        }
    }
}
