//! Report Error Types
//!
//! Report-specific error variants that integrate with the unified
//! `kernel::error::AppError` response body.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use kernel::error::{app_error::AppError, kind::ErrorKind};
use thiserror::Error;

use crate::domain::value_object::report_status::ReportStatus;

/// Report-specific result type alias
pub type ReportResult<T> = Result<T, ReportError>;

/// One message for "does not exist" and "not yours", so ids do not leak
pub const NOT_FOUND_OR_FORBIDDEN_MESSAGE: &str = "Report not found or access denied";

#[derive(Debug, Error)]
pub enum ReportError {
    /// Malformed input (missing attachment, length caps, unknown status)
    #[error("{message}")]
    Validation {
        message: String,
        field: Option<&'static str>,
    },

    /// Attachment is neither an image nor a video
    #[error("Unsupported file type: {0}")]
    UnsupportedMedia(String),

    /// Attachment over the per-file size cap
    #[error("Attachment exceeds the {max_mb} MB limit")]
    AttachmentTooLarge { max_mb: usize },

    /// Missing report, or one the requester may not see
    #[error("Report not found or access denied")]
    NotFoundOrForbidden,

    /// Missing report on an administrative operation
    #[error("Report not found")]
    NotFound,

    /// Signed in but not an administrator
    #[error("Access denied: administrators only")]
    AdminRequired,

    /// Lifecycle does not allow this status change
    #[error("Cannot change report status from {from} to {to}")]
    InvalidTransition { from: ReportStatus, to: ReportStatus },

    #[error("Storage error: {0}")]
    Storage(#[from] std::io::Error),

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl ReportError {
    pub(crate) fn validation(message: impl Into<String>, field: &'static str) -> Self {
        ReportError::Validation {
            message: message.into(),
            field: Some(field),
        }
    }

    /// Get the HTTP status code for this error
    pub fn status_code(&self) -> StatusCode {
        StatusCode::from_u16(self.kind().status_code())
            .unwrap_or(StatusCode::INTERNAL_SERVER_ERROR)
    }

    pub fn kind(&self) -> ErrorKind {
        match self {
            ReportError::Validation { .. } => ErrorKind::BadRequest,
            ReportError::UnsupportedMedia(_) => ErrorKind::UnsupportedMediaType,
            ReportError::AttachmentTooLarge { .. } => ErrorKind::PayloadTooLarge,
            ReportError::NotFoundOrForbidden | ReportError::NotFound => ErrorKind::NotFound,
            ReportError::AdminRequired => ErrorKind::Forbidden,
            ReportError::InvalidTransition { .. } => ErrorKind::Conflict,
            ReportError::Storage(_) | ReportError::Database(_) | ReportError::Internal(_) => {
                ErrorKind::InternalServerError
            }
        }
    }

    /// Machine-readable code for clients that branch on the failure
    pub fn code(&self) -> Option<&'static str> {
        match self {
            ReportError::AdminRequired => Some("admin_required"),
            ReportError::InvalidTransition { .. } => Some("invalid_transition"),
            _ => None,
        }
    }

    pub fn field(&self) -> Option<&'static str> {
        match self {
            ReportError::Validation { field, .. } => *field,
            ReportError::UnsupportedMedia(_) | ReportError::AttachmentTooLarge { .. } => {
                Some("attachment")
            }
            _ => None,
        }
    }

    /// Convert to AppError; server-side failures get a generic message
    pub fn to_app_error(&self) -> AppError {
        let err = match self {
            ReportError::Storage(_) | ReportError::Database(_) | ReportError::Internal(_) => {
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
            ReportError::Storage(e) => {
                tracing::error!(error = %e, "Report storage error");
            }
            ReportError::Database(e) => {
                tracing::error!(error = %e, "Report database error");
            }
            ReportError::Internal(msg) => {
                tracing::error!(message = %msg, "Report internal error");
            }
            ReportError::AdminRequired => {
                tracing::warn!("Non-admin request to a moderation operation");
            }
            _ => {
                tracing::debug!(error = %self, "Report error");
            }
        }
    }
}

impl IntoResponse for ReportError {
    fn into_response(self) -> Response {
        self.log();
        self.to_app_error().into_response()
    }
}

/// Value objects report through `AppError`; bad input stays a validation error
impl From<AppError> for ReportError {
    fn from(err: AppError) -> Self {
        match err.kind() {
            ErrorKind::BadRequest | ErrorKind::UnprocessableEntity => ReportError::Validation {
                message: err.message().to_string(),
                field: err.field(),
            },
            _ => ReportError::Internal(err.to_string()),
        }
    }
}
