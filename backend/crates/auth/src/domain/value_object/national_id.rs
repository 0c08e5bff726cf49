//! National ID Value Object
//!
//! Eleven-digit national identification number. Input may carry any
//! punctuation ("123.456.789-09"); only digits are kept.

use derive_more::Display;
use kernel::error::app_error::{AppError, AppResult};

pub const NATIONAL_ID_DIGITS: usize = 11;

#[derive(Debug, Clone, PartialEq, Eq, Hash, Display)]
pub struct NationalId(String);

impl NationalId {
    pub fn new(raw: &str) -> AppResult<Self> {
        let digits: String = raw.chars().filter(|c| c.is_ascii_digit()).collect();

        if digits.len() != NATIONAL_ID_DIGITS {
            return Err(AppError::bad_request(format!(
                "National ID must have {} digits",
                NATIONAL_ID_DIGITS
            ))
            .with_field("national_id"));
        }

        Ok(Self(digits))
    }

    /// Create from database value (assumed already normalized)
    pub fn from_db(digits: impl Into<String>) -> Self {
        Self(digits.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}
