//! Password Reset Token
//!
//! Opaque single-use secret with an expiry. Token and expiry are stored
//! together or not at all.

use chrono::{DateTime, Duration, Utc};
use platform::crypto::{RESET_TOKEN_BYTES, random_token_hex};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResetToken {
    pub token: String,
    pub expires_at: DateTime<Utc>,
}

impl ResetToken {
    /// Fresh token valid for `ttl` from `now`
    pub fn issue(now: DateTime<Utc>, ttl: Duration) -> Self {
        Self {
            token: random_token_hex(RESET_TOKEN_BYTES),
            expires_at: now + ttl,
        }
    }

    /// Rebuild from the two nullable columns; half-set rows read as no token
    pub fn from_db(token: Option<String>, expires_at: Option<DateTime<Utc>>) -> Option<Self> {
        match (token, expires_at) {
            (Some(token), Some(expires_at)) => Some(Self { token, expires_at }),
            _ => None,
        }
    }

    pub fn is_valid_at(&self, now: DateTime<Utc>) -> bool {
        now < self.expires_at
    }
}
