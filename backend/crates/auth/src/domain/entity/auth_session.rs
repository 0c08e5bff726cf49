//! Auth Session Entity
//!
//! Server-side session referenced by the signed cookie token. Carries the
//! principal snapshot (name, email, admin flag) so guarded requests need no
//! user lookup.

use chrono::{DateTime, Duration, Utc};
use kernel::principal::Principal;
use uuid::Uuid;

use crate::domain::entity::user::User;

#[derive(Debug, Clone)]
pub struct AuthSession {
    /// Session ID (UUID v4)
    pub session_id: Uuid,
    pub principal: Principal,
    /// Session expiration (Unix timestamp ms)
    pub expires_at_ms: i64,
    pub created_at: DateTime<Utc>,
}

impl AuthSession {
    /// Create a session for a freshly authenticated user
    ///
    /// TTL is provided by the application layer (config), not hard-coded here.
    pub fn new(user: &User, ttl: Duration) -> Self {
        let now = Utc::now();

        Self {
            session_id: Uuid::new_v4(),
            principal: Principal {
                user_id: user.user_id,
                full_name: user.full_name.as_str().to_string(),
                email: user.email.as_str().to_string(),
                is_admin: user.is_admin,
            },
            expires_at_ms: (now + ttl).timestamp_millis(),
            created_at: now,
        }
    }

    pub fn is_expired(&self) -> bool {
        Utc::now().timestamp_millis() > self.expires_at_ms
    }
}
