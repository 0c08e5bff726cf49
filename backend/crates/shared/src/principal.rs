//! Authenticated principal
//!
//! The session-backed identity every guarded handler receives. Produced by
//! the auth crate's middleware, consumed by other domains through request
//! extensions so they never depend on auth internals.

use serde::Serialize;

use crate::id::UserId;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Principal {
    pub user_id: UserId,
    pub full_name: String,
    pub email: String,
    pub is_admin: bool,
}

impl Principal {
    /// Whether this principal may act on a resource owned by `owner`
    pub fn owns(&self, owner: UserId) -> bool {
        self.user_id == owner
    }
}
