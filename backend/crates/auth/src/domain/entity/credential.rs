//! Credential Entity
//!
//! Password hash and reset state, loaded separately from the profile so
//! login touches as few columns as possible.

use kernel::id::UserId;

use crate::domain::value_object::{reset_token::ResetToken, user_password::UserPassword};

#[derive(Debug, Clone)]
pub struct Credential {
    pub user_id: UserId,
    pub password_hash: UserPassword,
    pub reset: Option<ResetToken>,
}
