//! Repository Traits
//!
//! Interfaces for data persistence. Implementation is in infrastructure layer.

use chrono::{DateTime, Utc};
use kernel::id::UserId;
use uuid::Uuid;

use crate::domain::entity::{
    auth_session::AuthSession,
    credential::Credential,
    user::{NewUser, User},
};
use crate::domain::value_object::{
    email::Email, national_id::NationalId, reset_token::ResetToken, user_password::UserPassword,
};
use crate::error::AuthResult;

/// User profile repository
#[trait_variant::make(UserRepository: Send)]
pub trait LocalUserRepository {
    /// Insert a user; a unique violation surfaces as `AuthError::Conflict`
    async fn create(&self, user: &NewUser) -> AuthResult<UserId>;

    async fn find_by_id(&self, user_id: UserId) -> AuthResult<Option<User>>;

    async fn find_by_email(&self, email: &Email) -> AuthResult<Option<User>>;

    async fn exists_by_national_id_or_email(
        &self,
        national_id: &NationalId,
        email: &Email,
    ) -> AuthResult<bool>;

    /// Whether another account already uses `email`
    async fn exists_by_email_excluding(&self, email: &Email, user_id: UserId)
    -> AuthResult<bool>;

    /// Persist full name, email and birth date
    async fn update_profile(&self, user: &User) -> AuthResult<()>;

    /// Terms acceptance time. Outer `None` means no such user, inner
    /// `None` means not accepted yet.
    async fn find_terms_accepted_at(
        &self,
        user_id: UserId,
    ) -> AuthResult<Option<Option<DateTime<Utc>>>>;

    async fn accept_terms(&self, user_id: UserId, at: DateTime<Utc>) -> AuthResult<()>;
}

/// Password hash and reset-token repository
#[trait_variant::make(CredentialRepository: Send)]
pub trait LocalCredentialRepository {
    async fn find_by_national_id(&self, national_id: &NationalId)
    -> AuthResult<Option<Credential>>;

    async fn find_by_user_id(&self, user_id: UserId) -> AuthResult<Option<Credential>>;

    async fn update_password(&self, user_id: UserId, hash: &UserPassword) -> AuthResult<()>;

    /// Store token and expiry together, replacing any previous token
    async fn set_reset_token(&self, user_id: UserId, token: &ResetToken) -> AuthResult<()>;

    /// Owner of `token` if it has not expired at `now`
    async fn find_user_by_reset_token(
        &self,
        token: &str,
        now: DateTime<Utc>,
    ) -> AuthResult<Option<UserId>>;

    /// Replace the hash and clear token and expiry in one statement, only
    /// if `token` is still valid at `now`. Returns the owner on success.
    async fn redeem_reset_token(
        &self,
        token: &str,
        hash: &UserPassword,
        now: DateTime<Utc>,
    ) -> AuthResult<Option<UserId>>;
}

/// Auth session repository
#[trait_variant::make(SessionRepository: Send)]
pub trait LocalSessionRepository {
    async fn create(&self, session: &AuthSession) -> AuthResult<()>;

    async fn find_by_id(&self, session_id: Uuid) -> AuthResult<Option<AuthSession>>;

    async fn delete(&self, session_id: Uuid) -> AuthResult<()>;

    /// Rewrite the principal snapshot of every live session of a user
    async fn refresh_profile(
        &self,
        user_id: UserId,
        full_name: &str,
        email: &str,
    ) -> AuthResult<u64>;

    async fn cleanup_expired(&self) -> AuthResult<u64>;
}

/// Keeps denormalized copies of a user's name in other tables current
#[trait_variant::make(DisplayNameSync: Send)]
pub trait LocalDisplayNameSync {
    /// Returns the number of rows updated
    async fn sync_display_name(&self, user_id: UserId, full_name: &str) -> AuthResult<u64>;
}
