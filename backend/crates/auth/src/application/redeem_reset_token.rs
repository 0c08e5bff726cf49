//! Redeem Reset Token Use Case
//!
//! Single use comes from clearing the token in the same statement that
//! stores the new hash.

use std::sync::Arc;

use chrono::Utc;

use crate::application::config::AuthConfig;
use crate::domain::repository::CredentialRepository;
use crate::domain::value_object::user_password::{RawPassword, UserPassword};
use crate::error::{AuthError, AuthResult};

pub struct RedeemResetTokenUseCase<C>
where
    C: CredentialRepository,
{
    credential_repo: Arc<C>,
    config: Arc<AuthConfig>,
}

impl<C> RedeemResetTokenUseCase<C>
where
    C: CredentialRepository,
{
    pub fn new(credential_repo: Arc<C>, config: Arc<AuthConfig>) -> Self {
        Self {
            credential_repo,
            config,
        }
    }

    pub async fn execute(&self, token: &str, new_password: String) -> AuthResult<()> {
        let raw = RawPassword::new(new_password)?;
        let hash = UserPassword::from_raw(&raw, self.config.pepper())?;

        let user_id = self
            .credential_repo
            .redeem_reset_token(token, &hash, Utc::now())
            .await?
            .ok_or(AuthError::TokenInvalid)?;

        tracing::info!(user_id = %user_id, "Password reset through token");
        Ok(())
    }
}
