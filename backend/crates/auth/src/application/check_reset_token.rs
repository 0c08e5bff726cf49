//! Check Reset Token Use Case
//!
//! Tells the reset form whether a token can still be redeemed.

use std::sync::Arc;

use chrono::Utc;

use crate::domain::repository::CredentialRepository;
use crate::error::{AuthError, AuthResult};

pub struct CheckResetTokenUseCase<C>
where
    C: CredentialRepository,
{
    credential_repo: Arc<C>,
}

impl<C> CheckResetTokenUseCase<C>
where
    C: CredentialRepository,
{
    pub fn new(credential_repo: Arc<C>) -> Self {
        Self { credential_repo }
    }

    pub async fn execute(&self, token: &str) -> AuthResult<()> {
        self.credential_repo
            .find_user_by_reset_token(token, Utc::now())
            .await?
            .map(|_| ())
            .ok_or(AuthError::TokenInvalid)
    }
}
