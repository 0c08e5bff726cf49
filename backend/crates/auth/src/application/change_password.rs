//! Change Password Use Case

use std::sync::Arc;

use kernel::id::UserId;

use crate::application::config::AuthConfig;
use crate::domain::repository::CredentialRepository;
use crate::domain::value_object::user_password::{RawPassword, UserPassword};
use crate::error::{AuthError, AuthResult};

pub struct ChangePasswordInput {
    pub current_password: String,
    pub new_password: String,
}

pub struct ChangePasswordUseCase<C>
where
    C: CredentialRepository,
{
    credential_repo: Arc<C>,
    config: Arc<AuthConfig>,
}

impl<C> ChangePasswordUseCase<C>
where
    C: CredentialRepository,
{
    pub fn new(credential_repo: Arc<C>, config: Arc<AuthConfig>) -> Self {
        Self {
            credential_repo,
            config,
        }
    }

    pub async fn execute(&self, user_id: UserId, input: ChangePasswordInput) -> AuthResult<()> {
        let new_password = RawPassword::with_field(input.new_password, "new_password")?;

        let credential = self
            .credential_repo
            .find_by_user_id(user_id)
            .await?
            .ok_or(AuthError::SessionInvalid)?;

        let current = RawPassword::for_verification(input.current_password);
        if !credential
            .password_hash
            .verify(&current, self.config.pepper())
        {
            return Err(AuthError::WrongCurrentPassword);
        }

        let hash = UserPassword::from_raw(&new_password, self.config.pepper())?;
        self.credential_repo.update_password(user_id, &hash).await?;

        tracing::info!(user_id = %user_id, "Password changed");
        Ok(())
    }
}
