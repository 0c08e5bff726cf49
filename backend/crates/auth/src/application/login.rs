//! Login Use Case
//!
//! Authenticates by national id and password and creates a session.
//! Credentials are fetched and verified before the profile is read.

use std::sync::Arc;

use kernel::principal::Principal;

use crate::application::{config::AuthConfig, session_token};
use crate::domain::entity::auth_session::AuthSession;
use crate::domain::repository::{CredentialRepository, SessionRepository, UserRepository};
use crate::domain::value_object::{national_id::NationalId, user_password::RawPassword};
use crate::error::{AuthError, AuthResult};

pub struct LoginInput {
    pub national_id: String,
    pub password: String,
}

#[derive(Debug)]
pub struct LoginOutput {
    /// Signed session token for the cookie
    pub session_token: String,
    pub principal: Principal,
}

pub struct LoginUseCase<U, C, S>
where
    U: UserRepository,
    C: CredentialRepository,
    S: SessionRepository,
{
    user_repo: Arc<U>,
    credential_repo: Arc<C>,
    session_repo: Arc<S>,
    config: Arc<AuthConfig>,
}

impl<U, C, S> LoginUseCase<U, C, S>
where
    U: UserRepository,
    C: CredentialRepository,
    S: SessionRepository,
{
    pub fn new(
        user_repo: Arc<U>,
        credential_repo: Arc<C>,
        session_repo: Arc<S>,
        config: Arc<AuthConfig>,
    ) -> Self {
        Self {
            user_repo,
            credential_repo,
            session_repo,
            config,
        }
    }

    pub async fn execute(&self, input: LoginInput) -> AuthResult<LoginOutput> {
        let national_id = NationalId::new(&input.national_id)?;

        let credential = self
            .credential_repo
            .find_by_national_id(&national_id)
            .await?
            .ok_or(AuthError::AccountNotFound)?;

        let raw_password = RawPassword::for_verification(input.password);
        if !credential
            .password_hash
            .verify(&raw_password, self.config.pepper())
        {
            return Err(AuthError::InvalidPassword);
        }

        let user = self
            .user_repo
            .find_by_id(credential.user_id)
            .await?
            .ok_or_else(|| AuthError::Internal("Credential without user profile".to_string()))?;

        let session = AuthSession::new(&user, self.config.session_ttl_chrono());
        self.session_repo.create(&session).await?;

        let session_token = session_token::sign(&self.config.session_secret, session.session_id)?;

        tracing::info!(
            user_id = %user.user_id,
            session_id = %session.session_id,
            is_admin = user.is_admin,
            "User logged in"
        );

        Ok(LoginOutput {
            session_token,
            principal: session.principal,
        })
    }
}
