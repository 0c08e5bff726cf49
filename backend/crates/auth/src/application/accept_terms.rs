//! Accept Terms Use Case

use std::sync::Arc;

use chrono::Utc;
use kernel::id::UserId;

use crate::domain::repository::UserRepository;
use crate::error::AuthResult;

pub struct AcceptTermsUseCase<U>
where
    U: UserRepository,
{
    user_repo: Arc<U>,
}

impl<U> AcceptTermsUseCase<U>
where
    U: UserRepository,
{
    pub fn new(user_repo: Arc<U>) -> Self {
        Self { user_repo }
    }

    pub async fn execute(&self, user_id: UserId) -> AuthResult<()> {
        self.user_repo.accept_terms(user_id, Utc::now()).await?;
        tracing::info!(user_id = %user_id, "Terms accepted");
        Ok(())
    }
}
