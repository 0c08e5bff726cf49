//! Register Use Case
//!
//! Creates a new user account. Terms are not accepted at this point; the
//! terms gate asks for them on first use.

use std::sync::Arc;

use kernel::id::UserId;

use crate::application::config::AuthConfig;
use crate::domain::entity::user::NewUser;
use crate::domain::repository::UserRepository;
use crate::domain::value_object::{
    birth_date::BirthDate,
    email::Email,
    full_name::FullName,
    national_id::NationalId,
    user_password::{RawPassword, UserPassword},
};
use crate::error::{AuthError, AuthResult};

pub struct RegisterInput {
    pub full_name: String,
    pub national_id: String,
    pub birth_date: String,
    pub email: String,
    pub password: String,
}

#[derive(Debug)]
pub struct RegisterOutput {
    pub user_id: UserId,
}

pub struct RegisterUseCase<U>
where
    U: UserRepository,
{
    user_repo: Arc<U>,
    config: Arc<AuthConfig>,
}

impl<U> RegisterUseCase<U>
where
    U: UserRepository,
{
    pub fn new(user_repo: Arc<U>, config: Arc<AuthConfig>) -> Self {
        Self { user_repo, config }
    }

    pub async fn execute(&self, input: RegisterInput) -> AuthResult<RegisterOutput> {
        let national_id = NationalId::new(&input.national_id)?;
        let full_name = FullName::new(&input.full_name)?;
        let email = Email::new(&input.email)?;
        let birth_date = BirthDate::parse(&input.birth_date)?;
        let raw_password = RawPassword::new(input.password)?;

        if self
            .user_repo
            .exists_by_national_id_or_email(&national_id, &email)
            .await?
        {
            return Err(AuthError::Conflict);
        }

        let password_hash = UserPassword::from_raw(&raw_password, self.config.pepper())?;

        // A concurrent registration can still win the race; the unique
        // constraints turn that into Conflict inside the repository.
        let user_id = self
            .user_repo
            .create(&NewUser {
                national_id,
                email,
                full_name,
                birth_date,
                password_hash,
            })
            .await?;

        tracing::info!(user_id = %user_id, "User registered");

        Ok(RegisterOutput { user_id })
    }
}
