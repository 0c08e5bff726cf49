//! Update Profile Use Case
//!
//! Full name, email and birth date are each optional. A name change is
//! copied into the user's non-anonymous reports, and name or email changes
//! are copied into every live session of the user.

use std::sync::Arc;

use chrono::Utc;
use kernel::id::UserId;

use crate::domain::entity::user::ProfileChanges;
use crate::domain::repository::{DisplayNameSync, SessionRepository, UserRepository};
use crate::domain::value_object::{birth_date::BirthDate, email::Email, full_name::FullName};
use crate::error::{AuthError, AuthResult};

/// Empty strings count as "not provided"
#[derive(Debug, Default)]
pub struct UpdateProfileInput {
    pub full_name: Option<String>,
    pub email: Option<String>,
    pub birth_date: Option<String>,
}

#[derive(Debug, PartialEq, Eq)]
pub struct UpdateProfileOutput {
    pub changed: bool,
    /// Reports whose display name was rewritten
    pub synced_reports: u64,
}

pub struct UpdateProfileUseCase<U, S, D>
where
    U: UserRepository,
    S: SessionRepository,
    D: DisplayNameSync,
{
    user_repo: Arc<U>,
    session_repo: Arc<S>,
    name_sync: Arc<D>,
}

fn provided(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}

impl<U, S, D> UpdateProfileUseCase<U, S, D>
where
    U: UserRepository,
    S: SessionRepository,
    D: DisplayNameSync,
{
    pub fn new(user_repo: Arc<U>, session_repo: Arc<S>, name_sync: Arc<D>) -> Self {
        Self {
            user_repo,
            session_repo,
            name_sync,
        }
    }

    pub async fn execute(
        &self,
        user_id: UserId,
        input: UpdateProfileInput,
    ) -> AuthResult<UpdateProfileOutput> {
        let changes = ProfileChanges {
            full_name: provided(input.full_name)
                .map(|v| FullName::new(&v))
                .transpose()?,
            email: provided(input.email).map(|v| Email::new(&v)).transpose()?,
            birth_date: provided(input.birth_date)
                .map(|v| BirthDate::parse(&v))
                .transpose()?,
        };

        if changes.is_empty() {
            return Ok(UpdateProfileOutput {
                changed: false,
                synced_reports: 0,
            });
        }

        if let Some(birth_date) = &changes.birth_date {
            birth_date.ensure_adult_on(Utc::now().date_naive())?;
        }

        if let Some(email) = &changes.email {
            if self
                .user_repo
                .exists_by_email_excluding(email, user_id)
                .await?
            {
                return Err(AuthError::EmailTaken);
            }
        }

        let mut user = self
            .user_repo
            .find_by_id(user_id)
            .await?
            .ok_or(AuthError::SessionInvalid)?;

        let name_changed = changes.apply_to(&mut user);
        self.user_repo.update_profile(&user).await?;

        let synced_reports = if name_changed {
            self.name_sync
                .sync_display_name(user_id, user.full_name.as_str())
                .await?
        } else {
            0
        };

        if changes.full_name.is_some() || changes.email.is_some() {
            self.session_repo
                .refresh_profile(user_id, user.full_name.as_str(), user.email.as_str())
                .await?;
        }

        tracing::info!(
            user_id = %user_id,
            name_changed,
            synced_reports,
            "Profile updated"
        );

        Ok(UpdateProfileOutput {
            changed: true,
            synced_reports,
        })
    }
}
