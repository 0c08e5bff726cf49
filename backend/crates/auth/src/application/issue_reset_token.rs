//! Issue Reset Token Use Case
//!
//! The caller always gets the same acknowledgment, whether or not the
//! address belongs to an account and whether or not the mail went out.

use std::sync::Arc;

use chrono::Utc;
use platform::mail::{Mailer, escape_html};

use crate::application::config::AuthConfig;
use crate::domain::entity::user::User;
use crate::domain::repository::{CredentialRepository, UserRepository};
use crate::domain::value_object::{email::Email, reset_token::ResetToken};
use crate::error::AuthResult;

pub struct IssueResetTokenUseCase<U, C, M>
where
    U: UserRepository,
    C: CredentialRepository,
    M: Mailer,
{
    user_repo: Arc<U>,
    credential_repo: Arc<C>,
    mailer: Arc<M>,
    config: Arc<AuthConfig>,
}

impl<U, C, M> IssueResetTokenUseCase<U, C, M>
where
    U: UserRepository,
    C: CredentialRepository,
    M: Mailer,
{
    pub fn new(
        user_repo: Arc<U>,
        credential_repo: Arc<C>,
        mailer: Arc<M>,
        config: Arc<AuthConfig>,
    ) -> Self {
        Self {
            user_repo,
            credential_repo,
            mailer,
            config,
        }
    }

    pub async fn execute(&self, email: &str) -> AuthResult<()> {
        let Ok(email) = Email::new(email) else {
            tracing::debug!("Reset requested for a malformed address");
            return Ok(());
        };

        let Some(user) = self.user_repo.find_by_email(&email).await? else {
            tracing::debug!("Reset requested for an unknown address");
            return Ok(());
        };

        let token = ResetToken::issue(Utc::now(), self.config.reset_token_ttl_chrono());
        self.credential_repo
            .set_reset_token(user.user_id, &token)
            .await?;

        let (subject, html) = reset_mail(&self.config, &user, &token.token);
        if let Err(e) = self.mailer.send(user.email.as_str(), &subject, &html).await {
            tracing::error!(user_id = %user.user_id, error = %e, "Reset mail not delivered");
        } else {
            tracing::info!(user_id = %user.user_id, "Reset token issued");
        }

        Ok(())
    }
}

/// Subject and HTML body of the reset mail
pub fn reset_mail(config: &AuthConfig, user: &User, token: &str) -> (String, String) {
    let link = escape_html(&config.reset_link(token));
    let subject = format!("[{}] Password reset", config.brand);
    let html = format!(
        "<p>Hello {name},</p>\
         <p>Follow this link to choose a new password: <a href=\"{link}\">{link}</a></p>\
         <p>The link expires in one hour. If you did not ask for it, ignore this message.</p>\
         <p>{brand} Team</p>",
        name = escape_html(user.full_name.as_str()),
        brand = escape_html(&config.brand),
    );
    (subject, html)
}
