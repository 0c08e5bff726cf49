//! Access Guard
//!
//! Request gates composed by the presentation middleware: authenticated,
//! admin, terms accepted.

use std::sync::Arc;

use kernel::principal::Principal;

use crate::application::config::AuthConfig;
use crate::domain::repository::UserRepository;
use crate::error::{AuthError, AuthResult};

pub fn require_admin(principal: &Principal) -> AuthResult<()> {
    if principal.is_admin {
        Ok(())
    } else {
        Err(AuthError::AdminRequired)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TermsDecision {
    Allow,
    RedirectToTerms,
}

pub struct TermsGate<U>
where
    U: UserRepository,
{
    user_repo: Arc<U>,
    config: Arc<AuthConfig>,
}

impl<U> TermsGate<U>
where
    U: UserRepository,
{
    pub fn new(user_repo: Arc<U>, config: Arc<AuthConfig>) -> Self {
        Self { user_repo, config }
    }

    /// Whether `path` belongs to the terms flow and is never gated
    pub fn is_exempt(&self, path: &str) -> bool {
        path.starts_with(self.config.terms_path.as_str())
    }

    /// Looks the acceptance up on every call. A user with no row is let
    /// through; a failed lookup too when `terms_fail_open` is set.
    pub async fn check(&self, principal: &Principal) -> AuthResult<TermsDecision> {
        match self
            .user_repo
            .find_terms_accepted_at(principal.user_id)
            .await
        {
            Ok(Some(Some(_))) => Ok(TermsDecision::Allow),
            Ok(Some(None)) => Ok(TermsDecision::RedirectToTerms),
            Ok(None) => {
                tracing::debug!(user_id = %principal.user_id, "No user row for terms check");
                Ok(TermsDecision::Allow)
            }
            Err(e) if self.config.terms_fail_open => {
                tracing::warn!(
                    user_id = %principal.user_id,
                    error = %e,
                    "Terms lookup failed, letting request through"
                );
                Ok(TermsDecision::Allow)
            }
            Err(e) => Err(e),
        }
    }
}
