//! Use-case and router tests for the auth crate, run against in-memory
//! repositories.

#[cfg(test)]
mod support {
    use std::collections::HashMap;
    use std::sync::{Arc, Mutex};

    use chrono::{DateTime, Utc};
    use kernel::id::UserId;
    use platform::mail::{MailError, Mailer};
    use uuid::Uuid;

    use crate::domain::entity::{
        auth_session::AuthSession,
        credential::Credential,
        user::{NewUser, User},
    };
    use crate::domain::repository::{
        CredentialRepository, DisplayNameSync, SessionRepository, UserRepository,
    };
    use crate::domain::value_object::{
        email::Email, national_id::NationalId, reset_token::ResetToken,
        user_password::UserPassword,
    };
    use crate::error::{AuthError, AuthResult};

    pub struct StoredUser {
        pub user: User,
        pub hash: UserPassword,
        pub reset: Option<ResetToken>,
    }

    /// Non-anonymous report owned by a user, reduced to what name sync touches
    pub struct StoredReport {
        pub user_id: UserId,
        pub anonymous: bool,
        pub display_name: String,
    }

    #[derive(Default)]
    pub struct State {
        pub users: Vec<StoredUser>,
        pub sessions: HashMap<Uuid, AuthSession>,
        pub reports: Vec<StoredReport>,
        pub next_id: i64,
        pub fail_terms_lookup: bool,
    }

    #[derive(Clone, Default)]
    pub struct MemoryAuthStore {
        pub state: Arc<Mutex<State>>,
    }

    impl MemoryAuthStore {
        pub fn promote_to_admin(&self, user_id: UserId) {
            let mut state = self.state.lock().unwrap();
            if let Some(stored) = state.users.iter_mut().find(|u| u.user.user_id == user_id) {
                stored.user.is_admin = true;
            }
        }

        pub fn reset_token_of(&self, user_id: UserId) -> Option<ResetToken> {
            let state = self.state.lock().unwrap();
            state
                .users
                .iter()
                .find(|u| u.user.user_id == user_id)
                .and_then(|u| u.reset.clone())
        }

        pub fn force_reset_token(&self, user_id: UserId, token: ResetToken) {
            let mut state = self.state.lock().unwrap();
            if let Some(stored) = state.users.iter_mut().find(|u| u.user.user_id == user_id) {
                stored.reset = Some(token);
            }
        }

        pub fn add_report(&self, user_id: UserId, anonymous: bool, display_name: &str) {
            self.state.lock().unwrap().reports.push(StoredReport {
                user_id,
                anonymous,
                display_name: display_name.to_string(),
            });
        }

        pub fn display_names(&self) -> Vec<String> {
            let state = self.state.lock().unwrap();
            state
                .reports
                .iter()
                .map(|r| r.display_name.clone())
                .collect()
        }

        pub fn session_names(&self, user_id: UserId) -> Vec<String> {
            let state = self.state.lock().unwrap();
            state
                .sessions
                .values()
                .filter(|s| s.principal.user_id == user_id)
                .map(|s| s.principal.full_name.clone())
                .collect()
        }

        pub fn session_count(&self) -> usize {
            self.state.lock().unwrap().sessions.len()
        }

        pub fn fail_terms_lookup(&self) {
            self.state.lock().unwrap().fail_terms_lookup = true;
        }

        fn credential(stored: &StoredUser) -> Credential {
            Credential {
                user_id: stored.user.user_id,
                password_hash: stored.hash.clone(),
                reset: stored.reset.clone(),
            }
        }
    }

    impl UserRepository for MemoryAuthStore {
        async fn create(&self, new: &NewUser) -> AuthResult<UserId> {
            let mut state = self.state.lock().unwrap();
            if state.users.iter().any(|u| {
                u.user.national_id == new.national_id || u.user.email == new.email
            }) {
                return Err(AuthError::Conflict);
            }
            state.next_id += 1;
            let user_id = UserId::from_i64(state.next_id);
            state.users.push(StoredUser {
                user: User {
                    user_id,
                    national_id: new.national_id.clone(),
                    email: new.email.clone(),
                    full_name: new.full_name.clone(),
                    birth_date: new.birth_date,
                    is_admin: false,
                    terms_accepted_at: None,
                    created_at: Utc::now(),
                },
                hash: new.password_hash.clone(),
                reset: None,
            });
            Ok(user_id)
        }

        async fn find_by_id(&self, user_id: UserId) -> AuthResult<Option<User>> {
            let state = self.state.lock().unwrap();
            Ok(state
                .users
                .iter()
                .find(|u| u.user.user_id == user_id)
                .map(|u| u.user.clone()))
        }

        async fn find_by_email(&self, email: &Email) -> AuthResult<Option<User>> {
            let state = self.state.lock().unwrap();
            Ok(state
                .users
                .iter()
                .find(|u| &u.user.email == email)
                .map(|u| u.user.clone()))
        }

        async fn exists_by_national_id_or_email(
            &self,
            national_id: &NationalId,
            email: &Email,
        ) -> AuthResult<bool> {
            let state = self.state.lock().unwrap();
            Ok(state
                .users
                .iter()
                .any(|u| &u.user.national_id == national_id || &u.user.email == email))
        }

        async fn exists_by_email_excluding(
            &self,
            email: &Email,
            user_id: UserId,
        ) -> AuthResult<bool> {
            let state = self.state.lock().unwrap();
            Ok(state
                .users
                .iter()
                .any(|u| &u.user.email == email && u.user.user_id != user_id))
        }

        async fn update_profile(&self, user: &User) -> AuthResult<()> {
            let mut state = self.state.lock().unwrap();
            if let Some(stored) = state
                .users
                .iter_mut()
                .find(|u| u.user.user_id == user.user_id)
            {
                stored.user.full_name = user.full_name.clone();
                stored.user.email = user.email.clone();
                stored.user.birth_date = user.birth_date;
            }
            Ok(())
        }

        async fn find_terms_accepted_at(
            &self,
            user_id: UserId,
        ) -> AuthResult<Option<Option<DateTime<Utc>>>> {
            let state = self.state.lock().unwrap();
            if state.fail_terms_lookup {
                return Err(AuthError::Internal("connection reset".to_string()));
            }
            Ok(state
                .users
                .iter()
                .find(|u| u.user.user_id == user_id)
                .map(|u| u.user.terms_accepted_at))
        }

        async fn accept_terms(&self, user_id: UserId, at: DateTime<Utc>) -> AuthResult<()> {
            let mut state = self.state.lock().unwrap();
            if let Some(stored) = state.users.iter_mut().find(|u| u.user.user_id == user_id) {
                stored.user.terms_accepted_at = Some(at);
            }
            Ok(())
        }
    }

    impl CredentialRepository for MemoryAuthStore {
        async fn find_by_national_id(
            &self,
            national_id: &NationalId,
        ) -> AuthResult<Option<Credential>> {
            let state = self.state.lock().unwrap();
            Ok(state
                .users
                .iter()
                .find(|u| &u.user.national_id == national_id)
                .map(Self::credential))
        }

        async fn find_by_user_id(&self, user_id: UserId) -> AuthResult<Option<Credential>> {
            let state = self.state.lock().unwrap();
            Ok(state
                .users
                .iter()
                .find(|u| u.user.user_id == user_id)
                .map(Self::credential))
        }

        async fn update_password(&self, user_id: UserId, hash: &UserPassword) -> AuthResult<()> {
            let mut state = self.state.lock().unwrap();
            if let Some(stored) = state.users.iter_mut().find(|u| u.user.user_id == user_id) {
                stored.hash = hash.clone();
            }
            Ok(())
        }

        async fn set_reset_token(&self, user_id: UserId, token: &ResetToken) -> AuthResult<()> {
            self.force_reset_token(user_id, token.clone());
            Ok(())
        }

        async fn find_user_by_reset_token(
            &self,
            token: &str,
            now: DateTime<Utc>,
        ) -> AuthResult<Option<UserId>> {
            let state = self.state.lock().unwrap();
            Ok(state
                .users
                .iter()
                .find(|u| {
                    u.reset
                        .as_ref()
                        .is_some_and(|r| r.token == token && r.is_valid_at(now))
                })
                .map(|u| u.user.user_id))
        }

        async fn redeem_reset_token(
            &self,
            token: &str,
            hash: &UserPassword,
            now: DateTime<Utc>,
        ) -> AuthResult<Option<UserId>> {
            let mut state = self.state.lock().unwrap();
            let Some(stored) = state.users.iter_mut().find(|u| {
                u.reset
                    .as_ref()
                    .is_some_and(|r| r.token == token && r.is_valid_at(now))
            }) else {
                return Ok(None);
            };
            stored.hash = hash.clone();
            stored.reset = None;
            Ok(Some(stored.user.user_id))
        }
    }

    impl SessionRepository for MemoryAuthStore {
        async fn create(&self, session: &AuthSession) -> AuthResult<()> {
            let mut state = self.state.lock().unwrap();
            state.sessions.insert(session.session_id, session.clone());
            Ok(())
        }

        async fn find_by_id(&self, session_id: Uuid) -> AuthResult<Option<AuthSession>> {
            Ok(self.state.lock().unwrap().sessions.get(&session_id).cloned())
        }

        async fn delete(&self, session_id: Uuid) -> AuthResult<()> {
            self.state.lock().unwrap().sessions.remove(&session_id);
            Ok(())
        }

        async fn refresh_profile(
            &self,
            user_id: UserId,
            full_name: &str,
            email: &str,
        ) -> AuthResult<u64> {
            let mut state = self.state.lock().unwrap();
            let mut updated = 0;
            for session in state.sessions.values_mut() {
                if session.principal.user_id == user_id {
                    session.principal.full_name = full_name.to_string();
                    session.principal.email = email.to_string();
                    updated += 1;
                }
            }
            Ok(updated)
        }

        async fn cleanup_expired(&self) -> AuthResult<u64> {
            let mut state = self.state.lock().unwrap();
            let before = state.sessions.len();
            state.sessions.retain(|_, s| !s.is_expired());
            Ok((before - state.sessions.len()) as u64)
        }
    }

    impl DisplayNameSync for MemoryAuthStore {
        async fn sync_display_name(&self, user_id: UserId, full_name: &str) -> AuthResult<u64> {
            let mut state = self.state.lock().unwrap();
            let mut updated = 0;
            for report in state
                .reports
                .iter_mut()
                .filter(|r| r.user_id == user_id && !r.anonymous)
            {
                report.display_name = full_name.to_string();
                updated += 1;
            }
            Ok(updated)
        }
    }

    /// Mail sent through [`RecordingMailer`]
    #[derive(Debug, Clone)]
    pub struct SentMail {
        pub to: String,
        pub subject: String,
        pub html: String,
    }

    #[derive(Clone, Default)]
    pub struct RecordingMailer {
        pub sent: Arc<Mutex<Vec<SentMail>>>,
        pub fail: bool,
    }

    impl RecordingMailer {
        pub fn failing() -> Self {
            Self {
                fail: true,
                ..Default::default()
            }
        }

        pub fn sent(&self) -> Vec<SentMail> {
            self.sent.lock().unwrap().clone()
        }
    }

    impl Mailer for RecordingMailer {
        async fn send(&self, to: &str, subject: &str, html: &str) -> Result<(), MailError> {
            if self.fail {
                return Err(MailError::Rejected {
                    status: 503,
                    body: "mail relay down".to_string(),
                });
            }
            self.sent.lock().unwrap().push(SentMail {
                to: to.to_string(),
                subject: subject.to_string(),
                html: html.to_string(),
            });
            Ok(())
        }
    }
}

#[cfg(test)]
mod use_case_tests {
    use std::sync::Arc;

    use chrono::{Duration, Utc};
    use kernel::id::UserId;
    use kernel::principal::Principal;

    use super::support::{MemoryAuthStore, RecordingMailer};
    use crate::application::*;
    use crate::domain::value_object::reset_token::ResetToken;
    use crate::error::AuthError;

    fn config() -> Arc<AuthConfig> {
        Arc::new(AuthConfig {
            public_base_url: "https://reports.example.org".to_string(),
            ..AuthConfig::development()
        })
    }

    fn register_input(national_id: &str, email: &str) -> RegisterInput {
        RegisterInput {
            full_name: "Maria Silva".to_string(),
            national_id: national_id.to_string(),
            birth_date: "1990-05-17".to_string(),
            email: email.to_string(),
            password: "secret1".to_string(),
        }
    }

    async fn register(store: &Arc<MemoryAuthStore>, config: &Arc<AuthConfig>) -> UserId {
        RegisterUseCase::new(store.clone(), config.clone())
            .execute(register_input("123.456.789-09", "maria@example.org"))
            .await
            .unwrap()
            .user_id
    }

    async fn login(
        store: &Arc<MemoryAuthStore>,
        config: &Arc<AuthConfig>,
        password: &str,
    ) -> Result<LoginOutput, AuthError> {
        LoginUseCase::new(store.clone(), store.clone(), store.clone(), config.clone())
            .execute(LoginInput {
                national_id: "12345678909".to_string(),
                password: password.to_string(),
            })
            .await
    }

    #[tokio::test]
    async fn test_register_then_login_is_not_admin() {
        let store = Arc::new(MemoryAuthStore::default());
        let config = config();
        let user_id = register(&store, &config).await;

        let output = login(&store, &config, "secret1").await.unwrap();
        assert_eq!(output.principal.user_id, user_id);
        assert_eq!(output.principal.full_name, "Maria Silva");
        assert!(!output.principal.is_admin);

        let session = CheckSessionUseCase::new(store.clone(), config.clone())
            .execute(&output.session_token)
            .await
            .unwrap();
        assert_eq!(session.principal, output.principal);
    }

    #[tokio::test]
    async fn test_duplicate_national_id_after_normalization_conflicts() {
        let store = Arc::new(MemoryAuthStore::default());
        let config = config();
        register(&store, &config).await;

        let err = RegisterUseCase::new(store.clone(), config.clone())
            .execute(register_input("12345678909", "other@example.org"))
            .await
            .unwrap_err();
        assert!(matches!(err, AuthError::Conflict));
    }

    #[tokio::test]
    async fn test_register_rejects_short_national_id() {
        let store = Arc::new(MemoryAuthStore::default());
        let err = RegisterUseCase::new(store.clone(), config())
            .execute(register_input("123.456.789", "maria@example.org"))
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            AuthError::Validation {
                field: Some("national_id"),
                ..
            }
        ));
    }

    #[tokio::test]
    async fn test_login_failures_are_distinguished() {
        let store = Arc::new(MemoryAuthStore::default());
        let config = config();

        let err = login(&store, &config, "secret1").await.unwrap_err();
        assert!(matches!(err, AuthError::AccountNotFound));

        register(&store, &config).await;
        let err = login(&store, &config, "wrong-password").await.unwrap_err();
        assert!(matches!(err, AuthError::InvalidPassword));

        // Too short for a new password, but still just a wrong one here
        let err = login(&store, &config, "abc").await.unwrap_err();
        assert!(matches!(err, AuthError::InvalidPassword));
    }

    #[tokio::test]
    async fn test_logout_invalidates_session() {
        let store = Arc::new(MemoryAuthStore::default());
        let config = config();
        register(&store, &config).await;
        let output = login(&store, &config, "secret1").await.unwrap();

        LogoutUseCase::new(store.clone(), config.clone())
            .execute(&output.session_token)
            .await
            .unwrap();

        let err = CheckSessionUseCase::new(store.clone(), config.clone())
            .execute(&output.session_token)
            .await
            .unwrap_err();
        assert!(matches!(err, AuthError::SessionInvalid));
    }

    #[tokio::test]
    async fn test_change_password() {
        let store = Arc::new(MemoryAuthStore::default());
        let config = config();
        let user_id = register(&store, &config).await;
        let use_case = ChangePasswordUseCase::new(store.clone(), config.clone());

        let err = use_case
            .execute(
                user_id,
                ChangePasswordInput {
                    current_password: "secret1".to_string(),
                    new_password: "12345".to_string(),
                },
            )
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            AuthError::Validation {
                field: Some("new_password"),
                ..
            }
        ));

        let err = use_case
            .execute(
                user_id,
                ChangePasswordInput {
                    current_password: "not-it".to_string(),
                    new_password: "secret2".to_string(),
                },
            )
            .await
            .unwrap_err();
        assert!(matches!(err, AuthError::WrongCurrentPassword));

        use_case
            .execute(
                user_id,
                ChangePasswordInput {
                    current_password: "secret1".to_string(),
                    new_password: "secret2".to_string(),
                },
            )
            .await
            .unwrap();
        assert!(login(&store, &config, "secret2").await.is_ok());
        assert!(login(&store, &config, "secret1").await.is_err());
    }

    #[tokio::test]
    async fn test_reset_token_lifecycle() {
        let store = Arc::new(MemoryAuthStore::default());
        let mailer = Arc::new(RecordingMailer::default());
        let config = config();
        let user_id = register(&store, &config).await;

        IssueResetTokenUseCase::new(store.clone(), store.clone(), mailer.clone(), config.clone())
            .execute("Maria@Example.org")
            .await
            .unwrap();

        let token = store.reset_token_of(user_id).unwrap();
        assert!(token.expires_at > Utc::now() + Duration::minutes(59));

        let sent = mailer.sent();
        assert_eq!(sent.len(), 1);
        assert_eq!(sent[0].to, "maria@example.org");
        assert!(sent[0].html.contains("Hello Maria Silva"));
        assert!(sent[0].html.contains(&format!(
            "https://reports.example.org/reset-password/{}",
            token.token
        )));

        CheckResetTokenUseCase::new(store.clone())
            .execute(&token.token)
            .await
            .unwrap();

        let redeem = RedeemResetTokenUseCase::new(store.clone(), config.clone());
        redeem
            .execute(&token.token, "brand-new".to_string())
            .await
            .unwrap();
        assert!(store.reset_token_of(user_id).is_none());
        assert!(login(&store, &config, "brand-new").await.is_ok());

        let err = redeem
            .execute(&token.token, "another1".to_string())
            .await
            .unwrap_err();
        assert!(matches!(err, AuthError::TokenInvalid));
    }

    #[tokio::test]
    async fn test_reset_request_for_unknown_email_is_silent() {
        let store = Arc::new(MemoryAuthStore::default());
        let mailer = Arc::new(RecordingMailer::default());

        IssueResetTokenUseCase::new(store.clone(), store.clone(), mailer.clone(), config())
            .execute("nobody@example.org")
            .await
            .unwrap();
        assert!(mailer.sent().is_empty());
    }

    #[tokio::test]
    async fn test_reset_request_survives_mail_failure() {
        let store = Arc::new(MemoryAuthStore::default());
        let config = config();
        let user_id = register(&store, &config).await;

        IssueResetTokenUseCase::new(
            store.clone(),
            store.clone(),
            Arc::new(RecordingMailer::failing()),
            config,
        )
        .execute("maria@example.org")
        .await
        .unwrap();
        assert!(store.reset_token_of(user_id).is_some());
    }

    #[tokio::test]
    async fn test_expired_reset_token_is_rejected() {
        let store = Arc::new(MemoryAuthStore::default());
        let config = config();
        let user_id = register(&store, &config).await;

        let expired = ResetToken::issue(Utc::now() - Duration::hours(2), Duration::hours(1));
        store.force_reset_token(user_id, expired.clone());

        let err = CheckResetTokenUseCase::new(store.clone())
            .execute(&expired.token)
            .await
            .unwrap_err();
        assert!(matches!(err, AuthError::TokenInvalid));

        let err = RedeemResetTokenUseCase::new(store.clone(), config.clone())
            .execute(&expired.token, "brand-new".to_string())
            .await
            .unwrap_err();
        assert!(matches!(err, AuthError::TokenInvalid));
        assert!(login(&store, &config, "secret1").await.is_ok());
    }

    #[tokio::test]
    async fn test_redeem_validates_password_length() {
        let store = Arc::new(MemoryAuthStore::default());
        let config = config();
        let user_id = register(&store, &config).await;
        let token = ResetToken::issue(Utc::now(), Duration::hours(1));
        store.force_reset_token(user_id, token.clone());

        let err = RedeemResetTokenUseCase::new(store.clone(), config)
            .execute(&token.token, "123".to_string())
            .await
            .unwrap_err();
        assert!(matches!(err, AuthError::Validation { .. }));
        assert!(store.reset_token_of(user_id).is_some());
    }

    #[tokio::test]
    async fn test_profile_name_change_propagates() {
        let store = Arc::new(MemoryAuthStore::default());
        let config = config();
        let user_id = register(&store, &config).await;
        login(&store, &config, "secret1").await.unwrap();
        store.add_report(user_id, false, "Maria Silva");
        store.add_report(user_id, true, "Anonymous");

        let output = UpdateProfileUseCase::new(store.clone(), store.clone(), store.clone())
            .execute(
                user_id,
                UpdateProfileInput {
                    full_name: Some("Maria S. Costa".to_string()),
                    ..Default::default()
                },
            )
            .await
            .unwrap();

        assert_eq!(
            output,
            UpdateProfileOutput {
                changed: true,
                synced_reports: 1
            }
        );
        assert_eq!(store.display_names(), vec!["Maria S. Costa", "Anonymous"]);
        assert_eq!(store.session_names(user_id), vec!["Maria S. Costa"]);
    }

    #[tokio::test]
    async fn test_profile_update_rules() {
        let store = Arc::new(MemoryAuthStore::default());
        let config = config();
        let user_id = register(&store, &config).await;
        RegisterUseCase::new(store.clone(), config.clone())
            .execute(register_input("98765432100", "joao@example.org"))
            .await
            .unwrap();
        let use_case = UpdateProfileUseCase::new(store.clone(), store.clone(), store.clone());

        let err = use_case
            .execute(
                user_id,
                UpdateProfileInput {
                    email: Some("joao@example.org".to_string()),
                    ..Default::default()
                },
            )
            .await
            .unwrap_err();
        assert!(matches!(err, AuthError::EmailTaken));
        assert_eq!(err.status_code(), axum::http::StatusCode::CONFLICT);
        assert_eq!(err.field(), Some("email"));

        let underage = (Utc::now() - Duration::days(365 * 10)).date_naive();
        let err = use_case
            .execute(
                user_id,
                UpdateProfileInput {
                    birth_date: Some(underage.format("%Y-%m-%d").to_string()),
                    ..Default::default()
                },
            )
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            AuthError::Validation {
                field: Some("birth_date"),
                ..
            }
        ));

        let err = use_case
            .execute(
                user_id,
                UpdateProfileInput {
                    full_name: Some("x".repeat(101)),
                    ..Default::default()
                },
            )
            .await
            .unwrap_err();
        assert!(matches!(err, AuthError::Validation { .. }));

        let output = use_case
            .execute(
                user_id,
                UpdateProfileInput {
                    full_name: Some(String::new()),
                    ..Default::default()
                },
            )
            .await
            .unwrap();
        assert!(!output.changed);

        // Keeping one's own address is not a conflict
        let output = use_case
            .execute(
                user_id,
                UpdateProfileInput {
                    email: Some("maria@example.org".to_string()),
                    ..Default::default()
                },
            )
            .await
            .unwrap();
        assert!(output.changed);
    }

    #[tokio::test]
    async fn test_terms_gate() {
        let store = Arc::new(MemoryAuthStore::default());
        let config = config();
        let user_id = register(&store, &config).await;
        let principal = Principal {
            user_id,
            full_name: "Maria Silva".to_string(),
            email: "maria@example.org".to_string(),
            is_admin: false,
        };
        let gate = TermsGate::new(store.clone(), config.clone());

        assert!(gate.is_exempt("/terms"));
        assert!(!gate.is_exempt("/api/reports/feed"));
        assert_eq!(
            gate.check(&principal).await.unwrap(),
            TermsDecision::RedirectToTerms
        );

        AcceptTermsUseCase::new(store.clone())
            .execute(user_id)
            .await
            .unwrap();
        assert_eq!(gate.check(&principal).await.unwrap(), TermsDecision::Allow);
    }

    #[tokio::test]
    async fn test_terms_gate_lets_unknown_user_through() {
        let store = Arc::new(MemoryAuthStore::default());
        let stranger = Principal {
            user_id: UserId::from_i64(4242),
            full_name: "Gone".to_string(),
            email: "gone@example.org".to_string(),
            is_admin: false,
        };

        let gate = TermsGate::new(store, config());
        assert_eq!(gate.check(&stranger).await.unwrap(), TermsDecision::Allow);
    }

    #[tokio::test]
    async fn test_terms_gate_lookup_failure() {
        let store = Arc::new(MemoryAuthStore::default());
        store.fail_terms_lookup();
        let principal = Principal {
            user_id: UserId::from_i64(1),
            full_name: "X".to_string(),
            email: "x@example.org".to_string(),
            is_admin: false,
        };

        let open = TermsGate::new(store.clone(), config());
        assert_eq!(open.check(&principal).await.unwrap(), TermsDecision::Allow);

        let closed = TermsGate::new(
            store.clone(),
            Arc::new(AuthConfig {
                terms_fail_open: false,
                ..AuthConfig::development()
            }),
        );
        assert!(closed.check(&principal).await.is_err());
    }

    #[test]
    fn test_require_admin() {
        let mut principal = Principal {
            user_id: UserId::from_i64(1),
            full_name: "X".to_string(),
            email: "x@example.org".to_string(),
            is_admin: false,
        };
        assert!(matches!(
            require_admin(&principal),
            Err(AuthError::AdminRequired)
        ));
        principal.is_admin = true;
        assert!(require_admin(&principal).is_ok());
    }
}

#[cfg(test)]
mod router_tests {
    use std::sync::Arc;

    use axum::Router;
    use axum::body::{Body, to_bytes};
    use axum::http::{Request, StatusCode, header};
    use axum::middleware::from_fn_with_state;
    use axum::routing::get;
    use tower::ServiceExt;

    use super::support::{MemoryAuthStore, RecordingMailer};
    use crate::application::AuthConfig;
    use crate::presentation::middleware::{
        AuthGuardState, require_admin, require_authenticated, require_terms_accepted,
    };
    use crate::presentation::router::auth_router;

    fn app(store: Arc<MemoryAuthStore>, config: Arc<AuthConfig>) -> Router {
        let guard = AuthGuardState::new(store.clone(), config.clone());
        let admin = Router::new()
            .route("/admin/ping", get(|| async { "pong" }))
            .route_layer(from_fn_with_state(
                guard.clone(),
                require_admin::<MemoryAuthStore>,
            ))
            .route_layer(from_fn_with_state(
                guard.clone(),
                require_authenticated::<MemoryAuthStore>,
            ));
        let gated = Router::new()
            .route("/feed", get(|| async { "feed" }))
            .route_layer(from_fn_with_state(
                guard.clone(),
                require_terms_accepted::<MemoryAuthStore>,
            ))
            .route_layer(from_fn_with_state(
                guard,
                require_authenticated::<MemoryAuthStore>,
            ));

        Router::new()
            .nest(
                "/api/auth",
                auth_router(store, Arc::new(RecordingMailer::default()), config),
            )
            .merge(admin)
            .merge(gated)
    }

    fn json_post(uri: &str, body: serde_json::Value) -> Request<Body> {
        Request::post(uri)
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    fn get_with_cookie(uri: &str, cookie: &str) -> Request<Body> {
        Request::get(uri)
            .header(header::COOKIE, cookie)
            .body(Body::empty())
            .unwrap()
    }

    /// Register and log in, returning the `name=value` cookie pair
    async fn sign_in(app: &Router) -> String {
        let response = app
            .clone()
            .oneshot(json_post(
                "/api/auth/register",
                serde_json::json!({
                    "fullName": "Maria Silva",
                    "nationalId": "123.456.789-09",
                    "birthDate": "1990-05-17",
                    "email": "maria@example.org",
                    "password": "secret1",
                }),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::CREATED);

        let response = app
            .clone()
            .oneshot(json_post(
                "/api/auth/login",
                serde_json::json!({ "nationalId": "12345678909", "password": "secret1" }),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let set_cookie = response
            .headers()
            .get(header::SET_COOKIE)
            .unwrap()
            .to_str()
            .unwrap()
            .to_string();
        assert!(set_cookie.contains("HttpOnly"));
        set_cookie.split(';').next().unwrap().to_string()
    }

    #[tokio::test]
    async fn test_anonymous_request_is_redirected_to_sign_in() {
        let app = app(
            Arc::new(MemoryAuthStore::default()),
            Arc::new(AuthConfig::development()),
        );

        let response = app
            .oneshot(Request::get("/api/auth/profile").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::SEE_OTHER);
        assert_eq!(response.headers()[header::LOCATION], "/login.html");
    }

    #[tokio::test]
    async fn test_profile_with_session_cookie() {
        let app = app(
            Arc::new(MemoryAuthStore::default()),
            Arc::new(AuthConfig::development()),
        );
        let cookie = sign_in(&app).await;

        let response = app
            .oneshot(get_with_cookie("/api/auth/profile", &cookie))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let json: serde_json::Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(json["nationalId"], "12345678909");
        assert_eq!(json["isAdmin"], false);
    }

    #[tokio::test]
    async fn test_wrong_password_problem_details() {
        let app = app(
            Arc::new(MemoryAuthStore::default()),
            Arc::new(AuthConfig::development()),
        );
        sign_in(&app).await;

        let response = app
            .oneshot(json_post(
                "/api/auth/login",
                serde_json::json!({ "nationalId": "12345678909", "password": "nope-nope" }),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

        let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let json: serde_json::Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(json["code"], "bad_password");
        assert_eq!(json["field"], "password");
    }

    #[tokio::test]
    async fn test_admin_gate() {
        let store = Arc::new(MemoryAuthStore::default());
        let app = app(store.clone(), Arc::new(AuthConfig::development()));
        let cookie = sign_in(&app).await;

        let response = app
            .clone()
            .oneshot(get_with_cookie("/admin/ping", &cookie))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::FORBIDDEN);
        let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let json: serde_json::Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(json["detail"], crate::error::ADMIN_REQUIRED_MESSAGE);

        // The admin flag is read at login, so promote and sign in again
        store.promote_to_admin(kernel::id::UserId::from_i64(1));
        let response = app
            .clone()
            .oneshot(json_post(
                "/api/auth/login",
                serde_json::json!({ "nationalId": "12345678909", "password": "secret1" }),
            ))
            .await
            .unwrap();
        let cookie = response.headers()[header::SET_COOKIE]
            .to_str()
            .unwrap()
            .split(';')
            .next()
            .unwrap()
            .to_string();

        let response = app
            .oneshot(get_with_cookie("/admin/ping", &cookie))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn test_terms_gate_redirects_until_accepted() {
        let app = app(
            Arc::new(MemoryAuthStore::default()),
            Arc::new(AuthConfig::development()),
        );
        let cookie = sign_in(&app).await;

        let response = app
            .clone()
            .oneshot(get_with_cookie("/feed", &cookie))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::SEE_OTHER);
        assert_eq!(response.headers()[header::LOCATION], "/terms");

        let response = app
            .clone()
            .oneshot(
                Request::post("/api/auth/accept-terms")
                    .header(header::COOKIE, &cookie)
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let response = app
            .oneshot(get_with_cookie("/feed", &cookie))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn test_logout_clears_cookie_and_session() {
        let store = Arc::new(MemoryAuthStore::default());
        let app = app(store.clone(), Arc::new(AuthConfig::development()));
        let cookie = sign_in(&app).await;
        assert_eq!(store.session_count(), 1);

        let response = app
            .oneshot(
                Request::post("/api/auth/logout")
                    .header(header::COOKIE, &cookie)
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::SEE_OTHER);
        assert!(
            response.headers()[header::SET_COOKIE]
                .to_str()
                .unwrap()
                .contains("Max-Age=0")
        );
        assert_eq!(store.session_count(), 0);
    }
}
