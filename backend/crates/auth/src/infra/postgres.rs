//! PostgreSQL Repository Implementations

use chrono::{DateTime, NaiveDate, Utc};
use kernel::error::conversions::is_unique_violation;
use kernel::id::UserId;
use kernel::principal::Principal;
use sqlx::PgPool;
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
    birth_date::BirthDate, email::Email, full_name::FullName, national_id::NationalId,
    reset_token::ResetToken, user_password::UserPassword,
};
use crate::error::{AuthError, AuthResult};

/// PostgreSQL-backed auth repository
#[derive(Clone)]
pub struct PgAuthRepository {
    pool: PgPool,
}

impl PgAuthRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Clean up expired sessions
    pub async fn cleanup_expired(&self) -> AuthResult<u64> {
        let now_ms = Utc::now().timestamp_millis();

        let deleted = sqlx::query("DELETE FROM auth_sessions WHERE expires_at_ms < $1")
            .bind(now_ms)
            .execute(&self.pool)
            .await?
            .rows_affected();

        tracing::info!(sessions_deleted = deleted, "Cleaned up expired auth sessions");

        Ok(deleted)
    }
}

// ============================================================================
// User Repository Implementation
// ============================================================================

const USER_COLUMNS: &str = r#"
    user_id,
    national_id,
    email,
    full_name,
    birth_date,
    is_admin,
    terms_accepted_at,
    created_at
"#;

impl UserRepository for PgAuthRepository {
    async fn create(&self, user: &NewUser) -> AuthResult<UserId> {
        let result = sqlx::query_scalar::<_, i64>(
            r#"
            INSERT INTO users (
                national_id,
                email,
                full_name,
                birth_date,
                password_hash,
                is_admin,
                terms_accepted_at
            ) VALUES ($1, $2, $3, $4, $5, FALSE, NULL)
            RETURNING user_id
            "#,
        )
        .bind(user.national_id.as_str())
        .bind(user.email.as_str())
        .bind(user.full_name.as_str())
        .bind(user.birth_date.as_date())
        .bind(user.password_hash.as_phc_string())
        .fetch_one(&self.pool)
        .await;

        match result {
            Ok(id) => Ok(UserId::from_i64(id)),
            Err(e) if is_unique_violation(&e) => Err(AuthError::Conflict),
            Err(e) => Err(e.into()),
        }
    }

    async fn find_by_id(&self, user_id: UserId) -> AuthResult<Option<User>> {
        let row = sqlx::query_as::<_, UserRow>(&format!(
            "SELECT {USER_COLUMNS} FROM users WHERE user_id = $1"
        ))
        .bind(user_id.as_i64())
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(UserRow::into_user))
    }

    async fn find_by_email(&self, email: &Email) -> AuthResult<Option<User>> {
        let row = sqlx::query_as::<_, UserRow>(&format!(
            "SELECT {USER_COLUMNS} FROM users WHERE email = $1"
        ))
        .bind(email.as_str())
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(UserRow::into_user))
    }

    async fn exists_by_national_id_or_email(
        &self,
        national_id: &NationalId,
        email: &Email,
    ) -> AuthResult<bool> {
        let exists = sqlx::query_scalar::<_, bool>(
            "SELECT EXISTS(SELECT 1 FROM users WHERE national_id = $1 OR email = $2)",
        )
        .bind(national_id.as_str())
        .bind(email.as_str())
        .fetch_one(&self.pool)
        .await?;

        Ok(exists)
    }

    async fn exists_by_email_excluding(
        &self,
        email: &Email,
        user_id: UserId,
    ) -> AuthResult<bool> {
        let exists = sqlx::query_scalar::<_, bool>(
            "SELECT EXISTS(SELECT 1 FROM users WHERE email = $1 AND user_id <> $2)",
        )
        .bind(email.as_str())
        .bind(user_id.as_i64())
        .fetch_one(&self.pool)
        .await?;

        Ok(exists)
    }

    async fn update_profile(&self, user: &User) -> AuthResult<()> {
        let result = sqlx::query(
            r#"
            UPDATE users SET
                full_name = $2,
                email = $3,
                birth_date = $4
            WHERE user_id = $1
            "#,
        )
        .bind(user.user_id.as_i64())
        .bind(user.full_name.as_str())
        .bind(user.email.as_str())
        .bind(user.birth_date.as_date())
        .execute(&self.pool)
        .await;

        match result {
            Ok(_) => Ok(()),
            Err(e) if is_unique_violation(&e) => Err(AuthError::EmailTaken),
            Err(e) => Err(e.into()),
        }
    }

    async fn find_terms_accepted_at(
        &self,
        user_id: UserId,
    ) -> AuthResult<Option<Option<DateTime<Utc>>>> {
        let accepted = sqlx::query_scalar::<_, Option<DateTime<Utc>>>(
            "SELECT terms_accepted_at FROM users WHERE user_id = $1",
        )
        .bind(user_id.as_i64())
        .fetch_optional(&self.pool)
        .await?;

        Ok(accepted)
    }

    async fn accept_terms(&self, user_id: UserId, at: DateTime<Utc>) -> AuthResult<()> {
        sqlx::query("UPDATE users SET terms_accepted_at = $2 WHERE user_id = $1")
            .bind(user_id.as_i64())
            .bind(at)
            .execute(&self.pool)
            .await?;

        Ok(())
    }
}

// ============================================================================
// Credential Repository Implementation
// ============================================================================

impl CredentialRepository for PgAuthRepository {
    async fn find_by_national_id(
        &self,
        national_id: &NationalId,
    ) -> AuthResult<Option<Credential>> {
        let row = sqlx::query_as::<_, CredentialRow>(
            r#"
            SELECT user_id, password_hash, reset_token, reset_expires_at
            FROM users
            WHERE national_id = $1
            "#,
        )
        .bind(national_id.as_str())
        .fetch_optional(&self.pool)
        .await?;

        row.map(CredentialRow::into_credential).transpose()
    }

    async fn find_by_user_id(&self, user_id: UserId) -> AuthResult<Option<Credential>> {
        let row = sqlx::query_as::<_, CredentialRow>(
            r#"
            SELECT user_id, password_hash, reset_token, reset_expires_at
            FROM users
            WHERE user_id = $1
            "#,
        )
        .bind(user_id.as_i64())
        .fetch_optional(&self.pool)
        .await?;

        row.map(CredentialRow::into_credential).transpose()
    }

    async fn update_password(&self, user_id: UserId, hash: &UserPassword) -> AuthResult<()> {
        sqlx::query("UPDATE users SET password_hash = $2 WHERE user_id = $1")
            .bind(user_id.as_i64())
            .bind(hash.as_phc_string())
            .execute(&self.pool)
            .await?;

        Ok(())
    }

    async fn set_reset_token(&self, user_id: UserId, token: &ResetToken) -> AuthResult<()> {
        sqlx::query(
            "UPDATE users SET reset_token = $2, reset_expires_at = $3 WHERE user_id = $1",
        )
        .bind(user_id.as_i64())
        .bind(&token.token)
        .bind(token.expires_at)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    async fn find_user_by_reset_token(
        &self,
        token: &str,
        now: DateTime<Utc>,
    ) -> AuthResult<Option<UserId>> {
        let user_id = sqlx::query_scalar::<_, i64>(
            "SELECT user_id FROM users WHERE reset_token = $1 AND reset_expires_at > $2",
        )
        .bind(token)
        .bind(now)
        .fetch_optional(&self.pool)
        .await?;

        Ok(user_id.map(UserId::from_i64))
    }

    async fn redeem_reset_token(
        &self,
        token: &str,
        hash: &UserPassword,
        now: DateTime<Utc>,
    ) -> AuthResult<Option<UserId>> {
        let user_id = sqlx::query_scalar::<_, i64>(
            r#"
            UPDATE users SET
                password_hash = $2,
                reset_token = NULL,
                reset_expires_at = NULL
            WHERE reset_token = $1 AND reset_expires_at > $3
            RETURNING user_id
            "#,
        )
        .bind(token)
        .bind(hash.as_phc_string())
        .bind(now)
        .fetch_optional(&self.pool)
        .await?;

        Ok(user_id.map(UserId::from_i64))
    }
}

// ============================================================================
// Session Repository Implementation
// ============================================================================

impl SessionRepository for PgAuthRepository {
    async fn create(&self, session: &AuthSession) -> AuthResult<()> {
        sqlx::query(
            r#"
            INSERT INTO auth_sessions (
                session_id,
                user_id,
                full_name,
                email,
                is_admin,
                expires_at_ms,
                created_at
            ) VALUES ($1, $2, $3, $4, $5, $6, $7)
            "#,
        )
        .bind(session.session_id)
        .bind(session.principal.user_id.as_i64())
        .bind(&session.principal.full_name)
        .bind(&session.principal.email)
        .bind(session.principal.is_admin)
        .bind(session.expires_at_ms)
        .bind(session.created_at)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    async fn find_by_id(&self, session_id: Uuid) -> AuthResult<Option<AuthSession>> {
        let row = sqlx::query_as::<_, AuthSessionRow>(
            r#"
            SELECT
                session_id,
                user_id,
                full_name,
                email,
                is_admin,
                expires_at_ms,
                created_at
            FROM auth_sessions
            WHERE session_id = $1
            "#,
        )
        .bind(session_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(AuthSessionRow::into_session))
    }

    async fn delete(&self, session_id: Uuid) -> AuthResult<()> {
        sqlx::query("DELETE FROM auth_sessions WHERE session_id = $1")
            .bind(session_id)
            .execute(&self.pool)
            .await?;

        Ok(())
    }

    async fn refresh_profile(
        &self,
        user_id: UserId,
        full_name: &str,
        email: &str,
    ) -> AuthResult<u64> {
        let updated = sqlx::query(
            "UPDATE auth_sessions SET full_name = $2, email = $3 WHERE user_id = $1",
        )
        .bind(user_id.as_i64())
        .bind(full_name)
        .bind(email)
        .execute(&self.pool)
        .await?
        .rows_affected();

        Ok(updated)
    }

    async fn cleanup_expired(&self) -> AuthResult<u64> {
        self.cleanup_expired().await
    }
}

// ============================================================================
// Display name synchronization
// ============================================================================

impl DisplayNameSync for PgAuthRepository {
    async fn sync_display_name(&self, user_id: UserId, full_name: &str) -> AuthResult<u64> {
        let updated = sqlx::query(
            "UPDATE reports SET display_name = $2 WHERE user_id = $1 AND anonymous = FALSE",
        )
        .bind(user_id.as_i64())
        .bind(full_name)
        .execute(&self.pool)
        .await?
        .rows_affected();

        Ok(updated)
    }
}

// ============================================================================
// Row Types for sqlx mapping
// ============================================================================

#[derive(sqlx::FromRow)]
struct UserRow {
    user_id: i64,
    national_id: String,
    email: String,
    full_name: String,
    birth_date: NaiveDate,
    is_admin: bool,
    terms_accepted_at: Option<DateTime<Utc>>,
    created_at: DateTime<Utc>,
}

impl UserRow {
    fn into_user(self) -> User {
        User {
            user_id: UserId::from_i64(self.user_id),
            national_id: NationalId::from_db(self.national_id),
            email: Email::from_db(self.email),
            full_name: FullName::from_db(self.full_name),
            birth_date: BirthDate::from_date(self.birth_date),
            is_admin: self.is_admin,
            terms_accepted_at: self.terms_accepted_at,
            created_at: self.created_at,
        }
    }
}

#[derive(sqlx::FromRow)]
struct CredentialRow {
    user_id: i64,
    password_hash: String,
    reset_token: Option<String>,
    reset_expires_at: Option<DateTime<Utc>>,
}

impl CredentialRow {
    fn into_credential(self) -> AuthResult<Credential> {
        Ok(Credential {
            user_id: UserId::from_i64(self.user_id),
            password_hash: UserPassword::from_phc_string(self.password_hash)?,
            reset: ResetToken::from_db(self.reset_token, self.reset_expires_at),
        })
    }
}

#[derive(sqlx::FromRow)]
struct AuthSessionRow {
    session_id: Uuid,
    user_id: i64,
    full_name: String,
    email: String,
    is_admin: bool,
    expires_at_ms: i64,
    created_at: DateTime<Utc>,
}

impl AuthSessionRow {
    fn into_session(self) -> AuthSession {
        AuthSession {
            session_id: self.session_id,
            principal: Principal {
                user_id: UserId::from_i64(self.user_id),
                full_name: self.full_name,
                email: self.email,
                is_admin: self.is_admin,
            },
            expires_at_ms: self.expires_at_ms,
            created_at: self.created_at,
        }
    }
}
