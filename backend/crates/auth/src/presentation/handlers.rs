//! HTTP Handlers

use axum::Json;
use axum::extract::{Extension, Path, State};
use axum::http::{HeaderMap, StatusCode, header};
use axum::response::{IntoResponse, Redirect, Response};
use kernel::principal::Principal;
use platform::cookie::{extract_cookie, to_header_value};
use platform::mail::Mailer;
use std::sync::Arc;

use crate::application::{
    AcceptTermsUseCase, AuthConfig, ChangePasswordInput, ChangePasswordUseCase,
    CheckResetTokenUseCase, GetProfileUseCase, IssueResetTokenUseCase, LoginInput, LoginUseCase,
    LogoutUseCase, RedeemResetTokenUseCase, RegisterInput, RegisterUseCase, UpdateProfileInput,
    UpdateProfileUseCase,
};
use crate::domain::repository::{
    CredentialRepository, DisplayNameSync, SessionRepository, UserRepository,
};
use crate::error::{AuthError, AuthResult};
use crate::presentation::dto::{
    ChangePasswordRequest, ForgotPasswordRequest, LoginRequest, LoginResponse, MessageResponse,
    ProfileResponse, RegisterRequest, RegisterResponse, ResetPasswordRequest,
    ResetTokenStatusResponse, UpdateProfileRequest, UpdateProfileResponse,
};

/// Every repository the auth handlers need, behind one bound
pub trait AuthRepositories:
    UserRepository
    + CredentialRepository
    + SessionRepository
    + DisplayNameSync
    + Clone
    + Send
    + Sync
    + 'static
{
}

impl<T> AuthRepositories for T where
    T: UserRepository
        + CredentialRepository
        + SessionRepository
        + DisplayNameSync
        + Clone
        + Send
        + Sync
        + 'static
{
}

/// Shared state for auth handlers
pub struct AuthAppState<R, M> {
    pub repo: Arc<R>,
    pub mailer: Arc<M>,
    pub config: Arc<AuthConfig>,
}

impl<R, M> Clone for AuthAppState<R, M> {
    fn clone(&self) -> Self {
        Self {
            repo: self.repo.clone(),
            mailer: self.mailer.clone(),
            config: self.config.clone(),
        }
    }
}

// ============================================================================
// Register / Login / Logout
// ============================================================================

/// POST /api/auth/register
pub async fn register<R, M>(
    State(state): State<AuthAppState<R, M>>,
    Json(req): Json<RegisterRequest>,
) -> AuthResult<impl IntoResponse>
where
    R: AuthRepositories,
    M: Mailer + Sync + 'static,
{
    let use_case = RegisterUseCase::new(state.repo.clone(), state.config.clone());

    let output = use_case
        .execute(RegisterInput {
            full_name: req.full_name,
            national_id: req.national_id,
            birth_date: req.birth_date,
            email: req.email,
            password: req.password,
        })
        .await?;

    Ok((
        StatusCode::CREATED,
        Json(RegisterResponse {
            user_id: output.user_id,
            message: "Registration complete. You can now log in.",
        }),
    ))
}

/// POST /api/auth/login
pub async fn login<R, M>(
    State(state): State<AuthAppState<R, M>>,
    Json(req): Json<LoginRequest>,
) -> AuthResult<Response>
where
    R: AuthRepositories,
    M: Mailer + Sync + 'static,
{
    let use_case = LoginUseCase::new(
        state.repo.clone(),
        state.repo.clone(),
        state.repo.clone(),
        state.config.clone(),
    );

    let output = use_case
        .execute(LoginInput {
            national_id: req.national_id,
            password: req.password,
        })
        .await?;

    let cookie = to_header_value(
        &state
            .config
            .session_cookie()
            .build_set_cookie(&output.session_token),
    )
    .ok_or_else(|| AuthError::Internal("Session cookie is not a valid header".to_string()))?;

    Ok((
        StatusCode::OK,
        [(header::SET_COOKIE, cookie)],
        Json(LoginResponse {
            message: "Login successful",
            user: output.principal,
        }),
    )
        .into_response())
}

/// POST /api/auth/logout
pub async fn logout<R, M>(
    State(state): State<AuthAppState<R, M>>,
    headers: HeaderMap,
) -> Response
where
    R: AuthRepositories,
    M: Mailer + Sync + 'static,
{
    if let Some(token) = extract_cookie(&headers, &state.config.session_cookie_name) {
        let use_case = LogoutUseCase::new(state.repo.clone(), state.config.clone());
        if let Err(e) = use_case.execute(&token).await {
            tracing::debug!(error = %e, "Logout with an unusable session token");
        }
    }

    let redirect = Redirect::to(&state.config.sign_in_path);
    match to_header_value(&state.config.session_cookie().build_delete_cookie()) {
        Some(cookie) => ([(header::SET_COOKIE, cookie)], redirect).into_response(),
        None => redirect.into_response(),
    }
}

// ============================================================================
// Password reset
// ============================================================================

/// POST /api/auth/forgot-password
pub async fn forgot_password<R, M>(
    State(state): State<AuthAppState<R, M>>,
    Json(req): Json<ForgotPasswordRequest>,
) -> AuthResult<Json<MessageResponse>>
where
    R: AuthRepositories,
    M: Mailer + Sync + 'static,
{
    let use_case = IssueResetTokenUseCase::new(
        state.repo.clone(),
        state.repo.clone(),
        state.mailer.clone(),
        state.config.clone(),
    );

    use_case.execute(&req.email).await?;

    Ok(Json(MessageResponse::new(
        "If the email is registered, a reset link has been sent.",
    )))
}

/// GET /api/auth/reset-password/{token}
pub async fn check_reset_token<R, M>(
    State(state): State<AuthAppState<R, M>>,
    Path(token): Path<String>,
) -> AuthResult<Json<ResetTokenStatusResponse>>
where
    R: AuthRepositories,
    M: Mailer + Sync + 'static,
{
    CheckResetTokenUseCase::new(state.repo.clone())
        .execute(&token)
        .await?;

    Ok(Json(ResetTokenStatusResponse { valid: true }))
}

/// POST /api/auth/reset-password/{token}
pub async fn reset_password<R, M>(
    State(state): State<AuthAppState<R, M>>,
    Path(token): Path<String>,
    Json(req): Json<ResetPasswordRequest>,
) -> AuthResult<Json<MessageResponse>>
where
    R: AuthRepositories,
    M: Mailer + Sync + 'static,
{
    RedeemResetTokenUseCase::new(state.repo.clone(), state.config.clone())
        .execute(&token, req.password)
        .await?;

    Ok(Json(MessageResponse::new(
        "Password updated. You can now log in.",
    )))
}

// ============================================================================
// Profile (requires authentication)
// ============================================================================

/// GET /api/auth/profile
pub async fn get_profile<R, M>(
    State(state): State<AuthAppState<R, M>>,
    Extension(principal): Extension<Principal>,
) -> AuthResult<Json<ProfileResponse>>
where
    R: AuthRepositories,
    M: Mailer + Sync + 'static,
{
    let user = GetProfileUseCase::new(state.repo.clone())
        .execute(principal.user_id)
        .await?;

    Ok(Json(user.into()))
}

/// POST /api/auth/profile
pub async fn update_profile<R, M>(
    State(state): State<AuthAppState<R, M>>,
    Extension(principal): Extension<Principal>,
    Json(req): Json<UpdateProfileRequest>,
) -> AuthResult<Json<UpdateProfileResponse>>
where
    R: AuthRepositories,
    M: Mailer + Sync + 'static,
{
    let use_case =
        UpdateProfileUseCase::new(state.repo.clone(), state.repo.clone(), state.repo.clone());

    let output = use_case
        .execute(
            principal.user_id,
            UpdateProfileInput {
                full_name: req.full_name,
                email: req.email,
                birth_date: req.birth_date,
            },
        )
        .await?;

    let message = if output.changed {
        "Profile updated"
    } else {
        "No changes"
    };

    Ok(Json(UpdateProfileResponse {
        message,
        changed: output.changed,
    }))
}

/// POST /api/auth/profile/password
pub async fn change_password<R, M>(
    State(state): State<AuthAppState<R, M>>,
    Extension(principal): Extension<Principal>,
    Json(req): Json<ChangePasswordRequest>,
) -> AuthResult<Json<MessageResponse>>
where
    R: AuthRepositories,
    M: Mailer + Sync + 'static,
{
    ChangePasswordUseCase::new(state.repo.clone(), state.config.clone())
        .execute(
            principal.user_id,
            ChangePasswordInput {
                current_password: req.current_password,
                new_password: req.new_password,
            },
        )
        .await?;

    Ok(Json(MessageResponse::new("Password changed")))
}

/// POST /api/auth/accept-terms
pub async fn accept_terms<R, M>(
    State(state): State<AuthAppState<R, M>>,
    Extension(principal): Extension<Principal>,
) -> AuthResult<Json<MessageResponse>>
where
    R: AuthRepositories,
    M: Mailer + Sync + 'static,
{
    AcceptTermsUseCase::new(state.repo.clone())
        .execute(principal.user_id)
        .await?;

    Ok(Json(MessageResponse::new("Terms accepted")))
}
