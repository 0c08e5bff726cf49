//! Auth Middleware
//!
//! Access gates for protected routes, applied with
//! `axum::middleware::from_fn_with_state`:
//! - [`require_authenticated`] resolves the session cookie into a
//!   [`Principal`] request extension, or redirects to the sign-in page
//! - [`require_admin`] rejects non-admin principals with 403
//! - [`require_terms_accepted`] redirects to the terms page until the user
//!   has accepted them
//!
//! Layer `require_authenticated` outermost; the other two read the
//! principal it inserts.

use axum::body::Body;
use axum::extract::{OriginalUri, State};
use axum::http::Request;
use axum::middleware::Next;
use axum::response::{IntoResponse, Redirect, Response};
use kernel::principal::Principal;
use platform::cookie::extract_cookie;
use std::sync::Arc;

use crate::application::{
    AuthConfig, CheckSessionUseCase, TermsDecision, TermsGate, require_admin as admin_gate,
};
use crate::domain::repository::{SessionRepository, UserRepository};

/// Middleware state
pub struct AuthGuardState<R> {
    pub repo: Arc<R>,
    pub config: Arc<AuthConfig>,
}

impl<R> AuthGuardState<R> {
    pub fn new(repo: Arc<R>, config: Arc<AuthConfig>) -> Self {
        Self { repo, config }
    }
}

impl<R> Clone for AuthGuardState<R> {
    fn clone(&self) -> Self {
        Self {
            repo: self.repo.clone(),
            config: self.config.clone(),
        }
    }
}

/// Middleware that requires a valid auth session
pub async fn require_authenticated<R>(
    State(state): State<AuthGuardState<R>>,
    mut req: Request<Body>,
    next: Next,
) -> Response
where
    R: SessionRepository + Send + Sync + 'static,
{
    let token = extract_cookie(req.headers(), &state.config.session_cookie_name);

    let session = match token {
        Some(token) => CheckSessionUseCase::new(state.repo.clone(), state.config.clone())
            .execute(&token)
            .await
            .ok(),
        None => None,
    };

    let Some(session) = session else {
        return Redirect::to(&state.config.sign_in_path).into_response();
    };

    req.extensions_mut().insert(session.principal);
    next.run(req).await
}

/// Middleware that requires an administrator
pub async fn require_admin<R>(
    State(state): State<AuthGuardState<R>>,
    req: Request<Body>,
    next: Next,
) -> Response
where
    R: Send + Sync + 'static,
{
    let Some(principal) = req.extensions().get::<Principal>() else {
        return Redirect::to(&state.config.sign_in_path).into_response();
    };

    if let Err(e) = admin_gate(principal) {
        tracing::warn!(user_id = %principal.user_id, "Admin route refused");
        return e.into_response();
    }

    next.run(req).await
}

/// Middleware that requires accepted terms of use
pub async fn require_terms_accepted<R>(
    State(state): State<AuthGuardState<R>>,
    req: Request<Body>,
    next: Next,
) -> Response
where
    R: UserRepository + Send + Sync + 'static,
{
    let gate = TermsGate::new(state.repo.clone(), state.config.clone());

    // Nested routers see a stripped path; the terms check wants the full one
    let path = req
        .extensions()
        .get::<OriginalUri>()
        .map(|uri| uri.0.path().to_string())
        .unwrap_or_else(|| req.uri().path().to_string());
    if gate.is_exempt(&path) {
        return next.run(req).await;
    }

    let Some(principal) = req.extensions().get::<Principal>().cloned() else {
        return Redirect::to(&state.config.sign_in_path).into_response();
    };

    match gate.check(&principal).await {
        Ok(TermsDecision::Allow) => next.run(req).await,
        Ok(TermsDecision::RedirectToTerms) => Redirect::to(&state.config.terms_path).into_response(),
        Err(e) => e.into_response(),
    }
}
