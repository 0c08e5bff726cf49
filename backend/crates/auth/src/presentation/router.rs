//! Auth Router

use axum::{
    Router,
    middleware::from_fn_with_state,
    routing::{get, post},
};
use platform::mail::Mailer;
use std::sync::Arc;

use crate::application::config::AuthConfig;
use crate::presentation::handlers::{self, AuthAppState, AuthRepositories};
use crate::presentation::middleware::{AuthGuardState, require_authenticated};

/// Create the Auth router, mounted under `/api/auth`
pub fn auth_router<R, M>(repo: Arc<R>, mailer: Arc<M>, config: Arc<AuthConfig>) -> Router
where
    R: AuthRepositories,
    M: Mailer + Sync + 'static,
{
    let guard = AuthGuardState::new(repo.clone(), config.clone());
    let state = AuthAppState {
        repo,
        mailer,
        config,
    };

    let signed_in = Router::new()
        .route(
            "/profile",
            get(handlers::get_profile::<R, M>).post(handlers::update_profile::<R, M>),
        )
        .route("/profile/password", post(handlers::change_password::<R, M>))
        .route("/accept-terms", post(handlers::accept_terms::<R, M>))
        .route_layer(from_fn_with_state(guard, require_authenticated::<R>));

    Router::new()
        .route("/register", post(handlers::register::<R, M>))
        .route("/login", post(handlers::login::<R, M>))
        .route("/logout", post(handlers::logout::<R, M>))
        .route("/forgot-password", post(handlers::forgot_password::<R, M>))
        .route(
            "/reset-password/{token}",
            get(handlers::check_reset_token::<R, M>).post(handlers::reset_password::<R, M>),
        )
        .merge(signed_in)
        .with_state(state)
}
