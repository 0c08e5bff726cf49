//! Report Routers

use axum::{
    Router,
    extract::DefaultBodyLimit,
    routing::{get, post},
};

use crate::domain::capability::{FileStorage, Geocoder};
use crate::domain::repository::ReportRepository;
use crate::presentation::handlers::{self, ReportAppState};

/// Create the report router, mounted under `/api/reports`
pub fn report_router<R, S, G>(state: ReportAppState<R, S, G>) -> Router
where
    R: ReportRepository + Sync + 'static,
    S: FileStorage + Sync + 'static,
    G: Geocoder + Sync + 'static,
{
    let body_limit = state.config.submission_body_limit();

    Router::new()
        .route("/feed", get(handlers::feed::<R, S, G>))
        .route("/mine", get(handlers::mine::<R, S, G>))
        .route(
            "/",
            post(handlers::submit::<R, S, G>).layer(DefaultBodyLimit::max(body_limit)),
        )
        .route("/{id}", get(handlers::details::<R, S, G>))
        .route("/{id}/cancel", post(handlers::cancel::<R, S, G>))
        .with_state(state)
}

/// Create the moderation router, mounted under `/api/admin`
pub fn admin_router<R, S, G>(state: ReportAppState<R, S, G>) -> Router
where
    R: ReportRepository + Sync + 'static,
    S: FileStorage + Sync + 'static,
    G: Geocoder + Sync + 'static,
{
    Router::new()
        .route("/reports", get(handlers::admin_panel::<R, S, G>))
        .route("/update-status", post(handlers::update_status::<R, S, G>))
        .route("/resolve", post(handlers::resolve::<R, S, G>))
        .with_state(state)
}
