//! API Server Entry Point
//!
//! Application entry point and server initialization.
//! Uses `anyhow` for startup errors, but application-level
//! errors should use `kernel::error::AppError`.

use auth::middleware::{
    AuthGuardState, require_admin, require_authenticated, require_terms_accepted,
};
use auth::{AuthConfig, PgAuthRepository, auth_router};
use axum::{
    Router, http,
    http::{Method, header},
    middleware::from_fn_with_state,
};
use platform::crypto::key_from_base64;
use platform::mail::{HttpMailer, LogMailer, SelectedMailer};
use report::domain::StatusNotifier;
use report::{
    DiskStorage, MailNotifier, NominatimGeocoder, PassThroughGeocoder, PgReportRepository,
    ReportAppState, ReportConfig, SelectedGeocoder, admin_router, report_router,
};
use sqlx::postgres::PgPoolOptions;
use std::env;
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::net::TcpListener;
use tower_http::cors::{AllowHeaders, AllowMethods, CorsLayer};
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env file
    dotenvy::dotenv().ok();

    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                //.unwrap_or_else(|_| "api=debug,auth=debug,report=debug,tower_http=debug".into()),
                .unwrap_or_else(|_| "api=info,auth=info,report=info,tower_http=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Database connection
    let database_url = env::var("DATABASE_URL").expect("DATABASE_URL must be set in environment");
    let max_connections: u32 = match env::var("DATABASE_MAX_CONNECTIONS") {
        Ok(value) => value.parse()?,
        Err(_) => 10,
    };

    let pool = PgPoolOptions::new()
        .max_connections(max_connections)
        .connect(&database_url)
        .await?;

    tracing::info!(max_connections, "Connected to database");

    // Run migrations
    sqlx::migrate!("../../../database/migrations")
        .run(&pool)
        .await?;

    tracing::info!("Migrations completed");

    // Startup cleanup: remove expired sessions
    // Errors here should not prevent server startup
    let auth_repo = Arc::new(PgAuthRepository::new(pool.clone()));
    match auth_repo.cleanup_expired().await {
        Ok(sessions) => {
            tracing::info!(
                sessions_deleted = sessions,
                "Auth session cleanup completed"
            );
        }
        Err(e) => {
            tracing::warn!(
                error = %e,
                "Auth session cleanup failed, continuing anyway"
            );
        }
    }

    // Auth configuration
    let mut auth_config = if cfg!(debug_assertions) {
        AuthConfig::development()
    } else {
        AuthConfig::default()
    };
    match env::var("SESSION_SECRET") {
        Ok(secret_b64) => {
            auth_config.session_secret = key_from_base64(&secret_b64)
                .ok_or_else(|| anyhow::anyhow!("SESSION_SECRET must be 32 bytes of base64"))?;
        }
        Err(_) if cfg!(debug_assertions) => {
            tracing::warn!("SESSION_SECRET not set, sessions will not survive a restart");
        }
        Err(_) => anyhow::bail!("SESSION_SECRET must be set in production"),
    }
    if let Ok(base_url) = env::var("PUBLIC_BASE_URL") {
        auth_config.public_base_url = base_url.trim_end_matches('/').to_string();
    }
    if let Ok(fail_open) = env::var("TERMS_FAIL_OPEN") {
        auth_config.terms_fail_open = fail_open.trim().parse()?;
    }
    let auth_config = Arc::new(auth_config);

    // Report configuration
    let mut report_config = ReportConfig::default();
    if let Ok(dir) = env::var("UPLOAD_DIR") {
        report_config.upload_dir = dir.into();
    }
    let report_config = Arc::new(report_config);

    let storage = DiskStorage::new(report_config.upload_dir.clone());
    storage.ensure_dir().await?;
    tracing::info!(dir = %storage.dir().display(), "Upload directory ready");

    // Mail
    let mailer = match (
        env::var("MAIL_API_URL"),
        env::var("MAIL_API_KEY"),
        env::var("MAIL_FROM"),
    ) {
        (Ok(url), Ok(key), Ok(from)) => {
            tracing::info!(endpoint = %url, "Using HTTP mail API");
            SelectedMailer::Http(HttpMailer::new(url, key, from)?)
        }
        _ => {
            tracing::warn!("MAIL_API_URL/MAIL_API_KEY/MAIL_FROM not set, mails are only logged");
            SelectedMailer::Log(LogMailer)
        }
    };
    let mailer = Arc::new(mailer);

    // Geocoding
    let geocoder = match env::var("GEOCODER_URL") {
        Ok(url) => {
            tracing::info!(endpoint = %url, "Using reverse geocoder");
            SelectedGeocoder::Nominatim(NominatimGeocoder::new(url, report_config.geocode_timeout)?)
        }
        Err(_) => SelectedGeocoder::PassThrough(PassThroughGeocoder),
    };

    let notifier: Arc<dyn StatusNotifier> = Arc::new(MailNotifier::new(
        mailer.clone(),
        report_config.brand.clone(),
    ));

    let report_state = ReportAppState::new(
        Arc::new(PgReportRepository::new(pool.clone())),
        Arc::new(storage),
        Arc::new(geocoder),
        notifier,
        report_config.clone(),
    );

    // CORS configuration
    let frontend_origins =
        env::var("FRONTEND_ORIGINS").unwrap_or_else(|_| "http://localhost:3000".to_string());

    let allowed_origins: Vec<http::HeaderValue> = frontend_origins
        .split(',')
        .filter_map(|origin| origin.trim().parse().ok())
        .collect();

    let cors = CorsLayer::new()
        .allow_origin(allowed_origins)
        .allow_methods(AllowMethods::list([
            Method::GET,
            Method::POST,
            Method::OPTIONS,
        ]))
        .allow_headers(AllowHeaders::list([
            header::CONTENT_TYPE,
            header::ACCEPT,
        ]))
        .allow_credentials(true);

    // Gates: the last route_layer added runs first
    let guard = AuthGuardState::new(auth_repo.clone(), auth_config.clone());

    let reports = report_router(report_state.clone())
        .route_layer(from_fn_with_state(
            guard.clone(),
            require_terms_accepted::<PgAuthRepository>,
        ))
        .route_layer(from_fn_with_state(
            guard.clone(),
            require_authenticated::<PgAuthRepository>,
        ));

    let admin = admin_router(report_state)
        .route_layer(from_fn_with_state(
            guard.clone(),
            require_admin::<PgAuthRepository>,
        ))
        .route_layer(from_fn_with_state(
            guard,
            require_authenticated::<PgAuthRepository>,
        ));

    // Build router
    let app = Router::new()
        .nest("/api/auth", auth_router(auth_repo, mailer, auth_config))
        .nest("/api/reports", reports)
        .nest("/api/admin", admin)
        .nest_service("/uploads", ServeDir::new(&report_config.upload_dir))
        .layer(TraceLayer::new_for_http())
        .layer(cors);

    // Start server
    let addr: SocketAddr = env::var("BIND_ADDR")
        .unwrap_or_else(|_| "0.0.0.0:3000".to_string())
        .parse()?;
    tracing::info!("Listening on {}", addr);

    let listener = TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
