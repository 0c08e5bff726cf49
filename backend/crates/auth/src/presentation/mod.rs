//! Presentation Layer
//!
//! HTTP handlers, DTOs, router, and middleware.

pub mod dto;
pub mod handlers;
pub mod middleware;
pub mod router;

pub use handlers::{AuthAppState, AuthRepositories};
pub use middleware::{
    AuthGuardState, require_admin, require_authenticated, require_terms_accepted,
};
pub use router::auth_router;
