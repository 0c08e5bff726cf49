//! Report Backend Module
//!
//! Clean Architecture structure:
//! - `domain/` - Report entity, status lifecycle, repository and capability traits
//! - `application/` - Use cases and notification content
//! - `infra/` - PostgreSQL, disk storage, geocoding and mail adapters
//! - `presentation/` - HTTP handlers, DTOs, routers
//!
//! ## Lifecycle
//! Reports start PENDING. A moderator approves or rejects them; approved
//! reports can later be resolved. APPROVED and RESOLVED reports make up the
//! public feed. Each moderation step mails the submitter without holding up
//! the request.
//!
//! ## Visibility
//! - Feed: public statuses only, for every signed-in user
//! - Details: the owner, or any admin
//! - Cancel: the owner only, in any status

pub mod application;
pub mod domain;
pub mod error;
pub mod infra;
pub mod presentation;


// Re-exports for convenience
pub use application::config::ReportConfig;
pub use error::{ReportError, ReportResult};
pub use infra::{
    DiskStorage, MailNotifier, NominatimGeocoder, PassThroughGeocoder, PgReportRepository,
    SelectedGeocoder,
};
pub use presentation::handlers::ReportAppState;
pub use presentation::router::{admin_router, report_router};
