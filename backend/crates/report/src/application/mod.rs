//! Application Layer
//!
//! Use cases and application services.

pub mod cancel_report;
pub mod config;
pub mod get_report_details;
pub mod list_admin_panel;
pub mod list_my_reports;
pub mod list_public_feed;
pub mod moderate_report;
pub mod notification;
pub mod resolve_report;
pub mod submit_report;
mod transition;

// Re-exports
pub use cancel_report::CancelReportUseCase;
pub use config::ReportConfig;
pub use get_report_details::GetReportDetailsUseCase;
pub use list_admin_panel::{ListAdminPanelUseCase, sort_for_admin};
pub use list_my_reports::ListMyReportsUseCase;
pub use list_public_feed::ListPublicFeedUseCase;
pub use moderate_report::{ModerateReportInput, ModerateReportUseCase};
pub use notification::{DEFAULT_REJECTION_REASON, status_mail};
pub use resolve_report::ResolveReportUseCase;
pub use submit_report::{SubmitReportInput, SubmitReportUseCase};
