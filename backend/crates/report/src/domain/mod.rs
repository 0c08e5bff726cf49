//! Domain Layer
//!
//! Contains entities, value objects, repository and capability traits.

pub mod capability;
pub mod entity;
pub mod repository;
pub mod value_object;

// Re-exports
pub use capability::{FileStorage, Geocoder, StatusNotice, StatusNotifier, Upload};
pub use entity::report::{NewReport, Report, SubmitterContact};
pub use repository::ReportRepository;
pub use value_object::{attachments::Attachments, report_status::ReportStatus};
