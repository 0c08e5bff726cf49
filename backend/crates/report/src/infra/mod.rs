//! Infrastructure Layer
//!
//! PostgreSQL repository and adapters for storage, geocoding and mail.

pub mod disk_storage;
pub mod mail_notifier;
pub mod nominatim;
pub mod postgres;

pub use disk_storage::DiskStorage;
pub use mail_notifier::MailNotifier;
pub use nominatim::{NominatimGeocoder, PassThroughGeocoder, SelectedGeocoder};
pub use postgres::PgReportRepository;
