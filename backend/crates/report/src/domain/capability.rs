//! Capabilities
//!
//! Outside collaborators of the report lifecycle: attachment storage,
//! reverse geocoding, status notifications.

use crate::domain::value_object::report_status::ReportStatus;
use crate::error::ReportResult;

/// Uploaded file as received, before it is stored
#[derive(Clone)]
pub struct Upload {
    /// Form field the file came in
    pub field_name: String,
    /// Client-side file name; only its extension is kept
    pub file_name: Option<String>,
    pub content_type: String,
    pub bytes: Vec<u8>,
}

impl std::fmt::Debug for Upload {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Upload")
            .field("field_name", &self.field_name)
            .field("file_name", &self.file_name)
            .field("content_type", &self.content_type)
            .field("len", &self.bytes.len())
            .finish()
    }
}

/// Attachment storage
#[trait_variant::make(FileStorage: Send)]
pub trait LocalFileStorage {
    /// Persist the upload under a fresh collision-free name and return it
    async fn store(&self, upload: &Upload) -> ReportResult<String>;

    /// Remove a stored file; missing files are not an error
    async fn delete(&self, file_name: &str) -> ReportResult<()>;
}

/// Reverse geocoding
#[trait_variant::make(Geocoder: Send)]
pub trait LocalGeocoder {
    /// Human-readable address for a raw location, or the raw string
    /// itself. Never fails.
    async fn reverse_lookup(&self, raw: &str) -> String;
}

/// Status change to tell a submitter about
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatusNotice {
    pub to: String,
    pub title: String,
    pub status: ReportStatus,
    pub reason: Option<String>,
}

/// Fire-and-forget status notifications. Implementations must not block
/// the caller on delivery and must swallow delivery failures.
pub trait StatusNotifier: Send + Sync {
    fn notify(&self, notice: StatusNotice);
}
