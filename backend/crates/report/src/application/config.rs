//! Application Configuration
//!
//! Configuration for the Report application layer.

use std::path::PathBuf;
use std::time::Duration;

/// Report application configuration
#[derive(Debug, Clone)]
pub struct ReportConfig {
    /// Directory attachments are written to and served from
    pub upload_dir: PathBuf,
    /// Per-file cap (50 MB)
    pub max_attachment_bytes: usize,
    /// Files per submission
    pub max_attachments: usize,
    /// Accepted content type prefixes
    pub allowed_media_prefixes: Vec<String>,
    /// Rejection reason cap, in characters
    pub max_reason_chars: usize,
    /// Product name used in notification mails
    pub brand: String,
    /// Budget for one reverse-geocoding lookup
    pub geocode_timeout: Duration,
}

impl Default for ReportConfig {
    fn default() -> Self {
        Self {
            upload_dir: PathBuf::from("uploads"),
            max_attachment_bytes: 50 * 1024 * 1024,
            max_attachments: 5,
            allowed_media_prefixes: vec!["image/".to_string(), "video/".to_string()],
            max_reason_chars: 500,
            brand: "EcoAlerta".to_string(),
            geocode_timeout: Duration::from_secs(5),
        }
    }
}

impl ReportConfig {
    /// Create config for development (uploads under the system temp dir)
    pub fn development() -> Self {
        Self {
            upload_dir: std::env::temp_dir().join("report-uploads"),
            ..Default::default()
        }
    }

    pub fn is_allowed_media(&self, content_type: &str) -> bool {
        let content_type = content_type.trim().to_ascii_lowercase();
        self.allowed_media_prefixes
            .iter()
            .any(|prefix| content_type.starts_with(prefix.as_str()))
    }

    pub fn max_attachment_mb(&self) -> usize {
        self.max_attachment_bytes / (1024 * 1024)
    }

    /// Request body limit for a submission: every file at its cap plus room
    /// for the text fields
    pub fn submission_body_limit(&self) -> usize {
        self.max_attachments * self.max_attachment_bytes + 1024 * 1024
    }
}
