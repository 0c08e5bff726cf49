//! Local Disk Attachment Storage
//!
//! Files land in one shared directory under names built from the form
//! field, the current time in milliseconds and a random number, so
//! concurrent uploads never collide.

use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use chrono::Utc;
use rand::Rng;

use crate::domain::capability::{FileStorage, Upload};
use crate::domain::value_object::attachments::basename;
use crate::error::ReportResult;

const MAX_EXTENSION_CHARS: usize = 8;

#[derive(Debug, Clone)]
pub struct DiskStorage {
    dir: PathBuf,
}

impl DiskStorage {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Create the upload directory if needed
    pub async fn ensure_dir(&self) -> std::io::Result<()> {
        tokio::fs::create_dir_all(&self.dir).await
    }

    /// `<field>-<millis>-<random><.ext>`
    fn file_name_for(upload: &Upload) -> String {
        let field: String = upload
            .field_name
            .chars()
            .filter(|c| c.is_ascii_alphanumeric() || *c == '_')
            .collect();
        let field = if field.is_empty() {
            "file".to_string()
        } else {
            field
        };

        let suffix: u32 = rand::rng().random_range(0..1_000_000_000);

        format!(
            "{field}-{}-{suffix}{}",
            Utc::now().timestamp_millis(),
            extension_of(upload.file_name.as_deref())
        )
    }
}

/// Lowercased `.ext` of the client file name, or nothing if it looks odd
fn extension_of(file_name: Option<&str>) -> String {
    let ext = file_name
        .and_then(|name| Path::new(name).extension())
        .and_then(|ext| ext.to_str())
        .filter(|ext| {
            !ext.is_empty()
                && ext.len() <= MAX_EXTENSION_CHARS
                && ext.chars().all(|c| c.is_ascii_alphanumeric())
        });

    match ext {
        Some(ext) => format!(".{}", ext.to_ascii_lowercase()),
        None => String::new(),
    }
}

impl FileStorage for DiskStorage {
    async fn store(&self, upload: &Upload) -> ReportResult<String> {
        let name = Self::file_name_for(upload);
        tokio::fs::write(self.dir.join(&name), &upload.bytes).await?;

        tracing::debug!(file = %name, bytes = upload.bytes.len(), "Attachment stored");
        Ok(name)
    }

    async fn delete(&self, file_name: &str) -> ReportResult<()> {
        let Some(name) = basename(file_name) else {
            tracing::warn!(file = %file_name, "Refusing to delete a file without a base name");
            return Ok(());
        };

        match tokio::fs::remove_file(self.dir.join(name)).await {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }
}
