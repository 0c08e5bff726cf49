//! Attachment References
//!
//! Ordered stored file names of a report, kept in one column joined by
//! `;`.

use serde::Serialize;
use std::path::Path;

const SEPARATOR: char = ';';

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
#[serde(transparent)]
pub struct Attachments(Vec<String>);

impl Attachments {
    pub fn new(names: Vec<String>) -> Self {
        Self(names)
    }

    /// Parse the stored column, skipping empty segments
    pub fn from_db(joined: &str) -> Self {
        Self(
            joined
                .split(SEPARATOR)
                .map(str::trim)
                .filter(|s| !s.is_empty())
                .map(str::to_string)
                .collect(),
        )
    }

    pub fn to_db(&self) -> String {
        self.0.join(&SEPARATOR.to_string())
    }

    pub fn as_slice(&self) -> &[String] {
        &self.0
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.0.iter().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

/// Final path component of a stored name, or `None` if there is none.
/// Anything resolved inside the upload directory goes through this first.
pub fn basename(name: &str) -> Option<&str> {
    let base = Path::new(name).file_name()?.to_str()?;
    if base.is_empty() || base == "." || base == ".." {
        return None;
    }
    Some(base)
}
