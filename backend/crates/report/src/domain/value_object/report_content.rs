//! Report Content
//!
//! Title, description and raw location of a report, trimmed and length
//! checked.

use kernel::error::app_error::{AppError, AppResult};

pub const TITLE_MAX_CHARS: usize = 150;
pub const DESCRIPTION_MAX_CHARS: usize = 5000;
pub const LOCATION_MAX_CHARS: usize = 255;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReportContent {
    title: String,
    description: String,
    location: String,
}

fn required(
    value: &str,
    label: &str,
    max: usize,
    field: &'static str,
) -> AppResult<String> {
    let value = value.trim();
    if value.is_empty() {
        return Err(AppError::bad_request(format!("{label} is required")).with_field(field));
    }
    if value.chars().count() > max {
        return Err(AppError::bad_request(format!(
            "{label} must be at most {max} characters"
        ))
        .with_field(field));
    }
    Ok(value.to_string())
}

impl ReportContent {
    pub fn new(title: &str, description: &str, location: &str) -> AppResult<Self> {
        Ok(Self {
            title: required(title, "Title", TITLE_MAX_CHARS, "title")?,
            description: required(
                description,
                "Description",
                DESCRIPTION_MAX_CHARS,
                "description",
            )?,
            location: required(location, "Location", LOCATION_MAX_CHARS, "location")?,
        })
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    /// Raw location as typed or captured: an address or a `lat,lon` pair
    pub fn location(&self) -> &str {
        &self.location
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_trims_fields() {
        let content = ReportContent::new("  Illegal dumping ", "Tires by the river", "GPS: -23.5,-46.6")
            .unwrap();
        assert_eq!(content.title(), "Illegal dumping");
        assert_eq!(content.location(), "GPS: -23.5,-46.6");
    }

    #[test]
    fn test_caps_are_in_characters() {
        // 150 multi-byte characters are fine
        assert!(ReportContent::new(&"ã".repeat(150), "d", "l").is_ok());

        let err = ReportContent::new(&"a".repeat(151), "d", "l").unwrap_err();
        assert_eq!(err.field(), Some("title"));

        let err = ReportContent::new("t", &"a".repeat(5001), "l").unwrap_err();
        assert_eq!(err.field(), Some("description"));

        let err = ReportContent::new("t", "d", &"a".repeat(256)).unwrap_err();
        assert_eq!(err.field(), Some("location"));
    }

    #[test]
    fn test_blank_fields_are_rejected() {
        let err = ReportContent::new("   ", "d", "l").unwrap_err();
        assert_eq!(err.field(), Some("title"));
    }
}
