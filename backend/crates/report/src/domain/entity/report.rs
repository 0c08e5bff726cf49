//! Report Entity

use chrono::{DateTime, Utc};
use kernel::id::{ReportId, UserId};
use kernel::principal::Principal;

use crate::domain::value_object::{
    attachments::Attachments, report_content::ReportContent, report_status::ReportStatus,
};

/// Display name stored for anonymous reports
pub const ANONYMOUS_DISPLAY_NAME: &str = "Anonymous";

/// Stored report
#[derive(Debug, Clone)]
pub struct Report {
    pub report_id: ReportId,
    /// Submitter; never exposed for anonymous reports
    pub user_id: UserId,
    pub title: String,
    pub description: String,
    pub location: String,
    pub attachments: Attachments,
    pub anonymous: bool,
    /// Copy of the submitter's name, or [`ANONYMOUS_DISPLAY_NAME`]
    pub display_name: String,
    pub status: ReportStatus,
    /// Only ever set on REJECTED reports
    pub rejection_reason: Option<String>,
    pub submitted_at: DateTime<Utc>,
}

impl Report {
    pub fn is_owned_by(&self, user_id: UserId) -> bool {
        self.user_id == user_id
    }

    /// Admins see everything, other users only their own reports
    pub fn is_visible_to(&self, principal: &Principal) -> bool {
        principal.is_admin || principal.owns(self.user_id)
    }
}

/// Report to be inserted; starts PENDING
#[derive(Debug, Clone)]
pub struct NewReport {
    pub user_id: UserId,
    pub title: String,
    pub description: String,
    pub location: String,
    pub attachments: Attachments,
    pub anonymous: bool,
    pub display_name: String,
}

impl NewReport {
    /// Resolve the display name from the submitter at submission time
    pub fn new(
        submitter: &Principal,
        content: ReportContent,
        attachments: Attachments,
        anonymous: bool,
    ) -> Self {
        let display_name = if anonymous {
            ANONYMOUS_DISPLAY_NAME.to_string()
        } else {
            submitter.full_name.clone()
        };

        Self {
            user_id: submitter.user_id,
            title: content.title().to_string(),
            description: content.description().to_string(),
            location: content.location().to_string(),
            attachments,
            anonymous,
            display_name,
        }
    }
}

/// What a status notification needs to know about a report
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubmitterContact {
    pub email: String,
    pub title: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn principal(is_admin: bool) -> Principal {
        Principal {
            user_id: UserId::from_i64(7),
            full_name: "Ana Souza".to_string(),
            email: "ana@example.org".to_string(),
            is_admin,
        }
    }

    fn content() -> ReportContent {
        ReportContent::new("Broken pipe", "Water everywhere", "Main St 10").unwrap()
    }

    #[test]
    fn test_display_name_follows_anonymous_flag() {
        let attachments = Attachments::new(vec!["a.jpg".to_string()]);

        let named = NewReport::new(&principal(false), content(), attachments.clone(), false);
        assert_eq!(named.display_name, "Ana Souza");

        let anonymous = NewReport::new(&principal(false), content(), attachments, true);
        assert_eq!(anonymous.display_name, ANONYMOUS_DISPLAY_NAME);
        assert_eq!(anonymous.user_id, UserId::from_i64(7));
    }

    #[test]
    fn test_visibility() {
        let report = Report {
            report_id: ReportId::from_i64(1),
            user_id: UserId::from_i64(99),
            title: "t".to_string(),
            description: "d".to_string(),
            location: "l".to_string(),
            attachments: Attachments::default(),
            anonymous: false,
            display_name: "Someone".to_string(),
            status: ReportStatus::Pending,
            rejection_reason: None,
            submitted_at: Utc::now(),
        };

        assert!(!report.is_visible_to(&principal(false)));
        assert!(report.is_visible_to(&principal(true)));
        assert!(!report.is_owned_by(UserId::from_i64(7)));
    }
}
