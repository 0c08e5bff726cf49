//! API DTOs (Data Transfer Objects)

use chrono::{DateTime, Utc};
use kernel::id::{ReportId, UserId};
use serde::{Deserialize, Serialize};

use crate::domain::entity::report::Report;
use crate::domain::value_object::report_status::ReportStatus;

/// Plain acknowledgment body
#[derive(Debug, Clone, Serialize)]
pub struct MessageResponse {
    pub message: &'static str,
}

impl MessageResponse {
    pub fn new(message: &'static str) -> Self {
        Self { message }
    }
}

/// Report as shown to users; never names the submitter's id
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ReportResponse {
    pub id: ReportId,
    pub title: String,
    pub description: String,
    pub location: String,
    pub attachments: Vec<String>,
    pub anonymous: bool,
    pub display_name: String,
    pub status: ReportStatus,
    pub rejection_reason: Option<String>,
    pub submitted_at: DateTime<Utc>,
}

impl From<Report> for ReportResponse {
    fn from(report: Report) -> Self {
        Self {
            id: report.report_id,
            title: report.title,
            description: report.description,
            location: report.location,
            attachments: report.attachments.as_slice().to_vec(),
            anonymous: report.anonymous,
            display_name: report.display_name,
            status: report.status,
            rejection_reason: report.rejection_reason,
            submitted_at: report.submitted_at,
        }
    }
}

/// Report as shown in the admin panel
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AdminReportResponse {
    pub user_id: UserId,
    #[serde(flatten)]
    pub report: ReportResponse,
}

impl From<Report> for AdminReportResponse {
    fn from(report: Report) -> Self {
        Self {
            user_id: report.user_id,
            report: report.into(),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct SubmitReportResponse {
    pub id: ReportId,
    pub status: ReportStatus,
    pub message: &'static str,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ModerateRequest {
    pub id: ReportId,
    /// `APPROVED` or `REJECTED`
    pub new_status: String,
    #[serde(default)]
    pub rejection_reason: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct StatusChangedResponse {
    pub id: ReportId,
    pub status: ReportStatus,
    pub message: &'static str,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ResolveRequest {
    pub id: ReportId,
}
