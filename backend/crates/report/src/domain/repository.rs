//! Repository Traits
//!
//! Interfaces for data persistence. Implementation is in infrastructure layer.

use kernel::id::{ReportId, UserId};

use crate::domain::entity::report::{NewReport, Report, SubmitterContact};
use crate::domain::value_object::report_status::ReportStatus;
use crate::error::ReportResult;

/// Report repository
#[trait_variant::make(ReportRepository: Send)]
pub trait LocalReportRepository {
    /// Insert a PENDING report
    async fn insert(&self, report: &NewReport) -> ReportResult<ReportId>;

    async fn find_by_id(&self, report_id: ReportId) -> ReportResult<Option<Report>>;

    /// APPROVED and RESOLVED reports, newest submission first
    async fn list_public(&self) -> ReportResult<Vec<Report>>;

    /// Every report, newest submission first
    async fn list_all(&self) -> ReportResult<Vec<Report>>;

    /// Reports of one submitter, newest submission first
    async fn list_by_owner(&self, user_id: UserId) -> ReportResult<Vec<Report>>;

    /// Returns false when no row was deleted
    async fn delete(&self, report_id: ReportId) -> ReportResult<bool>;

    /// Set status and rejection reason together, only if the current
    /// status is one of `status.write_guard()`. Returns false when nothing
    /// was written.
    async fn update_status(
        &self,
        report_id: ReportId,
        status: ReportStatus,
        rejection_reason: Option<&str>,
    ) -> ReportResult<bool>;

    /// Submitter email and report title, for notifications
    async fn find_submitter_contact(
        &self,
        report_id: ReportId,
    ) -> ReportResult<Option<SubmitterContact>>;
}
