//! Get Report Details Use Case

use std::sync::Arc;

use kernel::id::ReportId;
use kernel::principal::Principal;

use crate::domain::entity::report::Report;
use crate::domain::repository::ReportRepository;
use crate::error::{ReportError, ReportResult};

pub struct GetReportDetailsUseCase<R>
where
    R: ReportRepository,
{
    report_repo: Arc<R>,
}

impl<R> GetReportDetailsUseCase<R>
where
    R: ReportRepository,
{
    pub fn new(report_repo: Arc<R>) -> Self {
        Self { report_repo }
    }

    /// Admins get any report, others only their own. A missing report and
    /// someone else's report fail the same way.
    pub async fn execute(&self, requester: &Principal, report_id: ReportId) -> ReportResult<Report> {
        self.report_repo
            .find_by_id(report_id)
            .await?
            .filter(|report| report.is_visible_to(requester))
            .ok_or(ReportError::NotFoundOrForbidden)
    }
}
