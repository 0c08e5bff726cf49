//! List My Reports Use Case

use std::sync::Arc;

use kernel::principal::Principal;

use crate::domain::entity::report::Report;
use crate::domain::repository::ReportRepository;
use crate::error::ReportResult;

pub struct ListMyReportsUseCase<R>
where
    R: ReportRepository,
{
    report_repo: Arc<R>,
}

impl<R> ListMyReportsUseCase<R>
where
    R: ReportRepository,
{
    pub fn new(report_repo: Arc<R>) -> Self {
        Self { report_repo }
    }

    /// The requester's reports in every status, newest first
    pub async fn execute(&self, requester: &Principal) -> ReportResult<Vec<Report>> {
        self.report_repo.list_by_owner(requester.user_id).await
    }
}
