//! Resolve Report Use Case
//!
//! Marks an APPROVED report as RESOLVED.

use std::sync::Arc;

use kernel::id::ReportId;
use kernel::principal::Principal;

use crate::application::transition::apply_transition;
use crate::domain::capability::StatusNotifier;
use crate::domain::repository::ReportRepository;
use crate::domain::value_object::report_status::ReportStatus;
use crate::error::ReportResult;

pub struct ResolveReportUseCase<R>
where
    R: ReportRepository,
{
    report_repo: Arc<R>,
    notifier: Arc<dyn StatusNotifier>,
}

impl<R> ResolveReportUseCase<R>
where
    R: ReportRepository,
{
    pub fn new(report_repo: Arc<R>, notifier: Arc<dyn StatusNotifier>) -> Self {
        Self {
            report_repo,
            notifier,
        }
    }

    pub async fn execute(&self, admin: &Principal, report_id: ReportId) -> ReportResult<()> {
        apply_transition(
            self.report_repo.as_ref(),
            self.notifier.as_ref(),
            admin,
            report_id,
            ReportStatus::Resolved,
            None,
        )
        .await
    }
}
