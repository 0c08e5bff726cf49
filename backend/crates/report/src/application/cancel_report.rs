//! Cancel Report Use Case
//!
//! The owner may remove a report in any status. Attachment removal is
//! best effort; the row is gone either way.

use std::sync::Arc;

use kernel::id::ReportId;
use kernel::principal::Principal;

use crate::domain::capability::FileStorage;
use crate::domain::repository::ReportRepository;
use crate::error::{ReportError, ReportResult};

pub struct CancelReportUseCase<R, S>
where
    R: ReportRepository,
    S: FileStorage,
{
    report_repo: Arc<R>,
    storage: Arc<S>,
}

impl<R, S> CancelReportUseCase<R, S>
where
    R: ReportRepository,
    S: FileStorage,
{
    pub fn new(report_repo: Arc<R>, storage: Arc<S>) -> Self {
        Self {
            report_repo,
            storage,
        }
    }

    pub async fn execute(&self, requester: &Principal, report_id: ReportId) -> ReportResult<()> {
        // Ownership only; being an admin does not help here
        let report = self
            .report_repo
            .find_by_id(report_id)
            .await?
            .filter(|report| report.is_owned_by(requester.user_id))
            .ok_or(ReportError::NotFoundOrForbidden)?;

        if !self.report_repo.delete(report_id).await? {
            return Err(ReportError::NotFoundOrForbidden);
        }

        for name in report.attachments.iter() {
            if let Err(e) = self.storage.delete(name).await {
                tracing::warn!(
                    report_id = %report_id,
                    file = %name,
                    error = %e,
                    "Attachment left behind after cancellation"
                );
            }
        }

        tracing::info!(
            report_id = %report_id,
            user_id = %requester.user_id,
            status = %report.status,
            "Report cancelled"
        );

        Ok(())
    }
}
