//! List Admin Panel Use Case
//!
//! Every report, grouped by status rank (PENDING, APPROVED, RESOLVED,
//! REJECTED) and newest first within a group.

use std::sync::Arc;

use kernel::principal::Principal;

use crate::application::transition::ensure_admin;
use crate::domain::entity::report::Report;
use crate::domain::repository::ReportRepository;
use crate::error::ReportResult;

pub struct ListAdminPanelUseCase<R>
where
    R: ReportRepository,
{
    report_repo: Arc<R>,
}

/// Rank first, then newest submission
pub fn sort_for_admin(reports: &mut [Report]) {
    reports.sort_by(|a, b| {
        a.status
            .admin_rank()
            .cmp(&b.status.admin_rank())
            .then_with(|| b.submitted_at.cmp(&a.submitted_at))
            .then_with(|| b.report_id.as_i64().cmp(&a.report_id.as_i64()))
    });
}

impl<R> ListAdminPanelUseCase<R>
where
    R: ReportRepository,
{
    pub fn new(report_repo: Arc<R>) -> Self {
        Self { report_repo }
    }

    pub async fn execute(&self, admin: &Principal) -> ReportResult<Vec<Report>> {
        ensure_admin(admin)?;

        let mut reports = self.report_repo.list_all().await?;
        sort_for_admin(&mut reports);
        Ok(reports)
    }
}
