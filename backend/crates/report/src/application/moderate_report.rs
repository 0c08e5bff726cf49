//! Moderate Report Use Case
//!
//! Approve or reject a PENDING report. A rejection may carry a reason;
//! a blank one is stored as none.

use std::sync::Arc;

use kernel::id::ReportId;
use kernel::principal::Principal;

use crate::application::config::ReportConfig;
use crate::application::transition::{apply_transition, ensure_admin};
use crate::domain::capability::StatusNotifier;
use crate::domain::repository::ReportRepository;
use crate::domain::value_object::report_status::{ModerationDecision, ReportStatus};
use crate::error::{ReportError, ReportResult};

pub struct ModerateReportInput {
    pub report_id: ReportId,
    /// `APPROVED` or `REJECTED`
    pub new_status: String,
    pub rejection_reason: Option<String>,
}

pub struct ModerateReportUseCase<R>
where
    R: ReportRepository,
{
    report_repo: Arc<R>,
    notifier: Arc<dyn StatusNotifier>,
    config: Arc<ReportConfig>,
}

impl<R> ModerateReportUseCase<R>
where
    R: ReportRepository,
{
    pub fn new(
        report_repo: Arc<R>,
        notifier: Arc<dyn StatusNotifier>,
        config: Arc<ReportConfig>,
    ) -> Self {
        Self {
            report_repo,
            notifier,
            config,
        }
    }

    pub async fn execute(
        &self,
        admin: &Principal,
        input: ModerateReportInput,
    ) -> ReportResult<ReportStatus> {
        ensure_admin(admin)?;

        let decision = ModerationDecision::from_code(&input.new_status).ok_or_else(|| {
            ReportError::validation("Status must be APPROVED or REJECTED", "new_status")
        })?;

        // Only a rejection keeps its reason
        let reason = input
            .rejection_reason
            .filter(|_| decision == ModerationDecision::Reject)
            .map(|r| r.trim().to_string())
            .filter(|r| !r.is_empty());
        if let Some(reason) = &reason {
            if reason.chars().count() > self.config.max_reason_chars {
                return Err(ReportError::validation(
                    format!(
                        "Reason must be at most {} characters",
                        self.config.max_reason_chars
                    ),
                    "rejection_reason",
                ));
            }
        }

        let target = decision.target();
        apply_transition(
            self.report_repo.as_ref(),
            self.notifier.as_ref(),
            admin,
            input.report_id,
            target,
            reason,
        )
        .await?;

        Ok(target)
    }
}
