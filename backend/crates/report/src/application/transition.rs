//! Status Transitions
//!
//! Shared by moderation and resolution: admin check, lifecycle check,
//! update, then a notification that never affects the outcome.

use kernel::id::ReportId;
use kernel::principal::Principal;

use crate::domain::capability::{StatusNotice, StatusNotifier};
use crate::domain::repository::ReportRepository;
use crate::domain::value_object::report_status::ReportStatus;
use crate::error::{ReportError, ReportResult};

pub(crate) fn ensure_admin(principal: &Principal) -> ReportResult<()> {
    if principal.is_admin {
        Ok(())
    } else {
        Err(ReportError::AdminRequired)
    }
}

/// Racing moderation decisions are last-write-wins. The write itself
/// re-checks the stored status, so a decision read before another
/// transition cannot move a report out of REJECTED or RESOLVED.
pub(crate) async fn apply_transition<R>(
    report_repo: &R,
    notifier: &dyn StatusNotifier,
    admin: &Principal,
    report_id: ReportId,
    target: ReportStatus,
    rejection_reason: Option<String>,
) -> ReportResult<()>
where
    R: ReportRepository,
{
    ensure_admin(admin)?;

    let report = report_repo
        .find_by_id(report_id)
        .await?
        .ok_or(ReportError::NotFound)?;

    if !report.status.can_transition_to(target) {
        return Err(ReportError::InvalidTransition {
            from: report.status,
            to: target,
        });
    }

    let rejection_reason = match target {
        ReportStatus::Rejected => rejection_reason,
        _ => None,
    };

    if !report_repo
        .update_status(report_id, target, rejection_reason.as_deref())
        .await?
    {
        // Changed or removed since it was read
        return match report_repo.find_by_id(report_id).await? {
            Some(current) => {
                tracing::warn!(
                    report_id = %report_id,
                    from = %current.status,
                    status = %target,
                    "Status changed concurrently, transition refused"
                );
                Err(ReportError::InvalidTransition {
                    from: current.status,
                    to: target,
                })
            }
            None => Err(ReportError::NotFound),
        };
    }

    tracing::info!(
        report_id = %report_id,
        admin_id = %admin.user_id,
        from = %report.status,
        status = %target,
        "Report status changed"
    );

    match report_repo.find_submitter_contact(report_id).await {
        Ok(Some(contact)) => notifier.notify(StatusNotice {
            to: contact.email,
            title: contact.title,
            status: target,
            reason: rejection_reason,
        }),
        Ok(None) => {
            tracing::warn!(report_id = %report_id, "No submitter to notify");
        }
        Err(e) => {
            tracing::error!(report_id = %report_id, error = %e, "Submitter lookup failed, not notifying");
        }
    }

    Ok(())
}
