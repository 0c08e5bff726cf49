//! Status Notification Content
//!
//! Builds the mail a submitter receives when a moderator changes the
//! status of their report.

use platform::mail::escape_html;

use crate::domain::capability::StatusNotice;
use crate::domain::value_object::report_status::ReportStatus;

/// Reason shown when a report was rejected without one
pub const DEFAULT_REJECTION_REASON: &str = "Violation of the Terms of Use.";

/// Subject and HTML body for a status notice
pub fn status_mail(notice: &StatusNotice, brand: &str) -> (String, String) {
    let subject = format!("[{brand}] Update: report {}", notice.status);
    let title = escape_html(&notice.title);

    let mut html = match notice.status {
        ReportStatus::Approved => format!(
            "<h2>Your report was approved!</h2>\
             <p>The report <strong>\"{title}\"</strong> is now visible in the public feed.</p>\
             <p>Thank you for helping your community.</p>"
        ),
        ReportStatus::Rejected => {
            let reason = notice
                .reason
                .as_deref()
                .filter(|r| !r.trim().is_empty())
                .unwrap_or(DEFAULT_REJECTION_REASON);
            format!(
                "<h2>Status update</h2>\
                 <p>The report <strong>\"{title}\"</strong> was rejected.</p>\
                 <p><strong>Reason:</strong> {}</p>",
                escape_html(reason)
            )
        }
        ReportStatus::Resolved => format!(
            "<h2 style=\"color:green;\">Problem solved!</h2>\
             <p>The report <strong>\"{title}\"</strong> was marked as resolved.</p>"
        ),
        ReportStatus::Pending => format!(
            "<p>The status of the report \"{title}\" changed to: {}.</p>",
            notice.status
        ),
    };

    html.push_str(&format!(
        "<br><p><em>Kind regards,<br>The {} team.</em></p>",
        escape_html(brand)
    ));

    (subject, html)
}
