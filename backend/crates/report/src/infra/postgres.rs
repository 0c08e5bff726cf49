//! PostgreSQL Repository Implementation

use chrono::{DateTime, Utc};
use kernel::id::{ReportId, UserId};
use sqlx::PgPool;

use crate::domain::entity::report::{NewReport, Report, SubmitterContact};
use crate::domain::repository::ReportRepository;
use crate::domain::value_object::{attachments::Attachments, report_status::ReportStatus};
use crate::error::{ReportError, ReportResult};

/// PostgreSQL-backed report repository
#[derive(Clone)]
pub struct PgReportRepository {
    pool: PgPool,
}

impl PgReportRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

const REPORT_COLUMNS: &str = r#"
    report_id,
    user_id,
    title,
    description,
    location,
    attachments,
    anonymous,
    display_name,
    status,
    rejection_reason,
    submitted_at
"#;

impl ReportRepository for PgReportRepository {
    async fn insert(&self, report: &NewReport) -> ReportResult<ReportId> {
        let id = sqlx::query_scalar::<_, i64>(
            r#"
            INSERT INTO reports (
                user_id,
                title,
                description,
                location,
                attachments,
                anonymous,
                display_name,
                status
            ) VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
            RETURNING report_id
            "#,
        )
        .bind(report.user_id.as_i64())
        .bind(&report.title)
        .bind(&report.description)
        .bind(&report.location)
        .bind(report.attachments.to_db())
        .bind(report.anonymous)
        .bind(&report.display_name)
        .bind(ReportStatus::Pending.code())
        .fetch_one(&self.pool)
        .await?;

        Ok(ReportId::from_i64(id))
    }

    async fn find_by_id(&self, report_id: ReportId) -> ReportResult<Option<Report>> {
        let row = sqlx::query_as::<_, ReportRow>(&format!(
            "SELECT {REPORT_COLUMNS} FROM reports WHERE report_id = $1"
        ))
        .bind(report_id.as_i64())
        .fetch_optional(&self.pool)
        .await?;

        row.map(ReportRow::into_report).transpose()
    }

    async fn list_public(&self) -> ReportResult<Vec<Report>> {
        let rows = sqlx::query_as::<_, ReportRow>(&format!(
            r#"
            SELECT {REPORT_COLUMNS} FROM reports
            WHERE status IN ($1, $2)
            ORDER BY submitted_at DESC, report_id DESC
            "#
        ))
        .bind(ReportStatus::Approved.code())
        .bind(ReportStatus::Resolved.code())
        .fetch_all(&self.pool)
        .await?;

        rows.into_iter().map(ReportRow::into_report).collect()
    }

    async fn list_all(&self) -> ReportResult<Vec<Report>> {
        let rows = sqlx::query_as::<_, ReportRow>(&format!(
            "SELECT {REPORT_COLUMNS} FROM reports ORDER BY submitted_at DESC, report_id DESC"
        ))
        .fetch_all(&self.pool)
        .await?;

        rows.into_iter().map(ReportRow::into_report).collect()
    }

    async fn list_by_owner(&self, user_id: UserId) -> ReportResult<Vec<Report>> {
        let rows = sqlx::query_as::<_, ReportRow>(&format!(
            r#"
            SELECT {REPORT_COLUMNS} FROM reports
            WHERE user_id = $1
            ORDER BY submitted_at DESC, report_id DESC
            "#
        ))
        .bind(user_id.as_i64())
        .fetch_all(&self.pool)
        .await?;

        rows.into_iter().map(ReportRow::into_report).collect()
    }

    async fn delete(&self, report_id: ReportId) -> ReportResult<bool> {
        let deleted = sqlx::query("DELETE FROM reports WHERE report_id = $1")
            .bind(report_id.as_i64())
            .execute(&self.pool)
            .await?
            .rows_affected();

        Ok(deleted > 0)
    }

    async fn update_status(
        &self,
        report_id: ReportId,
        status: ReportStatus,
        rejection_reason: Option<&str>,
    ) -> ReportResult<bool> {
        let guard: Vec<String> = status
            .write_guard()
            .iter()
            .map(|s| s.code().to_string())
            .collect();

        let updated = sqlx::query(
            r#"
            UPDATE reports SET
                status = $2,
                rejection_reason = $3
            WHERE report_id = $1
              AND status = ANY($4)
            "#,
        )
        .bind(report_id.as_i64())
        .bind(status.code())
        .bind(rejection_reason)
        .bind(guard)
        .execute(&self.pool)
        .await?
        .rows_affected();

        Ok(updated > 0)
    }

    async fn find_submitter_contact(
        &self,
        report_id: ReportId,
    ) -> ReportResult<Option<SubmitterContact>> {
        let row = sqlx::query_as::<_, (String, String)>(
            r#"
            SELECT u.email, r.title
            FROM reports r
            JOIN users u ON u.user_id = r.user_id
            WHERE r.report_id = $1
            "#,
        )
        .bind(report_id.as_i64())
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(|(email, title)| SubmitterContact { email, title }))
    }
}

// ============================================================================
// Row Types
// ============================================================================

#[derive(sqlx::FromRow)]
struct ReportRow {
    report_id: i64,
    user_id: i64,
    title: String,
    description: String,
    location: String,
    attachments: String,
    anonymous: bool,
    display_name: String,
    status: String,
    rejection_reason: Option<String>,
    submitted_at: DateTime<Utc>,
}

impl ReportRow {
    fn into_report(self) -> ReportResult<Report> {
        let status = ReportStatus::from_code(&self.status).ok_or_else(|| {
            ReportError::Internal(format!(
                "report {} has unknown status {:?}",
                self.report_id, self.status
            ))
        })?;

        Ok(Report {
            report_id: ReportId::from_i64(self.report_id),
            user_id: UserId::from_i64(self.user_id),
            title: self.title,
            description: self.description,
            location: self.location,
            attachments: Attachments::from_db(&self.attachments),
            anonymous: self.anonymous,
            display_name: self.display_name,
            status,
            rejection_reason: self.rejection_reason,
            submitted_at: self.submitted_at,
        })
    }
}
