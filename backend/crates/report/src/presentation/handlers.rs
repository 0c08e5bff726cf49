//! HTTP Handlers
//!
//! Every handler expects a [`Principal`] extension; the api binary puts the
//! session and terms gates (and the admin gate for moderation) in front.

use axum::Json;
use axum::extract::multipart::{Field, MultipartError};
use axum::extract::{Extension, Multipart, Path, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use kernel::id::ReportId;
use kernel::principal::Principal;
use std::sync::Arc;

use crate::application::{
    CancelReportUseCase, GetReportDetailsUseCase, ListAdminPanelUseCase, ListMyReportsUseCase,
    ListPublicFeedUseCase, ModerateReportInput, ModerateReportUseCase, ReportConfig,
    ResolveReportUseCase, SubmitReportInput, SubmitReportUseCase,
};
use crate::domain::capability::{FileStorage, Geocoder, StatusNotifier, Upload};
use crate::domain::repository::ReportRepository;
use crate::domain::value_object::report_status::ReportStatus;
use crate::error::{ReportError, ReportResult};
use crate::presentation::dto::{
    AdminReportResponse, MessageResponse, ModerateRequest, ReportResponse, ResolveRequest,
    StatusChangedResponse, SubmitReportResponse,
};

/// Multipart field carrying photos and videos
pub const ATTACHMENT_FIELD: &str = "attachment";

/// Shared state for report handlers
pub struct ReportAppState<R, S, G> {
    pub repo: Arc<R>,
    pub storage: Arc<S>,
    pub geocoder: Arc<G>,
    pub notifier: Arc<dyn StatusNotifier>,
    pub config: Arc<ReportConfig>,
}

impl<R, S, G> ReportAppState<R, S, G> {
    pub fn new(
        repo: Arc<R>,
        storage: Arc<S>,
        geocoder: Arc<G>,
        notifier: Arc<dyn StatusNotifier>,
        config: Arc<ReportConfig>,
    ) -> Self {
        Self {
            repo,
            storage,
            geocoder,
            notifier,
            config,
        }
    }
}

impl<R, S, G> Clone for ReportAppState<R, S, G> {
    fn clone(&self) -> Self {
        Self {
            repo: self.repo.clone(),
            storage: self.storage.clone(),
            geocoder: self.geocoder.clone(),
            notifier: self.notifier.clone(),
            config: self.config.clone(),
        }
    }
}

// ============================================================================
// Reports (signed in, terms accepted)
// ============================================================================

/// GET /api/reports/feed
pub async fn feed<R, S, G>(
    State(state): State<ReportAppState<R, S, G>>,
) -> ReportResult<Json<Vec<ReportResponse>>>
where
    R: ReportRepository + Sync + 'static,
    S: FileStorage + Sync + 'static,
    G: Geocoder + Sync + 'static,
{
    let reports = ListPublicFeedUseCase::new(state.repo.clone(), state.geocoder.clone())
        .execute()
        .await?;

    Ok(Json(reports.into_iter().map(Into::into).collect()))
}

/// GET /api/reports/mine
pub async fn mine<R, S, G>(
    State(state): State<ReportAppState<R, S, G>>,
    Extension(principal): Extension<Principal>,
) -> ReportResult<Json<Vec<ReportResponse>>>
where
    R: ReportRepository + Sync + 'static,
    S: FileStorage + Sync + 'static,
    G: Geocoder + Sync + 'static,
{
    let reports = ListMyReportsUseCase::new(state.repo.clone())
        .execute(&principal)
        .await?;

    Ok(Json(reports.into_iter().map(Into::into).collect()))
}

/// POST /api/reports (multipart)
pub async fn submit<R, S, G>(
    State(state): State<ReportAppState<R, S, G>>,
    Extension(principal): Extension<Principal>,
    multipart: Multipart,
) -> ReportResult<impl IntoResponse>
where
    R: ReportRepository + Sync + 'static,
    S: FileStorage + Sync + 'static,
    G: Geocoder + Sync + 'static,
{
    let input = read_submission(multipart, &state.config).await?;

    let report_id =
        SubmitReportUseCase::new(state.repo.clone(), state.storage.clone(), state.config.clone())
            .execute(&principal, input)
            .await?;

    Ok((
        StatusCode::CREATED,
        Json(SubmitReportResponse {
            id: report_id,
            status: ReportStatus::Pending,
            message: "Report submitted for moderation",
        }),
    ))
}

/// GET /api/reports/{id}
pub async fn details<R, S, G>(
    State(state): State<ReportAppState<R, S, G>>,
    Extension(principal): Extension<Principal>,
    Path(id): Path<i64>,
) -> ReportResult<Json<ReportResponse>>
where
    R: ReportRepository + Sync + 'static,
    S: FileStorage + Sync + 'static,
    G: Geocoder + Sync + 'static,
{
    let report = GetReportDetailsUseCase::new(state.repo.clone())
        .execute(&principal, ReportId::from_i64(id))
        .await?;

    Ok(Json(report.into()))
}

/// POST /api/reports/{id}/cancel
pub async fn cancel<R, S, G>(
    State(state): State<ReportAppState<R, S, G>>,
    Extension(principal): Extension<Principal>,
    Path(id): Path<i64>,
) -> ReportResult<Json<MessageResponse>>
where
    R: ReportRepository + Sync + 'static,
    S: FileStorage + Sync + 'static,
    G: Geocoder + Sync + 'static,
{
    CancelReportUseCase::new(state.repo.clone(), state.storage.clone())
        .execute(&principal, ReportId::from_i64(id))
        .await?;

    Ok(Json(MessageResponse::new("Report cancelled")))
}

// ============================================================================
// Moderation (admin)
// ============================================================================

/// GET /api/admin/reports
pub async fn admin_panel<R, S, G>(
    State(state): State<ReportAppState<R, S, G>>,
    Extension(principal): Extension<Principal>,
) -> ReportResult<Json<Vec<AdminReportResponse>>>
where
    R: ReportRepository + Sync + 'static,
    S: FileStorage + Sync + 'static,
    G: Geocoder + Sync + 'static,
{
    let reports = ListAdminPanelUseCase::new(state.repo.clone())
        .execute(&principal)
        .await?;

    Ok(Json(reports.into_iter().map(Into::into).collect()))
}

/// POST /api/admin/update-status
pub async fn update_status<R, S, G>(
    State(state): State<ReportAppState<R, S, G>>,
    Extension(principal): Extension<Principal>,
    Json(req): Json<ModerateRequest>,
) -> ReportResult<Json<StatusChangedResponse>>
where
    R: ReportRepository + Sync + 'static,
    S: FileStorage + Sync + 'static,
    G: Geocoder + Sync + 'static,
{
    let status = ModerateReportUseCase::new(
        state.repo.clone(),
        state.notifier.clone(),
        state.config.clone(),
    )
    .execute(
        &principal,
        ModerateReportInput {
            report_id: req.id,
            new_status: req.new_status,
            rejection_reason: req.rejection_reason,
        },
    )
    .await?;

    Ok(Json(StatusChangedResponse {
        id: req.id,
        status,
        message: "Status updated",
    }))
}

/// POST /api/admin/resolve
pub async fn resolve<R, S, G>(
    State(state): State<ReportAppState<R, S, G>>,
    Extension(principal): Extension<Principal>,
    Json(req): Json<ResolveRequest>,
) -> ReportResult<Json<StatusChangedResponse>>
where
    R: ReportRepository + Sync + 'static,
    S: FileStorage + Sync + 'static,
    G: Geocoder + Sync + 'static,
{
    ResolveReportUseCase::new(state.repo.clone(), state.notifier.clone())
        .execute(&principal, req.id)
        .await?;

    Ok(Json(StatusChangedResponse {
        id: req.id,
        status: ReportStatus::Resolved,
        message: "Status updated to RESOLVED",
    }))
}

// ============================================================================
// Multipart
// ============================================================================

fn multipart_error(err: MultipartError, config: &ReportConfig) -> ReportError {
    if err.status() == StatusCode::PAYLOAD_TOO_LARGE {
        ReportError::AttachmentTooLarge {
            max_mb: config.max_attachment_mb(),
        }
    } else {
        ReportError::Validation {
            message: format!("Malformed upload: {}", err.body_text()),
            field: None,
        }
    }
}

async fn read_text(field: Field<'_>, config: &ReportConfig) -> ReportResult<String> {
    field.text().await.map_err(|e| multipart_error(e, config))
}

/// Collect the form into a submission. Count, type and size limits are
/// enforced while reading so oversized bodies are not buffered.
async fn read_submission(
    mut multipart: Multipart,
    config: &ReportConfig,
) -> ReportResult<SubmitReportInput> {
    let mut input = SubmitReportInput {
        title: String::new(),
        description: String::new(),
        location: String::new(),
        anonymous: false,
        attachments: Vec::new(),
    };

    while let Some(mut field) = multipart
        .next_field()
        .await
        .map_err(|e| multipart_error(e, config))?
    {
        let name = field.name().unwrap_or_default().to_string();
        match name.as_str() {
            "title" => input.title = read_text(field, config).await?,
            "description" => input.description = read_text(field, config).await?,
            "location" => input.location = read_text(field, config).await?,
            "anonymous" => {
                let value = read_text(field, config).await?;
                input.anonymous = matches!(value.trim(), "true" | "on" | "1");
            }
            ATTACHMENT_FIELD => {
                // Browsers send an empty part for an untouched file input
                if field.file_name().is_some_and(str::is_empty) {
                    continue;
                }
                if input.attachments.len() >= config.max_attachments {
                    return Err(ReportError::validation(
                        format!("At most {} files per report", config.max_attachments),
                        ATTACHMENT_FIELD,
                    ));
                }

                let content_type = field.content_type().unwrap_or_default().to_string();
                if !config.is_allowed_media(&content_type) {
                    return Err(ReportError::UnsupportedMedia(content_type));
                }
                let file_name = field.file_name().map(str::to_string);

                let mut bytes = Vec::new();
                while let Some(chunk) = field
                    .chunk()
                    .await
                    .map_err(|e| multipart_error(e, config))?
                {
                    if bytes.len() + chunk.len() > config.max_attachment_bytes {
                        return Err(ReportError::AttachmentTooLarge {
                            max_mb: config.max_attachment_mb(),
                        });
                    }
                    bytes.extend_from_slice(&chunk);
                }

                input.attachments.push(Upload {
                    field_name: ATTACHMENT_FIELD.to_string(),
                    file_name,
                    content_type,
                    bytes,
                });
            }
            _ => {
                tracing::debug!(field = %name, "Ignoring unknown form field");
            }
        }
    }

    Ok(input)
}
