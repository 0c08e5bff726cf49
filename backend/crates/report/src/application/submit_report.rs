//! Submit Report Use Case
//!
//! Validates content and attachments, stores the files, then inserts the
//! report as PENDING. If anything after the first stored file fails, the
//! stored files are removed again.

use std::sync::Arc;

use kernel::id::ReportId;
use kernel::principal::Principal;

use crate::application::config::ReportConfig;
use crate::domain::capability::{FileStorage, Upload};
use crate::domain::entity::report::NewReport;
use crate::domain::repository::ReportRepository;
use crate::domain::value_object::{attachments::Attachments, report_content::ReportContent};
use crate::error::{ReportError, ReportResult};

pub struct SubmitReportInput {
    pub title: String,
    pub description: String,
    pub location: String,
    pub anonymous: bool,
    pub attachments: Vec<Upload>,
}

pub struct SubmitReportUseCase<R, S>
where
    R: ReportRepository,
    S: FileStorage,
{
    report_repo: Arc<R>,
    storage: Arc<S>,
    config: Arc<ReportConfig>,
}

impl<R, S> SubmitReportUseCase<R, S>
where
    R: ReportRepository,
    S: FileStorage,
{
    pub fn new(report_repo: Arc<R>, storage: Arc<S>, config: Arc<ReportConfig>) -> Self {
        Self {
            report_repo,
            storage,
            config,
        }
    }

    pub async fn execute(
        &self,
        submitter: &Principal,
        input: SubmitReportInput,
    ) -> ReportResult<ReportId> {
        let content = ReportContent::new(&input.title, &input.description, &input.location)?;
        self.check_attachments(&input.attachments)?;

        let mut stored = Vec::with_capacity(input.attachments.len());
        for upload in &input.attachments {
            match self.storage.store(upload).await {
                Ok(name) => stored.push(name),
                Err(e) => {
                    self.discard(&stored).await;
                    return Err(e);
                }
            }
        }

        let report = NewReport::new(
            submitter,
            content,
            Attachments::new(stored.clone()),
            input.anonymous,
        );

        let report_id = match self.report_repo.insert(&report).await {
            Ok(id) => id,
            Err(e) => {
                self.discard(&stored).await;
                return Err(e);
            }
        };

        tracing::info!(
            report_id = %report_id,
            user_id = %submitter.user_id,
            attachments = stored.len(),
            anonymous = input.anonymous,
            "Report submitted"
        );

        Ok(report_id)
    }

    /// Everything here is decided before any file is written
    fn check_attachments(&self, uploads: &[Upload]) -> ReportResult<()> {
        if uploads.is_empty() {
            return Err(ReportError::validation(
                "A photo or video is required",
                "attachment",
            ));
        }
        if uploads.len() > self.config.max_attachments {
            return Err(ReportError::validation(
                format!("At most {} files per report", self.config.max_attachments),
                "attachment",
            ));
        }
        for upload in uploads {
            if !self.config.is_allowed_media(&upload.content_type) {
                return Err(ReportError::UnsupportedMedia(upload.content_type.clone()));
            }
            if upload.bytes.len() > self.config.max_attachment_bytes {
                return Err(ReportError::AttachmentTooLarge {
                    max_mb: self.config.max_attachment_mb(),
                });
            }
        }
        Ok(())
    }

    async fn discard(&self, stored: &[String]) {
        for name in stored {
            if let Err(e) = self.storage.delete(name).await {
                tracing::warn!(file = %name, error = %e, "Failed to remove orphaned attachment");
            }
        }
    }
}
