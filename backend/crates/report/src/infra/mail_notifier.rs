//! Mail Status Notifier
//!
//! Sends status mails on a spawned task so the moderation request does not
//! wait for the mail API.

use std::sync::Arc;

use platform::mail::{MailError, Mailer};

use crate::application::notification::status_mail;
use crate::domain::capability::{StatusNotice, StatusNotifier};

pub struct MailNotifier<M> {
    mailer: Arc<M>,
    brand: String,
}

impl<M> Clone for MailNotifier<M> {
    fn clone(&self) -> Self {
        Self {
            mailer: self.mailer.clone(),
            brand: self.brand.clone(),
        }
    }
}

impl<M> MailNotifier<M>
where
    M: Mailer + Sync + 'static,
{
    pub fn new(mailer: Arc<M>, brand: impl Into<String>) -> Self {
        Self {
            mailer,
            brand: brand.into(),
        }
    }

    /// Build and send one notice, waiting for the result
    pub async fn deliver(&self, notice: &StatusNotice) -> Result<(), MailError> {
        let (subject, html) = status_mail(notice, &self.brand);
        self.mailer.send(&notice.to, &subject, &html).await
    }
}

impl<M> StatusNotifier for MailNotifier<M>
where
    M: Mailer + Sync + 'static,
{
    fn notify(&self, notice: StatusNotice) {
        let notifier = self.clone();
        tokio::spawn(async move {
            match notifier.deliver(&notice).await {
                Ok(()) => {
                    tracing::info!(to = %notice.to, status = %notice.status, "Status notification sent");
                }
                Err(e) => {
                    tracing::error!(
                        to = %notice.to,
                        status = %notice.status,
                        error = %e,
                        "Status notification failed"
                    );
                }
            }
        });
    }
}
