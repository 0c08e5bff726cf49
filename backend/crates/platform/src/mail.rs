//! Outbound Mail
//!
//! The `send(to, subject, html)` capability. Callers treat every failure as
//! non-fatal: they log it and carry on.

use std::time::Duration;

use reqwest::Client;
use serde::Serialize;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum MailError {
    #[error("mail transport failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("mail API rejected the message ({status}): {body}")]
    Rejected { status: u16, body: String },
}

/// Mail delivery capability
#[trait_variant::make(Mailer: Send)]
pub trait LocalMailer {
    async fn send(&self, to: &str, subject: &str, html: &str) -> Result<(), MailError>;
}

/// HTTP JSON mail API client (Resend-compatible request body)
#[derive(Clone)]
pub struct HttpMailer {
    client: Client,
    endpoint: String,
    api_key: String,
    from: String,
}

#[derive(Debug, Serialize)]
struct SendRequest<'a> {
    from: &'a str,
    to: [&'a str; 1],
    subject: &'a str,
    html: &'a str,
}

impl HttpMailer {
    pub fn new(
        endpoint: impl Into<String>,
        api_key: impl Into<String>,
        from: impl Into<String>,
    ) -> Result<Self, MailError> {
        let client = Client::builder().timeout(Duration::from_secs(10)).build()?;
        Ok(Self {
            client,
            endpoint: endpoint.into(),
            api_key: api_key.into(),
            from: from.into(),
        })
    }
}

impl Mailer for HttpMailer {
    async fn send(&self, to: &str, subject: &str, html: &str) -> Result<(), MailError> {
        let request = SendRequest {
            from: &self.from,
            to: [to],
            subject,
            html,
        };

        let response = self
            .client
            .post(&self.endpoint)
            .bearer_auth(&self.api_key)
            .json(&request)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(MailError::Rejected {
                status: status.as_u16(),
                body,
            });
        }

        tracing::debug!(to = %to, subject = %subject, "Mail sent");
        Ok(())
    }
}

/// Mailer for environments without a mail API: writes the message to the log
#[derive(Debug, Clone, Default)]
pub struct LogMailer;

impl Mailer for LogMailer {
    async fn send(&self, to: &str, subject: &str, html: &str) -> Result<(), MailError> {
        tracing::info!(to = %to, subject = %subject, body_len = html.len(), "Mail (not sent, log only)");
        Ok(())
    }
}

/// Mailer picked at startup from configuration
#[derive(Clone)]
pub enum SelectedMailer {
    Http(HttpMailer),
    Log(LogMailer),
}

impl Mailer for SelectedMailer {
    async fn send(&self, to: &str, subject: &str, html: &str) -> Result<(), MailError> {
        match self {
            SelectedMailer::Http(mailer) => Mailer::send(mailer, to, subject, html).await,
            SelectedMailer::Log(mailer) => Mailer::send(mailer, to, subject, html).await,
        }
    }
}

/// Escape text for interpolation into an HTML mail body
pub fn escape_html(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    for ch in input.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(ch),
        }
    }
    out
}
