use async_trait::async_trait;
use rand::Rng;
use reqwest::multipart::{Form, Part};
use reqwest::StatusCode;
use std::time::Duration;
use thiserror::Error;

use super::ContactMessage;

#[derive(Debug, Error)]
pub enum RelayError {
    #[error("request failed: {0}")]
    Request(#[from] reqwest::Error),

    #[error("webhook returned {status}: {body}")]
    Status { status: StatusCode, body: String },
}

/// Delivers validated contact messages
#[async_trait]
pub trait MessageRelay: Send + Sync {
    async fn relay(&self, message: &ContactMessage) -> Result<(), RelayError>;
}

/// Discord-compatible webhook: the message body is uploaded as a text file,
/// the sender details go into the `payload_json` part.
pub struct WebhookRelay {
    http: reqwest::Client,
    url: String,
}

impl WebhookRelay {
    pub fn new(url: impl Into<String>) -> Result<Self, RelayError> {
        let http = reqwest::Client::builder()
            .user_agent(concat!("portfolio-rs/", env!("CARGO_PKG_VERSION")))
            .timeout(Duration::from_secs(15))
            .build()?;
        Ok(Self {
            http,
            url: url.into(),
        })
    }
}

#[async_trait]
impl MessageRelay for WebhookRelay {
    async fn relay(&self, message: &ContactMessage) -> Result<(), RelayError> {
        let file = Part::bytes(message.message.clone().into_bytes())
            .file_name(attachment_name())
            .mime_str("text/plain; charset=utf-8")?;
        let payload = serde_json::json!({ "content": message.summary() });
        let form = Form::new()
            .part("file", file)
            .text("payload_json", payload.to_string());

        let response = self.http.post(&self.url).multipart(form).send().await?;
        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(RelayError::Status { status, body });
        }

        tracing::info!("Relayed contact message from {}", message.email);
        Ok(())
    }
}

/// `message-<3 digits>.txt`
fn attachment_name() -> String {
    let id: u16 = rand::thread_rng().gen_range(100..1000);
    format!("message-{}.txt", id)
}
