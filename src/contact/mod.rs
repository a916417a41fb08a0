//! Contact form relay
//!
//! Submissions pass the rate limiter, then field validation, and only then
//! reach the webhook.

mod rate_limit;
mod relay;

use axum::http::StatusCode;
use lazy_static::lazy_static;
use regex::Regex;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::config::{ContactConfig, FieldLimits};

pub use rate_limit::RateLimiter;
pub use relay::{MessageRelay, RelayError, WebhookRelay};

lazy_static! {
    static ref EMAIL_RE: Regex = Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").unwrap();
}

#[derive(Debug, Error)]
pub enum ContactError {
    #[error("Too many requests, please try again later.")]
    RateLimited,

    #[error("Invalid request body.")]
    InvalidBody,

    #[error("Missing required fields.")]
    MissingFields,

    #[error("{field} exceeds {limit} characters limit.")]
    TooLong { field: &'static str, limit: usize },

    #[error("Invalid email address.")]
    InvalidEmail,

    #[error("Exact Reason is required when the reason is other.")]
    MissingExactReason,

    #[error("Webhook URL is not configured.")]
    NotConfigured,

    #[error("{0}")]
    Relay(#[from] RelayError),
}

impl ContactError {
    /// HTTP status reported to the client
    pub fn status(&self) -> StatusCode {
        match self {
            ContactError::RateLimited => StatusCode::TOO_MANY_REQUESTS,
            ContactError::InvalidBody
            | ContactError::MissingFields
            | ContactError::TooLong { .. }
            | ContactError::InvalidEmail
            | ContactError::MissingExactReason => StatusCode::BAD_REQUEST,
            ContactError::NotConfigured | ContactError::Relay(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }
}

/// Contact form as submitted by the browser
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct ContactForm {
    pub name: Option<String>,
    pub email: Option<String>,
    pub reason: Option<String>,
    #[serde(rename = "exactReason")]
    pub exact_reason: Option<String>,
    pub message: Option<String>,
}

/// A submission that passed validation
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ContactMessage {
    pub name: String,
    pub email: String,
    pub reason: String,
    pub exact_reason: Option<String>,
    pub message: String,
}

impl ContactForm {
    /// Check required fields and per-field limits
    pub fn validate(self, limits: &FieldLimits) -> Result<ContactMessage, ContactError> {
        let (Some(name), Some(email), Some(reason), Some(message)) = (
            non_empty(self.name),
            non_empty(self.email),
            non_empty(self.reason),
            non_empty(self.message),
        ) else {
            return Err(ContactError::MissingFields);
        };
        let exact_reason = non_empty(self.exact_reason);

        check_len("Name", &name, limits.name)?;
        check_len("Email", &email, limits.email)?;
        check_len("Reason", &reason, limits.reason)?;
        if let Some(exact) = &exact_reason {
            check_len("Exact Reason", exact, limits.exact_reason)?;
        }
        check_len("Message", &message, limits.message)?;

        if !EMAIL_RE.is_match(&email) {
            return Err(ContactError::InvalidEmail);
        }
        if reason == "other" && exact_reason.is_none() {
            return Err(ContactError::MissingExactReason);
        }

        Ok(ContactMessage {
            name,
            email,
            reason,
            exact_reason,
            message,
        })
    }
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.is_empty())
}

fn check_len(field: &'static str, value: &str, limit: usize) -> Result<(), ContactError> {
    if value.chars().count() > limit {
        return Err(ContactError::TooLong { field, limit });
    }
    Ok(())
}

impl ContactMessage {
    /// Markdown summary of the sender, posted alongside the message file
    pub fn summary(&self) -> String {
        let exact = self
            .exact_reason
            .as_ref()
            .map(|e| format!("**Exact Reason**: {}\n", e))
            .unwrap_or_default();
        format!(
            "**Name**: {}\n**Email**: {}\n**Reason**: {}\n{}",
            self.name, self.email, self.reason, exact
        )
    }
}

/// Rate limiter, limits and relay behind the contact endpoint
pub struct ContactService {
    limiter: RateLimiter,
    limits: FieldLimits,
    relay: Option<Box<dyn MessageRelay>>,
}

impl ContactService {
    pub fn new(
        limiter: RateLimiter,
        limits: FieldLimits,
        relay: Option<Box<dyn MessageRelay>>,
    ) -> Self {
        Self {
            limiter,
            limits,
            relay,
        }
    }

    /// Service relaying to the configured webhook, if any
    pub fn from_config(config: &ContactConfig) -> Result<Self, RelayError> {
        let relay: Option<Box<dyn MessageRelay>> = match config.resolve_webhook_url() {
            Some(url) => Some(Box::new(WebhookRelay::new(url)?)),
            None => {
                tracing::warn!("No webhook configured, contact messages will be rejected");
                None
            }
        };
        Ok(Self::new(
            RateLimiter::from_config(&config.rate_limit),
            config.limits.clone(),
            relay,
        ))
    }

    /// Count the request against the rate limit
    pub fn admit(&self) -> Result<(), ContactError> {
        if self.limiter.check() {
            Ok(())
        } else {
            tracing::warn!("Contact rate limit reached");
            Err(ContactError::RateLimited)
        }
    }

    /// Validate and relay an admitted submission
    pub async fn send(&self, form: ContactForm) -> Result<(), ContactError> {
        let message = form.validate(&self.limits)?;
        let relay = self.relay.as_ref().ok_or(ContactError::NotConfigured)?;
        relay.relay(&message).await.map_err(|e| {
            tracing::error!("Error sending contact message: {}", e);
            ContactError::from(e)
        })
    }

    /// `admit` followed by `send`
    pub async fn submit(&self, form: ContactForm) -> Result<(), ContactError> {
        self.admit()?;
        self.send(form).await
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use async_trait::async_trait;
    use std::sync::{Arc, Mutex};
    use std::time::Duration;

    /// Relay that records every message it is handed
    #[derive(Clone, Default)]
    pub(crate) struct RecordingRelay {
        pub sent: Arc<Mutex<Vec<ContactMessage>>>,
    }

    #[async_trait]
    impl MessageRelay for RecordingRelay {
        async fn relay(&self, message: &ContactMessage) -> Result<(), RelayError> {
            self.sent.lock().unwrap().push(message.clone());
            Ok(())
        }
    }

    pub(crate) fn form() -> ContactForm {
        ContactForm {
            name: Some("Ada Lovelace".to_string()),
            email: Some("ada@example.com".to_string()),
            reason: Some("question".to_string()),
            exact_reason: None,
            message: Some("Hello there".to_string()),
        }
    }

    fn service(relay: &RecordingRelay, max: u32) -> ContactService {
        ContactService::new(
            RateLimiter::new(max, Duration::from_secs(60)),
            FieldLimits::default(),
            Some(Box::new(relay.clone())),
        )
    }

    #[test]
    fn test_valid_form() {
        let message = form().validate(&FieldLimits::default()).unwrap();
        assert_eq!(message.name, "Ada Lovelace");
        assert_eq!(
            message.summary(),
            "**Name**: Ada Lovelace\n**Email**: ada@example.com\n**Reason**: question\n"
        );
    }

    #[test]
    fn test_missing_fields() {
        for f in [
            ContactForm {
                name: None,
                ..form()
            },
            ContactForm {
                email: Some(String::new()),
                ..form()
            },
            ContactForm {
                message: None,
                ..form()
            },
            ContactForm::default(),
        ] {
            let err = f.validate(&FieldLimits::default()).unwrap_err();
            assert!(matches!(err, ContactError::MissingFields));
            assert_eq!(err.status(), StatusCode::BAD_REQUEST);
        }
    }

    #[test]
    fn test_name_over_limit() {
        let f = ContactForm {
            name: Some("a".repeat(126)),
            ..form()
        };
        let err = f.validate(&FieldLimits::default()).unwrap_err();
        assert_eq!(err.to_string(), "Name exceeds 125 characters limit.");

        let f = ContactForm {
            name: Some("é".repeat(125)),
            ..form()
        };
        assert!(f.validate(&FieldLimits::default()).is_ok());
    }

    #[test]
    fn test_other_limits_and_rules() {
        let limits = FieldLimits::default();
        let err = ContactForm {
            reason: Some("r".repeat(51)),
            ..form()
        }
        .validate(&limits)
        .unwrap_err();
        assert_eq!(err.to_string(), "Reason exceeds 50 characters limit.");

        let err = ContactForm {
            exact_reason: Some("x".repeat(251)),
            ..form()
        }
        .validate(&limits)
        .unwrap_err();
        assert_eq!(err.to_string(), "Exact Reason exceeds 250 characters limit.");

        let err = ContactForm {
            email: Some("not-an-email".to_string()),
            ..form()
        }
        .validate(&limits)
        .unwrap_err();
        assert!(matches!(err, ContactError::InvalidEmail));

        let err = ContactForm {
            reason: Some("other".to_string()),
            ..form()
        }
        .validate(&limits)
        .unwrap_err();
        assert!(matches!(err, ContactError::MissingExactReason));

        let message = ContactForm {
            reason: Some("other".to_string()),
            exact_reason: Some("Collaboration".to_string()),
            ..form()
        }
        .validate(&limits)
        .unwrap();
        assert!(message.summary().ends_with("**Exact Reason**: Collaboration\n"));
    }

    #[tokio::test]
    async fn test_rejected_before_relay() {
        let relay = RecordingRelay::default();
        let service = service(&relay, 50);

        let err = service
            .submit(ContactForm {
                name: Some("a".repeat(126)),
                ..form()
            })
            .await
            .unwrap_err();
        assert_eq!(err.status(), StatusCode::BAD_REQUEST);
        assert!(relay.sent.lock().unwrap().is_empty());

        service.submit(form()).await.unwrap();
        assert_eq!(relay.sent.lock().unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_rate_limited_submissions() {
        let relay = RecordingRelay::default();
        let service = service(&relay, 2);

        service.submit(form()).await.unwrap();
        service.submit(form()).await.unwrap();
        let err = service.submit(form()).await.unwrap_err();
        assert_eq!(err.status(), StatusCode::TOO_MANY_REQUESTS);
        assert_eq!(relay.sent.lock().unwrap().len(), 2);
    }

    #[tokio::test]
    async fn test_missing_webhook() {
        let service = ContactService::new(
            RateLimiter::new(5, Duration::from_secs(60)),
            FieldLimits::default(),
            None,
        );
        let err = service.submit(form()).await.unwrap_err();
        assert!(matches!(err, ContactError::NotConfigured));
        assert_eq!(err.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }
}
