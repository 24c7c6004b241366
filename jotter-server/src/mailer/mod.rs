//! Outbound email port
//!
//! The server only ever sends one kind of email: a sign-in code. The
//! provider is an HTTP API behind the [`Mailer`] trait; local dev and
//! tests use [`LogMailer`], which prints the code instead of sending.

use async_trait::async_trait;
use chrono::Duration;
use serde_json::json;
use thiserror::Error;

/// Mailer error type
#[derive(Debug, Error)]
pub enum MailError {
    #[error("mail transport error: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("mail provider rejected the message (status {status})")]
    Provider { status: u16 },
}

/// Sends sign-in codes to users
#[async_trait]
pub trait Mailer: Send + Sync + 'static {
    async fn send_code(&self, to: &str, code: &str, expires_in: Duration) -> Result<(), MailError>;
}

/// Mailer backed by a transactional email HTTP API
pub struct HttpMailer {
    client: reqwest::Client,
    endpoint: String,
    api_key: Option<String>,
    from: String,
}

impl HttpMailer {
    pub fn new(endpoint: String, api_key: Option<String>, from: String) -> Self {
        Self {
            client: reqwest::Client::new(),
            endpoint,
            api_key,
            from,
        }
    }
}

#[async_trait]
impl Mailer for HttpMailer {
    async fn send_code(&self, to: &str, code: &str, expires_in: Duration) -> Result<(), MailError> {
        let payload = json!({
            "from": self.from,
            "to": [to],
            "subject": SUBJECT,
            "text": message_body(code, expires_in),
        });

        let mut request = self.client.post(&self.endpoint).json(&payload);
        if let Some(key) = &self.api_key {
            request = request.bearer_auth(key);
        }

        let response = request.send().await?;
        if !response.status().is_success() {
            return Err(MailError::Provider {
                status: response.status().as_u16(),
            });
        }

        Ok(())
    }
}

/// Mailer that logs the code instead of sending it (dev mode)
pub struct LogMailer;

#[async_trait]
impl Mailer for LogMailer {
    async fn send_code(&self, to: &str, code: &str, expires_in: Duration) -> Result<(), MailError> {
        tracing::info!(to, code, minutes = expires_in.num_minutes(), "sign-in code (log mailer)");
        Ok(())
    }
}

const SUBJECT: &str = "Your jotter sign-in code";

fn message_body(code: &str, expires_in: Duration) -> String {
    format!(
        "Your jotter sign-in code is {}. It expires in {} minutes.\n\n\
         If you didn't request this, you can ignore this email.",
        code,
        expires_in.num_minutes()
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn log_mailer_always_succeeds() {
        let mailer = LogMailer;
        let result = mailer
            .send_code("user@example.com", "123456", Duration::minutes(10))
            .await;
        assert!(result.is_ok());
    }

    #[test]
    fn message_body_includes_code_and_ttl() {
        let body = message_body("042137", Duration::minutes(10));
        assert!(body.contains("042137"));
        assert!(body.contains("10 minutes"));
    }
}
