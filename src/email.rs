use std::sync::Arc;

use anyhow::Context;
use async_trait::async_trait;
use reqwest::Client;
use serde_json::json;
use tracing::{error, info};

use crate::config::EmailConfig;

/// Delivers verification codes to registering users.
#[async_trait]
pub trait EmailSender: Send + Sync {
    async fn send_verification_code(&self, to: &str, code: &str) -> anyhow::Result<()>;
}

/// Sends mail through an HTTP email API (Resend-compatible payload).
pub struct HttpEmailSender {
    client: Client,
    api_url: String,
    api_key: String,
    from: String,
}

impl HttpEmailSender {
    pub fn new(client: Client, api_url: String, api_key: String, from: String) -> Self {
        Self {
            client,
            api_url,
            api_key,
            from,
        }
    }
}

fn verification_html(code: &str) -> String {
    format!(
        r#"
        <div style="font-family: sans-serif; max-width: 600px; margin: 0 auto; padding: 20px;">
            <h2 style="color: #333;">Confirm your registration</h2>
            <p style="color: #555; font-size: 16px;">Your verification code is:</p>
            <p style="font-size: 28px; font-weight: bold; letter-spacing: 6px;">{code}</p>
            <p style="color: #aaa; font-size: 12px;">If you didn't request this email, you can safely ignore it.</p>
        </div>
        "#
    )
}

#[async_trait]
impl EmailSender for HttpEmailSender {
    async fn send_verification_code(&self, to: &str, code: &str) -> anyhow::Result<()> {
        let payload = json!({
            "from": self.from,
            "to": [to],
            "subject": "Your verification code",
            "html": verification_html(code),
        });

        let response = self
            .client
            .post(&self.api_url)
            .bearer_auth(&self.api_key)
            .json(&payload)
            .send()
            .await
            .context("reach email API")?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            error!(%status, body = %body, "email API rejected the request");
            anyhow::bail!("email API returned {status}");
        }

        info!(to = %to, "verification code sent");
        Ok(())
    }
}

/// Writes the code to the log instead of sending it. Used when no API key is configured.
pub struct LogEmailSender;

#[async_trait]
impl EmailSender for LogEmailSender {
    async fn send_verification_code(&self, to: &str, code: &str) -> anyhow::Result<()> {
        info!(to = %to, code = %code, "verification code (email delivery disabled)");
        Ok(())
    }
}

/// Pick the sender matching the config.
pub fn from_config(cfg: &EmailConfig) -> Arc<dyn EmailSender> {
    match &cfg.api_key {
        Some(key) => Arc::new(HttpEmailSender::new(
            Client::new(),
            cfg.api_url.clone(),
            key.clone(),
            cfg.from.clone(),
        )),
        None => Arc::new(LogEmailSender),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn html_contains_code() {
        assert!(verification_html("042917").contains("042917"));
    }

    #[tokio::test]
    async fn log_sender_always_succeeds() {
        LogEmailSender
            .send_verification_code("a@example.com", "000001")
            .await
            .expect("log sender");
    }
}
