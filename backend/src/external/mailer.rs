//! Transactional mail provider client
//!
//! Sends email through the provider's HTTP API and verifies the signature
//! of its delivery webhooks. Mail is always sent by an explicit service
//! call from the command performing the mutation.

use base64::{engine::general_purpose::STANDARD as BASE64, Engine as _};
use hmac::{Hmac, Mac};
use reqwest::Client;
use serde::{Deserialize, Serialize};
use sha2::Sha256;

use crate::config::MailConfig;
use crate::error::{AppError, AppResult};

/// Mail provider API client
#[derive(Clone)]
pub struct MailerClient {
    client: Client,
    api_endpoint: String,
    api_key: String,
    from_address: String,
    from_name: String,
}

/// Outbound message payload
#[derive(Debug, Serialize)]
pub struct OutboundMail {
    pub from: MailAddress,
    pub to: Vec<MailAddress>,
    pub subject: String,
    pub html_body: String,
}

#[derive(Debug, Serialize)]
pub struct MailAddress {
    pub email: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
}

/// Provider acknowledgement for a queued message
#[derive(Debug, Deserialize)]
pub struct MailAccepted {
    pub message_id: String,
}

/// A delivery event posted to our webhook
#[derive(Debug, Deserialize)]
pub struct DeliveryEvent {
    pub message_id: String,
    pub event: DeliveryOutcome,
    #[serde(default)]
    pub reason: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DeliveryOutcome {
    Delivered,
    Bounced,
    Deferred,
}

impl MailerClient {
    /// Create a client from configuration; None when outbound mail is
    /// disabled or unconfigured.
    pub fn from_config(config: &MailConfig) -> Option<Self> {
        if !config.enabled || config.api_endpoint.is_empty() {
            return None;
        }
        Some(Self {
            client: Client::new(),
            api_endpoint: config.api_endpoint.clone(),
            api_key: config.api_key.clone(),
            from_address: config.from_address.clone(),
            from_name: config.from_name.clone(),
        })
    }

    /// Send one HTML email. Returns the provider message id.
    pub async fn send(
        &self,
        to_email: &str,
        to_name: Option<&str>,
        subject: &str,
        html_body: &str,
    ) -> AppResult<String> {
        let payload = OutboundMail {
            from: MailAddress {
                email: self.from_address.clone(),
                name: Some(self.from_name.clone()),
            },
            to: vec![MailAddress {
                email: to_email.to_string(),
                name: to_name.map(|n| n.to_string()),
            }],
            subject: subject.to_string(),
            html_body: html_body.to_string(),
        };

        let response = self
            .client
            .post(format!("{}/messages", self.api_endpoint))
            .bearer_auth(&self.api_key)
            .json(&payload)
            .send()
            .await
            .map_err(|e| AppError::MailError(e.to_string()))?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(AppError::MailError(format!(
                "provider returned {}: {}",
                status, body
            )));
        }

        let accepted: MailAccepted = response
            .json()
            .await
            .map_err(|e| AppError::MailError(e.to_string()))?;

        Ok(accepted.message_id)
    }
}

/// Verify the HMAC-SHA256 signature of a delivery webhook body.
pub fn verify_webhook_signature(
    secret: &str,
    body: &[u8],
    signature: &str,
) -> Result<(), String> {
    type HmacSha256 = Hmac<Sha256>;
    let mut mac =
        HmacSha256::new_from_slice(secret.as_bytes()).map_err(|_| "Failed to create HMAC")?;
    mac.update(body);
    let expected = BASE64.encode(mac.finalize().into_bytes());

    if signature != expected {
        return Err("Signature mismatch".to_string());
    }

    Ok(())
}
