//! Reqwest-based single-attempt webhook delivery (§4.D).

use hmac::{Hmac, Mac};
use reqwest::Client;
use sha2::Sha256;

use super::DeliveryConfig;
use crate::error::{Error, Result};

type HmacSha256 = Hmac<Sha256>;

/// Thin HTTP client responsible for exactly one delivery attempt: building
/// headers, signing, and posting. Retry orchestration lives in
/// [`crate::dispatcher::Dispatcher`].
#[derive(Clone)]
pub struct WebhookClient {
    http: Client,
    config: DeliveryConfig,
}

impl WebhookClient {
    pub fn new(config: DeliveryConfig) -> Self {
        let http = Client::builder()
            .timeout(config.timeout())
            .build()
            .expect("failed to build webhook HTTP client");
        Self { http, config }
    }

    pub fn config(&self) -> &DeliveryConfig {
        &self.config
    }

    /// Signs `"<timestamp>.<payload-bytes>"` with HMAC-SHA256, over the raw
    /// payload bytes rather than a lossy UTF-8 restringification, returning
    /// a bare lowercase-hex digest with no scheme prefix (§4.D, §8
    /// property 6).
    pub fn sign_payload(secret: &str, timestamp: i64, payload: &[u8]) -> String {
        let mut mac =
            HmacSha256::new_from_slice(secret.as_bytes()).expect("HMAC accepts a key of any size");
        mac.update(timestamp.to_string().as_bytes());
        mac.update(b".");
        mac.update(payload);
        hex::encode(mac.finalize().into_bytes())
    }

    /// One HTTP attempt. Returns the response status code on any completed
    /// response, or an [`Error`] on a transport failure.
    pub async fn attempt(
        &self,
        url: &str,
        event_type: &str,
        payload: &[u8],
        secret: Option<&str>,
    ) -> Result<u16> {
        let timestamp = jiff::Timestamp::now().as_second();

        let mut request = self
            .http
            .post(url)
            .header("Content-Type", "application/json")
            .header("X-Webhook-Event", event_type)
            .header("X-Webhook-Timestamp", timestamp.to_string());

        if let Some(secret) = secret {
            let signature = Self::sign_payload(secret, timestamp, payload);
            request = request.header("X-Webhook-Signature", signature);
        }

        let response = request.body(payload.to_vec()).send().await.map_err(Error::Request)?;
        Ok(response.status().as_u16())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sign_payload_is_lowercase_hex_sha256_digest() {
        let signature = WebhookClient::sign_payload("secret", 1707600000, br#"{"test":1}"#);
        assert_eq!(signature.len(), 64);
        assert!(signature.chars().all(|c| c.is_ascii_hexdigit() && !c.is_ascii_uppercase()));
    }

    #[test]
    fn sign_payload_is_deterministic() {
        let a = WebhookClient::sign_payload("secret", 1707600000, br#"{"test":1}"#);
        let b = WebhookClient::sign_payload("secret", 1707600000, br#"{"test":1}"#);
        assert_eq!(a, b);
    }

    #[test]
    fn sign_payload_changes_with_secret() {
        let a = WebhookClient::sign_payload("secret-a", 1707600000, b"{}");
        let b = WebhookClient::sign_payload("secret-b", 1707600000, b"{}");
        assert_ne!(a, b);
    }
}
