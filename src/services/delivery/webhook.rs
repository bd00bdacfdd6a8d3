use anyhow::Context;
use async_trait::async_trait;
use base64::Engine;
use hmac::{Hmac, Mac};
use sha1::Sha1;

use super::BookingSink;
use crate::models::Submission;

pub const SIGNATURE_HEADER: &str = "X-Kelme-Signature";
pub const BOOKING_ID_HEADER: &str = "X-Kelme-Booking-Id";

/// POSTs each booking payload as JSON to a CRM or booking endpoint. The
/// submission id and locale travel as headers.
pub struct WebhookSink {
    url: String,
    secret: String,
    client: reqwest::Client,
}

impl WebhookSink {
    pub fn new(url: String, secret: String) -> Self {
        Self {
            url,
            secret,
            client: reqwest::Client::new(),
        }
    }
}

/// Base64 HMAC-SHA1 of the raw request body.
pub fn sign_payload(secret: &str, body: &[u8]) -> anyhow::Result<String> {
    let mut mac =
        Hmac::<Sha1>::new_from_slice(secret.as_bytes()).context("invalid webhook secret")?;
    mac.update(body);
    let digest = mac.finalize().into_bytes();
    Ok(base64::engine::general_purpose::STANDARD.encode(digest))
}

#[async_trait]
impl BookingSink for WebhookSink {
    async fn deliver(&self, submission: &Submission) -> anyhow::Result<()> {
        let body =
            serde_json::to_vec(&submission.payload).context("failed to encode booking payload")?;

        let mut request = self
            .client
            .post(&self.url)
            .header(reqwest::header::CONTENT_TYPE, "application/json")
            .header(reqwest::header::CONTENT_LANGUAGE, submission.locale.as_ref())
            .header(BOOKING_ID_HEADER, submission.id.as_str());
        // Unsigned when no secret is configured (local development).
        if !self.secret.is_empty() {
            request = request.header(SIGNATURE_HEADER, sign_payload(&self.secret, &body)?);
        }

        request
            .body(body)
            .send()
            .await
            .context("failed to reach booking webhook")?
            .error_for_status()
            .context("booking webhook returned error")?;

        tracing::info!(id = %submission.id, url = %self.url, "booking delivered to webhook");
        Ok(())
    }
}
