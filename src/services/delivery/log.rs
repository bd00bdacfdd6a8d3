use async_trait::async_trait;

use super::BookingSink;
use crate::models::Submission;

/// Writes the payload to the log and nothing else.
pub struct LogSink;

#[async_trait]
impl BookingSink for LogSink {
    async fn deliver(&self, submission: &Submission) -> anyhow::Result<()> {
        let payload = serde_json::to_string(&submission.payload)?;
        tracing::info!(id = %submission.id, locale = %submission.locale, %payload, "booking submitted");
        Ok(())
    }
}
