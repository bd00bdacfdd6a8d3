pub mod log;
pub mod webhook;

use async_trait::async_trait;

use crate::models::Submission;

/// Where a finished booking goes once it has been accepted.
#[async_trait]
pub trait BookingSink: Send + Sync {
    async fn deliver(&self, submission: &Submission) -> anyhow::Result<()>;
}
