use async_trait::async_trait;

use crate::domain::EvaluationId;

/// Best-effort completion signal back to the console API. Failures are
/// logged by callers, never fatal to message processing.
#[async_trait]
pub trait CompletionNotifier: Send + Sync {
    async fn notify_completed(&self, evaluation_id: EvaluationId) -> Result<(), NotifyError>;
}

#[derive(Debug, thiserror::Error)]
pub enum NotifyError {
    #[error("notify request failed: {0}")]
    RequestFailed(String),
}
