use std::time::Duration;

use async_trait::async_trait;
use serde::Serialize;
use uuid::Uuid;

use crate::application::ports::{CompletionNotifier, NotifyError};
use crate::domain::EvaluationId;

const NOTIFY_TIMEOUT: Duration = Duration::from_secs(5);

/// Posts the completion signal to the console API so it can push the event
/// to connected operators.
pub struct HttpCompletionNotifier {
    client: reqwest::Client,
    endpoint: String,
}

impl HttpCompletionNotifier {
    pub fn new(base_url: &str) -> Self {
        Self {
            client: reqwest::Client::new(),
            endpoint: format!(
                "{}/internal/notify-completed",
                base_url.trim_end_matches('/')
            ),
        }
    }
}

#[derive(Serialize)]
struct NotifyRequest {
    #[serde(rename = "evaluationId")]
    evaluation_id: Uuid,
}

#[async_trait]
impl CompletionNotifier for HttpCompletionNotifier {
    async fn notify_completed(&self, evaluation_id: EvaluationId) -> Result<(), NotifyError> {
        let response = self
            .client
            .post(&self.endpoint)
            .timeout(NOTIFY_TIMEOUT)
            .json(&NotifyRequest {
                evaluation_id: evaluation_id.as_uuid(),
            })
            .send()
            .await
            .map_err(|e| NotifyError::RequestFailed(e.to_string()))?;

        if !response.status().is_success() {
            return Err(NotifyError::RequestFailed(format!(
                "status {}",
                response.status()
            )));
        }

        tracing::debug!(evaluation_id = %evaluation_id, "Completion notified");
        Ok(())
    }
}
