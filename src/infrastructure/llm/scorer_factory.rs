use std::sync::Arc;
use std::time::Duration;

use crate::application::ports::{CallScorer, CallScorerError};
use crate::presentation::config::{LlmProviderSetting, LlmSettings};

use super::gemini_scorer::GeminiScorer;
use super::stub_scorer::StubScorer;

pub struct CallScorerFactory;

impl CallScorerFactory {
    pub fn create(settings: &LlmSettings) -> Result<Arc<dyn CallScorer>, CallScorerError> {
        match settings.provider {
            LlmProviderSetting::Gemini => {
                let api_key = settings.api_key.as_deref().ok_or_else(|| {
                    CallScorerError::ApiRequestFailed(
                        "api key required for the Gemini provider".to_string(),
                    )
                })?;
                Ok(Arc::new(GeminiScorer::new(
                    settings.endpoint.as_deref(),
                    api_key,
                    &settings.model,
                    Duration::from_secs(settings.request_timeout_secs),
                )))
            }
            LlmProviderSetting::Stub => Ok(Arc::new(StubScorer)),
        }
    }
}
