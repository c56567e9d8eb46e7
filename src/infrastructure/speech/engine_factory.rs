use std::sync::Arc;
use std::time::Duration;

use crate::application::ports::{Transcriber, TranscriptionError};
use crate::presentation::config::{SpeechProviderSetting, SpeechSettings};

use super::google_speech_engine::GoogleSpeechEngine;
use super::stub_engine::StubTranscriber;

pub struct TranscriberFactory;

impl TranscriberFactory {
    pub fn create(settings: &SpeechSettings) -> Result<Arc<dyn Transcriber>, TranscriptionError> {
        match settings.provider {
            SpeechProviderSetting::Google => {
                let api_key = settings.api_key.as_deref().ok_or_else(|| {
                    TranscriptionError::ApiRequestFailed(
                        "api key required for the Google speech provider".to_string(),
                    )
                })?;
                Ok(Arc::new(GoogleSpeechEngine::new(
                    settings.endpoint.as_deref(),
                    api_key,
                    Duration::from_secs(settings.request_timeout_secs),
                )))
            }
            SpeechProviderSetting::Stub => Ok(Arc::new(StubTranscriber)),
        }
    }
}
