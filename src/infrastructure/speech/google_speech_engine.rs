use std::time::Duration;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::application::ports::{Transcriber, Transcript, TranscriptionError};
use crate::domain::WordTimestamp;

const DEFAULT_ENDPOINT: &str = "https://speech.googleapis.com";
const POLL_INTERVAL: Duration = Duration::from_secs(5);

/// Speech-to-Text over the REST surface: submit a long-running recognition
/// for a storage URI, then poll the operation until it resolves.
pub struct GoogleSpeechEngine {
    client: reqwest::Client,
    endpoint: String,
    api_key: String,
    request_timeout: Duration,
    max_poll_attempts: u32,
}

impl GoogleSpeechEngine {
    pub fn new(endpoint: Option<&str>, api_key: &str, request_timeout: Duration) -> Self {
        Self {
            client: reqwest::Client::new(),
            endpoint: endpoint
                .unwrap_or(DEFAULT_ENDPOINT)
                .trim_end_matches('/')
                .to_string(),
            api_key: api_key.to_string(),
            request_timeout,
            max_poll_attempts: 120,
        }
    }

    async fn start_operation(
        &self,
        object_uri: &str,
        language_code: &str,
    ) -> Result<String, TranscriptionError> {
        let url = format!(
            "{}/v1/speech:longrunningrecognize?key={}",
            self.endpoint, self.api_key
        );
        let request = RecognizeRequest {
            config: RecognitionConfig {
                encoding: "WEBM_OPUS",
                sample_rate_hertz: 16_000,
                language_code,
                enable_automatic_punctuation: true,
                enable_word_time_offsets: true,
                model: "latest_long",
                use_enhanced: true,
            },
            audio: RecognitionAudio { uri: object_uri },
        };

        tracing::debug!(uri = %object_uri, "Submitting audio for recognition");

        let response = self
            .client
            .post(&url)
            .timeout(self.request_timeout)
            .json(&request)
            .send()
            .await
            .map_err(|e| TranscriptionError::ApiRequestFailed(format!("request: {}", e)))?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| "unknown error".to_string());
            return Err(TranscriptionError::ApiRequestFailed(format!(
                "status {}: {}",
                status, body
            )));
        }

        let operation: Operation = response
            .json()
            .await
            .map_err(|e| TranscriptionError::ApiRequestFailed(format!("parse response: {}", e)))?;

        Ok(operation.name)
    }

    async fn poll_operation(&self, name: &str) -> Result<RecognizeResponse, TranscriptionError> {
        let url = format!("{}/v1/operations/{}?key={}", self.endpoint, name, self.api_key);

        for _ in 0..self.max_poll_attempts {
            let operation: Operation = self
                .client
                .get(&url)
                .timeout(self.request_timeout)
                .send()
                .await
                .map_err(|e| TranscriptionError::ApiRequestFailed(format!("poll: {}", e)))?
                .json()
                .await
                .map_err(|e| TranscriptionError::ApiRequestFailed(format!("parse poll: {}", e)))?;

            if let Some(error) = operation.error {
                return Err(TranscriptionError::OperationFailed(error.message));
            }
            if operation.done {
                return operation.response.ok_or(TranscriptionError::EmptyTranscript);
            }

            tokio::time::sleep(POLL_INTERVAL).await;
        }

        Err(TranscriptionError::OperationFailed(format!(
            "recognition operation {} did not finish in time",
            name
        )))
    }
}

#[async_trait]
impl Transcriber for GoogleSpeechEngine {
    async fn transcribe(
        &self,
        object_uri: &str,
        language_code: &str,
    ) -> Result<Transcript, TranscriptionError> {
        let operation_name = self.start_operation(object_uri, language_code).await?;
        let response = self.poll_operation(&operation_name).await?;

        let mut text = String::new();
        let mut words = Vec::new();
        let mut confidence = 0.0;

        for (i, result) in response.results.iter().enumerate() {
            let Some(alternative) = result.alternatives.first() else {
                continue;
            };
            if i == 0 {
                confidence = alternative.confidence;
            }
            text.push_str(&alternative.transcript);
            text.push(' ');
            for word in &alternative.words {
                words.push(WordTimestamp {
                    word: word.word.clone(),
                    start_secs: parse_offset(word.start_time.as_deref()),
                    end_secs: parse_offset(word.end_time.as_deref()),
                });
            }
        }

        let text = text.trim().to_string();
        if text.is_empty() {
            return Err(TranscriptionError::EmptyTranscript);
        }

        tracing::info!(chars = text.len(), words = words.len(), "Recognition completed");

        Ok(Transcript {
            text,
            words,
            confidence,
        })
    }
}

/// Offsets come back as `"1.500s"` strings.
fn parse_offset(offset: Option<&str>) -> f64 {
    offset
        .and_then(|s| s.trim_end_matches('s').parse::<f64>().ok())
        .unwrap_or(0.0)
}

#[derive(Serialize)]
struct RecognizeRequest<'a> {
    config: RecognitionConfig<'a>,
    audio: RecognitionAudio<'a>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct RecognitionConfig<'a> {
    encoding: &'a str,
    sample_rate_hertz: u32,
    language_code: &'a str,
    enable_automatic_punctuation: bool,
    enable_word_time_offsets: bool,
    model: &'a str,
    use_enhanced: bool,
}

#[derive(Serialize)]
struct RecognitionAudio<'a> {
    uri: &'a str,
}

#[derive(Deserialize)]
struct Operation {
    name: String,
    #[serde(default)]
    done: bool,
    error: Option<OperationError>,
    response: Option<RecognizeResponse>,
}

#[derive(Deserialize)]
struct OperationError {
    message: String,
}

#[derive(Deserialize)]
struct RecognizeResponse {
    #[serde(default)]
    results: Vec<SpeechResult>,
}

#[derive(Deserialize)]
struct SpeechResult {
    #[serde(default)]
    alternatives: Vec<SpeechAlternative>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct SpeechAlternative {
    #[serde(default)]
    transcript: String,
    #[serde(default)]
    confidence: f64,
    #[serde(default)]
    words: Vec<WordInfo>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct WordInfo {
    word: String,
    start_time: Option<String>,
    end_time: Option<String>,
}
