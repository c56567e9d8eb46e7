use async_trait::async_trait;

use crate::domain::WordTimestamp;

#[derive(Debug, Clone)]
pub struct Transcript {
    pub text: String,
    pub words: Vec<WordTimestamp>,
    pub confidence: f64,
}

#[async_trait]
pub trait Transcriber: Send + Sync {
    /// Transcribe the object at `object_uri`. Implementations must return
    /// `EmptyTranscript` rather than an empty text.
    async fn transcribe(
        &self,
        object_uri: &str,
        language_code: &str,
    ) -> Result<Transcript, TranscriptionError>;
}

#[derive(Debug, thiserror::Error)]
pub enum TranscriptionError {
    #[error("api request failed: {0}")]
    ApiRequestFailed(String),
    #[error("recognition operation failed: {0}")]
    OperationFailed(String),
    #[error("transcription empty or invalid")]
    EmptyTranscript,
}
