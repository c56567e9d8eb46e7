use async_trait::async_trait;

use crate::application::ports::{Transcriber, Transcript, TranscriptionError};
use crate::domain::WordTimestamp;

/// Canned transcriber for local runs without speech credentials.
pub struct StubTranscriber;

#[async_trait]
impl Transcriber for StubTranscriber {
    async fn transcribe(
        &self,
        object_uri: &str,
        _language_code: &str,
    ) -> Result<Transcript, TranscriptionError> {
        tracing::debug!(uri = %object_uri, "Stub transcription");
        Ok(Transcript {
            text: "Bom dia, em que posso ajudar?".to_string(),
            words: vec![
                WordTimestamp {
                    word: "Bom".to_string(),
                    start_secs: 0.0,
                    end_secs: 0.4,
                },
                WordTimestamp {
                    word: "dia".to_string(),
                    start_secs: 0.4,
                    end_secs: 0.8,
                },
            ],
            confidence: 1.0,
        })
    }
}
