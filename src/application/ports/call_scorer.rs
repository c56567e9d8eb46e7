use async_trait::async_trait;

use crate::domain::{Emotion, Nuance, QualityCriteria, WordTimestamp};

/// What one generative scoring pass produces for a transcript.
#[derive(Debug, Clone)]
pub struct CallScore {
    pub criteria: QualityCriteria,
    pub score: Option<f64>,
    pub confidence: f64,
    pub critical_words: Vec<String>,
    pub rationale: Vec<String>,
    pub analysis: String,
    pub emotion: Option<Emotion>,
    pub nuance: Option<Nuance>,
}

#[async_trait]
pub trait CallScorer: Send + Sync {
    async fn score(
        &self,
        transcript: &str,
        words: &[WordTimestamp],
    ) -> Result<CallScore, CallScorerError>;
}

#[derive(Debug, thiserror::Error)]
pub enum CallScorerError {
    #[error("api request failed: {0}")]
    ApiRequestFailed(String),
    #[error("model response contains no JSON object")]
    Parse(String),
    #[error("malformed criteria in model response: {0}")]
    MalformedCriteria(String),
}
