use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::{EvaluationId, QualityCriteria};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct AnalysisId(Uuid);

impl AnalysisId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    pub fn from_uuid(uuid: Uuid) -> Self {
        Self(uuid)
    }

    pub fn as_uuid(&self) -> Uuid {
        self.0
    }
}

impl Default for AnalysisId {
    fn default() -> Self {
        Self::new()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WordTimestamp {
    pub word: String,
    #[serde(rename = "startTime")]
    pub start_secs: f64,
    #[serde(rename = "endTime")]
    pub end_secs: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Emotion {
    #[serde(rename = "tom")]
    pub tone: String,
    #[serde(rename = "empatia")]
    pub empathy: f64,
    #[serde(rename = "profissionalismo")]
    pub professionalism: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Nuance {
    #[serde(rename = "clareza")]
    pub clarity: f64,
    #[serde(rename = "tensao")]
    pub tension: f64,
}

/// One automated scoring of a call. `score` is `None` when the pass could
/// not produce a number (the model omitted it).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoringPass {
    #[serde(rename = "criterios")]
    pub criteria: QualityCriteria,
    #[serde(rename = "pontuacao")]
    pub score: Option<f64>,
    #[serde(rename = "confianca", default)]
    pub confidence: f64,
    #[serde(rename = "palavrasCriticas", default)]
    pub critical_words: Vec<String>,
    #[serde(rename = "calculoDetalhado", default)]
    pub rationale: Vec<String>,
}

/// Outcome of the analysis pipeline for one evaluation. At most one exists
/// per evaluation; reprocessing overwrites it.
#[derive(Debug, Clone)]
pub struct AnalysisResult {
    pub id: AnalysisId,
    pub evaluation_id: EvaluationId,
    pub object_key: String,
    pub object_uri: String,
    pub transcript: String,
    pub transcription_confidence: f64,
    pub word_timestamps: Vec<WordTimestamp>,
    pub emotion: Option<Emotion>,
    pub nuance: Option<Nuance>,
    pub primary_score: ScoringPass,
    pub secondary_score: ScoringPass,
    pub consensus_score: Option<f64>,
    pub analysis: String,
    pub processing_secs: f64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl AnalysisResult {
    /// Score used for reporting: consensus when both passes produced one,
    /// then the model-reported score, then the deterministic re-score.
    pub fn effective_score(&self) -> Option<f64> {
        self.consensus_score
            .or(self.secondary_score.score)
            .or(self.primary_score.score)
    }
}

/// Mean of the two passes, when both produced a number.
pub fn consensus_of(primary: &ScoringPass, secondary: &ScoringPass) -> Option<f64> {
    match (primary.score, secondary.score) {
        (Some(a), Some(b)) => Some((a + b) / 2.0),
        _ => None,
    }
}
