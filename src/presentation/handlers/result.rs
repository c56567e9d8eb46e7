use axum::extract::{Path, State};
use axum::Json;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::{AnalysisResult, Emotion, EvaluationId, Nuance, ScoringPass, WordTimestamp};
use crate::presentation::state::AppState;

use super::error::ApiError;

#[derive(Serialize)]
pub struct AnalysisResultResponse {
    pub id: Uuid,
    #[serde(rename = "evaluationId")]
    pub evaluation_id: Uuid,
    #[serde(rename = "objectKey")]
    pub object_key: String,
    #[serde(rename = "objectUri")]
    pub object_uri: String,
    pub transcript: String,
    #[serde(rename = "transcriptionConfidence")]
    pub transcription_confidence: f64,
    #[serde(rename = "wordTimestamps")]
    pub word_timestamps: Vec<WordTimestamp>,
    pub emotion: Option<Emotion>,
    pub nuance: Option<Nuance>,
    #[serde(rename = "qualityAnalysis")]
    pub primary_score: ScoringPass,
    #[serde(rename = "gptAnalysis")]
    pub secondary_score: ScoringPass,
    #[serde(rename = "consensusScore")]
    pub consensus_score: Option<f64>,
    pub analysis: String,
    #[serde(rename = "processingTime")]
    pub processing_secs: f64,
    #[serde(rename = "createdAt")]
    pub created_at: String,
    #[serde(rename = "updatedAt")]
    pub updated_at: String,
}

impl From<AnalysisResult> for AnalysisResultResponse {
    fn from(result: AnalysisResult) -> Self {
        Self {
            id: result.id.as_uuid(),
            evaluation_id: result.evaluation_id.as_uuid(),
            object_key: result.object_key,
            object_uri: result.object_uri,
            transcript: result.transcript,
            transcription_confidence: result.transcription_confidence,
            word_timestamps: result.word_timestamps,
            emotion: result.emotion,
            nuance: result.nuance,
            primary_score: result.primary_score,
            secondary_score: result.secondary_score,
            consensus_score: result.consensus_score,
            analysis: result.analysis,
            processing_secs: result.processing_secs,
            created_at: result.created_at.to_rfc3339(),
            updated_at: result.updated_at.to_rfc3339(),
        }
    }
}

#[tracing::instrument(skip(state))]
pub async fn result_handler(
    State(state): State<AppState>,
    Path(evaluation_id): Path<Uuid>,
) -> Result<Json<AnalysisResultResponse>, ApiError> {
    let result = state
        .report_service
        .result(EvaluationId::from_uuid(evaluation_id))
        .await?;
    Ok(Json(result.into()))
}

#[derive(Deserialize)]
pub struct EditAnalysisRequest {
    pub analysis: String,
}

#[tracing::instrument(skip(state, request))]
pub async fn edit_analysis_handler(
    State(state): State<AppState>,
    Path(evaluation_id): Path<Uuid>,
    Json(request): Json<EditAnalysisRequest>,
) -> Result<Json<AnalysisResultResponse>, ApiError> {
    let result = state
        .report_service
        .edit_analysis(EvaluationId::from_uuid(evaluation_id), &request.analysis)
        .await?;
    Ok(Json(result.into()))
}
