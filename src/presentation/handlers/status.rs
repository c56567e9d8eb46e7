use axum::extract::{Path, State};
use axum::Json;
use serde::Serialize;
use uuid::Uuid;

use crate::domain::{Evaluation, EvaluationId, QualityCriteria};
use crate::presentation::state::AppState;

use super::error::ApiError;

#[derive(Serialize)]
pub struct StatusResponse {
    #[serde(rename = "evaluationId")]
    pub evaluation_id: Uuid,
    pub status: String,
    #[serde(rename = "audioFileName")]
    pub audio_file_name: Option<String>,
    pub sent: bool,
    pub treated: bool,
    #[serde(rename = "audioCreatedAt")]
    pub audio_created_at: Option<String>,
    #[serde(rename = "audioUpdatedAt")]
    pub audio_updated_at: Option<String>,
}

#[tracing::instrument(skip(state))]
pub async fn status_handler(
    State(state): State<AppState>,
    Path(evaluation_id): Path<Uuid>,
) -> Result<Json<StatusResponse>, ApiError> {
    let view = state
        .report_service
        .status(EvaluationId::from_uuid(evaluation_id))
        .await?;

    Ok(Json(StatusResponse {
        evaluation_id: view.evaluation_id.as_uuid(),
        status: view.status.as_str().to_string(),
        audio_file_name: view.audio_file_name,
        sent: view.sent,
        treated: view.treated,
        audio_created_at: view.audio_created_at.map(|t| t.to_rfc3339()),
        audio_updated_at: view.audio_updated_at.map(|t| t.to_rfc3339()),
    }))
}

#[derive(Serialize)]
pub struct EvaluationResponse {
    pub id: Uuid,
    #[serde(rename = "agentName")]
    pub agent_name: String,
    #[serde(rename = "evaluatorName")]
    pub evaluator_name: String,
    pub month: String,
    pub year: i32,
    #[serde(rename = "callDate")]
    pub call_date: String,
    pub criteria: QualityCriteria,
    pub notes: String,
    #[serde(rename = "totalScore")]
    pub total_score: i32,
    #[serde(rename = "audioFileName")]
    pub audio_file_name: Option<String>,
    #[serde(rename = "audioSent")]
    pub audio_sent: bool,
    #[serde(rename = "audioTreated")]
    pub audio_treated: bool,
    #[serde(rename = "audioCreatedAt")]
    pub audio_created_at: Option<String>,
    #[serde(rename = "audioUpdatedAt")]
    pub audio_updated_at: Option<String>,
    #[serde(rename = "createdAt")]
    pub created_at: String,
    #[serde(rename = "updatedAt")]
    pub updated_at: String,
}

impl From<Evaluation> for EvaluationResponse {
    fn from(evaluation: Evaluation) -> Self {
        Self {
            id: evaluation.id.as_uuid(),
            agent_name: evaluation.agent_name,
            evaluator_name: evaluation.evaluator_name,
            month: evaluation.month,
            year: evaluation.year,
            call_date: evaluation.call_date.to_rfc3339(),
            criteria: evaluation.criteria,
            notes: evaluation.notes,
            total_score: evaluation.total_score,
            audio_file_name: evaluation.audio_file_name,
            audio_sent: evaluation.audio_sent,
            audio_treated: evaluation.audio_treated,
            audio_created_at: evaluation.audio_created_at.map(|t| t.to_rfc3339()),
            audio_updated_at: evaluation.audio_updated_at.map(|t| t.to_rfc3339()),
            created_at: evaluation.created_at.to_rfc3339(),
            updated_at: evaluation.updated_at.to_rfc3339(),
        }
    }
}

#[tracing::instrument(skip(state))]
pub async fn evaluation_handler(
    State(state): State<AppState>,
    Path(evaluation_id): Path<Uuid>,
) -> Result<Json<EvaluationResponse>, ApiError> {
    let evaluation = state
        .report_service
        .evaluation(EvaluationId::from_uuid(evaluation_id))
        .await?;
    Ok(Json(evaluation.into()))
}
