use axum::extract::{Path, State};
use axum::Json;
use serde::Serialize;
use uuid::Uuid;

use crate::domain::EvaluationId;
use crate::presentation::state::AppState;

use super::error::ApiError;

#[derive(Serialize)]
pub struct ReprocessResponse {
    #[serde(rename = "messageId")]
    pub message_id: String,
}

#[tracing::instrument(skip(state))]
pub async fn reprocess_handler(
    State(state): State<AppState>,
    Path(evaluation_id): Path<Uuid>,
) -> Result<Json<ReprocessResponse>, ApiError> {
    let message_id = state
        .upload_service
        .reprocess(EvaluationId::from_uuid(evaluation_id))
        .await?;
    Ok(Json(ReprocessResponse { message_id }))
}
