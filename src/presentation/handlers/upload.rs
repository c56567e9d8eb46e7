use axum::extract::State;
use axum::Json;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::EvaluationId;
use crate::presentation::state::AppState;

use super::error::ApiError;

#[derive(Deserialize)]
pub struct UploadUrlRequest {
    #[serde(rename = "evaluationId")]
    pub evaluation_id: Uuid,
    #[serde(rename = "fileName")]
    pub file_name: String,
    #[serde(rename = "mimeType")]
    pub mime_type: String,
    #[serde(rename = "fileSize")]
    pub file_size: Option<u64>,
}

#[derive(Serialize)]
pub struct UploadUrlResponse {
    #[serde(rename = "uploadUrl")]
    pub upload_url: String,
    #[serde(rename = "objectKey")]
    pub object_key: String,
    #[serde(rename = "expiresInSeconds")]
    pub expires_in_seconds: u64,
}

#[tracing::instrument(skip(state, request), fields(evaluation_id = %request.evaluation_id))]
pub async fn upload_url_handler(
    State(state): State<AppState>,
    Json(request): Json<UploadUrlRequest>,
) -> Result<Json<UploadUrlResponse>, ApiError> {
    let grant = state
        .upload_service
        .request_upload_url(
            EvaluationId::from_uuid(request.evaluation_id),
            &request.file_name,
            &request.mime_type,
            request.file_size,
        )
        .await?;

    Ok(Json(UploadUrlResponse {
        upload_url: grant.upload_url,
        object_key: grant.object_key,
        expires_in_seconds: grant.expires_in_seconds,
    }))
}

#[derive(Deserialize)]
pub struct ConfirmUploadRequest {
    #[serde(rename = "evaluationId")]
    pub evaluation_id: Uuid,
    #[serde(rename = "fileName")]
    pub file_name: String,
}

#[derive(Serialize)]
pub struct ConfirmUploadResponse {
    #[serde(rename = "audioSent")]
    pub audio_sent: bool,
}

#[tracing::instrument(skip(state, request), fields(evaluation_id = %request.evaluation_id))]
pub async fn confirm_upload_handler(
    State(state): State<AppState>,
    Json(request): Json<ConfirmUploadRequest>,
) -> Result<Json<ConfirmUploadResponse>, ApiError> {
    state
        .upload_service
        .confirm_upload(
            EvaluationId::from_uuid(request.evaluation_id),
            &request.file_name,
        )
        .await?;

    Ok(Json(ConfirmUploadResponse { audio_sent: true }))
}
