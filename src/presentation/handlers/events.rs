use std::convert::Infallible;

use axum::extract::State;
use axum::response::sse::{Event, KeepAlive, Sse};
use axum::Json;
use futures::stream::Stream;
use futures::StreamExt;
use serde::{Deserialize, Serialize};
use tokio_stream::wrappers::BroadcastStream;
use uuid::Uuid;

use crate::domain::EvaluationId;
use crate::presentation::state::{AppState, CompletionEvent};

use super::error::ApiError;

#[derive(Deserialize)]
pub struct NotifyCompletedRequest {
    #[serde(rename = "evaluationId")]
    pub evaluation_id: Uuid,
}

#[derive(Serialize)]
pub struct NotifyCompletedResponse {
    pub notified: bool,
}

/// Worker-internal: fan the completion out to connected operators. Best
/// effort by contract; an empty listener set is not an error.
#[tracing::instrument(skip(state, request), fields(evaluation_id = %request.evaluation_id))]
pub async fn notify_completed_handler(
    State(state): State<AppState>,
    Json(request): Json<NotifyCompletedRequest>,
) -> Result<Json<NotifyCompletedResponse>, ApiError> {
    let view = state
        .report_service
        .status(EvaluationId::from_uuid(request.evaluation_id))
        .await?;

    let event = CompletionEvent {
        evaluation_id: view.evaluation_id.as_uuid(),
        audio_file_name: view.audio_file_name,
        status: view.status.as_str().to_string(),
    };
    let receivers = state.completion_events.send(event).unwrap_or(0);
    tracing::debug!(receivers, "Completion event broadcast");

    Ok(Json(NotifyCompletedResponse { notified: true }))
}

pub async fn events_handler(
    State(state): State<AppState>,
) -> Sse<impl Stream<Item = Result<Event, Infallible>>> {
    let receiver = state.completion_events.subscribe();
    let stream = BroadcastStream::new(receiver).filter_map(|event| async move {
        match event {
            Ok(completion) => Event::default()
                .event("completed")
                .json_data(&completion)
                .ok()
                .map(Ok),
            // Lagged receivers just miss events; the status endpoint remains
            // the source of truth.
            Err(_) => None,
        }
    });

    Sse::new(stream).keep_alive(KeepAlive::default())
}
