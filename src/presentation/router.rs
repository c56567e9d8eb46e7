use axum::middleware;
use axum::routing::{get, patch, post};
use axum::Router;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::{DefaultMakeSpan, DefaultOnResponse, TraceLayer};
use tracing::Level;

use crate::infrastructure::observability::request_id_middleware;
use crate::presentation::handlers::{
    agent_average_handler, confirm_upload_handler, edit_analysis_handler, evaluation_handler,
    events_handler, health_handler, list_handler, notify_completed_handler, reprocess_handler,
    result_handler, status_handler, upload_url_handler,
};
use crate::presentation::state::AppState;

pub fn create_router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let trace_layer = TraceLayer::new_for_http()
        .make_span_with(DefaultMakeSpan::new().level(Level::INFO))
        .on_response(DefaultOnResponse::new().level(Level::INFO));

    Router::new()
        .route("/health", get(health_handler))
        .route("/audio/upload-url", post(upload_url_handler))
        .route("/audio/confirm-upload", post(confirm_upload_handler))
        .route("/audio/status/{evaluation_id}", get(status_handler))
        .route("/audio/result/{evaluation_id}", get(result_handler))
        .route(
            "/audio/result/{evaluation_id}/analysis",
            patch(edit_analysis_handler),
        )
        .route("/audio/reprocess/{evaluation_id}", post(reprocess_handler))
        .route("/audio/agent-average/{agent_name}", get(agent_average_handler))
        .route("/audio/list", get(list_handler))
        .route("/audio/evaluation/{evaluation_id}", get(evaluation_handler))
        .route("/audio/events", get(events_handler))
        .route("/internal/notify-completed", post(notify_completed_handler))
        .layer(middleware::from_fn(request_id_middleware))
        .layer(trace_layer)
        .layer(cors)
        .with_state(state)
}
