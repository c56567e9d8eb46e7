use std::sync::Arc;

use serde::Serialize;
use tokio::sync::broadcast;
use uuid::Uuid;

use crate::application::services::{ReportService, UploadService};

/// Pushed to connected operators when the worker finishes an evaluation.
#[derive(Debug, Clone, Serialize)]
pub struct CompletionEvent {
    #[serde(rename = "evaluationId")]
    pub evaluation_id: Uuid,
    #[serde(rename = "audioFileName")]
    pub audio_file_name: Option<String>,
    pub status: String,
}

#[derive(Clone)]
pub struct AppState {
    pub upload_service: Arc<UploadService>,
    pub report_service: Arc<ReportService>,
    pub completion_events: broadcast::Sender<CompletionEvent>,
}

impl AppState {
    pub fn new(upload_service: Arc<UploadService>, report_service: Arc<ReportService>) -> Self {
        let (completion_events, _) = broadcast::channel(64);
        Self {
            upload_service,
            report_service,
            completion_events,
        }
    }
}
