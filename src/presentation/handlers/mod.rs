mod error;
mod events;
mod health;
mod reports;
mod reprocess;
mod result;
mod status;
mod upload;

pub use error::{ApiError, ErrorResponse};
pub use events::{events_handler, notify_completed_handler};
pub use health::health_handler;
pub use reports::{agent_average_handler, list_handler};
pub use reprocess::reprocess_handler;
pub use result::{edit_analysis_handler, result_handler, AnalysisResultResponse};
pub use status::{evaluation_handler, status_handler, EvaluationResponse, StatusResponse};
pub use upload::{confirm_upload_handler, upload_url_handler};
