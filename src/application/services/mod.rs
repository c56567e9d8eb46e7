mod analysis_worker;
mod report_service;
mod retry;
mod upload_service;

pub use analysis_worker::{AnalysisWorker, RetryTracker, WorkerConfig, WorkerError};
pub use report_service::{
    month_name, AgentAverage, AudioStatusView, ReportError, ReportService, MONTHS_PT,
};
pub use retry::with_retry;
pub use upload_service::{UploadError, UploadGrant, UploadService};
