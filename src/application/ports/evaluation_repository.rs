use async_trait::async_trait;

use crate::domain::{Evaluation, EvaluationId};

use super::RepositoryError;

/// Persistence seam for evaluations. The audio-status mutators each bump
/// `audio_updated_at`; `set_upload_pending` starts a fresh upload cycle and
/// resets both audio timestamps.
#[async_trait]
pub trait EvaluationRepository: Send + Sync {
    async fn create(&self, evaluation: &Evaluation) -> Result<(), RepositoryError>;

    async fn get_by_id(&self, id: EvaluationId) -> Result<Option<Evaluation>, RepositoryError>;

    async fn find_by_audio_file_name(
        &self,
        file_name: &str,
    ) -> Result<Option<Evaluation>, RepositoryError>;

    async fn set_upload_pending(
        &self,
        id: EvaluationId,
        file_name: &str,
    ) -> Result<(), RepositoryError>;

    async fn mark_audio_sent(&self, id: EvaluationId) -> Result<(), RepositoryError>;

    /// Asserts both `audio_sent` and `audio_treated`: completion proves the
    /// object arrived even when the client never confirmed the upload.
    async fn mark_audio_treated(&self, id: EvaluationId) -> Result<(), RepositoryError>;
}
