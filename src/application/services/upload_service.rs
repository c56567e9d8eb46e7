use std::sync::Arc;
use std::time::Duration;

use chrono::Utc;

use crate::application::ports::{
    AudioEvent, AudioEventQueue, AudioObjectStore, AudioStoreError, EvaluationRepository,
    QueueError, RepositoryError,
};
use crate::domain::{
    validate_upload, AudioState, EvaluationId, FileClass, ObjectKey, UploadPolicyError,
};

#[derive(Debug, Clone)]
pub struct UploadGrant {
    pub upload_url: String,
    pub object_key: String,
    pub expires_in_seconds: u64,
}

/// Drives the evaluation audio-status state machine: issuing upload URLs,
/// confirming uploads, and re-publishing stuck objects for reprocessing.
pub struct UploadService {
    evaluations: Arc<dyn EvaluationRepository>,
    store: Arc<dyn AudioObjectStore>,
    queue: Arc<dyn AudioEventQueue>,
    bucket: String,
    url_ttl: Duration,
}

impl UploadService {
    pub fn new(
        evaluations: Arc<dyn EvaluationRepository>,
        store: Arc<dyn AudioObjectStore>,
        queue: Arc<dyn AudioEventQueue>,
        bucket: String,
        url_ttl: Duration,
    ) -> Self {
        Self {
            evaluations,
            store,
            queue,
            bucket,
            url_ttl,
        }
    }

    /// `NONE`/`UPLOAD_PENDING`/`TREATED` → `UPLOAD_PENDING`. Rejected while
    /// an unprocessed upload is in flight (`SENT`) so it cannot be clobbered.
    pub async fn request_upload_url(
        &self,
        evaluation_id: EvaluationId,
        file_name: &str,
        mime_type: &str,
        size_bytes: Option<u64>,
    ) -> Result<UploadGrant, UploadError> {
        validate_upload(FileClass::Audio, file_name, mime_type, size_bytes)?;

        let evaluation = self
            .evaluations
            .get_by_id(evaluation_id)
            .await?
            .ok_or(UploadError::EvaluationNotFound(evaluation_id))?;

        if evaluation.audio_state() == AudioState::Sent {
            return Err(UploadError::UploadInFlight(evaluation_id));
        }

        let key = ObjectKey::namespaced(FileClass::Audio.folder(), file_name, Utc::now());
        let upload_url = self
            .store
            .signed_upload_url(&key, mime_type, self.url_ttl)
            .await?;

        self.evaluations
            .set_upload_pending(evaluation_id, key.as_str())
            .await?;

        tracing::info!(
            evaluation_id = %evaluation_id,
            object_key = %key,
            expires_in_seconds = self.url_ttl.as_secs(),
            "Upload URL issued"
        );

        Ok(UploadGrant {
            upload_url,
            object_key: key.as_str().to_string(),
            expires_in_seconds: self.url_ttl.as_secs(),
        })
    }

    /// `UPLOAD_PENDING` → `SENT`, after the client's PUT to the signed URL
    /// succeeded. The confirmed key must be the one the URL was issued for.
    pub async fn confirm_upload(
        &self,
        evaluation_id: EvaluationId,
        file_name: &str,
    ) -> Result<(), UploadError> {
        let evaluation = self
            .evaluations
            .get_by_id(evaluation_id)
            .await?
            .ok_or(UploadError::EvaluationNotFound(evaluation_id))?;

        match evaluation.audio_state() {
            AudioState::None => Err(UploadError::NoUploadPending(evaluation_id)),
            AudioState::Sent | AudioState::Treated => {
                Err(UploadError::AlreadyConfirmed(evaluation_id))
            }
            AudioState::UploadPending => {
                let recorded = evaluation.audio_file_name.as_deref().unwrap_or_default();
                if recorded != file_name {
                    return Err(UploadError::FileNameMismatch {
                        recorded: recorded.to_string(),
                        provided: file_name.to_string(),
                    });
                }
                self.evaluations.mark_audio_sent(evaluation_id).await?;
                tracing::info!(evaluation_id = %evaluation_id, "Upload confirmed");
                Ok(())
            }
        }
    }

    /// `SENT` → `SENT`: re-publish the object-finalized event for an upload
    /// the worker never finished. Does not reset `audio_sent`.
    pub async fn reprocess(&self, evaluation_id: EvaluationId) -> Result<String, UploadError> {
        let evaluation = self
            .evaluations
            .get_by_id(evaluation_id)
            .await?
            .ok_or(UploadError::EvaluationNotFound(evaluation_id))?;

        if evaluation.audio_treated {
            return Err(UploadError::AlreadyTreated(evaluation_id));
        }
        let Some(file_name) = evaluation.audio_file_name else {
            return Err(UploadError::NoAudioFile(evaluation_id));
        };
        if !evaluation.audio_sent {
            return Err(UploadError::UploadNotConfirmed(evaluation_id));
        }

        let key = ObjectKey::from_raw(file_name);
        if !self.store.exists(&key).await? {
            return Err(UploadError::ObjectMissing(key.to_string()));
        }

        let message_id = self
            .queue
            .publish(&AudioEvent {
                object_key: key.as_str().to_string(),
                bucket: self.bucket.clone(),
            })
            .await?;

        tracing::info!(
            evaluation_id = %evaluation_id,
            object_key = %key,
            message_id = %message_id,
            "Reprocess message published"
        );

        Ok(message_id)
    }
}

#[derive(Debug, thiserror::Error)]
pub enum UploadError {
    #[error(transparent)]
    Policy(#[from] UploadPolicyError),
    #[error("evaluation not found: {0}")]
    EvaluationNotFound(EvaluationId),
    #[error("an unprocessed upload is already pending for evaluation {0}")]
    UploadInFlight(EvaluationId),
    #[error("no upload URL was issued for evaluation {0}")]
    NoUploadPending(EvaluationId),
    #[error("upload already confirmed for evaluation {0}")]
    AlreadyConfirmed(EvaluationId),
    #[error("file name mismatch: upload URL was issued for {recorded}, got {provided}")]
    FileNameMismatch { recorded: String, provided: String },
    #[error("audio already processed for evaluation {0}")]
    AlreadyTreated(EvaluationId),
    #[error("evaluation {0} has no audio file")]
    NoAudioFile(EvaluationId),
    #[error("upload not confirmed for evaluation {0}")]
    UploadNotConfirmed(EvaluationId),
    #[error("audio object missing from storage: {0}")]
    ObjectMissing(String),
    #[error("storage: {0}")]
    Store(#[from] AudioStoreError),
    #[error("queue: {0}")]
    Queue(#[from] QueueError),
    #[error("repository: {0}")]
    Repository(#[from] RepositoryError),
}
