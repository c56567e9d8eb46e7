use std::time::Duration;

use async_trait::async_trait;

use crate::domain::ObjectKey;

#[async_trait]
pub trait AudioObjectStore: Send + Sync {
    /// Time-boxed, write-capable URL for a direct client upload.
    async fn signed_upload_url(
        &self,
        key: &ObjectKey,
        mime_type: &str,
        ttl: Duration,
    ) -> Result<String, AudioStoreError>;

    async fn exists(&self, key: &ObjectKey) -> Result<bool, AudioStoreError>;
}

#[derive(Debug, thiserror::Error)]
pub enum AudioStoreError {
    #[error("bucket not configured: {0}")]
    Configuration(String),
    #[error("signing failed: {0}")]
    SignFailed(String),
    #[error("object not found: {0}")]
    NotFound(String),
    #[error("request failed: {0}")]
    RequestFailed(String),
}
