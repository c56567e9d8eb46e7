use std::time::Duration;

use async_trait::async_trait;
use object_store::memory::InMemory;
use object_store::path::Path as StorePath;
use object_store::{ObjectStore, PutPayload};

use crate::application::ports::{AudioObjectStore, AudioStoreError};
use crate::domain::ObjectKey;

/// In-memory store for local runs and tests. "Signed" URLs are synthetic;
/// no client can actually PUT against them.
pub struct InMemoryAudioStore {
    inner: InMemory,
    bucket: String,
}

impl InMemoryAudioStore {
    pub fn new(bucket: impl Into<String>) -> Self {
        Self {
            inner: InMemory::new(),
            bucket: bucket.into(),
        }
    }

    /// Seed an object, standing in for the client-side PUT.
    pub async fn put(&self, key: &ObjectKey, data: Vec<u8>) -> Result<(), AudioStoreError> {
        let path = StorePath::from(key.as_str());
        self.inner
            .put(&path, PutPayload::from(data))
            .await
            .map_err(|e| AudioStoreError::RequestFailed(e.to_string()))?;
        Ok(())
    }
}

#[async_trait]
impl AudioObjectStore for InMemoryAudioStore {
    async fn signed_upload_url(
        &self,
        key: &ObjectKey,
        _mime_type: &str,
        ttl: Duration,
    ) -> Result<String, AudioStoreError> {
        Ok(format!(
            "memory://{}/{}?expires={}",
            self.bucket,
            key.as_str(),
            ttl.as_secs()
        ))
    }

    async fn exists(&self, key: &ObjectKey) -> Result<bool, AudioStoreError> {
        let path = StorePath::from(key.as_str());
        match self.inner.head(&path).await {
            Ok(_) => Ok(true),
            Err(object_store::Error::NotFound { .. }) => Ok(false),
            Err(e) => Err(AudioStoreError::RequestFailed(e.to_string())),
        }
    }
}
