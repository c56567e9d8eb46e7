use std::time::Duration;

use async_trait::async_trait;
use object_store::gcp::{GoogleCloudStorage, GoogleCloudStorageBuilder};
use object_store::path::Path as StorePath;
use object_store::signer::Signer;
use object_store::ObjectStore;

use crate::application::ports::{AudioObjectStore, AudioStoreError};
use crate::domain::ObjectKey;

pub struct GcsAudioStore {
    inner: GoogleCloudStorage,
}

impl GcsAudioStore {
    /// Credentials come from the ambient environment (service-account key
    /// or application-default credentials), as the rest of the deployment
    /// expects.
    pub fn new(bucket: &str) -> Result<Self, AudioStoreError> {
        if bucket.trim().is_empty() {
            return Err(AudioStoreError::Configuration(
                "bucket name is not set".to_string(),
            ));
        }
        let inner = GoogleCloudStorageBuilder::from_env()
            .with_bucket_name(bucket)
            .build()
            .map_err(|e| AudioStoreError::Configuration(e.to_string()))?;
        Ok(Self { inner })
    }
}

#[async_trait]
impl AudioObjectStore for GcsAudioStore {
    async fn signed_upload_url(
        &self,
        key: &ObjectKey,
        _mime_type: &str,
        ttl: Duration,
    ) -> Result<String, AudioStoreError> {
        let path = StorePath::from(key.as_str());
        let url = self
            .inner
            .signed_url(http::Method::PUT, &path, ttl)
            .await
            .map_err(|e| AudioStoreError::SignFailed(e.to_string()))?;
        Ok(url.to_string())
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
