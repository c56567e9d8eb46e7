use std::sync::Arc;

use crate::application::ports::{AudioObjectStore, AudioStoreError};
use crate::presentation::config::{StorageProviderSetting, StorageSettings};

use super::gcs_store::GcsAudioStore;
use super::memory_store::InMemoryAudioStore;

pub struct AudioStoreFactory;

impl AudioStoreFactory {
    pub fn create(
        settings: &StorageSettings,
    ) -> Result<Arc<dyn AudioObjectStore>, AudioStoreError> {
        match settings.provider {
            StorageProviderSetting::Gcs => {
                let store = GcsAudioStore::new(&settings.bucket)?;
                Ok(Arc::new(store))
            }
            StorageProviderSetting::Memory => {
                Ok(Arc::new(InMemoryAudioStore::new(settings.bucket.clone())))
            }
        }
    }
}
