use std::fmt;

use chrono::{DateTime, Utc};

/// Namespaced key of an uploaded object: `<folder>/<epoch_millis>-<file>`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ObjectKey(String);

impl ObjectKey {
    pub fn namespaced(folder: &str, file_name: &str, at: DateTime<Utc>) -> Self {
        Self(format!("{}/{}-{}", folder, at.timestamp_millis(), file_name))
    }

    pub fn from_raw(key: impl Into<String>) -> Self {
        Self(key.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn uri(&self, bucket: &str) -> String {
        format!("gs://{}/{}", bucket, self.0)
    }
}

impl fmt::Display for ObjectKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
