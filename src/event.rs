// src/event.rs

use serde::Deserialize;

/// Object-created notification as delivered by the trigger infrastructure.
/// Real GCS notifications carry many more fields; only the bucket and the
/// object name matter here.
#[derive(Debug, Clone, Deserialize)]
pub struct ObjectCreated {
    pub bucket: String,
    pub name: String,
}

impl ObjectCreated {
    /// `gs://bucket/name` addressing for the load job source.
    pub fn gs_uri(&self) -> String {
        format!("gs://{}/{}", self.bucket, self.name)
    }
}
