// src/gcp/storage.rs

use anyhow::{Context, Result};
use async_trait::async_trait;
use google_cloud_storage::client::{Client, ClientConfig};
use google_cloud_storage::http::objects::get::GetObjectRequest;
use google_cloud_storage::http::Error as GcsError;
use std::collections::HashMap;

use crate::handler::ObjectStore;

/// GCS-backed metadata reader using application-default credentials.
pub struct GcsObjectStore {
    client: Client,
}

impl GcsObjectStore {
    pub async fn new() -> Result<Self> {
        let config = ClientConfig::default()
            .with_auth()
            .await
            .context("authenticating GCS client")?;
        Ok(Self {
            client: Client::new(config),
        })
    }
}

#[async_trait]
impl ObjectStore for GcsObjectStore {
    async fn object_metadata(
        &self,
        bucket: &str,
        object: &str,
    ) -> Result<Option<HashMap<String, String>>> {
        let request = GetObjectRequest {
            bucket: bucket.to_string(),
            object: object.to_string(),
            ..Default::default()
        };
        match self.client.get_object(&request).await {
            Ok(obj) => Ok(Some(obj.metadata.unwrap_or_default())),
            Err(GcsError::Response(e)) if e.code == 404 => Ok(None),
            Err(e) => {
                Err(e).with_context(|| format!("fetching gs://{}/{} metadata", bucket, object))
            }
        }
    }
}
