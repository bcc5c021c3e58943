// src/handler/mod.rs

use anyhow::{Context, Result};
use async_trait::async_trait;
use serde::Serialize;
use std::collections::HashMap;
use std::fmt;
use tracing::{info, warn};

use crate::config::Config;
use crate::event::ObjectCreated;
use crate::schema::{appointment_fields, fields_from_json, Field};

/// Fully-qualified load destination.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TableId {
    pub project: String,
    pub dataset: String,
    pub table: String,
}

impl fmt::Display for TableId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}.{}", self.project, self.dataset, self.table)
    }
}

/// Whether the load may append to existing rows or must find the table empty.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum WriteMode {
    Append,
    Empty,
}

/// Everything the warehouse needs to run one CSV load.
#[derive(Debug, Clone, PartialEq)]
pub struct LoadRequest {
    pub source_uri: String,
    pub table: TableId,
    pub fields: Vec<Field>,
    pub skip_leading_rows: i64,
    pub write: WriteMode,
}

/// Server-side identifier of a submitted load job, for polling.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JobHandle {
    pub job_id: String,
    pub location: Option<String>,
}

/// Read access to uploaded objects' custom metadata.
#[async_trait]
pub trait ObjectStore: Send + Sync {
    /// `Ok(None)` when the object does not exist; any other failure propagates.
    async fn object_metadata(
        &self,
        bucket: &str,
        object: &str,
    ) -> Result<Option<HashMap<String, String>>>;
}

/// The warehouse operations this service needs: an existence probe and the
/// submit/await pair of the asynchronous bulk loader.
#[async_trait]
pub trait Warehouse: Send + Sync {
    fn project_id(&self) -> &str;

    /// `Ok(false)` only for a definite not-found; permission or transport
    /// failures propagate.
    async fn table_exists(&self, table: &TableId) -> Result<bool>;

    async fn submit_load(&self, req: &LoadRequest) -> Result<JobHandle>;

    async fn await_load(&self, job: JobHandle) -> Result<()>;
}

/// Why a notification was dropped without touching the warehouse.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Skip {
    NotCsv,
    ObjectNotFound,
    NoSite,
    NoSchema,
    SchemaNotJson,
}

/// What one invocation did.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum Outcome {
    Skipped(Skip),
    Loaded { uri: String, table: TableId },
}

/// Handles one object-created notification end to end: filter, resolve the
/// destination and column schema, then run a single load-and-wait against
/// the warehouse. Holds no state between invocations.
pub struct TriggerHandler<S, W> {
    store: S,
    warehouse: W,
    config: Config,
}

impl<S: ObjectStore, W: Warehouse> TriggerHandler<S, W> {
    pub fn new(store: S, warehouse: W, config: Config) -> Self {
        Self {
            store,
            warehouse,
            config,
        }
    }

    /// Dispatch on configuration: a fixed table name means the built-in
    /// appointment schema, otherwise table and schema come from the
    /// object's metadata.
    pub async fn handle(&self, event: &ObjectCreated) -> Result<Outcome> {
        match self.config.table.clone() {
            Some(table) => self.handle_fixed(event, table).await,
            None => self.handle_dynamic(event).await,
        }
    }

    /// Variant driven by per-object metadata: `site` names the target table
    /// and `schema` carries the column definitions.
    pub async fn handle_dynamic(&self, event: &ObjectCreated) -> Result<Outcome> {
        if !event.name.ends_with(".csv") {
            info!("ignoring non-CSV file: {}", event.name);
            return Ok(Outcome::Skipped(Skip::NotCsv));
        }

        let metadata = match self
            .store
            .object_metadata(&event.bucket, &event.name)
            .await?
        {
            Some(metadata) => metadata,
            None => {
                warn!(
                    "could not retrieve object {} from bucket {}",
                    event.name, event.bucket
                );
                return Ok(Outcome::Skipped(Skip::ObjectNotFound));
            }
        };

        let table = match metadata.get("site") {
            Some(site) if !site.is_empty() => site.clone(),
            _ => {
                warn!("missing 'site' in metadata for {}", event.name);
                return Ok(Outcome::Skipped(Skip::NoSite));
            }
        };

        let schema_json = match metadata.get("schema") {
            Some(raw) if !raw.is_empty() => raw,
            _ => {
                warn!("no schema defined for table: {}", table);
                return Ok(Outcome::Skipped(Skip::NoSchema));
            }
        };

        // A value that is not JSON at all is benign (nothing to do); a decoded
        // value with malformed field entries is a configuration error and
        // fails the invocation.
        let decoded: serde_json::Value = match serde_json::from_str(schema_json) {
            Ok(decoded) => decoded,
            Err(e) => {
                warn!("failed to decode schema JSON for {}: {}", event.name, e);
                return Ok(Outcome::Skipped(Skip::SchemaNotJson));
            }
        };
        let fields = fields_from_json(&decoded)?;

        self.load(event, table, fields).await
    }

    /// Variant with the built-in appointment schema and a configured table.
    pub async fn handle_fixed(&self, event: &ObjectCreated, table: String) -> Result<Outcome> {
        if !event.name.ends_with(".csv") {
            info!("ignoring non-CSV file: {}", event.name);
            return Ok(Outcome::Skipped(Skip::NotCsv));
        }
        self.load(event, table, appointment_fields()).await
    }

    async fn load(&self, event: &ObjectCreated, table: String, fields: Vec<Field>) -> Result<Outcome> {
        let table = TableId {
            project: self.warehouse.project_id().to_string(),
            dataset: self.config.dataset.clone(),
            table,
        };
        let uri = event.gs_uri();

        // Append by default; a table that does not exist yet must be created
        // fresh by this load, so require it to be empty.
        let write = if self.warehouse.table_exists(&table).await? {
            WriteMode::Append
        } else {
            info!("table {} not found, creating from file {}", table, event.name);
            WriteMode::Empty
        };

        let req = LoadRequest {
            source_uri: uri.clone(),
            table: table.clone(),
            fields,
            skip_leading_rows: 1,
            write,
        };
        let job = self
            .warehouse
            .submit_load(&req)
            .await
            .with_context(|| format!("submitting load of {} into {}", uri, table))?;
        self.warehouse
            .await_load(job)
            .await
            .with_context(|| format!("loading {} into {}", uri, table))?;

        info!("loaded file {} into {}", event.name, table);
        Ok(Outcome::Loaded { uri, table })
    }
}
