// src/gcp/bigquery.rs

use anyhow::{anyhow, bail, Context, Result};
use async_trait::async_trait;
use google_cloud_bigquery::client::{Client, ClientConfig};
use google_cloud_bigquery::http::error::Error as BqError;
use google_cloud_bigquery::http::job::get::GetJobRequest;
use google_cloud_bigquery::http::job::{
    Job, JobConfiguration, JobConfigurationLoad, JobState, JobType, WriteDisposition,
};
use google_cloud_bigquery::http::table::{
    SourceFormat, TableFieldSchema, TableFieldType, TableReference, TableSchema,
};
use std::time::Duration;
use tracing::debug;

use crate::handler::{JobHandle, LoadRequest, TableId, Warehouse, WriteMode};
use crate::schema::{ColumnType, Field};

const POLL_INTERVAL: Duration = Duration::from_secs(2);

/// BigQuery-backed warehouse using application-default credentials; the
/// project id is taken from the credentials.
pub struct BigQueryWarehouse {
    client: Client,
    project_id: String,
}

impl BigQueryWarehouse {
    pub async fn new() -> Result<Self> {
        let (config, project_id) = ClientConfig::new_with_auth()
            .await
            .context("authenticating BigQuery client")?;
        let project_id = project_id.ok_or_else(|| anyhow!("no project_id from credentials"))?;
        let client = Client::new(config).await?;
        Ok(Self { client, project_id })
    }
}

#[async_trait]
impl Warehouse for BigQueryWarehouse {
    fn project_id(&self) -> &str {
        &self.project_id
    }

    async fn table_exists(&self, table: &TableId) -> Result<bool> {
        match self
            .client
            .table()
            .get(&table.project, &table.dataset, &table.table)
            .await
        {
            Ok(_) => Ok(true),
            Err(BqError::Response(e)) if e.code == 404 => Ok(false),
            Err(e) => Err(e).with_context(|| format!("probing table {}", table)),
        }
    }

    async fn submit_load(&self, req: &LoadRequest) -> Result<JobHandle> {
        let load = JobConfigurationLoad {
            source_uris: vec![req.source_uri.clone()],
            destination_table: TableReference {
                project_id: req.table.project.clone(),
                dataset_id: req.table.dataset.clone(),
                table_id: req.table.table.clone(),
            },
            schema: Some(TableSchema {
                fields: req.fields.iter().map(field_schema).collect(),
            }),
            source_format: Some(SourceFormat::Csv),
            field_delimiter: Some(",".to_string()),
            skip_leading_rows: Some(req.skip_leading_rows),
            write_disposition: Some(match req.write {
                WriteMode::Append => WriteDisposition::WriteAppend,
                WriteMode::Empty => WriteDisposition::WriteEmpty,
            }),
            ..Default::default()
        };
        let job = Job {
            configuration: JobConfiguration {
                job: JobType::Load(load),
                ..Default::default()
            },
            ..Default::default()
        };

        let created = self
            .client
            .job()
            .create(&job)
            .await
            .with_context(|| format!("creating load job for {}", req.source_uri))?;
        debug!(
            "created load job {} for {}",
            created.job_reference.job_id, req.source_uri
        );
        Ok(JobHandle {
            job_id: created.job_reference.job_id,
            location: created.job_reference.location,
        })
    }

    async fn await_load(&self, job: JobHandle) -> Result<()> {
        loop {
            let current = self
                .client
                .job()
                .get(
                    &self.project_id,
                    &job.job_id,
                    &GetJobRequest {
                        location: job.location.clone(),
                    },
                )
                .await
                .with_context(|| format!("polling load job {}", job.job_id))?;

            if current.status.state != JobState::Done {
                tokio::time::sleep(POLL_INTERVAL).await;
                continue;
            }
            if let Some(err) = current.status.error_result {
                bail!("load job {} failed: {:?}", job.job_id, err);
            }
            return Ok(());
        }
    }
}

fn field_schema(field: &Field) -> TableFieldSchema {
    TableFieldSchema {
        name: field.name.clone(),
        data_type: field_type(field.ty),
        ..Default::default()
    }
}

/// The load API speaks the legacy type names, so the standard-SQL aliases
/// collapse onto them.
fn field_type(ty: ColumnType) -> TableFieldType {
    match ty {
        ColumnType::String => TableFieldType::String,
        ColumnType::Bytes => TableFieldType::Bytes,
        ColumnType::Integer | ColumnType::Int64 => TableFieldType::Integer,
        ColumnType::Float | ColumnType::Float64 => TableFieldType::Float,
        ColumnType::Numeric => TableFieldType::Numeric,
        ColumnType::Boolean | ColumnType::Bool => TableFieldType::Boolean,
        ColumnType::Date => TableFieldType::Date,
        ColumnType::Time => TableFieldType::Time,
        ColumnType::Datetime => TableFieldType::Datetime,
        ColumnType::Timestamp => TableFieldType::Timestamp,
    }
}
