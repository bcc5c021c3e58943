use anyhow::Result;
use bqingest::config::Config;
use bqingest::event::ObjectCreated;
use bqingest::gcp::{BigQueryWarehouse, GcsObjectStore};
use bqingest::handler::TriggerHandler;
use std::{env, sync::Arc};
use tracing::{info, warn, Level};
use tracing_subscriber::{fmt, EnvFilter};
use warp::http::StatusCode;
use warp::{reject::Rejection, reply::Reply, Filter};

type Handler = TriggerHandler<GcsObjectStore, BigQueryWarehouse>;

async fn health_check() -> Result<impl Reply, Rejection> {
    Ok(warp::reply::json(&serde_json::json!({
        "status": "healthy",
        "service": "csv-to-bigquery-loader"
    })))
}

/// One notification in, at most one load out. Soft skips still answer 200 so
/// the trigger infrastructure does not redeliver them; hard faults answer
/// 500 so it records the failure and may retry the whole notification.
async fn handle_event(handler: Arc<Handler>, event: ObjectCreated) -> Result<impl Reply, Rejection> {
    info!(
        "notification: bucket={}, name={}",
        event.bucket, event.name
    );

    match handler.handle(&event).await {
        Ok(outcome) => Ok(warp::reply::with_status(
            warp::reply::json(&outcome),
            StatusCode::OK,
        )),
        Err(e) => {
            warn!("load of gs://{}/{} failed: {:?}", event.bucket, event.name, e);
            Ok(warp::reply::with_status(
                warp::reply::json(&serde_json::json!({
                    "error": "load failed",
                    "details": format!("{:?}", e),
                })),
                StatusCode::INTERNAL_SERVER_ERROR,
            ))
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let _ = rustls::crypto::aws_lc_rs::default_provider().install_default();

    // Initialize tracing
    let log_level = env::var("LOG_LEVEL").unwrap_or_else(|_| "info".to_string());
    fmt()
        .with_env_filter(
            EnvFilter::from_default_env()
                .add_directive(log_level.parse().unwrap_or(Level::INFO.into())),
        )
        .init();

    info!("starting CSV to BigQuery loader service");

    let config = Config::from_env()?;
    match &config.table {
        Some(table) => info!("fixed-table mode: loading into table {}", table),
        None => info!("metadata mode: table and schema from object metadata"),
    }

    let store = GcsObjectStore::new().await?;
    let warehouse = BigQueryWarehouse::new().await?;
    let handler = Arc::new(TriggerHandler::new(store, warehouse, config));
    let handler = warp::any().map(move || handler.clone());

    // Health check endpoint
    let health = warp::path("health").and(warp::get()).and_then(health_check);

    // Object-created notifications land here
    let notify = warp::path::end()
        .and(warp::post())
        .and(handler)
        .and(warp::body::json())
        .and_then(handle_event);

    let routes = health.or(notify);

    // Get port from environment or default to 8080 (Cloud Run default)
    let port: u16 = env::var("PORT")
        .unwrap_or_else(|_| "8080".to_string())
        .parse()
        .unwrap_or(8080);

    info!("server starting on port {}", port);

    warp::serve(routes).run(([0, 0, 0, 0], port)).await;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_health_check() {
        let result = health_check().await;
        assert!(result.is_ok());
    }
}
