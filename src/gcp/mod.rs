pub mod bigquery;
pub mod storage;

pub use bigquery::BigQueryWarehouse;
pub use storage::GcsObjectStore;
