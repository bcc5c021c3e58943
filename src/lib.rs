pub mod config;
pub mod event;
pub mod gcp;
pub mod handler;
pub mod schema;
