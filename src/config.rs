// src/config.rs

use anyhow::{Context, Result};
use std::env;

/// Load destination settings, resolved once at startup.
///
/// `table` set means every file loads into that one fixed table with the
/// built-in appointment schema; unset means table and schema come from the
/// uploaded object's metadata.
#[derive(Debug, Clone)]
pub struct Config {
    pub dataset: String,
    pub table: Option<String>,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        let dataset = env::var("BQ_DATASET").context("Please set env var BQ_DATASET")?;
        let table = env::var("BQ_TABLE").ok().filter(|t| !t.is_empty());
        Ok(Self { dataset, table })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn env_roundtrip() {
        env::set_var("BQ_DATASET", "clinic");
        env::set_var("BQ_TABLE", "appointments");
        let cfg = Config::from_env().unwrap();
        assert_eq!(cfg.dataset, "clinic");
        assert_eq!(cfg.table.as_deref(), Some("appointments"));

        env::set_var("BQ_TABLE", "");
        let cfg = Config::from_env().unwrap();
        assert_eq!(cfg.table, None);
    }
}
