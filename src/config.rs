// src/config.rs
//! Connection settings for the sales mart, resolved from the conventional
//! libpq environment variables.

use anyhow::{Context, Result};
use std::env;

/// Postgres connection parameters. Every variable has a local-development
/// default, so a bare environment still resolves.
#[derive(Debug, Clone, PartialEq)]
pub struct StoreSettings {
    pub database: String,
    pub user: String,
    pub password: String,
    pub host: String,
    pub port: u16,
}

impl StoreSettings {
    /// Read `PGDATABASE`, `PGUSER`, `PGPASSWORD`, `PGHOST` and `PGPORT`,
    /// falling back to the defaults for any variable that is unset. A
    /// `PGPORT` that is not a valid port number fails the run.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let var = |key: &str, default: &str| lookup(key).unwrap_or_else(|| default.to_string());

        let port_raw = var("PGPORT", "6543");
        let port = port_raw
            .parse::<u16>()
            .with_context(|| format!("PGPORT value {:?} is not a valid port number", port_raw))?;

        Ok(StoreSettings {
            database: var("PGDATABASE", "sales"),
            user: var("PGUSER", "postgres"),
            password: var("PGPASSWORD", "postgres"),
            host: var("PGHOST", "localhost"),
            port,
        })
    }
}
