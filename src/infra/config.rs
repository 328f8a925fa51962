//! Centralized configuration (environment variables + defaults).

use anyhow::{anyhow, Result};
use std::net::SocketAddr;

/// Listen address used when `BIND_ADDR` is not set.
pub const DEFAULT_BIND_ADDR: &str = "0.0.0.0:3000";

/// Loads `.env` (if present) into the process environment.
pub fn load_dotenv() {
    dotenv::dotenv().ok();
}

/// Database URL.
///
/// `DATABASE_URL` wins. Otherwise the URL is assembled from `DB_NAME`, `DB_USER`
/// and `DB_PASS` (plus `DB_HOST`, default `localhost`).
pub fn database_url() -> Result<String> {
    if let Ok(url) = std::env::var("DATABASE_URL") {
        return Ok(url);
    }
    let name = required("DB_NAME")?;
    let user = required("DB_USER")?;
    let pass = required("DB_PASS")?;
    let host = std::env::var("DB_HOST").unwrap_or_else(|_| "localhost".to_string());
    Ok(format!("postgres://{}:{}@{}/{}", user, pass, host, name))
}

/// HTTP listen address (`BIND_ADDR`, default `0.0.0.0:3000`).
pub fn bind_addr() -> Result<SocketAddr> {
    let raw = std::env::var("BIND_ADDR").unwrap_or_else(|_| DEFAULT_BIND_ADDR.to_string());
    raw.parse::<SocketAddr>()
        .map_err(|e| anyhow!("BIND_ADDR must be a socket address (got '{}'): {}", raw, e))
}

fn required(key: &str) -> Result<String> {
    std::env::var(key).map_err(|_| anyhow!("DATABASE_URL or {} must be set", key))
}
