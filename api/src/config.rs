//! Server configuration module.
//!
//! Handles loading configuration from environment variables with sensible defaults.

use anyhow::{Context, Result};
use std::net::SocketAddr;
use std::path::PathBuf;

/// Default maximum request body size (collections may carry a photo).
pub const DEFAULT_MAX_BODY_BYTES: usize = 10 * 1024 * 1024;

/// Server configuration.
///
/// Configuration values can be set via environment variables:
/// - `PREDIMAINT_HOST`: The host address to bind to (default: "0.0.0.0")
/// - `PREDIMAINT_PORT`: The port to listen on (default: 8080)
/// - `PREDIMAINT_DATA_FILE`: JSON file backing the registry (default: in-memory)
/// - `PREDIMAINT_MAX_BODY_BYTES`: Request body limit (default: 10 MiB)
#[derive(Debug, Clone)]
pub struct Config {
    /// The host address to bind to.
    pub host: String,
    /// The port to listen on.
    pub port: u16,
    /// Registry data file; `None` keeps everything in memory.
    pub data_file: Option<PathBuf>,
    /// Maximum accepted request body size in bytes.
    pub max_body_bytes: usize,
}

impl Config {
    /// Creates a new configuration from environment variables.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - `PREDIMAINT_PORT` is set but cannot be parsed as a valid port number
    /// - `PREDIMAINT_MAX_BODY_BYTES` is set but is not a number
    pub fn from_env() -> Result<Self> {
        let host = std::env::var("PREDIMAINT_HOST").unwrap_or_else(|_| "0.0.0.0".to_string());

        let port = std::env::var("PREDIMAINT_PORT")
            .ok()
            .map(|p| p.parse::<u16>())
            .transpose()
            .context("PREDIMAINT_PORT must be a port number")?
            .unwrap_or(8080);

        let data_file = std::env::var("PREDIMAINT_DATA_FILE")
            .ok()
            .filter(|p| !p.trim().is_empty())
            .map(PathBuf::from);

        let max_body_bytes = std::env::var("PREDIMAINT_MAX_BODY_BYTES")
            .ok()
            .map(|b| b.parse::<usize>())
            .transpose()
            .context("PREDIMAINT_MAX_BODY_BYTES must be a byte count")?
            .unwrap_or(DEFAULT_MAX_BODY_BYTES);

        Ok(Self {
            host,
            port,
            data_file,
            max_body_bytes,
        })
    }

    /// Returns the socket address for binding.
    ///
    /// # Errors
    ///
    /// Returns an error if the host and port do not form a valid socket address.
    pub fn socket_addr(&self) -> Result<SocketAddr> {
        format!("{}:{}", self.host, self.port)
            .parse()
            .with_context(|| format!("Invalid socket address {}:{}", self.host, self.port))
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8080,
            data_file: None,
            max_body_bytes: DEFAULT_MAX_BODY_BYTES,
        }
    }
}
