//! Application state module.
//!
//! Defines the shared application state that is passed to route handlers.

use anyhow::{Context, Result};
use axum::http::StatusCode;
use shared::registry::{Registry, RegistryError};
use shared::storage::{FileKeyValueStore, InMemoryKeyValueStore, KeyValueStore};
use std::sync::Arc;

use crate::config::Config;
use crate::routes::error::{api_error, registry_error, ApiError};

/// Application state shared across all request handlers.
#[derive(Clone)]
pub struct AppState {
    /// The maintenance registry.
    registry: Arc<Registry>,
}

impl AppState {
    /// Creates a new application state over the given store.
    pub fn new(store: Arc<dyn KeyValueStore>) -> Self {
        Self {
            registry: Arc::new(Registry::new(store)),
        }
    }

    /// Creates a new application state with an in-memory store.
    ///
    /// This is useful for development and testing.
    #[must_use]
    pub fn with_in_memory_store() -> Self {
        Self::new(Arc::new(InMemoryKeyValueStore::new()))
    }

    /// Creates the state described by the configuration: a file-backed store
    /// when a data file is configured, in-memory otherwise.
    ///
    /// # Errors
    ///
    /// Returns an error if the data file exists but cannot be loaded.
    pub fn from_config(config: &Config) -> Result<Self> {
        match config.data_file {
            Some(ref path) => {
                let store = FileKeyValueStore::open(path)
                    .with_context(|| format!("Failed to open data file {}", path.display()))?;
                tracing::info!(path = %path.display(), "Using file-backed registry");
                Ok(Self::new(Arc::new(store)))
            }
            None => {
                tracing::warn!("PREDIMAINT_DATA_FILE not set, records will not survive a restart");
                Ok(Self::with_in_memory_store())
            }
        }
    }

    /// Returns a reference to the registry.
    #[must_use]
    pub fn registry(&self) -> &Registry {
        self.registry.as_ref()
    }

    /// Runs a registry operation on the blocking thread pool.
    ///
    /// File-backed writes rewrite the data file while holding the registry
    /// lock, so handlers never call the registry on the async workers.
    ///
    /// # Errors
    ///
    /// Returns the mapped registry error, or a 500 if the task did not
    /// complete.
    pub async fn run<T, F>(&self, op: F) -> std::result::Result<T, ApiError>
    where
        F: FnOnce(&Registry) -> std::result::Result<T, RegistryError> + Send + 'static,
        T: Send + 'static,
    {
        let registry = Arc::clone(&self.registry);
        tokio::task::spawn_blocking(move || op(&registry))
            .await
            .map_err(|e| {
                tracing::error!(error = %e, "Registry task did not complete");
                api_error(
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "internal_error",
                    "Registry task did not complete",
                )
            })?
            .map_err(registry_error)
    }
}

impl Default for AppState {
    fn default() -> Self {
        Self::with_in_memory_store()
    }
}
