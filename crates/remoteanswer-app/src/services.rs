//! Wiring of the catalog, store and oracle from configuration.

use std::sync::Arc;

use remoteanswer_core::{Catalog, CatalogError};
use remoteanswer_oracle::{HttpOracle, NoopOracle, Oracle, OracleOptions};
use remoteanswer_store::{KeyValueStore, MemoryStore};

use crate::config::AppConfig;

/// The collaborators the storefront runs with.
pub struct Services {
    /// The product catalog.
    pub catalog: Catalog,

    /// The storage backend.
    pub store: Arc<dyn KeyValueStore>,

    /// The recommendation and sales-copy oracle.
    pub oracle: Arc<dyn Oracle>,
}

impl Services {
    /// Build the services described by `config`.
    ///
    /// An unusable store or oracle degrades (in-memory store, no-op
    /// oracle); only the catalog is required.
    ///
    /// # Errors
    ///
    /// Returns an error if the catalog cannot be loaded.
    pub fn from_config(config: &AppConfig) -> Result<Self, CatalogError> {
        let catalog = load_catalog(config)?;
        let store = open_store(config);
        let oracle = build_oracle(config);
        Ok(Self {
            catalog,
            store,
            oracle,
        })
    }
}

fn load_catalog(config: &AppConfig) -> Result<Catalog, CatalogError> {
    let catalog = match &config.catalog_path {
        Some(path) => {
            tracing::info!(path = %path, "Loading catalog from file");
            Catalog::from_path(path)?
        }
        None => Catalog::builtin()?,
    };
    tracing::info!(products = catalog.len(), "Catalog loaded");
    Ok(catalog)
}

#[cfg(feature = "rocksdb-backend")]
fn open_store(config: &AppConfig) -> Arc<dyn KeyValueStore> {
    tracing::info!(path = %config.data_dir, "Opening RocksDB store");
    match remoteanswer_store::RocksStore::open(&config.data_dir) {
        Ok(store) => Arc::new(store),
        Err(e) => {
            tracing::error!(
                path = %config.data_dir,
                error = %e,
                "Failed to open RocksDB store - collections will not persist"
            );
            Arc::new(MemoryStore::new())
        }
    }
}

#[cfg(not(feature = "rocksdb-backend"))]
fn open_store(config: &AppConfig) -> Arc<dyn KeyValueStore> {
    tracing::warn!(
        path = %config.data_dir,
        "Built without RocksDB - collections will not persist"
    );
    Arc::new(MemoryStore::new())
}

fn build_oracle(config: &AppConfig) -> Arc<dyn Oracle> {
    let oracle = config.oracle_url.as_ref().and_then(|url| {
        let options = OracleOptions {
            timeout_seconds: config.oracle_timeout_seconds,
            api_key: config.oracle_api_key.clone(),
        };
        match HttpOracle::with_options(url, options) {
            Ok(client) => {
                tracing::info!(oracle_url = %url, "Oracle integration enabled");
                Some(Arc::new(client) as Arc<dyn Oracle>)
            }
            Err(e) => {
                tracing::error!(error = %e, "Failed to create oracle client");
                None
            }
        }
    });

    oracle.unwrap_or_else(|| {
        tracing::warn!("Oracle not configured - search falls back to text filtering");
        Arc::new(NoopOracle)
    })
}
