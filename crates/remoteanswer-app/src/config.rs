//! Application configuration.

use serde::Deserialize;
use std::path::Path;
use std::time::Duration;

use crate::error::ConfigError;

/// Configuration loaded from environment variables and secrets files.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppConfig {
    /// Path to the `RocksDB` data directory (default: "./data/remoteanswer").
    pub data_dir: String,

    /// Catalog JSON file; the bundled catalog is used when unset.
    pub catalog_path: Option<String>,

    /// Oracle service base URL (optional).
    pub oracle_url: Option<String>,

    /// Oracle API key (optional).
    pub oracle_api_key: Option<String>,

    /// Oracle request timeout in seconds.
    pub oracle_timeout_seconds: u64,

    /// Interval between checkout progress ticks, in milliseconds.
    pub checkout_tick_millis: u64,
}

/// Oracle secrets file structure.
#[derive(Debug, Deserialize)]
struct OracleSecrets {
    url: String,
    #[serde(default)]
    api_key: Option<String>,
}

impl AppConfig {
    /// Load configuration from environment variables and secrets files.
    ///
    /// # Errors
    ///
    /// Returns an error if a numeric variable does not parse or is zero.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| std::env::var(name).ok(), load_oracle_secrets())
    }

    fn from_lookup(
        lookup: impl Fn(&str) -> Option<String>,
        secrets: Option<OracleSecrets>,
    ) -> Result<Self, ConfigError> {
        let defaults = Self::default();

        let (oracle_url, oracle_api_key) = match secrets {
            Some(secrets) => (Some(secrets.url), secrets.api_key),
            None => (lookup("ORACLE_URL"), lookup("ORACLE_API_KEY")),
        };

        Ok(Self {
            data_dir: lookup("DATA_DIR").unwrap_or(defaults.data_dir),
            catalog_path: lookup("CATALOG_PATH").filter(|p| !p.trim().is_empty()),
            oracle_url: oracle_url.filter(|u| !u.trim().is_empty()),
            oracle_api_key: oracle_api_key.filter(|k| !k.is_empty()),
            oracle_timeout_seconds: positive(
                "ORACLE_TIMEOUT_SECONDS",
                lookup("ORACLE_TIMEOUT_SECONDS"),
                defaults.oracle_timeout_seconds,
            )?,
            checkout_tick_millis: positive(
                "CHECKOUT_TICK_MILLIS",
                lookup("CHECKOUT_TICK_MILLIS"),
                defaults.checkout_tick_millis,
            )?,
        })
    }

    /// Interval between checkout progress ticks.
    #[must_use]
    pub fn tick_interval(&self) -> Duration {
        Duration::from_millis(self.checkout_tick_millis)
    }
}

fn positive(var: &'static str, value: Option<String>, default: u64) -> Result<u64, ConfigError> {
    let Some(value) = value else {
        return Ok(default);
    };

    match value.trim().parse::<u64>() {
        Ok(0) => Err(ConfigError::Invalid {
            var,
            reason: "must be greater than zero".into(),
        }),
        Ok(n) => Ok(n),
        Err(e) => Err(ConfigError::Invalid {
            var,
            reason: format!("{value:?} is not a number ({e})"),
        }),
    }
}

/// Load oracle secrets from the first secrets file found.
fn load_oracle_secrets() -> Option<OracleSecrets> {
    let secret_paths = [".secrets/oracle.json", "../.secrets/oracle.json"];

    for path in &secret_paths {
        if let Ok(secrets) = load_secrets_file::<OracleSecrets>(path) {
            tracing::info!(path = %path, "Loaded oracle secrets from file");
            return Some(secrets);
        }
    }

    tracing::debug!("Oracle secrets file not found, using environment variables");
    None
}

/// Load secrets from a JSON file.
fn load_secrets_file<T: serde::de::DeserializeOwned>(
    path: impl AsRef<Path>,
) -> Result<T, std::io::Error> {
    let path = path.as_ref();
    if !path.exists() {
        return Err(std::io::Error::new(
            std::io::ErrorKind::NotFound,
            "Secrets file not found",
        ));
    }
    let contents = std::fs::read_to_string(path)?;
    serde_json::from_str(&contents)
        .map_err(|e| std::io::Error::new(std::io::ErrorKind::InvalidData, e))
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            data_dir: "./data/remoteanswer".into(),
            catalog_path: None,
            oracle_url: None,
            oracle_api_key: None,
            oracle_timeout_seconds: 10,
            checkout_tick_millis: 100,
        }
    }
}
