//! HTTP oracle client implementation.

use async_trait::async_trait;
use reqwest::Client;
use std::time::Duration;

use remoteanswer_core::{CatalogEntry, ProductId};

use crate::error::OracleError;
use crate::oracle::Oracle;
use crate::types::{
    ApiErrorResponse, RecommendationRequest, RecommendationResponse, SalesCopyRequest,
    SalesCopyResponse,
};

/// Oracle backed by an HTTP service.
///
/// Endpoints:
///
/// - `POST /v1/recommendations` with `{"query", "catalog": [{"id", "title"}]}`
/// - `POST /v1/sales-copy` with `{"title"}`
#[derive(Debug, Clone)]
pub struct HttpOracle {
    client: Client,
    base_url: String,
    api_key: Option<String>,
}

impl HttpOracle {
    /// Create a new HTTP oracle with default options.
    ///
    /// # Arguments
    ///
    /// * `base_url` - Base URL of the oracle service (e.g., `"http://oracle:8080"`)
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be built.
    pub fn new(base_url: impl Into<String>) -> Result<Self, OracleError> {
        Self::with_options(base_url, OracleOptions::default())
    }

    /// Create a new HTTP oracle with custom options.
    ///
    /// # Errors
    ///
    /// Returns an error if the URL is blank or the HTTP client cannot be built.
    pub fn with_options(
        base_url: impl Into<String>,
        options: OracleOptions,
    ) -> Result<Self, OracleError> {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        if base_url.is_empty() {
            return Err(OracleError::Configuration("oracle URL is empty".into()));
        }

        let client = Client::builder()
            .timeout(Duration::from_secs(options.timeout_seconds))
            .build()
            .map_err(|e| OracleError::Configuration(format!("failed to build HTTP client: {e}")))?;

        Ok(Self {
            client,
            base_url,
            api_key: options.api_key,
        })
    }

    /// Base URL requests are sent to.
    #[must_use]
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    async fn post<B, T>(&self, path: &str, body: &B) -> Result<T, OracleError>
    where
        B: serde::Serialize + Sync,
        T: serde::de::DeserializeOwned,
    {
        let url = format!("{}{path}", self.base_url);
        let mut request = self.client.post(&url).json(body);
        if let Some(key) = &self.api_key {
            request = request.header("x-api-key", key);
        }

        let response = request.send().await?;
        Self::handle_response(response).await
    }

    /// Handle API response and convert errors.
    async fn handle_response<T: serde::de::DeserializeOwned>(
        response: reqwest::Response,
    ) -> Result<T, OracleError> {
        let status = response.status();

        if status.is_success() {
            let bytes = response.bytes().await?;
            return Ok(serde_json::from_slice(&bytes)?);
        }

        let message = match response.json::<ApiErrorResponse>().await {
            Ok(api_error) => api_error.error.message,
            Err(_) => format!("HTTP {status}"),
        };

        Err(OracleError::Api {
            status: status.as_u16(),
            message,
        })
    }
}

#[async_trait]
impl Oracle for HttpOracle {
    async fn recommend(
        &self,
        query: &str,
        catalog: &[CatalogEntry],
    ) -> Result<Vec<ProductId>, OracleError> {
        let request = RecommendationRequest { query, catalog };
        let response: RecommendationResponse = self.post("/v1/recommendations", &request).await?;
        Ok(response.recommended_ids)
    }

    async fn pitch(&self, title: &str) -> Result<String, OracleError> {
        let response: SalesCopyResponse =
            self.post("/v1/sales-copy", &SalesCopyRequest { title }).await?;
        let text = response.text.trim();
        if text.is_empty() {
            return Err(OracleError::EmptyResponse);
        }
        Ok(text.to_string())
    }
}

/// Client options for customization.
#[derive(Debug, Clone)]
pub struct OracleOptions {
    /// Request timeout in seconds (default: 10).
    pub timeout_seconds: u64,
    /// API key sent as `x-api-key`, if any.
    pub api_key: Option<String>,
}

impl Default for OracleOptions {
    fn default() -> Self {
        Self {
            timeout_seconds: 10,
            api_key: None,
        }
    }
}

impl OracleOptions {
    /// Create options with an API key.
    #[must_use]
    pub fn with_api_key(key: impl Into<String>) -> Self {
        Self {
            api_key: Some(key.into()),
            ..Self::default()
        }
    }
}
