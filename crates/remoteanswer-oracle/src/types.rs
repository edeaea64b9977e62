//! Request and response bodies for the HTTP oracle.

use serde::{Deserialize, Serialize};

use remoteanswer_core::{CatalogEntry, ProductId};

/// Recommendation request.
#[derive(Debug, Clone, Serialize)]
pub struct RecommendationRequest<'a> {
    /// Free-text search query.
    pub query: &'a str,
    /// Every catalog product as `{id, title}`.
    pub catalog: &'a [CatalogEntry],
}

/// Recommendation response.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RecommendationResponse {
    /// Matching product identifiers.
    #[serde(default)]
    pub recommended_ids: Vec<ProductId>,
}

/// Sales-copy request.
#[derive(Debug, Clone, Serialize)]
pub struct SalesCopyRequest<'a> {
    /// Product title.
    pub title: &'a str,
}

/// Sales-copy response.
#[derive(Debug, Clone, Deserialize)]
pub struct SalesCopyResponse {
    /// Short promotional text.
    #[serde(default)]
    pub text: String,
}

/// Error body returned by the oracle service.
#[derive(Debug, Clone, Deserialize)]
pub struct ApiErrorResponse {
    /// Error details.
    pub error: ApiErrorBody,
}

/// Error details.
#[derive(Debug, Clone, Deserialize)]
pub struct ApiErrorBody {
    /// Human-readable message.
    pub message: String,
}
