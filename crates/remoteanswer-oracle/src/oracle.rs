//! The oracle capability and its fail-open helpers.

use std::collections::HashMap;

use async_trait::async_trait;

use remoteanswer_core::{CatalogEntry, Product, ProductId};

use crate::error::OracleError;

/// An external, possibly non-deterministic source of recommendations and
/// promotional text.
///
/// Implementations may fail freely; storefront code goes through
/// [`recommend_or_empty`] and [`pitch_or_description`], which never fail.
#[async_trait]
pub trait Oracle: Send + Sync {
    /// Products from `catalog` that match the free-text `query`.
    async fn recommend(
        &self,
        query: &str,
        catalog: &[CatalogEntry],
    ) -> Result<Vec<ProductId>, OracleError>;

    /// Short promotional text for a product title.
    async fn pitch(&self, title: &str) -> Result<String, OracleError>;
}

/// Ask for recommendations, treating any failure as "no recommendations".
pub async fn recommend_or_empty(
    oracle: &dyn Oracle,
    query: &str,
    catalog: &[CatalogEntry],
) -> Vec<ProductId> {
    match oracle.recommend(query, catalog).await {
        Ok(ids) => {
            tracing::debug!(query, matches = ids.len(), "Recommendations received");
            ids
        }
        Err(e) => {
            tracing::warn!(query, error = %e, "Recommendation oracle failed, using no results");
            Vec::new()
        }
    }
}

/// Ask for sales copy, falling back to the product's static description.
pub async fn pitch_or_description(oracle: &dyn Oracle, product: &Product) -> String {
    match oracle.pitch(&product.title).await {
        Ok(text) if !text.trim().is_empty() => text,
        Ok(_) => {
            tracing::debug!(product_id = %product.id, "Sales copy was blank, using description");
            product.description.clone()
        }
        Err(e) => {
            tracing::warn!(product_id = %product.id, error = %e, "Sales copy oracle failed, using description");
            product.description.clone()
        }
    }
}

/// An oracle that is never available.
///
/// Search degrades to text filtering and cards show their descriptions.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopOracle;

#[async_trait]
impl Oracle for NoopOracle {
    async fn recommend(
        &self,
        _query: &str,
        _catalog: &[CatalogEntry],
    ) -> Result<Vec<ProductId>, OracleError> {
        Err(OracleError::Unavailable)
    }

    async fn pitch(&self, _title: &str) -> Result<String, OracleError> {
        Err(OracleError::Unavailable)
    }
}

/// An oracle with canned answers, keyed by exact query and title.
///
/// Unknown queries recommend nothing; unknown titles fail.
#[derive(Debug, Clone, Default)]
pub struct StaticOracle {
    recommendations: HashMap<String, Vec<ProductId>>,
    pitches: HashMap<String, String>,
}

impl StaticOracle {
    /// Create an oracle with no answers.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Answer `query` with `ids`.
    #[must_use]
    pub fn with_recommendation(mut self, query: impl Into<String>, ids: Vec<ProductId>) -> Self {
        self.recommendations.insert(query.into(), ids);
        self
    }

    /// Answer `title` with `text`.
    #[must_use]
    pub fn with_pitch(mut self, title: impl Into<String>, text: impl Into<String>) -> Self {
        self.pitches.insert(title.into(), text.into());
        self
    }
}

#[async_trait]
impl Oracle for StaticOracle {
    async fn recommend(
        &self,
        query: &str,
        catalog: &[CatalogEntry],
    ) -> Result<Vec<ProductId>, OracleError> {
        let wanted = self.recommendations.get(query).cloned().unwrap_or_default();
        Ok(wanted
            .into_iter()
            .filter(|id| catalog.iter().any(|entry| &entry.id == id))
            .collect())
    }

    async fn pitch(&self, title: &str) -> Result<String, OracleError> {
        self.pitches
            .get(title)
            .cloned()
            .ok_or(OracleError::EmptyResponse)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use remoteanswer_core::Category;

    fn product() -> Product {
        Product {
            id: ProductId::new("algos").unwrap(),
            title: "Algorithms Workbook".into(),
            description: "Graphs and dynamic programming".into(),
            price_cents: 2299,
            category: Category::Tech,
            thumbnail: String::new(),
            file_size: "2.6 MB".into(),
            pages: 150,
            rating: 4.7,
            sales_count: 0,
            discount_label: None,
            is_featured: false,
            price_history: None,
        }
    }

    fn listing() -> Vec<CatalogEntry> {
        vec![CatalogEntry::from(&product())]
    }

    #[tokio::test]
    async fn noop_oracle_fails_open() {
        let ids = recommend_or_empty(&NoopOracle, "graphs", &listing()).await;
        assert!(ids.is_empty());

        let text = pitch_or_description(&NoopOracle, &product()).await;
        assert_eq!(text, "Graphs and dynamic programming");
    }

    #[tokio::test]
    async fn static_oracle_drops_unknown_ids() {
        let oracle = StaticOracle::new().with_recommendation(
            "graphs",
            vec![
                ProductId::new("algos").unwrap(),
                ProductId::new("missing").unwrap(),
            ],
        );
        let ids = recommend_or_empty(&oracle, "graphs", &listing()).await;
        assert_eq!(ids, vec![ProductId::new("algos").unwrap()]);
    }

    #[tokio::test]
    async fn blank_pitch_falls_back_to_description() {
        let oracle = StaticOracle::new().with_pitch("Algorithms Workbook", "   ");
        let text = pitch_or_description(&oracle, &product()).await;
        assert_eq!(text, "Graphs and dynamic programming");
    }

    #[tokio::test]
    async fn pitch_is_used_when_present() {
        let oracle = StaticOracle::new().with_pitch("Algorithms Workbook", "Ace every interview.");
        let text = pitch_or_description(&oracle, &product()).await;
        assert_eq!(text, "Ace every interview.");
    }
}
