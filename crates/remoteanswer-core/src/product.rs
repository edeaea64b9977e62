//! Catalog product types.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::ProductId;

/// Highest baseline or review rating a product can carry.
pub const MAX_RATING: f64 = 5.0;

/// Markup applied to the current price when a product has no price history.
const SIMULATED_HISTORY_MARKUP: f64 = 1.15;

/// A digital study-guide product.
///
/// Products are immutable catalog data, loaded once at startup.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Product {
    /// Unique catalog identifier.
    pub id: ProductId,

    /// Display title.
    pub title: String,

    /// Static description, also the fallback for sales copy.
    pub description: String,

    /// Price in cents.
    pub price_cents: i64,

    /// Subject category.
    pub category: Category,

    /// Thumbnail reference (URL or asset path).
    pub thumbnail: String,

    /// Human-readable file size, e.g. `"2.4 MB"`.
    pub file_size: String,

    /// Number of pages in the guide.
    pub pages: u32,

    /// Baseline rating (0–5) before any submitted reviews.
    pub rating: f64,

    /// Lifetime sales count.
    pub sales_count: u32,

    /// Promotional label such as `"20% OFF"`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub discount_label: Option<String>,

    /// Whether the product is highlighted in the marketplace.
    #[serde(default)]
    pub is_featured: bool,

    /// Historical prices in cents, oldest first.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub price_history: Option<Vec<i64>>,
}

impl Product {
    /// Price formatted as dollars, e.g. `"$24.99"`.
    #[must_use]
    pub fn formatted_price(&self) -> String {
        format_cents(self.price_cents)
    }

    /// Price trend for the product card.
    ///
    /// Returns the recorded history when there is one. Otherwise a
    /// three-point trend is simulated: 15% above the current price, then the
    /// current price twice.
    #[must_use]
    #[allow(clippy::cast_possible_truncation, clippy::cast_precision_loss)]
    pub fn price_trend(&self) -> Vec<i64> {
        match &self.price_history {
            Some(history) if !history.is_empty() => history.clone(),
            _ => {
                let marked_up =
                    (self.price_cents as f64 * SIMULATED_HISTORY_MARKUP).round() as i64;
                vec![marked_up, self.price_cents, self.price_cents]
            }
        }
    }

    /// Price history followed by the current price, for the order receipt chart.
    ///
    /// Returns `None` when fewer than two points are available.
    #[must_use]
    pub fn price_series(&self) -> Option<Vec<i64>> {
        let mut series = self.price_history.clone().unwrap_or_default();
        series.push(self.price_cents);
        (series.len() >= 2).then_some(series)
    }

    /// Filename offered when the guide is downloaded.
    #[must_use]
    pub fn download_filename(&self) -> String {
        download_filename(&self.title)
    }
}

/// Format an amount in cents as dollars.
#[must_use]
pub fn format_cents(cents: i64) -> String {
    let sign = if cents < 0 { "-" } else { "" };
    let abs = cents.unsigned_abs();
    format!("{sign}${}.{:02}", abs / 100, abs % 100)
}

/// Turn a product title into a download filename (`My Guide` → `My_Guide.pdf`).
#[must_use]
pub fn download_filename(title: &str) -> String {
    let stem = title.split_whitespace().collect::<Vec<_>>().join("_");
    format!("{stem}.pdf")
}

/// Product subject categories.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Category {
    /// Science, technology, engineering and mathematics.
    #[serde(rename = "STEM")]
    Stem,
    /// Humanities.
    Humanities,
    /// Business.
    Business,
    /// Technology.
    Tech,
    /// Anything else.
    Other,
}

impl Category {
    /// All categories in display order.
    pub const ALL: [Self; 5] = [
        Self::Stem,
        Self::Humanities,
        Self::Business,
        Self::Tech,
        Self::Other,
    ];

    /// Get the category name as shown in the catalog.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Stem => "STEM",
            Self::Humanities => "Humanities",
            Self::Business => "Business",
            Self::Tech => "Tech",
            Self::Other => "Other",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Category {
    type Err = UnknownCategory;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|c| c.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| UnknownCategory(s.to_string()))
    }
}

/// A category name that matches no known category.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown category: {0}")]
pub struct UnknownCategory(pub String);
