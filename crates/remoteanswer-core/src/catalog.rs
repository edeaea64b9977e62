//! The product catalog and the filtering pipeline over it.
//!
//! A catalog view is computed in two pure steps:
//!
//! 1. [`filter`] picks the visible products. Active recommendation results
//!    take absolute precedence; otherwise the category and text filters
//!    apply together.
//! 2. [`paginate`] slices the visible products into fixed-size pages.

use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fmt;
use std::path::Path;
use std::str::FromStr;

use crate::product::{UnknownCategory, MAX_RATING};
use crate::{Category, Product, ProductId};

/// Products shown per catalog page.
pub const PAGE_SIZE: usize = 6;

/// Category tabs offered in the marketplace, in display order.
pub const FILTER_TABS: [CategoryFilter; 5] = [
    CategoryFilter::All,
    CategoryFilter::Only(Category::Stem),
    CategoryFilter::Only(Category::Humanities),
    CategoryFilter::Only(Category::Business),
    CategoryFilter::Only(Category::Tech),
];

const BUILTIN_CATALOG: &str = include_str!("../data/catalog.json");

/// Errors raised while loading a catalog.
#[derive(Debug, thiserror::Error)]
pub enum CatalogError {
    /// The catalog file could not be read.
    #[error("failed to read catalog: {0}")]
    Io(#[from] std::io::Error),

    /// The catalog is not valid JSON for a product list.
    #[error("failed to parse catalog: {0}")]
    Parse(#[from] serde_json::Error),

    /// Two products share an identifier.
    #[error("duplicate product id: {0}")]
    DuplicateId(ProductId),

    /// A product field is out of range.
    #[error("invalid product {id}: {reason}")]
    InvalidProduct {
        /// The offending product.
        id: ProductId,
        /// What is wrong with it.
        reason: String,
    },
}

/// The immutable set of products available for purchase.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Catalog {
    products: Vec<Product>,
}

impl Catalog {
    /// Build a catalog from products, validating them.
    ///
    /// # Errors
    ///
    /// Returns an error on duplicate identifiers, negative prices or price
    /// history entries, or a baseline rating outside 0–5.
    pub fn new(products: Vec<Product>) -> Result<Self, CatalogError> {
        let mut seen = HashSet::with_capacity(products.len());
        for product in &products {
            if !seen.insert(&product.id) {
                return Err(CatalogError::DuplicateId(product.id.clone()));
            }
            validate(product)?;
        }
        Ok(Self { products })
    }

    /// Parse a catalog from a JSON product list.
    ///
    /// # Errors
    ///
    /// Returns an error if the JSON is malformed or a product is invalid.
    pub fn from_json(json: &str) -> Result<Self, CatalogError> {
        Self::new(serde_json::from_str(json)?)
    }

    /// Load a catalog from a JSON file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed.
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, CatalogError> {
        let contents = std::fs::read_to_string(path)?;
        Self::from_json(&contents)
    }

    /// The demo catalog bundled with the crate.
    ///
    /// # Errors
    ///
    /// Returns an error only if the bundled data is corrupt.
    pub fn builtin() -> Result<Self, CatalogError> {
        Self::from_json(BUILTIN_CATALOG)
    }

    /// All products in catalog order.
    #[must_use]
    pub fn products(&self) -> &[Product] {
        &self.products
    }

    /// Look up a product by ID.
    #[must_use]
    pub fn get(&self, id: &ProductId) -> Option<&Product> {
        self.products.iter().find(|p| &p.id == id)
    }

    /// Number of products.
    #[must_use]
    pub fn len(&self) -> usize {
        self.products.len()
    }

    /// Whether the catalog has no products.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.products.is_empty()
    }

    /// The `{id, title}` listing sent to the recommendation oracle.
    #[must_use]
    pub fn listing(&self) -> Vec<CatalogEntry> {
        self.products.iter().map(CatalogEntry::from).collect()
    }
}

fn validate(product: &Product) -> Result<(), CatalogError> {
    let invalid = |reason: &str| CatalogError::InvalidProduct {
        id: product.id.clone(),
        reason: reason.to_string(),
    };

    if product.price_cents < 0 {
        return Err(invalid("price must not be negative"));
    }
    if !(0.0..=MAX_RATING).contains(&product.rating) {
        return Err(invalid("rating must be between 0 and 5"));
    }
    if product
        .price_history
        .as_ref()
        .is_some_and(|h| h.iter().any(|&p| p < 0))
    {
        return Err(invalid("price history must not contain negative prices"));
    }
    Ok(())
}

/// A compact product reference for the recommendation oracle.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CatalogEntry {
    /// Product identifier.
    pub id: ProductId,
    /// Product title.
    pub title: String,
}

impl From<&Product> for CatalogEntry {
    fn from(product: &Product) -> Self {
        Self {
            id: product.id.clone(),
            title: product.title.clone(),
        }
    }
}

/// Category filter: a wildcard or a single category.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum CategoryFilter {
    /// Every category.
    #[default]
    All,
    /// Exactly one category.
    Only(Category),
}

impl CategoryFilter {
    /// Whether a product's category passes the filter.
    #[must_use]
    pub fn matches(&self, category: Category) -> bool {
        match self {
            Self::All => true,
            Self::Only(wanted) => *wanted == category,
        }
    }
}

impl fmt::Display for CategoryFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::All => f.write_str("All"),
            Self::Only(category) => category.fmt(f),
        }
    }
}

impl FromStr for CategoryFilter {
    type Err = UnknownCategory;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.trim().eq_ignore_ascii_case("all") {
            Ok(Self::All)
        } else {
            s.parse().map(Self::Only)
        }
    }
}

/// Inputs to the catalog filter.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CatalogQuery {
    /// Category filter.
    pub category: CategoryFilter,
    /// Free-text filter, matched case-insensitively against title and description.
    pub text: String,
    /// Products recommended for the last submitted search. Non-empty means active.
    pub recommended: Vec<ProductId>,
}

impl CatalogQuery {
    /// Whether recommendation results currently override the other filters.
    #[must_use]
    pub fn has_recommendations(&self) -> bool {
        !self.recommended.is_empty()
    }
}

/// Compute the visible products, in catalog order.
#[must_use]
pub fn filter<'a>(products: &'a [Product], query: &CatalogQuery) -> Vec<&'a Product> {
    if query.has_recommendations() {
        return products
            .iter()
            .filter(|p| query.recommended.contains(&p.id))
            .collect();
    }

    let needle = query.text.trim().to_lowercase();
    products
        .iter()
        .filter(|p| query.category.matches(p.category))
        .filter(|p| needle.is_empty() || matches_text(p, &needle))
        .collect()
}

fn matches_text(product: &Product, needle: &str) -> bool {
    product.title.to_lowercase().contains(needle)
        || product.description.to_lowercase().contains(needle)
}

/// One page of a filtered list.
#[derive(Debug, Clone, PartialEq)]
pub struct Page<T> {
    /// Items on this page.
    pub items: Vec<T>,
    /// The requested page number (1-based).
    pub page: usize,
    /// Total number of pages; zero when there are no items.
    pub total_pages: usize,
    /// Total number of items across all pages.
    pub total_items: usize,
}

impl<T> Page<T> {
    /// Whether a later page exists.
    #[must_use]
    pub fn has_next(&self) -> bool {
        self.page < self.total_pages
    }

    /// Whether an earlier page exists.
    #[must_use]
    pub fn has_previous(&self) -> bool {
        self.page > 1 && self.total_pages > 0
    }
}

/// Slice `items` into the 1-based `page` of size `page_size`.
///
/// Pages before the first or past the last yield an empty slice.
#[must_use]
pub fn paginate<T: Clone>(items: &[T], page: usize, page_size: usize) -> Page<T> {
    let page_size = page_size.max(1);
    let total_items = items.len();
    let total_pages = total_items.div_ceil(page_size);

    let slice = match page.checked_sub(1) {
        Some(index) => items
            .iter()
            .skip(index.saturating_mul(page_size))
            .take(page_size)
            .cloned()
            .collect(),
        None => Vec::new(),
    };

    Page {
        items: slice,
        page,
        total_pages,
        total_items,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::product::fixtures::product;

    fn catalog_of(n: usize) -> Vec<Product> {
        (0..n)
            .map(|i| product(&format!("p{i}"), Category::ALL[i % Category::ALL.len()]))
            .collect()
    }

    fn ids(products: &[&Product]) -> Vec<String> {
        products.iter().map(|p| p.id.to_string()).collect()
    }

    #[test]
    fn builtin_catalog_loads() {
        let catalog = Catalog::builtin().unwrap();
        assert!(catalog.len() > PAGE_SIZE);
    }

    #[test]
    fn rejects_duplicate_ids() {
        let products = vec![product("a", Category::Stem), product("a", Category::Tech)];
        assert!(matches!(
            Catalog::new(products),
            Err(CatalogError::DuplicateId(_))
        ));
    }

    #[test]
    fn rejects_out_of_range_fields() {
        let mut p = product("a", Category::Stem);
        p.rating = 5.5;
        assert!(matches!(
            Catalog::new(vec![p]),
            Err(CatalogError::InvalidProduct { .. })
        ));

        let mut p = product("b", Category::Stem);
        p.price_cents = -1;
        assert!(Catalog::new(vec![p]).is_err());
    }

    #[test]
    fn category_filter_is_exact() {
        let products = vec![product("p1", Category::Stem), product("p2", Category::Tech)];
        let query = CatalogQuery {
            category: CategoryFilter::Only(Category::Tech),
            ..CatalogQuery::default()
        };
        assert_eq!(ids(&filter(&products, &query)), vec!["p2"]);
    }

    #[test]
    fn text_filter_matches_title_or_description() {
        let mut a = product("a", Category::Stem);
        a.title = "Linear Algebra".into();
        let mut b = product("b", Category::Stem);
        b.description = "Eigenvalues and LINEAR maps".into();
        let c = product("c", Category::Stem);
        let products = vec![a, b, c];

        let query = CatalogQuery {
            text: "linear".into(),
            ..CatalogQuery::default()
        };
        assert_eq!(ids(&filter(&products, &query)), vec!["a", "b"]);
    }

    #[test]
    fn whitespace_text_is_no_filter() {
        let products = catalog_of(4);
        let query = CatalogQuery {
            text: "   ".into(),
            ..CatalogQuery::default()
        };
        assert_eq!(filter(&products, &query).len(), 4);
    }

    #[test]
    fn filter_output_satisfies_predicates() {
        let products = catalog_of(20);
        for tab in FILTER_TABS {
            for text in ["", "guide p1", "NOTES", "zzz"] {
                let query = CatalogQuery {
                    category: tab,
                    text: text.into(),
                    recommended: Vec::new(),
                };
                for p in filter(&products, &query) {
                    assert!(products.contains(p));
                    assert!(tab.matches(p.category));
                    let needle = text.to_lowercase();
                    assert!(
                        p.title.to_lowercase().contains(&needle)
                            || p.description.to_lowercase().contains(&needle)
                    );
                }
            }
        }
    }

    #[test]
    fn recommendations_take_precedence() {
        let products = vec![
            product("p1", Category::Stem),
            product("p2", Category::Tech),
            product("p3", Category::Business),
        ];
        let query = CatalogQuery {
            category: CategoryFilter::Only(Category::Tech),
            text: "nothing matches this".into(),
            recommended: vec![
                ProductId::new("p3").unwrap(),
                ProductId::new("ghost").unwrap(),
                ProductId::new("p1").unwrap(),
            ],
        };
        // Catalog order, unknown ids dropped.
        assert_eq!(ids(&filter(&products, &query)), vec!["p1", "p3"]);
    }

    #[test]
    fn pagination_counts_pages() {
        let items: Vec<u32> = (0..13).collect();
        let page = paginate(&items, 1, PAGE_SIZE);
        assert_eq!(page.total_pages, 3);
        assert_eq!(page.items, vec![0, 1, 2, 3, 4, 5]);
        assert!(page.has_next());
        assert!(!page.has_previous());

        let last = paginate(&items, 3, PAGE_SIZE);
        assert_eq!(last.items, vec![12]);
        assert!(!last.has_next());
    }

    #[test]
    fn page_past_end_is_empty() {
        let items: Vec<u32> = (0..6).collect();
        let page = paginate(&items, 2, PAGE_SIZE);
        assert!(page.items.is_empty());
        assert_eq!(page.total_pages, 1);

        assert!(paginate(&items, 0, PAGE_SIZE).items.is_empty());
    }

    #[test]
    fn empty_list_has_zero_pages() {
        let items: Vec<u32> = Vec::new();
        let page = paginate(&items, 1, PAGE_SIZE);
        assert!(page.items.is_empty());
        assert_eq!(page.total_pages, 0);
        assert_eq!(page.total_items, 0);
        assert!(!page.has_next());
        assert!(!page.has_previous());
    }

    #[test]
    fn category_filter_parses_all() {
        assert_eq!("All".parse::<CategoryFilter>().unwrap(), CategoryFilter::All);
        assert_eq!(
            "humanities".parse::<CategoryFilter>().unwrap(),
            CategoryFilter::Only(Category::Humanities)
        );
    }
}
