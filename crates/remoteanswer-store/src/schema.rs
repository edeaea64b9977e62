//! Storage layout: column family and collection keys.

/// Column family names for the `RocksDB` database.
pub mod cf {
    /// Persisted collections, keyed by collection name.
    pub const COLLECTIONS: &str = "collections";
}

/// Logical keys of the persisted collections.
///
/// Each value holds the full collection; there are no incremental writes.
pub mod keys {
    /// Purchase records, newest first.
    pub const PURCHASES: &str = "purchases";

    /// Submitted reviews, newest first.
    pub const REVIEWS: &str = "reviews";

    /// Wishlisted product identifiers.
    pub const WISHLIST: &str = "wishlist";
}

/// Returns all column family names for database initialization.
#[must_use]
pub fn all_column_families() -> Vec<&'static str> {
    vec![cf::COLLECTIONS]
}
