//! Persisted storage for RemoteAnswer collections.
//!
//! The storefront keeps three durable collections (purchases, reviews and
//! the wishlist). Each is written as a whole under a fixed key of a simple
//! key-value byte store; there are no transactions and no schema versions.
//!
//! # Backends
//!
//! - [`RocksStore`]: `RocksDB`, one `collections` column family
//!   (feature `rocksdb-backend`, on by default)
//! - [`MemoryStore`]: process-local map, for tests and ephemeral sessions
//!
//! # Example
//!
//! ```no_run
//! use remoteanswer_store::{codec, keys, KeyValueStore, MemoryStore};
//!
//! let store = MemoryStore::new();
//! codec::save(&store, keys::WISHLIST, &vec!["calc-1".to_string()]).unwrap();
//!
//! let restored: Option<Vec<String>> = codec::load(&store, keys::WISHLIST).unwrap();
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]

pub mod codec;
pub mod error;
pub mod memory;
#[cfg(feature = "rocksdb-backend")]
pub mod rocks;
pub mod schema;

pub use error::{Result, StoreError};
pub use memory::MemoryStore;
#[cfg(feature = "rocksdb-backend")]
pub use rocks::RocksStore;
pub use schema::keys;

/// A synchronous key-value byte store.
///
/// This trait abstracts the storage layer, allowing for different
/// implementations (e.g., `RocksDB`, in-memory for testing).
pub trait KeyValueStore: Send + Sync {
    /// Read the value stored under `key`.
    ///
    /// # Errors
    ///
    /// Returns an error if the database operation fails.
    fn get(&self, key: &str) -> Result<Option<Vec<u8>>>;

    /// Overwrite the value stored under `key`.
    ///
    /// # Errors
    ///
    /// Returns an error if the database operation fails.
    fn put(&self, key: &str, value: &[u8]) -> Result<()>;
}
