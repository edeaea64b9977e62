//! `RocksDB` storage implementation.
//!
//! This module provides the `RocksStore` implementation of the `KeyValueStore` trait.

use std::path::Path;
use std::sync::Arc;

use rocksdb::{BoundColumnFamily, ColumnFamilyDescriptor, DBWithThreadMode, MultiThreaded, Options};

use crate::error::{Result, StoreError};
use crate::schema::{all_column_families, cf};
use crate::KeyValueStore;

/// RocksDB-backed storage implementation.
pub struct RocksStore {
    db: Arc<DBWithThreadMode<MultiThreaded>>,
}

impl RocksStore {
    /// Open or create a `RocksDB` database at the given path.
    ///
    /// # Errors
    ///
    /// Returns an error if the database cannot be opened or created.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let mut opts = Options::default();
        opts.create_if_missing(true);
        opts.create_missing_column_families(true);

        let cf_descriptors: Vec<_> = all_column_families()
            .into_iter()
            .map(|name| ColumnFamilyDescriptor::new(name, Options::default()))
            .collect();

        let db = DBWithThreadMode::open_cf_descriptors(&opts, path, cf_descriptors)
            .map_err(|e| StoreError::Database(e.to_string()))?;

        Ok(Self { db: Arc::new(db) })
    }

    /// Get a column family handle.
    fn cf(&self, name: &str) -> Result<Arc<BoundColumnFamily<'_>>> {
        self.db
            .cf_handle(name)
            .ok_or_else(|| StoreError::Database(format!("column family not found: {name}")))
    }
}

impl KeyValueStore for RocksStore {
    fn get(&self, key: &str) -> Result<Option<Vec<u8>>> {
        let cf = self.cf(cf::COLLECTIONS)?;
        self.db
            .get_cf(&cf, key.as_bytes())
            .map_err(|e| StoreError::Database(e.to_string()))
    }

    fn put(&self, key: &str, value: &[u8]) -> Result<()> {
        let cf = self.cf(cf::COLLECTIONS)?;
        self.db
            .put_cf(&cf, key.as_bytes(), value)
            .map_err(|e| StoreError::Database(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{codec, keys};
    use tempfile::TempDir;

    fn create_test_store() -> (RocksStore, TempDir) {
        let dir = TempDir::new().unwrap();
        let store = RocksStore::open(dir.path()).unwrap();
        (store, dir)
    }

    #[test]
    fn put_then_get() {
        let (store, _dir) = create_test_store();
        assert!(store.get(keys::WISHLIST).unwrap().is_none());

        store.put(keys::WISHLIST, b"bytes").unwrap();
        assert_eq!(
            store.get(keys::WISHLIST).unwrap().as_deref(),
            Some(&b"bytes"[..])
        );
    }

    #[test]
    fn collections_survive_reopen() {
        let dir = TempDir::new().unwrap();
        let wishlist = vec!["calc-1".to_string(), "algos".to_string()];

        {
            let store = RocksStore::open(dir.path()).unwrap();
            codec::save(&store, keys::WISHLIST, &wishlist).unwrap();
        }

        let store = RocksStore::open(dir.path()).unwrap();
        let restored: Vec<String> = codec::load(&store, keys::WISHLIST).unwrap().unwrap();
        assert_eq!(restored, wishlist);
    }
}
