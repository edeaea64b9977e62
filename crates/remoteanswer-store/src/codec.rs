//! Typed collection reads and writes on top of a [`KeyValueStore`].
//!
//! Values are encoded as CBOR.

use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::error::{Result, StoreError};
use crate::KeyValueStore;

/// Serialize a value using CBOR.
///
/// # Errors
///
/// Returns `StoreError::Serialization` if the value cannot be encoded.
pub fn encode<T: Serialize>(value: &T) -> Result<Vec<u8>> {
    let mut buf = Vec::new();
    ciborium::into_writer(value, &mut buf)
        .map_err(|e| StoreError::Serialization(e.to_string()))?;
    Ok(buf)
}

/// Deserialize a value from CBOR.
///
/// # Errors
///
/// Returns `StoreError::Serialization` if the bytes do not decode as `T`.
pub fn decode<T: DeserializeOwned>(data: &[u8]) -> Result<T> {
    ciborium::from_reader(data).map_err(|e| StoreError::Serialization(e.to_string()))
}

/// Load and decode the collection stored under `key`.
///
/// # Errors
///
/// Returns an error if the read fails or the stored bytes are not a valid `T`.
pub fn load<T: DeserializeOwned>(store: &dyn KeyValueStore, key: &str) -> Result<Option<T>> {
    store.get(key)?.map(|data| decode(&data)).transpose()
}

/// Encode and store `value` under `key`, replacing what was there.
///
/// # Errors
///
/// Returns an error if encoding or the write fails.
pub fn save<T: Serialize>(store: &dyn KeyValueStore, key: &str, value: &T) -> Result<()> {
    let bytes = encode(value)?;
    store.put(key, &bytes)?;
    tracing::trace!(key, bytes = bytes.len(), "Collection saved");
    Ok(())
}
