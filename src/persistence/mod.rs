//! Key/value persistence
//!
//! Features:
//! - `StorageAdapter` trait so hosts can swap backends
//! - Key prefixing; `clear` and `keys` only see the adapter's own prefix
//! - JSON helpers that treat corrupted blobs as absent

#[cfg(not(target_arch = "wasm32"))]
mod file;
mod memory;

#[cfg(target_arch = "wasm32")]
mod local;

use serde::Serialize;
use serde::de::DeserializeOwned;
use thiserror::Error;

#[cfg(not(target_arch = "wasm32"))]
pub use file::FileStorage;
#[cfg(target_arch = "wasm32")]
pub use local::LocalStorage;
pub use memory::MemoryStorage;

/// Prefix used by the built-in adapters
pub const DEFAULT_PREFIX: &str = "arena_";

#[derive(Debug, Error)]
pub enum StorageError {
    #[error("storage backend unavailable: {0}")]
    Unavailable(String),
    #[error("invalid storage key {0:?}")]
    InvalidKey(String),
    #[error("storage I/O failed: {0}")]
    Io(#[from] std::io::Error),
    #[error("could not encode value: {0}")]
    Encode(#[from] serde_json::Error),
}

/// Raw string storage, one value per key
pub trait StorageAdapter {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError>;
    fn set(&mut self, key: &str, value: &str) -> Result<(), StorageError>;
    fn remove(&mut self, key: &str) -> Result<(), StorageError>;
    /// Remove every key under this adapter's prefix
    fn clear(&mut self) -> Result<(), StorageError>;
    /// Keys under this adapter's prefix, prefix stripped
    fn keys(&self) -> Result<Vec<String>, StorageError>;
}

/// Keys become file names, so keep them to a safe alphabet
pub(crate) fn validate_key(key: &str) -> Result<(), StorageError> {
    let ok = !key.is_empty() && key.chars().all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-');
    if ok {
        Ok(())
    } else {
        Err(StorageError::InvalidKey(key.to_string()))
    }
}

/// Read and decode a JSON value. Missing, unreadable or corrupted data all
/// come back as `None`.
pub fn load_json<T: DeserializeOwned>(storage: &dyn StorageAdapter, key: &str) -> Option<T> {
    let raw = match storage.get(key) {
        Ok(Some(raw)) => raw,
        Ok(None) => return None,
        Err(e) => {
            log::warn!("Failed to read {:?}: {}", key, e);
            return None;
        }
    };
    match serde_json::from_str(&raw) {
        Ok(value) => Some(value),
        Err(e) => {
            log::warn!("Ignoring corrupted data under {:?}: {}", key, e);
            None
        }
    }
}

pub fn save_json<T: Serialize>(storage: &mut dyn StorageAdapter, key: &str, value: &T) -> Result<(), StorageError> {
    let json = serde_json::to_string(value)?;
    storage.set(key, &json)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Deserialize;

    #[derive(Debug, PartialEq, Serialize, Deserialize)]
    struct Blob {
        n: u32,
    }

    #[test]
    fn test_json_round_trip() {
        let mut store = MemoryStorage::new();
        save_json(&mut store, "blob", &Blob { n: 7 }).unwrap();
        assert_eq!(load_json::<Blob>(&store, "blob"), Some(Blob { n: 7 }));
        assert_eq!(load_json::<Blob>(&store, "missing"), None);
    }

    #[test]
    fn test_corrupted_json_reads_as_absent() {
        let mut store = MemoryStorage::new();
        store.set("blob", "{not json").unwrap();
        assert_eq!(load_json::<Blob>(&store, "blob"), None);
        store.set("blob", r#"{"n":"seven"}"#).unwrap();
        assert_eq!(load_json::<Blob>(&store, "blob"), None);
    }

    #[test]
    fn test_key_validation() {
        assert!(validate_key("progression").is_ok());
        assert!(validate_key("level-1_best").is_ok());
        assert!(validate_key("").is_err());
        assert!(validate_key("../etc/passwd").is_err());
        assert!(validate_key("a b").is_err());
    }
}
