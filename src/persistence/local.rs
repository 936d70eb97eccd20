//! Browser LocalStorage backend (wasm32 only)

use web_sys::Storage;

use super::{DEFAULT_PREFIX, StorageAdapter, StorageError, validate_key};

pub struct LocalStorage {
    storage: Storage,
    prefix: String,
}

fn js_err(what: &str) -> StorageError {
    StorageError::Unavailable(format!("localStorage {} failed", what))
}

impl LocalStorage {
    pub fn open() -> Result<Self, StorageError> {
        Self::open_with_prefix(DEFAULT_PREFIX)
    }

    pub fn open_with_prefix(prefix: &str) -> Result<Self, StorageError> {
        let storage = web_sys::window()
            .and_then(|w| w.local_storage().ok())
            .flatten()
            .ok_or_else(|| StorageError::Unavailable("no window.localStorage".into()))?;
        Ok(Self {
            storage,
            prefix: prefix.to_string(),
        })
    }

    fn full_key(&self, key: &str) -> Result<String, StorageError> {
        validate_key(key)?;
        Ok(format!("{}{}", self.prefix, key))
    }

    fn raw_keys(&self) -> Result<Vec<String>, StorageError> {
        let len = self.storage.length().map_err(|_| js_err("length"))?;
        let mut out = Vec::new();
        for i in 0..len {
            if let Ok(Some(k)) = self.storage.key(i) {
                if k.starts_with(self.prefix.as_str()) {
                    out.push(k);
                }
            }
        }
        Ok(out)
    }
}

impl StorageAdapter for LocalStorage {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        self.storage.get_item(&self.full_key(key)?).map_err(|_| js_err("getItem"))
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), StorageError> {
        self.storage
            .set_item(&self.full_key(key)?, value)
            .map_err(|_| js_err("setItem"))
    }

    fn remove(&mut self, key: &str) -> Result<(), StorageError> {
        self.storage
            .remove_item(&self.full_key(key)?)
            .map_err(|_| js_err("removeItem"))
    }

    fn clear(&mut self) -> Result<(), StorageError> {
        // Collect first; removing while indexing shifts the key order
        for k in self.raw_keys()? {
            self.storage.remove_item(&k).map_err(|_| js_err("removeItem"))?;
        }
        Ok(())
    }

    fn keys(&self) -> Result<Vec<String>, StorageError> {
        Ok(self
            .raw_keys()?
            .into_iter()
            .filter_map(|k| k.strip_prefix(self.prefix.as_str()).map(str::to_string))
            .collect())
    }
}
