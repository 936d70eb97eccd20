//! In-memory storage, used by tests and headless hosts

use std::cell::RefCell;
use std::collections::BTreeMap;
use std::rc::Rc;

use super::{DEFAULT_PREFIX, StorageAdapter, StorageError, validate_key};

/// Prefixed view over a shared in-memory map
#[derive(Debug, Clone)]
pub struct MemoryStorage {
    prefix: String,
    entries: Rc<RefCell<BTreeMap<String, String>>>,
}

impl Default for MemoryStorage {
    fn default() -> Self {
        Self::new()
    }
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::with_prefix(DEFAULT_PREFIX)
    }

    pub fn with_prefix(prefix: &str) -> Self {
        Self {
            prefix: prefix.to_string(),
            entries: Rc::new(RefCell::new(BTreeMap::new())),
        }
    }

    /// Another adapter over the same map with a different prefix
    pub fn scoped(&self, prefix: &str) -> Self {
        Self {
            prefix: prefix.to_string(),
            entries: Rc::clone(&self.entries),
        }
    }

    /// Number of raw entries across all prefixes
    pub fn raw_len(&self) -> usize {
        self.entries.borrow().len()
    }

    fn full_key(&self, key: &str) -> Result<String, StorageError> {
        validate_key(key)?;
        Ok(format!("{}{}", self.prefix, key))
    }
}

impl StorageAdapter for MemoryStorage {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        let key = self.full_key(key)?;
        Ok(self.entries.borrow().get(&key).cloned())
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), StorageError> {
        let key = self.full_key(key)?;
        self.entries.borrow_mut().insert(key, value.to_string());
        Ok(())
    }

    fn remove(&mut self, key: &str) -> Result<(), StorageError> {
        let key = self.full_key(key)?;
        self.entries.borrow_mut().remove(&key);
        Ok(())
    }

    fn clear(&mut self) -> Result<(), StorageError> {
        let prefix = &self.prefix;
        self.entries.borrow_mut().retain(|k, _| !k.starts_with(prefix.as_str()));
        Ok(())
    }

    fn keys(&self) -> Result<Vec<String>, StorageError> {
        Ok(self
            .entries
            .borrow()
            .keys()
            .filter_map(|k| k.strip_prefix(self.prefix.as_str()))
            .map(str::to_string)
            .collect())
    }
}
