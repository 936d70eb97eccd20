//! Directory-backed storage for native builds
//!
//! One JSON file per key: `<dir>/<prefix><key>.json`.

use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use super::{DEFAULT_PREFIX, StorageAdapter, StorageError, validate_key};

const EXTENSION: &str = ".json";

#[derive(Debug, Clone)]
pub struct FileStorage {
    dir: PathBuf,
    prefix: String,
}

impl FileStorage {
    /// Open (creating if needed) a storage directory
    pub fn open(dir: impl AsRef<Path>) -> Result<Self, StorageError> {
        Self::open_with_prefix(dir, DEFAULT_PREFIX)
    }

    pub fn open_with_prefix(dir: impl AsRef<Path>, prefix: &str) -> Result<Self, StorageError> {
        let dir = dir.as_ref().to_path_buf();
        fs::create_dir_all(&dir)?;
        Ok(Self {
            dir,
            prefix: prefix.to_string(),
        })
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn path(&self, key: &str) -> Result<PathBuf, StorageError> {
        validate_key(key)?;
        Ok(self.dir.join(format!("{}{}{}", self.prefix, key, EXTENSION)))
    }

    /// Key for a file name in the directory, if it belongs to this prefix
    fn key_of(&self, file_name: &str) -> Option<String> {
        let key = file_name.strip_prefix(self.prefix.as_str())?.strip_suffix(EXTENSION)?;
        validate_key(key).ok().map(|_| key.to_string())
    }
}

impl StorageAdapter for FileStorage {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        match fs::read_to_string(self.path(key)?) {
            Ok(s) => Ok(Some(s)),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), StorageError> {
        let path = self.path(key)?;
        // Write then rename so a crash never leaves a half-written file
        let tmp = path.with_extension("json.tmp");
        fs::write(&tmp, value)?;
        fs::rename(&tmp, &path)?;
        Ok(())
    }

    fn remove(&mut self, key: &str) -> Result<(), StorageError> {
        match fs::remove_file(self.path(key)?) {
            Err(e) if e.kind() != ErrorKind::NotFound => Err(e.into()),
            _ => Ok(()),
        }
    }

    fn clear(&mut self) -> Result<(), StorageError> {
        for key in self.keys()? {
            self.remove(&key)?;
        }
        Ok(())
    }

    fn keys(&self) -> Result<Vec<String>, StorageError> {
        let mut keys = Vec::new();
        for entry in fs::read_dir(&self.dir)? {
            let entry = entry?;
            if let Some(key) = entry.file_name().to_str().and_then(|name| self.key_of(name)) {
                keys.push(key);
            }
        }
        keys.sort();
        Ok(keys)
    }
}
