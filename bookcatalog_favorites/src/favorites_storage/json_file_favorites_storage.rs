use std::collections::HashMap;
use std::io::ErrorKind;
use std::path::PathBuf;

use crate::favorites_storage::{FavoritesStorage, StorageError};

/// Key-value store persisted as one JSON document on disk. Writes go through
/// a temp file and a rename so a crash never leaves a half-written document.
pub struct JsonFileFavoritesStorage {
    path: PathBuf,
    // Serializes the read-modify-write cycle of concurrent writers
    write_lock: parking_lot::Mutex<()>,
}

impl JsonFileFavoritesStorage {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            write_lock: parking_lot::Mutex::new(()),
        }
    }

    fn load_document(&self) -> Result<HashMap<String, String>, StorageError> {
        match std::fs::read(&self.path) {
            Ok(bytes) => Ok(serde_json::from_slice(&bytes)?),
            Err(error) if error.kind() == ErrorKind::NotFound => Ok(HashMap::default()),
            Err(error) => Err(error.into()),
        }
    }
}

impl FavoritesStorage for JsonFileFavoritesStorage {
    fn read(&self, key: &str) -> Result<Option<String>, StorageError> {
        Ok(self.load_document()?.remove(key))
    }

    fn write(&self, key: &str, value: &str) -> Result<(), StorageError> {
        let _guard = self.write_lock.lock();
        let mut document = self.load_document()?;
        document.insert(key.to_string(), value.to_string());

        let temp_path = self.path.with_extension("tmp");
        std::fs::write(&temp_path, serde_json::to_vec(&document)?)?;
        std::fs::rename(&temp_path, &self.path)?;
        Ok(())
    }
}
