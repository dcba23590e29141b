use std::collections::HashMap;

use crate::favorites_storage::{FavoritesStorage, StorageError};

#[derive(Default)]
pub struct InMemoryFavoritesStorage {
    entries: parking_lot::RwLock<HashMap<String, String>>,
}

impl FavoritesStorage for InMemoryFavoritesStorage {
    fn read(&self, key: &str) -> Result<Option<String>, StorageError> {
        Ok(self.entries.read().get(key).cloned())
    }

    fn write(&self, key: &str, value: &str) -> Result<(), StorageError> {
        self.entries
            .write()
            .insert(key.to_string(), value.to_string());
        Ok(())
    }
}
