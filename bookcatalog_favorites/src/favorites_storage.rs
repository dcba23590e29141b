pub use in_memory_favorites_storage::InMemoryFavoritesStorage;
pub use json_file_favorites_storage::JsonFileFavoritesStorage;

mod in_memory_favorites_storage;
mod json_file_favorites_storage;

#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    #[error("storage io failure: {0}")]
    Io(#[from] std::io::Error),

    #[error("storage serialization failure: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Durable key-value store with web-local-storage semantics: opaque string
/// keys and values, last write wins. The favorites store keeps one key per
/// user so entries never leak between accounts.
pub trait FavoritesStorage: Send + Sync {
    fn read(&self, key: &str) -> Result<Option<String>, StorageError>;

    fn write(&self, key: &str, value: &str) -> Result<(), StorageError>;
}
