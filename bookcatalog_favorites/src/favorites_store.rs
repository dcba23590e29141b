use std::sync::Arc;

use bookcatalog_books::api::BookId;
use bookcatalog_session::session_store::SessionProvider;

use crate::favorites_storage::{FavoritesStorage, StorageError};

#[derive(Debug, thiserror::Error)]
pub enum FavoritesError {
    /// Favoriting is gated on an active session.
    #[error("sign in to manage favorites")]
    Unauthenticated,

    #[error(transparent)]
    Storage(#[from] StorageError),
}

/// Per-user set of favorited canonical book ids, durable across sessions on
/// the same device. Storage is keyed by user id, so switching accounts never
/// leaks favorites between users, and logging out leaves the stored set in
/// place for the next login.
pub struct FavoritesStore {
    storage: Arc<dyn FavoritesStorage>,
    sessions: Arc<dyn SessionProvider>,
}

impl FavoritesStore {
    pub fn new(storage: Arc<dyn FavoritesStorage>, sessions: Arc<dyn SessionProvider>) -> Self {
        Self { storage, sessions }
    }

    fn storage_key(user_id: &str) -> String {
        format!("favorites_{user_id}")
    }

    fn load_set(&self, user_id: &str) -> Result<Vec<BookId>, StorageError> {
        let raw = self.storage.read(&Self::storage_key(user_id))?;
        Ok(match raw {
            Some(raw) => serde_json::from_str(&raw).unwrap_or_else(|error| {
                tracing::warn!("stored favorites for {} are corrupt, resetting: {}", user_id, error);
                Vec::default()
            }),
            None => Vec::default(),
        })
    }

    /// The signed-in user's favorites; empty when signed out.
    pub fn favorites(&self) -> Vec<BookId> {
        let Some(user) = self.sessions.current_user() else {
            return Vec::default();
        };
        self.load_set(&user.id).unwrap_or_else(|error| {
            tracing::warn!("failed to read favorites for {}: {}", user.id, error);
            Vec::default()
        })
    }

    pub fn is_favorite(&self, book_id: &BookId) -> bool {
        self.favorites().iter().any(|id| id == book_id)
    }

    /// Flips membership and returns the new state. Two toggles restore the
    /// original state; adding a member twice is the same as adding it once.
    pub fn toggle_favorite(&self, book_id: &BookId) -> Result<bool, FavoritesError> {
        let user = self
            .sessions
            .current_user()
            .ok_or(FavoritesError::Unauthenticated)?;

        let mut favorites = self.load_set(&user.id)?;
        let now_favorite = if let Some(position) = favorites.iter().position(|id| id == book_id) {
            favorites.remove(position);
            false
        } else {
            favorites.push(book_id.clone());
            true
        };

        let serialized = serde_json::to_string(&favorites).map_err(StorageError::from)?;
        self.storage
            .write(&Self::storage_key(&user.id), &serialized)?;
        Ok(now_favorite)
    }
}

#[cfg(test)]
mod favorites_store_tests {
    use super::*;
    use crate::favorites_storage::InMemoryFavoritesStorage;
    use bookcatalog_session::api::{Session, SessionUser, UserRole};
    use bookcatalog_session::session_store::InMemorySessionStore;

    fn session_for(id: &str) -> Session {
        Session {
            token: format!("token-{id}"),
            user: SessionUser {
                id: id.to_string(),
                name: format!("name-{id}"),
                email: format!("{id}@example.com"),
                role: UserRole::User,
            },
        }
    }

    fn store_fixture() -> (
        Arc<InMemoryFavoritesStorage>,
        Arc<InMemorySessionStore>,
        FavoritesStore,
    ) {
        let storage = Arc::new(InMemoryFavoritesStorage::default());
        let sessions = Arc::new(InMemorySessionStore::default());
        let store = FavoritesStore::new(storage.clone(), sessions.clone());
        (storage, sessions, store)
    }

    #[test]
    fn toggling_signed_out_fails_and_leaves_storage_untouched() {
        let (storage, _, store) = store_fixture();

        let result = store.toggle_favorite(&"1".to_string());
        assert!(matches!(result, Err(FavoritesError::Unauthenticated)));
        assert!(storage.read("favorites_u1").unwrap().is_none());
        assert!(!store.is_favorite(&"1".to_string()));
    }

    #[test]
    fn double_toggle_restores_the_original_state() {
        let (_, sessions, store) = store_fixture();
        sessions.login(session_for("u1"));
        let book = "42".to_string();

        assert!(!store.is_favorite(&book));
        assert!(store.toggle_favorite(&book).unwrap());
        assert!(store.is_favorite(&book));
        assert!(!store.toggle_favorite(&book).unwrap());
        assert!(!store.is_favorite(&book));
    }

    #[test]
    fn favorites_never_leak_between_users() {
        let (_, sessions, store) = store_fixture();
        let book = "42".to_string();

        sessions.login(session_for("userA"));
        store.toggle_favorite(&book).unwrap();
        assert!(store.is_favorite(&book));

        // same device, different account
        sessions.login(session_for("userB"));
        assert!(!store.is_favorite(&book));
        assert!(store.favorites().is_empty());

        // and the first account still has its set
        sessions.login(session_for("userA"));
        assert!(store.is_favorite(&book));
    }

    #[test]
    fn logout_clears_the_view_but_not_the_stored_set() {
        let (storage, sessions, store) = store_fixture();
        sessions.login(session_for("u1"));
        store.toggle_favorite(&"7".to_string()).unwrap();

        sessions.logout();
        assert!(store.favorites().is_empty());
        // durable set is retained for the next login
        assert_eq!(
            storage.read("favorites_u1").unwrap().as_deref(),
            Some(r#"["7"]"#)
        );

        sessions.login(session_for("u1"));
        assert!(store.is_favorite(&"7".to_string()));
    }

    #[test]
    fn corrupt_stored_value_reads_as_empty_and_recovers_on_write() {
        let (storage, sessions, store) = store_fixture();
        sessions.login(session_for("u1"));
        storage.write("favorites_u1", "definitely not json").unwrap();

        assert!(store.favorites().is_empty());

        assert!(store.toggle_favorite(&"1".to_string()).unwrap());
        assert_eq!(store.favorites(), vec!["1".to_string()]);
    }
}
