use crate::api::{Session, SessionUser};

/// Single accessor for the active session. Clients and stores take this as a
/// parameter instead of reading durable storage themselves.
pub trait SessionProvider: Send + Sync {
    fn current_session(&self) -> Option<Session>;

    fn current_user(&self) -> Option<SessionUser> {
        self.current_session().map(|session| session.user)
    }

    fn token(&self) -> Option<String> {
        self.current_session().map(|session| session.token)
    }
}

#[derive(Default)]
pub struct InMemorySessionStore {
    session: parking_lot::RwLock<Option<Session>>,
}

impl InMemorySessionStore {
    pub fn login(&self, session: Session) {
        *self.session.write() = Some(session);
    }

    pub fn logout(&self) {
        *self.session.write() = None;
    }
}

impl SessionProvider for InMemorySessionStore {
    fn current_session(&self) -> Option<Session> {
        self.session.read().clone()
    }
}

#[cfg(test)]
mod session_store_tests {
    use super::*;
    use crate::api::{SessionUser, UserRole};

    fn reader_session() -> Session {
        Session {
            token: "token-1".to_string(),
            user: SessionUser {
                id: "user-1".to_string(),
                name: "Reader".to_string(),
                email: "reader@example.com".to_string(),
                role: UserRole::User,
            },
        }
    }

    #[test]
    fn login_exposes_session_and_logout_clears_it() {
        let store = InMemorySessionStore::default();
        assert!(store.current_session().is_none());
        assert!(store.token().is_none());

        store.login(reader_session());

        assert_eq!(store.token().as_deref(), Some("token-1"));
        assert_eq!(
            store.current_user().map(|user| user.id),
            Some("user-1".to_string())
        );

        store.logout();
        assert!(store.current_session().is_none());
    }

    #[test]
    fn user_deserializes_from_backend_shape() {
        // /users/me responds with a mongo-style _id and a lowercase role
        let user: SessionUser = serde_json::from_str(
            r#"{"_id":"64b0c1","name":"Admin","email":"admin@example.com","role":"admin"}"#,
        )
        .unwrap();
        assert_eq!(user.id, "64b0c1");
        assert!(user.is_admin());

        // role missing entirely defaults to a plain user
        let user: SessionUser =
            serde_json::from_str(r#"{"id":"u2","name":"N","email":"n@example.com"}"#).unwrap();
        assert!(!user.is_admin());
    }
}
