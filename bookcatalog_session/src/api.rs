use serde::{Deserialize, Serialize};

pub type UserId = String;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, Eq, PartialEq)]
#[serde(rename_all = "lowercase")]
pub enum UserRole {
    User,
    Admin,
}

impl Default for UserRole {
    fn default() -> Self {
        UserRole::User
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, Eq, PartialEq)]
pub struct SessionUser {
    #[serde(alias = "_id")]
    pub id: UserId,
    pub name: String,
    pub email: String,
    #[serde(default)]
    pub role: UserRole,
}

impl SessionUser {
    pub fn is_admin(&self) -> bool {
        self.role == UserRole::Admin
    }
}

/// Issued by the authentication service on login. The token is an opaque
/// bearer credential attached to outgoing requests as-is.
#[derive(Debug, Clone, Serialize, Deserialize, Eq, PartialEq)]
pub struct Session {
    pub token: String,
    pub user: SessionUser,
}
