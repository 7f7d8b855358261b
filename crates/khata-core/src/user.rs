//! User types for khata.
//!
//! Users exist so the audit trail can name an actor. Password hashing and
//! verification are owned by the authentication collaborator; this crate
//! only stores the pre-hashed value it is handed.

use serde::{Deserialize, Serialize};

use crate::UserId;

/// A login user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    /// Unique user ID.
    pub id: UserId,

    /// Unique username.
    pub username: String,

    /// Pre-hashed password, opaque to this crate.
    pub password_hash: String,
}

/// Input for creating a user.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewUser {
    /// Unique username.
    pub username: String,

    /// Pre-hashed password.
    pub password_hash: String,
}

impl User {
    /// Create a new user record.
    #[must_use]
    pub fn create(id: UserId, new: NewUser) -> Self {
        Self {
            id,
            username: new.username,
            password_hash: new.password_hash,
        }
    }
}
