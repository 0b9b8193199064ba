//! User model - merchant accounts that log in and own orders.

use sqlx::FromRow;

/// Numeric user identifier (`users.id`).
pub type UserId = i64;

/// User entity as stored. `password` holds the salted hash, never plaintext.
#[derive(Debug, Clone, FromRow)]
pub struct User {
    pub id: UserId,
    pub email: String,
    pub password: String,
}

impl User {
    pub fn new(id: UserId, email: String, password_hash: String) -> Self {
        Self {
            id,
            email,
            password: password_hash,
        }
    }
}

/// Identity resolved from a bearer token for the duration of one request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Principal {
    pub user_id: UserId,
    pub email: String,
}

impl From<&User> for Principal {
    fn from(user: &User) -> Self {
        Self {
            user_id: user.id,
            email: user.email.clone(),
        }
    }
}
