use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// Role assigned to every self-registered account.
pub const DEFAULT_ROLE: &str = "user";

/// User record in the database.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct User {
    pub id: i32,               // assigned by the store
    pub username: String,      // unique
    #[serde(skip_serializing)]
    pub password_hash: String, // raw submitted password, not exposed in JSON
    pub email: String,
    pub avatar: String,
    pub role: String,
}

/// Row to insert; the store assigns `id`.
#[derive(Debug, Clone, Copy)]
pub struct NewUser<'a> {
    pub username: &'a str,
    pub password: &'a str,
    pub email: &'a str,
    pub avatar: &'a str,
    pub role: &'a str,
}
