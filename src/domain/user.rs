use serde::{Deserialize, Serialize};

use super::{Credential, Wishlist};

/// Represents a registered shopper or administrator.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct User {
    /// Unique and case-sensitive.
    pub username: String,
    #[serde(rename = "password")]
    pub credential: Credential,
    #[serde(default)]
    pub is_admin: bool,
    #[serde(default)]
    pub wishlist: Wishlist,
}

/// Payload for registering a new user. The password is already hashed.
#[derive(Debug, Clone)]
pub struct UserCreate {
    pub username: String,
    pub credential: Credential,
    pub is_admin: bool,
}

impl UserCreate {
    /// Trims surrounding whitespace, as the signup form does.
    pub fn new(username: &str, credential: Credential, is_admin: bool) -> Self {
        Self {
            username: username.trim().to_string(),
            credential,
            is_admin,
        }
    }
}
