use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::{Cart, Wishlist};

/// Opaque per-visitor handle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SessionId(Uuid);

impl SessionId {
    pub fn random() -> Self {
        Self(Uuid::new_v4())
    }
}

impl std::fmt::Display for SessionId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Per-visitor state. Never written to durable storage.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Session {
    pub id: SessionId,
    /// Set while a user is signed in.
    pub username: Option<String>,
    pub cart: Cart,
    /// Only used while anonymous; a signed-in user's wishlist lives on the
    /// user record.
    pub wishlist: Wishlist,
    pub dark_mode: bool,
    /// Refreshed by every session action; idle sessions expire from it.
    #[serde(default = "Utc::now")]
    pub last_active: DateTime<Utc>,
}

impl Session {
    pub fn new(id: SessionId) -> Self {
        Self {
            id,
            username: None,
            cart: Cart::new(),
            wishlist: Wishlist::new(),
            dark_mode: false,
            last_active: Utc::now(),
        }
    }

    pub fn is_authenticated(&self) -> bool {
        self.username.is_some()
    }
}
