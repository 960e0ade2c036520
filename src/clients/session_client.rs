use chrono::{DateTime, Utc};
use tracing::{debug, instrument};

use crate::actor_framework::ResourceClient;
use crate::domain::{Cart, ProductId, Session, SessionId, Wishlist};
use crate::session_actor::{SessionAction, SessionActionResult, SessionCreate, SessionError};

/// Client for interacting with the Session actor.
#[derive(Clone)]
pub struct SessionClient {
    inner: ResourceClient<Session>,
}

impl_basic_client!(SessionClient, Session, SessionId, SessionError, session);

impl SessionClient {
    #[instrument(skip(self))]
    pub async fn open(&self) -> Result<Session, SessionError> {
        debug!("Sending request");
        Ok(self.inner.create(SessionCreate).await?)
    }

    #[instrument(skip(self))]
    pub async fn close(&self, id: SessionId) -> Result<(), SessionError> {
        debug!("Sending request");
        Ok(self.inner.delete(id).await?)
    }

    /// Reads the session and counts the read as activity.
    #[instrument(skip(self))]
    pub async fn touch(&self, id: SessionId) -> Result<Session, SessionError> {
        match self.act(id, SessionAction::Touch).await? {
            SessionActionResult::Touch(session) => Ok(*session),
            _ => Err(unexpected()),
        }
    }

    /// Drops every session idle since before `cutoff`. Returns how many went.
    #[instrument(skip(self))]
    pub async fn expire_idle(&self, cutoff: DateTime<Utc>) -> Result<usize, SessionError> {
        debug!("Sending request");
        Ok(self.inner.sweep(cutoff).await?)
    }

    async fn act(&self, id: SessionId, action: SessionAction) -> Result<SessionActionResult, SessionError> {
        debug!(action = ?action, "Sending request");
        Ok(self.inner.perform_action(id, action).await?)
    }

    #[instrument(skip(self))]
    pub async fn add_to_cart(&self, id: SessionId, product_id: ProductId, delta: u32) -> Result<u32, SessionError> {
        match self.act(id, SessionAction::AddToCart { product_id, delta }).await? {
            SessionActionResult::AddToCart(quantity) => Ok(quantity),
            _ => Err(unexpected()),
        }
    }

    #[instrument(skip(self))]
    pub async fn decrement_cart(&self, id: SessionId, product_id: ProductId) -> Result<Option<u32>, SessionError> {
        match self.act(id, SessionAction::DecrementCart(product_id)).await? {
            SessionActionResult::DecrementCart(quantity) => Ok(quantity),
            _ => Err(unexpected()),
        }
    }

    #[instrument(skip(self))]
    pub async fn remove_from_cart(&self, id: SessionId, product_id: ProductId) -> Result<bool, SessionError> {
        match self.act(id, SessionAction::RemoveFromCart(product_id)).await? {
            SessionActionResult::RemoveFromCart(removed) => Ok(removed),
            _ => Err(unexpected()),
        }
    }

    /// Empties the cart in one step and returns what it held.
    #[instrument(skip(self))]
    pub async fn take_cart(&self, id: SessionId) -> Result<Cart, SessionError> {
        match self.act(id, SessionAction::TakeCart).await? {
            SessionActionResult::TakeCart(cart) => Ok(cart),
            _ => Err(unexpected()),
        }
    }

    /// Puts taken lines back, on top of anything added since.
    #[instrument(skip(self, cart))]
    pub async fn restore_cart(&self, id: SessionId, cart: Cart) -> Result<(), SessionError> {
        match self.act(id, SessionAction::RestoreCart(cart)).await? {
            SessionActionResult::RestoreCart => Ok(()),
            _ => Err(unexpected()),
        }
    }

    #[instrument(skip(self))]
    pub async fn add_to_wishlist(&self, id: SessionId, product_id: ProductId) -> Result<bool, SessionError> {
        match self.act(id, SessionAction::AddToWishlist(product_id)).await? {
            SessionActionResult::AddToWishlist(added) => Ok(added),
            _ => Err(unexpected()),
        }
    }

    #[instrument(skip(self))]
    pub async fn remove_from_wishlist(&self, id: SessionId, product_id: ProductId) -> Result<bool, SessionError> {
        match self.act(id, SessionAction::RemoveFromWishlist(product_id)).await? {
            SessionActionResult::RemoveFromWishlist(removed) => Ok(removed),
            _ => Err(unexpected()),
        }
    }

    /// Marks the session as signed in and hands back the anonymous wishlist,
    /// which the session no longer holds.
    #[instrument(skip(self))]
    pub async fn sign_in(&self, id: SessionId, username: &str) -> Result<Wishlist, SessionError> {
        match self.act(id, SessionAction::SignIn(username.to_string())).await? {
            SessionActionResult::SignIn(anonymous) => Ok(anonymous),
            _ => Err(unexpected()),
        }
    }

    #[instrument(skip(self))]
    pub async fn sign_out(&self, id: SessionId) -> Result<(), SessionError> {
        match self.act(id, SessionAction::SignOut).await? {
            SessionActionResult::SignOut => Ok(()),
            _ => Err(unexpected()),
        }
    }

    #[instrument(skip(self))]
    pub async fn toggle_dark_mode(&self, id: SessionId) -> Result<bool, SessionError> {
        match self.act(id, SessionAction::ToggleDarkMode).await? {
            SessionActionResult::ToggleDarkMode(enabled) => Ok(enabled),
            _ => Err(unexpected()),
        }
    }
}

fn unexpected() -> SessionError {
    SessionError::ActorCommunicationError("Unexpected result".to_string())
}
