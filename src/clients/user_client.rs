use tracing::{debug, info, instrument, warn};

use crate::actor_framework::ResourceClient;
use crate::domain::{Credential, ProductId, User, UserCreate, Wishlist};
use crate::user_actor::{UserAction, UserActionResult, UserError};

/// Client for interacting with the User actor.
#[derive(Clone)]
pub struct UserClient {
    inner: ResourceClient<User>,
}

impl_basic_client!(UserClient, User, String, UserError, user);

impl UserClient {
    /// Hashes the password and stores a new user.
    ///
    /// # Errors
    /// `AlreadyExists` when the username is taken, `ValidationError` for a
    /// blank username or empty password.
    #[instrument(skip(self, password))]
    pub async fn register(&self, username: &str, password: &str, is_admin: bool) -> Result<User, UserError> {
        debug!("Sending request");
        let credential = Credential::hash(password)?;
        let user = self.inner.create(UserCreate::new(username, credential, is_admin)).await?;
        info!(username = %user.username, is_admin, "User registered");
        Ok(user)
    }

    /// Looks the user up and checks the password. Unknown users and wrong
    /// passwords are indistinguishable to the caller.
    #[instrument(skip(self, password))]
    pub async fn authenticate(&self, username: &str, password: &str) -> Result<User, UserError> {
        debug!("Sending request");
        let Some(user) = self.inner.get(username.to_string()).await? else {
            return Err(UserError::InvalidCredentials);
        };
        match user.credential.verify(password) {
            Ok(true) => Ok(user),
            Ok(false) => Err(UserError::InvalidCredentials),
            Err(e) => {
                warn!(error = %e, "Stored credential unusable");
                Err(UserError::InvalidCredentials)
            }
        }
    }

    #[instrument(skip(self))]
    pub async fn require_user(&self, username: &str) -> Result<User, UserError> {
        self.get_user(username.to_string())
            .await?
            .ok_or_else(|| UserError::NotFound(username.to_string()))
    }

    #[instrument(skip(self))]
    pub async fn add_to_wishlist(&self, username: &str, product_id: ProductId) -> Result<Wishlist, UserError> {
        self.wishlist_action(username, UserAction::AddToWishlist(product_id)).await
    }

    #[instrument(skip(self))]
    pub async fn remove_from_wishlist(&self, username: &str, product_id: ProductId) -> Result<Wishlist, UserError> {
        self.wishlist_action(username, UserAction::RemoveFromWishlist(product_id)).await
    }

    /// Appends `anonymous` to the stored wishlist, skipping ids already there.
    #[instrument(skip(self))]
    pub async fn merge_wishlist(&self, username: &str, anonymous: Wishlist) -> Result<Wishlist, UserError> {
        self.wishlist_action(username, UserAction::MergeWishlist(anonymous)).await
    }

    async fn wishlist_action(&self, username: &str, action: UserAction) -> Result<Wishlist, UserError> {
        debug!("Sending request");
        let UserActionResult::Wishlist(wishlist) = self.inner.perform_action(username.to_string(), action).await?;
        Ok(wishlist)
    }
}
