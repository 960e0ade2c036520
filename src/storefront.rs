//! Shopper- and admin-facing operations, one method per storefront route.
//!
//! Every call names the visitor's session. Cart state always lives on the
//! session; the wishlist lives on the session while anonymous and on the
//! user record once signed in.

use serde::Serialize;
use tracing::{debug, info, instrument, warn};

use crate::app_system::ShopError;
use crate::clients::{OrderClient, ProductClient, SessionClient, UserClient};
use crate::domain::{
    CartLine, Order, Product, ProductId, ProductView, SearchFilter, Session, SessionId, User, Wishlist,
};
use crate::product_actor::{ProductCreate, ProductError, ProductPatch};

/// The cart page: resolved lines plus the total at current prices.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CartView {
    pub lines: Vec<CartLine>,
    pub total: u64,
}

/// Parses a submitted rating. Only whole numbers are accepted; the range is
/// checked when the rating is recorded.
pub fn parse_rating(raw: &str) -> Result<i64, ProductError> {
    raw.trim()
        .parse::<i64>()
        .map_err(|_| ProductError::Validation(format!("rating must be a whole number, got {raw:?}")))
}

#[derive(Clone)]
pub struct Storefront {
    products: ProductClient,
    users: UserClient,
    orders: OrderClient,
    sessions: SessionClient,
}

impl Storefront {
    pub fn new(products: ProductClient, users: UserClient, orders: OrderClient, sessions: SessionClient) -> Self {
        Self {
            products,
            users,
            orders,
            sessions,
        }
    }

    // --- Sessions ---

    /// Sessions that see no activity for the configured idle timeout are
    /// dropped by the system's sweeper, cart and anonymous wishlist included.
    #[instrument(skip(self))]
    pub async fn open_session(&self) -> Result<Session, ShopError> {
        let session = self.sessions.open().await?;
        debug!(session_id = %session.id, "Session opened");
        Ok(session)
    }

    #[instrument(skip(self))]
    pub async fn close_session(&self, session: SessionId) -> Result<(), ShopError> {
        Ok(self.sessions.close(session).await?)
    }

    #[instrument(skip(self))]
    pub async fn session(&self, session: SessionId) -> Result<Session, ShopError> {
        Ok(self.sessions.touch(session).await?)
    }

    #[instrument(skip(self))]
    pub async fn toggle_dark_mode(&self, session: SessionId) -> Result<bool, ShopError> {
        Ok(self.sessions.toggle_dark_mode(session).await?)
    }

    // --- Catalog ---

    /// Home page listing.
    #[instrument(skip(self))]
    pub async fn search(&self, filter: &SearchFilter) -> Result<Vec<ProductView>, ShopError> {
        Ok(self.products.search(filter).await?)
    }

    #[instrument(skip(self))]
    pub async fn categories(&self) -> Result<Vec<String>, ShopError> {
        Ok(self.products.catalog().await?.categories())
    }

    #[instrument(skip(self))]
    pub async fn product(&self, product_id: ProductId) -> Result<ProductView, ShopError> {
        Ok(self.products.require_product(product_id).await?.view())
    }

    /// Product page rating form. Returns the new average.
    #[instrument(skip(self))]
    pub async fn rate(&self, product_id: ProductId, raw_rating: &str) -> Result<f64, ShopError> {
        let score = parse_rating(raw_rating)?;
        self.rate_score(product_id, score).await
    }

    #[instrument(skip(self))]
    pub async fn rate_score(&self, product_id: ProductId, score: i64) -> Result<f64, ShopError> {
        let average = self.products.add_rating(product_id, score).await?;
        info!(average, "Rating recorded");
        Ok(average)
    }

    // --- Cart ---

    /// Adds `delta` units. The product must exist.
    #[instrument(skip(self))]
    pub async fn add_to_cart(&self, session: SessionId, product_id: ProductId, delta: u32) -> Result<u32, ShopError> {
        self.products.require_product(product_id).await?;
        Ok(self.sessions.add_to_cart(session, product_id, delta).await?)
    }

    #[instrument(skip(self))]
    pub async fn increase_quantity(&self, session: SessionId, product_id: ProductId) -> Result<u32, ShopError> {
        self.add_to_cart(session, product_id, 1).await
    }

    /// Removes the line when the quantity reaches zero.
    #[instrument(skip(self))]
    pub async fn decrease_quantity(&self, session: SessionId, product_id: ProductId) -> Result<Option<u32>, ShopError> {
        Ok(self.sessions.decrement_cart(session, product_id).await?)
    }

    #[instrument(skip(self))]
    pub async fn remove_from_cart(&self, session: SessionId, product_id: ProductId) -> Result<bool, ShopError> {
        Ok(self.sessions.remove_from_cart(session, product_id).await?)
    }

    #[instrument(skip(self))]
    pub async fn cart(&self, session: SessionId) -> Result<CartView, ShopError> {
        let session = self.sessions.touch(session).await?;
        let catalog = self.products.catalog().await?;
        Ok(CartView {
            lines: session.cart.lines(&catalog)?,
            total: session.cart.total(&catalog)?,
        })
    }

    // --- Checkout and orders ---

    /// Places an order for the signed-in user and empties the cart.
    ///
    /// # Errors
    /// `Unauthorized` when anonymous, `OrderError::EmptyCart` when there is
    /// nothing to buy. Neither touches the cart or the ledger. Any other
    /// failure puts the cart back.
    ///
    /// The cart is taken from the session before the order is placed, so two
    /// checkouts racing on one session cannot both buy it.
    #[instrument(skip(self))]
    pub async fn checkout(&self, session: SessionId) -> Result<Order, ShopError> {
        let username = self.signed_in(session).await?;
        let cart = self.sessions.take_cart(session).await?;

        match self.orders.checkout(&username, &cart).await {
            Ok(order) => {
                info!(order_id = %order.id, stage = "cleared", "Checkout complete");
                Ok(order)
            }
            Err(e) => {
                if !cart.is_empty() {
                    self.sessions.restore_cart(session, cart).await?;
                    debug!("Cart restored after failed checkout");
                }
                Err(e.into())
            }
        }
    }

    #[instrument(skip(self))]
    pub async fn orders(&self, session: SessionId) -> Result<Vec<Order>, ShopError> {
        let username = self.signed_in(session).await?;
        Ok(self.orders.orders_for(&username).await?)
    }

    // --- Wishlist ---

    /// Wishlist products that still exist, in the order they were saved.
    #[instrument(skip(self))]
    pub async fn wishlist(&self, session: SessionId) -> Result<Vec<Product>, ShopError> {
        let wishlist = self.current_wishlist(session).await?;
        let catalog = self.products.catalog().await?;
        Ok(wishlist.resolve(&catalog))
    }

    #[instrument(skip(self))]
    pub async fn add_to_wishlist(&self, session: SessionId, product_id: ProductId) -> Result<(), ShopError> {
        self.products.require_product(product_id).await?;
        match self.sessions.touch(session).await?.username {
            Some(username) => {
                self.users.add_to_wishlist(&username, product_id).await?;
            }
            None => {
                self.sessions.add_to_wishlist(session, product_id).await?;
            }
        }
        Ok(())
    }

    #[instrument(skip(self))]
    pub async fn remove_from_wishlist(&self, session: SessionId, product_id: ProductId) -> Result<(), ShopError> {
        match self.sessions.touch(session).await?.username {
            Some(username) => {
                self.users.remove_from_wishlist(&username, product_id).await?;
            }
            None => {
                self.sessions.remove_from_wishlist(session, product_id).await?;
            }
        }
        Ok(())
    }

    async fn current_wishlist(&self, session: SessionId) -> Result<Wishlist, ShopError> {
        let current = self.sessions.touch(session).await?;
        match current.username {
            Some(username) => Ok(self.users.require_user(&username).await?.wishlist),
            None => Ok(current.wishlist),
        }
    }

    // --- Identity ---

    /// Registers a shopper and signs them in on this session.
    #[instrument(skip(self, password))]
    pub async fn signup(&self, session: SessionId, username: &str, password: &str) -> Result<User, ShopError> {
        self.sessions.touch(session).await?;
        let user = self.users.register(username, password, false).await?;
        self.sign_in(session, user).await
    }

    #[instrument(skip(self, password))]
    pub async fn login(&self, session: SessionId, username: &str, password: &str) -> Result<User, ShopError> {
        let user = match self.users.authenticate(username.trim(), password).await {
            Ok(user) => user,
            Err(e) => {
                warn!(error = %e, "Login rejected");
                return Err(e.into());
            }
        };
        self.sign_in(session, user).await
    }

    /// Forgets the user; the cart stays with the session.
    #[instrument(skip(self))]
    pub async fn logout(&self, session: SessionId) -> Result<(), ShopError> {
        Ok(self.sessions.sign_out(session).await?)
    }

    #[instrument(skip(self))]
    pub async fn current_user(&self, session: SessionId) -> Result<Option<User>, ShopError> {
        match self.sessions.touch(session).await?.username {
            Some(username) => Ok(self.users.get_user(username).await?),
            None => Ok(None),
        }
    }

    /// Marks the session signed in and folds the anonymous wishlist into the
    /// user's, dropping ids the catalog no longer knows.
    async fn sign_in(&self, session: SessionId, mut user: User) -> Result<User, ShopError> {
        let mut anonymous = self.sessions.sign_in(session, &user.username).await?;
        if !anonymous.is_empty() {
            let catalog = self.products.catalog().await?;
            anonymous.retain_known(&catalog);
            user.wishlist = self.users.merge_wishlist(&user.username, anonymous).await?;
        }
        info!(username = %user.username, "Signed in");
        Ok(user)
    }

    async fn signed_in(&self, session: SessionId) -> Result<String, ShopError> {
        self.sessions
            .touch(session)
            .await?
            .username
            .ok_or(ShopError::Unauthorized)
    }

    // --- Admin ---

    async fn require_admin(&self, session: SessionId) -> Result<User, ShopError> {
        let username = self.signed_in(session).await?;
        let user = self.users.require_user(&username).await?;
        if !user.is_admin {
            warn!(username = %user.username, "Admin operation refused");
            return Err(ShopError::Forbidden);
        }
        Ok(user)
    }

    #[instrument(skip(self))]
    pub async fn admin_products(&self, session: SessionId) -> Result<Vec<Product>, ShopError> {
        self.require_admin(session).await?;
        Ok(self.products.list_products().await?)
    }

    #[instrument(skip(self))]
    pub async fn admin_create_product(&self, session: SessionId, params: ProductCreate) -> Result<Product, ShopError> {
        self.require_admin(session).await?;
        Ok(self.products.create_product(params).await?)
    }

    #[instrument(skip(self))]
    pub async fn admin_update_product(
        &self,
        session: SessionId,
        product_id: ProductId,
        patch: ProductPatch,
    ) -> Result<Product, ShopError> {
        self.require_admin(session).await?;
        Ok(self.products.update_product(product_id, patch).await?)
    }

    #[instrument(skip(self))]
    pub async fn admin_delete_product(&self, session: SessionId, product_id: ProductId) -> Result<(), ShopError> {
        self.require_admin(session).await?;
        Ok(self.products.delete_product(product_id).await?)
    }
}
