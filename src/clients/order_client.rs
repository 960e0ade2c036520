use chrono::Utc;
use tracing::{debug, error, info, instrument};

use crate::actor_framework::ResourceClient;
use crate::clients::{ProductClient, UserClient};
use crate::domain::{Cart, Order, OrderCreate, OrderId};
use crate::order_actor::OrderError;

/// Client for interacting with the Order actor.
///
/// Checkout is orchestrated here: the user is validated and the cart priced
/// against the catalog before the order is appended to the ledger.
#[derive(Clone)]
pub struct OrderClient {
    inner: ResourceClient<Order>,
    user_client: UserClient,
    product_client: ProductClient,
}

impl_client_methods!(OrderClient, Order, OrderId, OrderError, order);

impl OrderClient {
    pub fn new(inner: ResourceClient<Order>, user_client: UserClient, product_client: ProductClient) -> Self {
        Self {
            inner,
            user_client,
            product_client,
        }
    }

    pub async fn shutdown(&self) -> Result<(), crate::actor_framework::FrameworkError> {
        self.inner.shutdown().await
    }

    /// Turns a cart snapshot into an order.
    ///
    /// The total uses catalog prices as they are now; products that no longer
    /// exist are priced at zero. The cart itself is not touched, clearing it
    /// is up to the caller.
    #[instrument(skip(self, cart), fields(line_count = cart.len()))]
    pub async fn checkout(&self, username: &str, cart: &Cart) -> Result<Order, OrderError> {
        info!(stage = "validating", "Processing checkout");
        if cart.is_empty() {
            info!("Cart is empty, nothing to check out");
            return Err(OrderError::EmptyCart);
        }

        match self.user_client.get_user(username.to_string()).await {
            Ok(Some(_)) => debug!("User validation successful"),
            Ok(None) => {
                error!("User not found");
                return Err(OrderError::InvalidUser(username.to_string()));
            }
            Err(e) => {
                error!(error = %e, "User validation failed");
                return Err(OrderError::InvalidUser(format!("User validation failed: {}", e)));
            }
        }

        info!(stage = "pricing", "Processing checkout");
        let catalog = self
            .product_client
            .catalog()
            .await
            .map_err(|e| OrderError::ActorCommunicationError(e.to_string()))?;
        let total = cart.total(&catalog)?;

        info!(stage = "appending", total, "Processing checkout");
        let order = self
            .inner
            .create(OrderCreate {
                username: username.to_string(),
                items: cart.clone(),
                total,
                created_at: Utc::now(),
            })
            .await?;

        info!(order_id = %order.id, total = order.total, "Order appended");
        Ok(order)
    }

    /// Orders placed by `username`, oldest first.
    #[instrument(skip(self))]
    pub async fn orders_for(&self, username: &str) -> Result<Vec<Order>, OrderError> {
        let orders = self.list_orders().await?;
        Ok(orders.into_iter().filter(|order| order.username == username).collect())
    }
}
