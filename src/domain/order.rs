use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::{Cart, OrderId};

/// Represents a completed checkout.
///
/// Items and total are captured at checkout time. Later price changes or
/// product deletions never touch an existing order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Order {
    pub id: OrderId,
    #[serde(rename = "user")]
    pub username: String,
    pub items: Cart,
    pub total: u64,
    pub created_at: DateTime<Utc>,
}

/// Payload for appending an order to the ledger.
#[derive(Debug, Clone)]
pub struct OrderCreate {
    pub username: String,
    pub items: Cart,
    pub total: u64,
    pub created_at: DateTime<Utc>,
}
