use crate::actor_framework::{Entity, FrameworkError};
use crate::domain::{Order, OrderCreate, OrderId};

impl Entity for Order {
    type Id = OrderId;
    type CreatePayload = OrderCreate;
    type Patch = ();
    type Action = ();
    type ActionResult = ();

    const COLLECTION: &'static str = "orders";

    fn id(&self) -> &OrderId { &self.id }

    /// Ledger length plus one. Safe only because the ledger actor is the
    /// sole writer and nothing is ever removed.
    fn assign_id(_params: &OrderCreate, existing: &[Self]) -> Result<OrderId, FrameworkError> {
        Ok(OrderId::new(existing.len() as u64 + 1))
    }

    fn from_create(id: OrderId, params: OrderCreate) -> Result<Self, FrameworkError> {
        if params.items.is_empty() {
            return Err(FrameworkError::Validation("order has no items".to_string()));
        }
        Ok(Self {
            id,
            username: params.username,
            items: params.items,
            total: params.total,
            created_at: params.created_at,
        })
    }

    fn on_update(&mut self, _patch: ()) -> Result<(), FrameworkError> {
        Err(FrameworkError::NotPermitted("orders are immutable".to_string()))
    }

    fn on_delete(&self) -> Result<(), FrameworkError> {
        Err(FrameworkError::NotPermitted("orders are append-only".to_string()))
    }

    fn handle_action(&mut self, _action: ()) -> Result<(), FrameworkError> {
        Err(FrameworkError::NotPermitted("orders accept no actions".to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::actor_framework::ResourceActor;
    use crate::domain::{Cart, ProductId};
    use chrono::Utc;

    fn params(username: &str) -> OrderCreate {
        let mut items = Cart::new();
        items.add(ProductId::new(1), 2);
        OrderCreate { username: username.into(), items, total: 1000, created_at: Utc::now() }
    }

    #[tokio::test]
    async fn ids_follow_ledger_length() {
        let (actor, client) = ResourceActor::<Order>::new(10);
        tokio::spawn(actor.run());

        assert_eq!(client.create(params("a")).await.unwrap().id, OrderId::new(1));
        assert_eq!(client.create(params("b")).await.unwrap().id, OrderId::new(2));
    }

    #[tokio::test]
    async fn ledger_rejects_edits_and_deletes() {
        let (actor, client) = ResourceActor::<Order>::new(10);
        tokio::spawn(actor.run());
        client.create(params("a")).await.unwrap();

        assert!(matches!(client.update(OrderId::new(1), ()).await, Err(FrameworkError::NotPermitted(_))));
        assert!(matches!(client.delete(OrderId::new(1)).await, Err(FrameworkError::NotPermitted(_))));
        assert_eq!(client.list().await.unwrap().len(), 1);
    }

    #[test]
    fn empty_item_snapshot_is_refused() {
        let mut empty = params("a");
        empty.items.clear();
        assert!(matches!(Order::from_create(OrderId::new(1), empty), Err(FrameworkError::Validation(_))));
    }
}
