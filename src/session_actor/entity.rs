use std::mem;

use chrono::{DateTime, Utc};

use crate::actor_framework::{Entity, FrameworkError};
use crate::domain::{Session, SessionId};
use super::actions::{SessionAction, SessionActionResult};

/// Opening a session takes no input.
#[derive(Debug, Clone, Default)]
pub struct SessionCreate;

impl Entity for Session {
    type Id = SessionId;
    type CreatePayload = SessionCreate;
    type Patch = ();
    type Action = SessionAction;
    type ActionResult = SessionActionResult;

    const COLLECTION: &'static str = "sessions";

    fn id(&self) -> &SessionId { &self.id }

    fn assign_id(_payload: &SessionCreate, existing: &[Self]) -> Result<SessionId, FrameworkError> {
        let mut id = SessionId::random();
        while existing.iter().any(|session| session.id == id) {
            id = SessionId::random();
        }
        Ok(id)
    }

    fn from_create(id: SessionId, _payload: SessionCreate) -> Result<Self, FrameworkError> {
        Ok(Session::new(id))
    }

    fn on_update(&mut self, _patch: ()) -> Result<(), FrameworkError> {
        Err(FrameworkError::NotPermitted("sessions change through actions only".to_string()))
    }

    fn expired_before(&self, cutoff: DateTime<Utc>) -> bool {
        self.last_active < cutoff
    }

    fn handle_action(&mut self, action: SessionAction) -> Result<SessionActionResult, FrameworkError> {
        self.last_active = Utc::now();
        let result = match action {
            SessionAction::AddToCart { product_id, delta } => {
                if delta == 0 {
                    return Err(FrameworkError::Validation("quantity to add must be positive".to_string()));
                }
                SessionActionResult::AddToCart(self.cart.add(product_id, delta))
            }
            SessionAction::DecrementCart(product_id) => {
                SessionActionResult::DecrementCart(self.cart.decrement(product_id))
            }
            SessionAction::RemoveFromCart(product_id) => {
                SessionActionResult::RemoveFromCart(self.cart.remove(product_id))
            }
            SessionAction::TakeCart => SessionActionResult::TakeCart(mem::take(&mut self.cart)),
            SessionAction::RestoreCart(cart) => {
                self.cart.merge(&cart);
                SessionActionResult::RestoreCart
            }
            SessionAction::AddToWishlist(product_id) => {
                SessionActionResult::AddToWishlist(self.wishlist.add(product_id))
            }
            SessionAction::RemoveFromWishlist(product_id) => {
                SessionActionResult::RemoveFromWishlist(self.wishlist.remove(product_id))
            }
            SessionAction::SignIn(username) => {
                self.username = Some(username);
                SessionActionResult::SignIn(mem::take(&mut self.wishlist))
            }
            SessionAction::SignOut => {
                self.username = None;
                SessionActionResult::SignOut
            }
            SessionAction::ToggleDarkMode => {
                self.dark_mode = !self.dark_mode;
                SessionActionResult::ToggleDarkMode(self.dark_mode)
            }
            SessionAction::Touch => SessionActionResult::Touch(Box::new(self.clone())),
        };
        Ok(result)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{ProductId, Wishlist};

    fn session() -> Session {
        Session::new(SessionId::random())
    }

    #[test]
    fn zero_delta_is_rejected() {
        let mut session = session();
        let result = session.handle_action(SessionAction::AddToCart { product_id: ProductId::new(1), delta: 0 });
        assert!(matches!(result, Err(FrameworkError::Validation(_))));
        assert!(session.cart.is_empty());
    }

    #[test]
    fn sign_in_drains_the_anonymous_wishlist() {
        let mut session = session();
        session.handle_action(SessionAction::AddToWishlist(ProductId::new(3))).unwrap();

        let result = session.handle_action(SessionAction::SignIn("alice".into())).unwrap();

        assert_eq!(result, SessionActionResult::SignIn(Wishlist::from(vec![ProductId::new(3)])));
        assert!(session.wishlist.is_empty());
        assert_eq!(session.username.as_deref(), Some("alice"));
    }

    #[test]
    fn sign_out_keeps_the_cart() {
        let mut session = session();
        session.handle_action(SessionAction::SignIn("alice".into())).unwrap();
        session.handle_action(SessionAction::AddToCart { product_id: ProductId::new(1), delta: 2 }).unwrap();

        session.handle_action(SessionAction::SignOut).unwrap();

        assert!(!session.is_authenticated());
        assert_eq!(session.cart.quantity(ProductId::new(1)), Some(2));
    }

    #[test]
    fn taking_the_cart_leaves_it_empty() {
        let mut session = session();
        session.handle_action(SessionAction::AddToCart { product_id: ProductId::new(1), delta: 2 }).unwrap();

        let SessionActionResult::TakeCart(taken) = session.handle_action(SessionAction::TakeCart).unwrap() else {
            panic!("expected the taken cart");
        };

        assert_eq!(taken.quantity(ProductId::new(1)), Some(2));
        assert!(session.cart.is_empty());
        let SessionActionResult::TakeCart(second) = session.handle_action(SessionAction::TakeCart).unwrap() else {
            panic!("expected the taken cart");
        };
        assert!(second.is_empty());
    }

    #[test]
    fn restoring_keeps_lines_added_meanwhile() {
        let mut session = session();
        session.handle_action(SessionAction::AddToCart { product_id: ProductId::new(1), delta: 2 }).unwrap();
        let SessionActionResult::TakeCart(taken) = session.handle_action(SessionAction::TakeCart).unwrap() else {
            panic!("expected the taken cart");
        };
        session.handle_action(SessionAction::AddToCart { product_id: ProductId::new(2), delta: 1 }).unwrap();

        session.handle_action(SessionAction::RestoreCart(taken)).unwrap();

        assert_eq!(session.cart.quantity(ProductId::new(1)), Some(2));
        assert_eq!(session.cart.quantity(ProductId::new(2)), Some(1));
    }

    #[test]
    fn actions_refresh_activity() {
        let mut session = session();
        let opened = session.last_active;
        assert!(!session.expired_before(opened));

        session.handle_action(SessionAction::Touch).unwrap();

        assert!(session.last_active >= opened);
        assert!(session.expired_before(session.last_active + chrono::Duration::seconds(1)));
    }

    #[test]
    fn dark_mode_flips() {
        let mut session = session();
        assert_eq!(session.handle_action(SessionAction::ToggleDarkMode).unwrap(), SessionActionResult::ToggleDarkMode(true));
        assert_eq!(session.handle_action(SessionAction::ToggleDarkMode).unwrap(), SessionActionResult::ToggleDarkMode(false));
    }
}
