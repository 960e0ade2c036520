use crate::actor_framework::{Entity, FrameworkError};
use crate::domain::{User, UserCreate, Wishlist};
use super::actions::{UserAction, UserActionResult};

impl Entity for User {
    type Id = String;
    type CreatePayload = UserCreate;
    type Patch = ();
    type Action = UserAction;
    type ActionResult = UserActionResult;

    const COLLECTION: &'static str = "users";

    fn id(&self) -> &String { &self.username }

    /// The username is the identifier; it must be non-empty and unused.
    fn assign_id(params: &UserCreate, existing: &[Self]) -> Result<String, FrameworkError> {
        if params.username.is_empty() {
            return Err(FrameworkError::Validation("username must not be empty".to_string()));
        }
        if existing.iter().any(|user| user.username == params.username) {
            return Err(FrameworkError::AlreadyExists(params.username.clone()));
        }
        Ok(params.username.clone())
    }

    fn from_create(id: String, params: UserCreate) -> Result<Self, FrameworkError> {
        Ok(Self {
            username: id,
            credential: params.credential,
            is_admin: params.is_admin,
            wishlist: Wishlist::new(),
        })
    }

    /// Profiles are not editable.
    fn on_update(&mut self, _patch: ()) -> Result<(), FrameworkError> {
        Err(FrameworkError::NotPermitted("user records cannot be edited".to_string()))
    }

    /// Users are never deleted.
    fn on_delete(&self) -> Result<(), FrameworkError> {
        Err(FrameworkError::NotPermitted("user records cannot be deleted".to_string()))
    }

    fn handle_action(&mut self, action: UserAction) -> Result<UserActionResult, FrameworkError> {
        match action {
            UserAction::AddToWishlist(product_id) => {
                self.wishlist.add(product_id);
            }
            UserAction::RemoveFromWishlist(product_id) => {
                self.wishlist.remove(product_id);
            }
            UserAction::MergeWishlist(other) => {
                self.wishlist.merge(&other);
            }
        }
        Ok(UserActionResult::Wishlist(self.wishlist.clone()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{Credential, ProductId};

    fn credential() -> Credential {
        serde_json::from_str("\"$argon2id$placeholder\"").unwrap()
    }

    fn user(name: &str) -> User {
        User::from_create(name.to_string(), UserCreate::new(name, credential(), false)).unwrap()
    }

    #[test]
    fn duplicate_username_is_rejected() {
        let existing = vec![user("alice")];
        let result = User::assign_id(&UserCreate::new("alice", credential(), false), &existing);
        assert_eq!(result, Err(FrameworkError::AlreadyExists("alice".to_string())));
    }

    #[test]
    fn usernames_are_case_sensitive() {
        let existing = vec![user("alice")];
        assert_eq!(User::assign_id(&UserCreate::new("Alice", credential(), false), &existing).unwrap(), "Alice");
    }

    #[test]
    fn blank_username_is_rejected() {
        let result = User::assign_id(&UserCreate::new("   ", credential(), false), &[]);
        assert!(matches!(result, Err(FrameworkError::Validation(_))));
    }

    #[test]
    fn wishlist_actions_never_duplicate() {
        let mut alice = user("alice");
        alice.handle_action(UserAction::AddToWishlist(ProductId::new(1))).unwrap();
        let UserActionResult::Wishlist(wishlist) =
            alice.handle_action(UserAction::AddToWishlist(ProductId::new(1))).unwrap();

        assert_eq!(wishlist.ids(), &[ProductId::new(1)]);
    }

    #[test]
    fn merge_keeps_existing_entries_first() {
        let mut alice = user("alice");
        alice.handle_action(UserAction::AddToWishlist(ProductId::new(2))).unwrap();
        let anonymous = Wishlist::from(vec![ProductId::new(3), ProductId::new(2)]);

        let UserActionResult::Wishlist(wishlist) = alice.handle_action(UserAction::MergeWishlist(anonymous)).unwrap();
        assert_eq!(wishlist.ids(), &[ProductId::new(2), ProductId::new(3)]);
    }

    #[test]
    fn records_cannot_be_deleted() {
        assert!(matches!(user("alice").on_delete(), Err(FrameworkError::NotPermitted(_))));
    }
}
