use crate::domain::{ProductId, Wishlist};

/// Wishlist operations on a user record. Callers check the catalog first.
#[derive(Debug, Clone)]
pub enum UserAction {
    AddToWishlist(ProductId),
    RemoveFromWishlist(ProductId),
    /// Folds an anonymous session wishlist into the stored one.
    MergeWishlist(Wishlist),
}

/// Every user action answers with the wishlist as it now stands.
#[derive(Debug, Clone, PartialEq)]
pub enum UserActionResult {
    Wishlist(Wishlist),
}
