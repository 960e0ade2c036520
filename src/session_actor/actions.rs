use crate::domain::{Cart, ProductId, Session, Wishlist};

/// Mutations of a visitor session. Callers check the catalog before adding.
#[derive(Debug, Clone)]
pub enum SessionAction {
    AddToCart { product_id: ProductId, delta: u32 },
    DecrementCart(ProductId),
    RemoveFromCart(ProductId),
    /// Empties the cart and hands back what it held.
    TakeCart,
    /// Adds the lines of a previously taken cart back.
    RestoreCart(Cart),
    AddToWishlist(ProductId),
    RemoveFromWishlist(ProductId),
    /// Records the username and drains the anonymous wishlist.
    SignIn(String),
    SignOut,
    ToggleDarkMode,
    /// Marks the session active and returns it.
    Touch,
}

/// Results from SessionActions - variants match 1:1 with SessionAction
#[derive(Debug, Clone, PartialEq)]
pub enum SessionActionResult {
    /// Quantity now in the cart.
    AddToCart(u32),
    /// Remaining quantity, `None` when the line was dropped or never existed.
    DecrementCart(Option<u32>),
    RemoveFromCart(bool),
    TakeCart(Cart),
    RestoreCart,
    AddToWishlist(bool),
    RemoveFromWishlist(bool),
    /// The anonymous wishlist as it was before sign-in.
    SignIn(Wishlist),
    SignOut,
    /// New dark-mode flag.
    ToggleDarkMode(bool),
    Touch(Box<Session>),
}
