//! Per-visitor state: cart, anonymous wishlist, sign-in and display flags.
//! Sessions are never persisted.

mod actions;
pub mod entity;
pub mod error;

pub use actions::*;
pub use entity::SessionCreate;
pub use error::*;
