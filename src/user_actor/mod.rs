//! Identity: username uniqueness and the signed-in wishlist.

mod actions;
pub mod entity;
pub mod error;

pub use actions::*;
pub use error::*;
