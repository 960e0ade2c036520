//! Catalog-specific domain logic: product validation, id assignment and ratings.

mod actions;
mod dtos;
pub mod entity;
pub mod error;

pub use actions::*;
pub use dtos::*;
pub use error::*;
