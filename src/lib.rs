//! Actor-backed storefront core: catalog, carts, wishlists, an append-only
//! order ledger and identity, persisted as whole-collection JSON snapshots.

pub mod actor_framework;
pub mod api;
pub mod app_system;
pub mod clients;
pub mod domain;
pub mod order_actor;
pub mod persistence;
pub mod product_actor;
pub mod session_actor;
pub mod storefront;
pub mod user_actor;

#[cfg(test)]
mod mock_framework;

pub use app_system::{setup_tracing, ShopConfig, ShopError, ShopSystem};
pub use storefront::Storefront;
