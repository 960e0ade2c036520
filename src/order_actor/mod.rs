//! The order ledger: append-only, ids assigned by position.

pub mod entity;
pub mod error;

pub use error::*;
