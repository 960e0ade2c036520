//! Business entities. Pure data and pure operations; no actor concerns.

pub mod cart;
pub mod catalog;
pub mod credential;
pub mod order;
pub mod product;
pub mod session;
pub mod user;
pub mod wishlist;

pub use cart::*;
pub use catalog::*;
pub use credential::*;
pub use order::*;
pub use product::*;
pub use session::*;
pub use user::*;
pub use wishlist::*;

/// Defines a `u64` newtype identifier that serializes as a bare number.
macro_rules! define_id {
    ($name:ident) => {
        #[derive(
            Debug,
            Clone,
            Copy,
            PartialEq,
            Eq,
            PartialOrd,
            Ord,
            Hash,
            ::serde::Serialize,
            ::serde::Deserialize
        )]
        #[serde(transparent)]
        pub struct $name(u64);

        impl $name {
            pub const fn new(id: u64) -> Self {
                Self(id)
            }

            pub const fn get(self) -> u64 {
                self.0
            }
        }

        impl ::core::fmt::Display for $name {
            fn fmt(&self, f: &mut ::core::fmt::Formatter<'_>) -> ::core::fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl From<u64> for $name {
            fn from(id: u64) -> Self {
                Self(id)
            }
        }
    };
}

define_id!(ProductId);
define_id!(OrderId);
