//! Typed handles over the resource actors. Each client wraps a
//! `ResourceClient` and converts framework errors into its component's error.

#[macro_use]
mod macros;

pub mod order_client;
pub mod product_client;
pub mod session_client;
pub mod user_client;

pub use order_client::OrderClient;
pub use product_client::ProductClient;
pub use session_client::SessionClient;
pub use user_client::UserClient;
