use thiserror::Error;

use crate::actor_framework::FrameworkError;
use crate::domain::CartError;

/// Errors that can occur during order operations.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum OrderError {
    #[error("Cart is empty")]
    EmptyCart,
    #[error("Invalid user: {0}")]
    InvalidUser(String),
    #[error("Order cannot be priced: {0}")]
    Pricing(String),
    #[error("Order not permitted: {0}")]
    NotPermitted(String),
    #[error("Order storage error: {0}")]
    Storage(String),
    #[error("Actor communication error: {0}")]
    ActorCommunicationError(String),
}

impl From<FrameworkError> for OrderError {
    fn from(err: FrameworkError) -> Self {
        match err {
            FrameworkError::NotFound(msg)
            | FrameworkError::AlreadyExists(msg)
            | FrameworkError::Validation(msg)
            | FrameworkError::NotPermitted(msg) => Self::NotPermitted(msg),
            FrameworkError::Persistence(e) => Self::Storage(e.to_string()),
            FrameworkError::ActorClosed | FrameworkError::ActorDropped => {
                Self::ActorCommunicationError(err.to_string())
            }
        }
    }
}

impl From<CartError> for OrderError {
    fn from(err: CartError) -> Self {
        Self::Pricing(err.to_string())
    }
}
