use thiserror::Error;

use crate::actor_framework::FrameworkError;
use crate::app_system::ConfigError;
use crate::domain::CartError;
use crate::order_actor::OrderError;
use crate::persistence::PersistenceError;
use crate::product_actor::ProductError;
use crate::session_actor::SessionError;
use crate::user_actor::UserError;

/// Every failure a storefront operation can surface.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum ShopError {
    #[error(transparent)]
    Product(#[from] ProductError),
    #[error(transparent)]
    User(#[from] UserError),
    #[error(transparent)]
    Order(#[from] OrderError),
    #[error(transparent)]
    Session(#[from] SessionError),
    #[error(transparent)]
    Cart(#[from] CartError),
    #[error("Sign-in required")]
    Unauthorized,
    #[error("Administrator access required")]
    Forbidden,
    #[error("Invalid input: {0}")]
    Validation(String),
}

/// Coarse classification used when reporting errors outward.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    Validation,
    NotFound,
    EmptyCart,
    Duplicate,
    Unauthorized,
    Forbidden,
    Internal,
}

impl ShopError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::Validation(_)
            | Self::Product(ProductError::Validation(_))
            | Self::User(UserError::ValidationError(_))
            | Self::Session(SessionError::Validation(_))
            | Self::Cart(CartError::TotalOverflow)
            | Self::Order(OrderError::Pricing(_) | OrderError::NotPermitted(_)) => ErrorKind::Validation,
            Self::Product(ProductError::NotFound(_))
            | Self::User(UserError::NotFound(_))
            | Self::Session(SessionError::NotFound(_)) => ErrorKind::NotFound,
            Self::Order(OrderError::EmptyCart) => ErrorKind::EmptyCart,
            Self::User(UserError::AlreadyExists(_)) => ErrorKind::Duplicate,
            Self::Unauthorized | Self::User(UserError::InvalidCredentials) => ErrorKind::Unauthorized,
            Self::Order(OrderError::InvalidUser(_)) => ErrorKind::Unauthorized,
            Self::Forbidden => ErrorKind::Forbidden,
            Self::Product(ProductError::Storage(_) | ProductError::ActorCommunicationError(_))
            | Self::User(UserError::Storage(_) | UserError::ActorCommunicationError(_))
            | Self::Order(OrderError::Storage(_) | OrderError::ActorCommunicationError(_))
            | Self::Session(SessionError::ActorCommunicationError(_)) => ErrorKind::Internal,
        }
    }

    /// HTTP status for the error's kind.
    pub fn status_code(&self) -> u16 {
        match self.kind() {
            ErrorKind::Validation | ErrorKind::EmptyCart => 400,
            ErrorKind::Unauthorized => 401,
            ErrorKind::Forbidden => 403,
            ErrorKind::NotFound => 404,
            ErrorKind::Duplicate => 409,
            ErrorKind::Internal => 500,
        }
    }
}

/// Failures while starting or stopping the system.
#[derive(Debug, Error)]
pub enum SystemError {
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error("Failed to load {collection}: {source}")]
    Load {
        collection: &'static str,
        #[source]
        source: PersistenceError,
    },
    #[error("Failed to seed admin account: {0}")]
    Seed(#[from] UserError),
    #[error("Actor shutdown failed: {0}")]
    Shutdown(#[from] FrameworkError),
    #[error("Actor task failed: {0}")]
    Join(#[from] tokio::task::JoinError),
}
