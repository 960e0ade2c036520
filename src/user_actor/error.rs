use thiserror::Error;

use crate::actor_framework::FrameworkError;
use crate::domain::CredentialError;

/// Errors that can occur during user operations.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum UserError {
    #[error("User not found: {0}")]
    NotFound(String),
    #[error("User already exists: {0}")]
    AlreadyExists(String),
    #[error("User validation error: {0}")]
    ValidationError(String),
    #[error("Invalid credentials")]
    InvalidCredentials,
    #[error("User storage error: {0}")]
    Storage(String),
    #[error("Actor communication error: {0}")]
    ActorCommunicationError(String),
}

impl From<FrameworkError> for UserError {
    fn from(err: FrameworkError) -> Self {
        match err {
            FrameworkError::NotFound(name) => Self::NotFound(name),
            FrameworkError::AlreadyExists(name) => Self::AlreadyExists(name),
            FrameworkError::Validation(msg) | FrameworkError::NotPermitted(msg) => Self::ValidationError(msg),
            FrameworkError::Persistence(e) => Self::Storage(e.to_string()),
            FrameworkError::ActorClosed | FrameworkError::ActorDropped => {
                Self::ActorCommunicationError(err.to_string())
            }
        }
    }
}

impl From<CredentialError> for UserError {
    fn from(err: CredentialError) -> Self {
        match err {
            CredentialError::EmptyPassword => Self::ValidationError(err.to_string()),
            CredentialError::Hash(msg) => Self::Storage(msg),
            CredentialError::Malformed(_) => Self::InvalidCredentials,
        }
    }
}
