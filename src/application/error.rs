//! Application-level errors (wraps domain errors)

use thiserror::Error;

use crate::domain::{DomainError, NodeId};
use crate::infrastructure::traits::{GenerationError, PersistenceError};

/// Application errors wrap domain errors and add orchestration-level context.
#[derive(Error, Debug)]
pub enum ApplicationError {
    #[error("{0}")]
    Domain(#[from] DomainError),

    #[error("{0}")]
    Generation(#[from] GenerationError),

    #[error("{0}")]
    Persistence(#[from] PersistenceError),

    #[error("no taxonomy has been generated yet")]
    NoTaxonomy,

    #[error("an augmentation for {0} is already in flight")]
    AugmentInFlight(NodeId),

    #[error("{message}")]
    Validation { message: String },
}

impl ApplicationError {
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation {
            message: message.into(),
        }
    }
}

/// Result type for application layer operations.
pub type ApplicationResult<T> = Result<T, ApplicationError>;
