//! Domain-level errors (no external dependencies)

use thiserror::Error;

use crate::domain::node_id::NodeId;

/// Domain errors represent business logic violations.
/// These are independent of infrastructure concerns.
#[derive(Error, Debug)]
pub enum DomainError {
    #[error("invalid node identifier: {0}")]
    InvalidIdentifier(String),

    #[error("no node with identifier {0} in the current taxonomy")]
    UnknownNode(NodeId),

    #[error("node {0} is not a level-2 keyword")]
    NotLevel2(NodeId),

    #[error("unrecognized category: {0}")]
    UnknownCategory(String),

    #[error("unrecognized funnel stage: {0}")]
    UnknownStage(String),
}

pub type DomainResult<T> = Result<T, DomainError>;
