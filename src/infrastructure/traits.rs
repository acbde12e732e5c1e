//! I/O boundary traits for testability
//!
//! These traits abstract the external collaborators (generation service and
//! persistence store), allowing application services to be tested with mock
//! implementations.

use std::collections::BTreeMap;

use async_trait::async_trait;
use thiserror::Error;

use crate::domain::{AugmentContext, Project, RawHierarchy, SavedSubProject};

/// Failure of the external generation collaborator.
///
/// Network and malformed-payload failures are distinguished so callers can
/// present the former as retryable.
#[derive(Error, Debug)]
pub enum GenerationError {
    #[error("generation request failed: {0}")]
    Network(String),

    #[error("malformed generation response: {0}")]
    Malformed(String),
}

/// Failure of the external persistence collaborator. Surfaced verbatim.
#[derive(Error, Debug)]
pub enum PersistenceError {
    #[error("persistence failure: {0}")]
    Backend(String),

    #[error("no project with id {0}")]
    ProjectNotFound(String),
}

/// External generation collaborator.
#[async_trait]
pub trait GenerationService: Send + Sync {
    /// Generate a raw keyword hierarchy from seed keywords and instructions.
    async fn generate_hierarchy(
        &self,
        seed_keywords: &[String],
        instructions: &str,
    ) -> Result<RawHierarchy, GenerationError>;

    /// Generate supplementary term candidates for one level-2 node.
    async fn generate_terms(&self, context: &AugmentContext)
        -> Result<Vec<String>, GenerationError>;

    /// Translate a batch of texts. The result maps source text to
    /// translation; partial results are allowed.
    async fn translate_many(
        &self,
        texts: &[String],
        target_language: &str,
    ) -> Result<BTreeMap<String, String>, GenerationError>;
}

/// External persistence collaborator for projects and sub-projects.
#[async_trait]
pub trait PersistenceService: Send + Sync {
    async fn create_project(&self, name: &str) -> Result<Project, PersistenceError>;

    async fn list_projects(&self) -> Result<Vec<Project>, PersistenceError>;

    /// Insert a saved sub-project under its parent project.
    async fn insert(&self, sub_project: &SavedSubProject) -> Result<(), PersistenceError>;

    /// All sub-projects saved under the given parent project, for
    /// version-lineage lookup.
    async fn list_existing(
        &self,
        parent_project_id: &str,
    ) -> Result<Vec<SavedSubProject>, PersistenceError>;
}
