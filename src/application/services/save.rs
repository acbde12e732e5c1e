//! Save service: validation, pruning, version naming, and handoff to the
//! persistence collaborator.

use std::sync::Arc;

use chrono::Utc;
use tracing::{debug, instrument};
use uuid::Uuid;

use crate::application::{ApplicationError, ApplicationResult};
use crate::domain::{
    prune, resolve_name, restrict_translations, SavedSubProject, SelectionSet, Taxonomy,
    TranslationOverlay,
};
use crate::infrastructure::traits::PersistenceService;

/// Where the sub-project should be stored.
#[derive(Debug, Clone)]
pub enum SaveTarget {
    /// Under an existing project.
    Existing { project_id: String },
    /// Create a new parent project first.
    NewProject { project_name: String },
}

/// A requested save, prior to validation and version resolution.
#[derive(Debug, Clone)]
pub struct SaveRequest {
    pub name: String,
    pub target: SaveTarget,
}

/// Service that turns a curated session into a versioned, persisted
/// sub-project. Never mutates the live tree or selection.
pub struct SaveService {
    persistence: Arc<dyn PersistenceService>,
}

impl SaveService {
    pub fn new(persistence: Arc<dyn PersistenceService>) -> Self {
        Self { persistence }
    }

    /// Validate, prune, resolve the versioned name, and insert.
    ///
    /// Validation failures block the save locally; the persistence service
    /// is not called. A persistence failure is surfaced verbatim and leaves
    /// the in-memory session intact for a retry.
    #[instrument(skip_all, fields(name = %request.name))]
    pub async fn save(
        &self,
        tree: &Taxonomy,
        selection: &SelectionSet,
        translations: &TranslationOverlay,
        request: SaveRequest,
    ) -> ApplicationResult<SavedSubProject> {
        if request.name.trim().is_empty() {
            return Err(ApplicationError::validation("sub-project name must not be empty"));
        }
        let parent_project_id = match &request.target {
            SaveTarget::Existing { project_id } => {
                if project_id.trim().is_empty() {
                    return Err(ApplicationError::validation("no parent project selected"));
                }
                project_id.clone()
            }
            SaveTarget::NewProject { project_name } => {
                if project_name.trim().is_empty() {
                    return Err(ApplicationError::validation("new project name must not be empty"));
                }
                self.persistence.create_project(project_name).await?.id
            }
        };

        let existing = self.persistence.list_existing(&parent_project_id).await?;
        let existing_names: Vec<String> = existing.into_iter().map(|s| s.name).collect();
        let stored_name = resolve_name(&request.name, &existing_names);

        let pruned_hierarchy = prune(tree, selection);
        let translations = restrict_translations(translations, &pruned_hierarchy);
        debug!(
            "pruned to {} level-1 groups, {} overlay entries, stored name {:?}",
            pruned_hierarchy.len(),
            translations.len(),
            stored_name
        );

        let record = SavedSubProject {
            id: Uuid::new_v4().to_string(),
            name: stored_name,
            parent_project_id,
            saved_at: Utc::now(),
            model_used: tree.model_used.clone(),
            pruned_hierarchy,
            translations,
        };

        self.persistence.insert(&record).await?;
        Ok(record)
    }
}
