//! JSON-file persistence store.
//!
//! Projects live in `projects.json`; sub-projects are grouped per parent
//! project under `sub_projects/{parent_id}.json`. Writes go through a temp
//! file in the same directory followed by a rename.

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use chrono::Utc;
use serde::de::DeserializeOwned;
use serde::Serialize;
use tempfile::NamedTempFile;
use tracing::{debug, instrument};
use uuid::Uuid;

use crate::domain::{Project, SavedSubProject};
use crate::infrastructure::traits::{PersistenceError, PersistenceService};

/// File-backed persistence for projects and saved sub-projects.
pub struct JsonStore {
    root: PathBuf,
}

impl JsonStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    fn projects_path(&self) -> PathBuf {
        self.root.join("projects.json")
    }

    fn sub_projects_path(&self, parent_id: &str) -> PathBuf {
        self.root.join("sub_projects").join(format!("{}.json", parent_id))
    }

    fn read_or_default<T: DeserializeOwned + Default>(path: &Path) -> Result<T, PersistenceError> {
        if !path.exists() {
            return Ok(T::default());
        }
        let content = std::fs::read_to_string(path)
            .map_err(|e| PersistenceError::Backend(format!("read {}: {}", path.display(), e)))?;
        serde_json::from_str(&content)
            .map_err(|e| PersistenceError::Backend(format!("parse {}: {}", path.display(), e)))
    }

    fn write_atomic<T: Serialize>(path: &Path, value: &T) -> Result<(), PersistenceError> {
        let dir = path
            .parent()
            .ok_or_else(|| PersistenceError::Backend(format!("no parent dir: {}", path.display())))?;
        std::fs::create_dir_all(dir)
            .map_err(|e| PersistenceError::Backend(format!("mkdir {}: {}", dir.display(), e)))?;

        let tmp = NamedTempFile::new_in(dir)
            .map_err(|e| PersistenceError::Backend(format!("tempfile in {}: {}", dir.display(), e)))?;
        serde_json::to_writer_pretty(&tmp, value)
            .map_err(|e| PersistenceError::Backend(format!("serialize: {}", e)))?;
        tmp.persist(path)
            .map_err(|e| PersistenceError::Backend(format!("persist {}: {}", path.display(), e)))?;
        Ok(())
    }
}

#[async_trait]
impl PersistenceService for JsonStore {
    #[instrument(skip(self))]
    async fn create_project(&self, name: &str) -> Result<Project, PersistenceError> {
        let mut projects: Vec<Project> = Self::read_or_default(&self.projects_path())?;
        let project = Project {
            id: Uuid::new_v4().to_string(),
            name: name.to_string(),
            created_at: Utc::now(),
        };
        projects.push(project.clone());
        Self::write_atomic(&self.projects_path(), &projects)?;
        debug!("created project {} ({})", project.name, project.id);
        Ok(project)
    }

    async fn list_projects(&self) -> Result<Vec<Project>, PersistenceError> {
        Self::read_or_default(&self.projects_path())
    }

    #[instrument(skip_all, fields(name = %sub_project.name))]
    async fn insert(&self, sub_project: &SavedSubProject) -> Result<(), PersistenceError> {
        let projects: Vec<Project> = Self::read_or_default(&self.projects_path())?;
        if !projects.iter().any(|p| p.id == sub_project.parent_project_id) {
            return Err(PersistenceError::ProjectNotFound(
                sub_project.parent_project_id.clone(),
            ));
        }

        let path = self.sub_projects_path(&sub_project.parent_project_id);
        let mut existing: Vec<SavedSubProject> = Self::read_or_default(&path)?;
        existing.push(sub_project.clone());
        Self::write_atomic(&path, &existing)
    }

    async fn list_existing(
        &self,
        parent_project_id: &str,
    ) -> Result<Vec<SavedSubProject>, PersistenceError> {
        Self::read_or_default(&self.sub_projects_path(parent_project_id))
    }
}
