//! Service container for dependency injection
//!
//! Wires up the application services with their collaborators.

use std::sync::Arc;

use crate::application::services::SaveService;
use crate::config::Settings;
use crate::infrastructure::http_generation::HttpGenerationClient;
use crate::infrastructure::json_store::JsonStore;
use crate::infrastructure::traits::{GenerationError, GenerationService, PersistenceService};

/// Container holding the collaborators and services the CLI needs.
pub struct ServiceContainer {
    /// Application settings
    pub settings: Arc<Settings>,

    /// External generation collaborator
    pub generation: Arc<dyn GenerationService>,

    /// External persistence collaborator
    pub persistence: Arc<dyn PersistenceService>,

    /// Save orchestration over the persistence collaborator
    pub save_service: SaveService,
}

impl ServiceContainer {
    /// Create a container with the real HTTP client and JSON store.
    pub fn new(settings: Settings) -> Result<Self, GenerationError> {
        let generation = Arc::new(HttpGenerationClient::new(&settings)?);
        let persistence = Arc::new(JsonStore::new(settings.data_dir.clone()));
        Ok(Self::with_deps(settings, generation, persistence))
    }

    /// Create a container with custom collaborators (for testing).
    pub fn with_deps(
        settings: Settings,
        generation: Arc<dyn GenerationService>,
        persistence: Arc<dyn PersistenceService>,
    ) -> Self {
        let settings = Arc::new(settings);
        let save_service = SaveService::new(persistence.clone());

        Self {
            settings,
            generation,
            persistence,
            save_service,
        }
    }
}
