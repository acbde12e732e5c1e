//! Test support: tracing setup, scripted collaborator mocks, and fixtures.

use std::collections::{BTreeMap, HashMap, VecDeque};
use std::env;
use std::sync::{Mutex, Once};

use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::Semaphore;
use tracing::{debug, info};
use tracing_subscriber::{filter::filter_fn, fmt, prelude::*, EnvFilter};
use uuid::Uuid;

use crate::domain::{
    build_taxonomy, AugmentContext, Project, RawHierarchy, RawLevel1, RawLevel2, SavedSubProject,
    Taxonomy,
};
use crate::infrastructure::traits::{
    GenerationError, GenerationService, PersistenceError, PersistenceService,
};

static TEST_SETUP: Once = Once::new();

pub fn init_test_setup() {
    TEST_SETUP.call_once(|| {
        if env::var("RUST_LOG").is_err() {
            env::set_var("RUST_LOG", "debug");
        }
        // global logging subscriber, used by all tracing log macros
        setup_test_logging();
        info!("Test Setup complete");
    });
}

fn setup_test_logging() {
    debug!("INIT: Attempting logger init from testing.rs");

    let noisy_modules = ["hyper", "reqwest"];
    let module_filter = filter_fn(move |metadata| {
        !noisy_modules
            .iter()
            .any(|name| metadata.target().starts_with(name))
    });

    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("debug"));

    let subscriber = tracing_subscriber::registry().with(
        fmt::layer()
            .with_writer(std::io::stderr)
            .with_target(true)
            .with_filter(module_filter)
            .with_filter(env_filter),
    );

    if tracing::dispatcher::has_been_set() {
        debug!("Tracing subscriber already set");
    } else {
        subscriber.try_init().unwrap_or_else(|e| {
            eprintln!("Error: Failed to set up logging: {}", e);
        });
    }
}

type Scripted<T> = Mutex<VecDeque<Result<T, GenerationError>>>;

fn pop<T>(queue: &Scripted<T>, what: &str) -> Result<T, GenerationError> {
    queue
        .lock()
        .expect("scripted queue poisoned")
        .pop_front()
        .unwrap_or_else(|| Err(GenerationError::Network(format!("no scripted {} response", what))))
}

/// Generation mock producing pre-scripted responses in FIFO order.
#[derive(Default)]
pub struct ScriptedGeneration {
    hierarchies: Scripted<RawHierarchy>,
    terms: Scripted<Vec<String>>,
    translations: Scripted<BTreeMap<String, String>>,
}

impl ScriptedGeneration {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn hierarchy_ok(self, raw: RawHierarchy) -> Self {
        self.hierarchies.lock().unwrap().push_back(Ok(raw));
        self
    }

    pub fn hierarchy_err(self, err: GenerationError) -> Self {
        self.hierarchies.lock().unwrap().push_back(Err(err));
        self
    }

    pub fn terms_ok(self, terms: Vec<&str>) -> Self {
        self.terms
            .lock()
            .unwrap()
            .push_back(Ok(terms.into_iter().map(String::from).collect()));
        self
    }

    pub fn terms_err(self, err: GenerationError) -> Self {
        self.terms.lock().unwrap().push_back(Err(err));
        self
    }

    pub fn translations_ok(self, pairs: &[(&str, &str)]) -> Self {
        let map = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        self.translations.lock().unwrap().push_back(Ok(map));
        self
    }
}

#[async_trait]
impl GenerationService for ScriptedGeneration {
    async fn generate_hierarchy(
        &self,
        _seed_keywords: &[String],
        _instructions: &str,
    ) -> Result<RawHierarchy, GenerationError> {
        pop(&self.hierarchies, "hierarchy")
    }

    async fn generate_terms(
        &self,
        _context: &AugmentContext,
    ) -> Result<Vec<String>, GenerationError> {
        pop(&self.terms, "terms")
    }

    async fn translate_many(
        &self,
        _texts: &[String],
        _target_language: &str,
    ) -> Result<BTreeMap<String, String>, GenerationError> {
        pop(&self.translations, "translation")
    }
}

/// Generation mock whose `generate_terms` blocks until the test releases it,
/// for exercising in-flight behavior.
pub struct GatedGeneration {
    scripted: ScriptedGeneration,
    gate: Semaphore,
}

impl GatedGeneration {
    pub fn new(scripted: ScriptedGeneration) -> Self {
        Self {
            scripted,
            gate: Semaphore::new(0),
        }
    }

    /// Let one pending `generate_terms` call proceed.
    pub fn release(&self) {
        self.gate.add_permits(1);
    }
}

#[async_trait]
impl GenerationService for GatedGeneration {
    async fn generate_hierarchy(
        &self,
        seed_keywords: &[String],
        instructions: &str,
    ) -> Result<RawHierarchy, GenerationError> {
        self.scripted
            .generate_hierarchy(seed_keywords, instructions)
            .await
    }

    async fn generate_terms(
        &self,
        context: &AugmentContext,
    ) -> Result<Vec<String>, GenerationError> {
        let permit = self
            .gate
            .acquire()
            .await
            .map_err(|_| GenerationError::Network("gate closed".into()))?;
        permit.forget();
        self.scripted.generate_terms(context).await
    }

    async fn translate_many(
        &self,
        texts: &[String],
        target_language: &str,
    ) -> Result<BTreeMap<String, String>, GenerationError> {
        self.scripted.translate_many(texts, target_language).await
    }
}

/// In-memory persistence mock.
#[derive(Default)]
pub struct MemoryStore {
    state: Mutex<MemoryStoreState>,
}

#[derive(Default)]
struct MemoryStoreState {
    projects: Vec<Project>,
    sub_projects: HashMap<String, Vec<SavedSubProject>>,
    fail_next_insert: Option<String>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed a project and return its id.
    pub fn seed_project(&self, name: &str) -> String {
        let project = Project {
            id: Uuid::new_v4().to_string(),
            name: name.to_string(),
            created_at: Utc::now(),
        };
        let id = project.id.clone();
        self.state.lock().unwrap().projects.push(project);
        id
    }

    /// Make the next insert fail with the given backend message.
    pub fn fail_next_insert(&self, message: &str) {
        self.state.lock().unwrap().fail_next_insert = Some(message.to_string());
    }
}

#[async_trait]
impl PersistenceService for MemoryStore {
    async fn create_project(&self, name: &str) -> Result<Project, PersistenceError> {
        let project = Project {
            id: Uuid::new_v4().to_string(),
            name: name.to_string(),
            created_at: Utc::now(),
        };
        self.state.lock().unwrap().projects.push(project.clone());
        Ok(project)
    }

    async fn list_projects(&self) -> Result<Vec<Project>, PersistenceError> {
        Ok(self.state.lock().unwrap().projects.clone())
    }

    async fn insert(&self, sub_project: &SavedSubProject) -> Result<(), PersistenceError> {
        let mut state = self.state.lock().unwrap();
        if let Some(message) = state.fail_next_insert.take() {
            return Err(PersistenceError::Backend(message));
        }
        if !state
            .projects
            .iter()
            .any(|p| p.id == sub_project.parent_project_id)
        {
            return Err(PersistenceError::ProjectNotFound(
                sub_project.parent_project_id.clone(),
            ));
        }
        state
            .sub_projects
            .entry(sub_project.parent_project_id.clone())
            .or_default()
            .push(sub_project.clone());
        Ok(())
    }

    async fn list_existing(
        &self,
        parent_project_id: &str,
    ) -> Result<Vec<SavedSubProject>, PersistenceError> {
        Ok(self
            .state
            .lock()
            .unwrap()
            .sub_projects
            .get(parent_project_id)
            .cloned()
            .unwrap_or_default())
    }
}

/// Two-group raw hierarchy covering every category/stage combination the
/// tests exercise.
pub fn sample_raw_hierarchy() -> RawHierarchy {
    RawHierarchy {
        entries: vec![
            RawLevel1 {
                keyword: "organic bedding".into(),
                category: "Traffic".into(),
                page_kind: "Blog Article".into(),
                children: vec![
                    RawLevel2 {
                        keyword: "what is organic bedding".into(),
                        stage: "Awareness".into(),
                        terms: vec![
                            "gots certification".into(),
                            "organic cotton vs regular".into(),
                            "chemical free sheets".into(),
                        ],
                    },
                    RawLevel2 {
                        keyword: "best organic sheets".into(),
                        stage: "Decision".into(),
                        terms: vec!["organic sheet reviews".into(), "thread count guide".into()],
                    },
                ],
            },
            RawLevel1 {
                keyword: "buy duvet covers".into(),
                category: "Conversion".into(),
                page_kind: "Product Page".into(),
                children: vec![RawLevel2 {
                    keyword: "duvet cover sale".into(),
                    stage: "Action".into(),
                    terms: vec!["linen duvet cover".into()],
                }],
            },
        ],
    }
}

/// Taxonomy built from [`sample_raw_hierarchy`].
pub fn sample_taxonomy() -> Taxonomy {
    build_taxonomy(
        sample_raw_hierarchy(),
        vec!["bedding".into()],
        "focus on organic cotton".into(),
        "test-model".into(),
    )
    .expect("sample hierarchy builds")
}
