//! Domain layer: entities and business logic
//!
//! This layer is independent of external concerns (no I/O, no CLI, no config
//! loading). The taxonomy engine lives here: tree building, cascading
//! selection, augmentation merge, filtered views, pruning, and version
//! naming.

pub mod builder;
pub mod entities;
pub mod error;
pub mod filter;
pub mod merge;
pub mod node_id;
pub mod prune;
pub mod selection;
pub mod version;

pub use builder::build_taxonomy;
pub use entities::{
    AugmentContext, Category, Level1Node, Level2Node, LsiTerm, Project, RawHierarchy, RawLevel1,
    RawLevel2, SavedSubProject, Stage, Taxonomy, TranslationOverlay,
};
pub use error::{DomainError, DomainResult};
pub use filter::{apply_filter, normalize_page_kind, FilterCriteria};
pub use merge::merge_terms;
pub use node_id::NodeId;
pub use prune::{prune, restrict_translations};
pub use selection::{EffectiveState, SelectionSet};
pub use version::{base_name, resolve_name};
