//! keywork: a content-strategy workbench engine.
//!
//! Generates hierarchical keyword taxonomies through an external generation
//! service, maintains a cascading tri-state selection over the three-level
//! tree, merges supplementary terms without duplication, derives read-only
//! filtered views, and persists curated subsets as versioned sub-projects.
//!
//! Layers:
//! - [`domain`] — the taxonomy engine: pure data structures and logic
//! - [`application`] — services orchestrating the engine over collaborators
//! - [`infrastructure`] — collaborator traits and real implementations
//! - [`cli`] — the command-line front end

pub mod application;
pub mod cli;
pub mod config;
pub mod domain;
pub mod infrastructure;
pub mod util;
