//! Application services
//!
//! Concrete service implementations that orchestrate domain logic.
//! Services depend on the I/O boundary traits (GenerationService,
//! PersistenceService) but are themselves concrete structs, not traits.

mod save;
mod workbench;

pub use save::{SaveRequest, SaveService, SaveTarget};
pub use workbench::{Workbench, WorkbenchSnapshot, WorkbenchState};
