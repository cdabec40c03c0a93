pub mod catalog;
pub mod config;
pub mod error;
pub mod git;
pub mod manifest;
pub mod project;
pub mod traits;

pub use catalog::{Catalog, ScoredResult, SkillRecord};
pub use config::Config;
pub use error::{CatalogError, ConfigError};
pub use git::GitOps;
pub use manifest::Manifest;
pub use project::{Project, SelectionPlan, StageKind, StatusReport, SyncOutcome};
pub use traits::*;
