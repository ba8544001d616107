//! Playbook Builder Library
//!
//! This library provides the task model and synthesis engine behind the
//! playbook builder: module schemas, dependency expansion, preset merging and
//! deterministic YAML rendering.

pub mod catalog;
pub mod cli;
pub mod config_file;
pub mod error;
pub mod logic;
pub mod playbook;
pub mod schema;
pub mod session;
pub mod task;
pub mod task_list;
pub mod types;

// Re-export main types for convenience
pub use catalog::{DependencyEntry, PresetCategory, DEPENDENCY_CATALOG, PRESET_CATEGORIES};
pub use config_file::BuildConfig;
pub use error::{PlaybookError, Result};
pub use playbook::{render, synthesize, Play, PlaybookDocument, PlaybookSettings, PlaybookSpec};
pub use schema::{default_params_for, fields_for, ModuleField, ModuleSchema};
pub use session::Session;
pub use task::{ModuleParams, Task};
pub use task_list::TaskList;
pub use types::{FieldKind, ModuleKind};

// Expansion and preset engines
pub use logic::expansion::expand;
pub use logic::presets::{merge, parse_entry, PresetBundle, PresetCatalog};
