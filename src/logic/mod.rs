//! Logic modules: transformations over the task list.
//!
//! Both engines are pure: they read the current list and return the tasks to
//! insert. Applying them is the session's job.
//!
//! # Modules
//!
//! - `expansion`: Prerequisite keys, sources and packages for known packages
//! - `presets`: Preset bundle parsing, catalogs and duplicate-free merging

pub mod expansion;
pub mod presets;
