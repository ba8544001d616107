//! Preset bundles and merging
//!
//! A preset bundle is a pre-authored group of tasks imported as a unit. Bundle
//! payloads arrive as JSON (fetching them is the caller's business); entries
//! have the playbook task shape `{ "name": ..., "<module>": { params } }`.
//!
//! # Merge rule
//!
//! Bundle order is kept. An `apt` entry is skipped when its package already
//! appears in the current list or earlier in the same merge pass. Every other
//! entry is always included. Skips are silent: bulk import must not abort on a
//! single conflict.
//!
//! # Catalog shape
//!
//! ```json
//! {
//!   "webservers": {
//!     "nginx": { "name": "Nginx", "tasks": [ { "name": "Install nginx", "apt": { "name": "nginx" } } ] }
//!   }
//! }
//! ```
//!
//! Bundles are addressed as `category/key`. A flat `key -> bundle` document is
//! also accepted.

use serde_json::{Map, Value};
use std::collections::BTreeMap;
use std::fs;
use std::path::Path;
use tracing::{debug, warn};

use crate::error::{PlaybookError, Result};
use crate::task::Task;
use crate::task_list::TaskList;
use crate::types::ModuleKind;

// ============================================================================
// Entry parsing
// ============================================================================

/// Parse one task entry.
///
/// Missing params are filled from module defaults. Boolean values map to the
/// `yes`/`no` select values and numbers to their decimal text. Fails with
/// `InvalidPresetEntry` when the module key is missing, ambiguous or unknown,
/// or when a param does not fit the module schema.
pub fn parse_entry(value: &Value) -> Result<Task> {
    let object = value
        .as_object()
        .ok_or_else(|| PlaybookError::invalid_preset(value.to_string(), "entry is not an object"))?;

    let name = match object.get("name") {
        None => String::new(),
        Some(Value::String(s)) => s.clone(),
        Some(other) => {
            return Err(PlaybookError::invalid_preset(
                other.to_string(),
                "task name is not a string",
            ));
        }
    };

    let mut module_keys = object.keys().filter(|k| k.as_str() != "name");
    let module_id = match (module_keys.next(), module_keys.next()) {
        (Some(id), None) => id,
        (None, _) => return Err(PlaybookError::invalid_preset(&name, "missing module key")),
        (Some(_), Some(_)) => {
            return Err(PlaybookError::invalid_preset(&name, "more than one module key"));
        }
    };

    let kind = ModuleKind::parse(module_id)
        .map_err(|e| PlaybookError::invalid_preset(&name, e.to_string()))?;
    let mut task = Task::new(name, kind);

    match &object[module_id] {
        Value::Null => {}
        Value::Object(params) => apply_params(&mut task, params)?,
        _ => {
            return Err(PlaybookError::invalid_preset(
                &task.name,
                format!("{} params are not an object", module_id),
            ));
        }
    }

    Ok(task)
}

fn apply_params(task: &mut Task, params: &Map<String, Value>) -> Result<()> {
    for (field, value) in params {
        let text = scalar_text(value).ok_or_else(|| {
            PlaybookError::invalid_preset(&task.name, format!("{} is not a scalar", field))
        })?;
        task.module
            .set(field, &text)
            .map_err(|e| PlaybookError::invalid_preset(&task.name, e.to_string()))?;
    }
    Ok(())
}

fn scalar_text(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Bool(true) => Some("yes".to_string()),
        Value::Bool(false) => Some("no".to_string()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

// ============================================================================
// Bundles
// ============================================================================

/// A named group of tasks imported as a unit
#[derive(Debug, Default)]
pub struct PresetBundle {
    pub name: String,
    pub tasks: Vec<Task>,
    /// Entries that failed to parse, in bundle order
    pub rejected: Vec<PlaybookError>,
}

impl PresetBundle {
    /// Build a bundle from `{ "name": ..., "tasks": [...] }`.
    ///
    /// Malformed entries are skipped and recorded in `rejected`; only a
    /// payload that is not a bundle at all is an error.
    pub fn from_value(key: &str, value: &Value) -> Result<Self> {
        let object = value
            .as_object()
            .ok_or_else(|| PlaybookError::invalid_preset(key, "bundle is not an object"))?;
        let entries = object
            .get("tasks")
            .and_then(Value::as_array)
            .ok_or_else(|| PlaybookError::invalid_preset(key, "bundle has no task array"))?;
        let name = object
            .get("name")
            .and_then(Value::as_str)
            .unwrap_or(key)
            .to_string();

        let mut bundle = Self {
            name,
            ..Self::default()
        };
        for entry in entries {
            match parse_entry(entry) {
                Ok(task) => bundle.tasks.push(task),
                Err(e) => {
                    warn!("Skipping preset entry in {}: {}", key, e);
                    bundle.rejected.push(e);
                }
            }
        }
        Ok(bundle)
    }
}

/// All bundles available for merging, keyed by `category/key` or `key`
#[derive(Debug, Default)]
pub struct PresetCatalog {
    bundles: BTreeMap<String, PresetBundle>,
}

impl PresetCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a catalog from a category document or a flat bundle map
    pub fn from_value(value: &Value) -> Result<Self> {
        let object = value
            .as_object()
            .ok_or_else(|| PlaybookError::invalid_preset("catalog", "catalog is not an object"))?;

        let mut catalog = Self::new();
        for (key, item) in object {
            if is_bundle(item) {
                match PresetBundle::from_value(key, item) {
                    Ok(bundle) => catalog.insert(key.clone(), bundle),
                    Err(e) => warn!("Ignoring preset {}: {}", key, e),
                }
                continue;
            }
            let Some(category) = item.as_object() else {
                warn!("Ignoring preset catalog entry {}: not an object", key);
                continue;
            };
            for (preset_key, bundle) in category {
                let full_key = format!("{}/{}", key, preset_key);
                match PresetBundle::from_value(&full_key, bundle) {
                    Ok(b) => catalog.insert(full_key, b),
                    Err(e) => warn!("Ignoring preset {}: {}", full_key, e),
                }
            }
        }
        Ok(catalog)
    }

    /// Load a catalog JSON document from disk
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = fs::read_to_string(&path)?;
        let value: Value = serde_json::from_str(&content)?;
        let catalog = Self::from_value(&value)?;
        debug!(
            "Loaded {} preset bundle(s) from {:?}",
            catalog.len(),
            path.as_ref()
        );
        Ok(catalog)
    }

    /// Register (or replace) a bundle under `key`
    pub fn insert(&mut self, key: impl Into<String>, bundle: PresetBundle) {
        self.bundles.insert(key.into(), bundle);
    }

    /// Bundle by exact key, or by bare key when exactly one category has it
    pub fn get(&self, key: &str) -> Option<&PresetBundle> {
        if let Some(bundle) = self.bundles.get(key) {
            return Some(bundle);
        }
        let suffix = format!("/{}", key);
        let mut matches = self.bundles.iter().filter(|(k, _)| k.ends_with(&suffix));
        match (matches.next(), matches.next()) {
            (Some((_, bundle)), None) => Some(bundle),
            _ => None,
        }
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.bundles.keys().map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &PresetBundle)> {
        self.bundles.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub fn len(&self) -> usize {
        self.bundles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bundles.is_empty()
    }
}

fn is_bundle(value: &Value) -> bool {
    value.get("tasks").is_some_and(Value::is_array)
}

// ============================================================================
// Merge
// ============================================================================

/// Tasks from `bundle` to append to `current`, with duplicate apt installs
/// removed. Apt entries with an empty package name are never deduplicated.
pub fn merge(bundle: &[Task], current: &TaskList) -> Vec<Task> {
    let mut added: Vec<&str> = Vec::new();
    let mut merged = Vec::with_capacity(bundle.len());

    for task in bundle {
        match task.apt_package() {
            Some(package) if !package.is_empty() => {
                if added.contains(&package) || current.has_apt_package(package, None) {
                    debug!("Preset merge skipping duplicate package {}", package);
                    continue;
                }
                added.push(package);
                merged.push(task.clone());
            }
            _ => merged.push(task.clone()),
        }
    }

    merged
}

// ============================================================================
// Tests
// ============================================================================
