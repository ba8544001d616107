//! Build file handling for headless playbook generation.
//!
//! A build file describes the playbook settings, the presets to merge and the
//! tasks to add. It is input only; the session is never written back.
//!
//! ```json
//! {
//!   "name": "my-playbook",
//!   "hosts": "all",
//!   "become": true,
//!   "presets": ["webservers/nginx"],
//!   "expand_dependencies": true,
//!   "tasks": [ { "name": "docker", "apt": { "name": "docker-ce" } } ]
//! }
//! ```

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fs;
use std::path::Path;
use tracing::{debug, info};

use crate::logic::presets::{parse_entry, PresetCatalog};
use crate::playbook::PlaybookSettings;
use crate::session::Session;

/// Build file contents
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct BuildConfig {
    #[serde(flatten)]
    pub settings: PlaybookSettings,

    /// Preset keys (`category/key` or `key`) merged before `tasks`
    #[serde(default)]
    pub presets: Vec<String>,

    /// Insert catalog prerequisites for apt tasks in `tasks`
    #[serde(default)]
    pub expand_dependencies: bool,

    /// Task entries in playbook shape
    #[serde(default)]
    pub tasks: Vec<Value>,
}

impl BuildConfig {
    /// Load a build file from JSON
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = fs::read_to_string(&path)
            .with_context(|| format!("Failed to read build file {:?}", path.as_ref()))?;

        let config: Self =
            serde_json::from_str(&content).context("Failed to parse build file JSON")?;

        Ok(config)
    }

    /// Validate settings and every task entry
    pub fn validate(&self) -> Result<()> {
        if self.settings.name.trim().is_empty() {
            anyhow::bail!("Playbook name must be specified");
        }
        if self.settings.hosts.trim().is_empty() {
            anyhow::bail!("Hosts pattern must be specified");
        }
        for (i, entry) in self.tasks.iter().enumerate() {
            parse_entry(entry).with_context(|| format!("Task entry {} is invalid", i + 1))?;
        }
        Ok(())
    }

    /// Build a session: presets first, then tasks in file order.
    ///
    /// Direct task adds fail on duplicate apt packages; preset merges skip them.
    pub fn build_session(&self, catalog: Option<&PresetCatalog>) -> Result<Session> {
        self.validate()?;
        let mut session = Session::with_settings(self.settings.clone());

        if !self.presets.is_empty() {
            let catalog = catalog.context("Build file names presets but no preset catalog was given")?;
            for key in &self.presets {
                let bundle = catalog
                    .get(key)
                    .with_context(|| format!("Unknown preset {}", key))?;
                session.apply_preset(bundle);
            }
        }

        for (i, entry) in self.tasks.iter().enumerate() {
            let task = parse_entry(entry).with_context(|| format!("Task entry {} is invalid", i + 1))?;
            debug!("Adding build file task {}: {}", i + 1, task.name);
            let added = if self.expand_dependencies {
                session.add_task_with_dependencies(task).map(|_| ())
            } else {
                session.add_task(task)
            };
            added.with_context(|| format!("Cannot add task entry {}", i + 1))?;
        }

        info!(
            "Built playbook '{}' with {} task(s)",
            session.spec().name,
            session.tasks().len()
        );
        Ok(session)
    }
}
