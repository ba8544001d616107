//! Builder session
//!
//! The `Session` is the single owner of the playbook being assembled. Every
//! mutation goes through it and runs to completion before the next one; there
//! is no global state. Rendering only borrows the spec, so a preview can be
//! produced after every change.
//!
//! # Mutation rules
//!
//! - A rejected mutation leaves the task list unchanged.
//! - Direct adds and edits raise `DuplicatePackage`; preset merges skip silently.
//! - Dependency expansion runs only when the caller asks for it, and its tasks
//!   are inserted directly ahead of the task that triggered it.

use tracing::{debug, info};

use crate::error::{PlaybookError, Result};
use crate::logic::expansion;
use crate::logic::presets::{self, PresetBundle};
use crate::playbook::{self, PlaybookDocument, PlaybookSettings, PlaybookSpec};
use crate::task::Task;
use crate::task_list::TaskList;
use crate::types::ModuleKind;

/// Explicitly owned builder state
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Session {
    spec: PlaybookSpec,
}

impl Session {
    /// New session with default settings and no tasks
    pub fn new() -> Self {
        Self::default()
    }

    /// New session with the given playbook settings
    pub fn with_settings(settings: PlaybookSettings) -> Self {
        Self {
            spec: PlaybookSpec {
                name: settings.name,
                hosts: settings.hosts,
                r#become: settings.r#become,
                tasks: TaskList::new(),
            },
        }
    }

    pub fn spec(&self) -> &PlaybookSpec {
        &self.spec
    }

    pub fn tasks(&self) -> &TaskList {
        &self.spec.tasks
    }

    // ------------------------------------------------------------------------
    // Playbook settings
    // ------------------------------------------------------------------------

    pub fn set_name(&mut self, name: impl Into<String>) {
        self.spec.name = name.into();
    }

    pub fn set_hosts(&mut self, hosts: impl Into<String>) {
        self.spec.hosts = hosts.into();
    }

    pub fn set_become(&mut self, r#become: bool) {
        self.spec.r#become = r#become;
    }

    // ------------------------------------------------------------------------
    // Task list mutations
    // ------------------------------------------------------------------------

    /// Append a blank apt task named `task-<n>`; returns its index
    pub fn add_default_task(&mut self) -> usize {
        let index = self.spec.tasks.len();
        let task = Task::new(format!("task-{}", index + 1), ModuleKind::Apt);
        self.spec.tasks.insert(index, task);
        index
    }

    /// Append `task`, failing with `DuplicatePackage` on a repeated apt install
    pub fn add_task(&mut self, task: Task) -> Result<()> {
        info!("Adding task '{}' ({})", task.name, task.kind());
        self.spec.tasks.add(task)
    }

    /// Append `task` and insert its catalog prerequisites ahead of it.
    ///
    /// Returns the final index of `task`.
    pub fn add_task_with_dependencies(&mut self, task: Task) -> Result<usize> {
        self.add_task(task)?;
        let index = self.spec.tasks.len() - 1;
        Ok(index + self.expand_at(index))
    }

    /// Insert `task` at `position`, with the same duplicate check as `add_task`
    pub fn insert_task(&mut self, position: usize, task: Task) -> Result<()> {
        if let Some(package) = task.apt_package() {
            if !package.is_empty() && self.spec.tasks.has_apt_package(package, None) {
                return Err(PlaybookError::duplicate_package(package));
            }
        }
        self.spec.tasks.insert(position, task);
        Ok(())
    }

    /// Remove the task at `index`
    pub fn remove_task_at(&mut self, index: usize) -> Result<Task> {
        let removed = self.spec.tasks.remove_at(index)?;
        info!("Removed task '{}'", removed.name);
        Ok(removed)
    }

    /// Rename the task at `index`
    pub fn rename_task_at(&mut self, index: usize, name: impl Into<String>) -> Result<()> {
        let renamed = self.task_at(index)?.renamed(name);
        self.spec.tasks.replace(index, renamed)?;
        Ok(())
    }

    /// Switch the task at `index` to another module, resetting its params
    pub fn change_module_at(&mut self, index: usize, kind: ModuleKind) -> Result<()> {
        let changed = self.task_at(index)?.with_module(kind);
        self.spec.tasks.replace(index, changed)?;
        debug!("Task {} switched to {}", index, kind);
        Ok(())
    }

    /// Set one parameter of the task at `index`.
    ///
    /// Setting an apt package name to one already used by another apt task
    /// fails with `DuplicatePackage`. When `expand` is true and the edit sets
    /// an apt package name, the package's prerequisites are inserted ahead of
    /// the task. Returns the task's index after any insertion.
    pub fn set_param_at(
        &mut self,
        index: usize,
        field: &str,
        value: &str,
        expand: bool,
    ) -> Result<usize> {
        let updated = self.task_at(index)?.with_param(field, value)?;
        let triggers_expansion =
            expand && field == "name" && updated.kind() == ModuleKind::Apt && !value.is_empty();
        self.spec.tasks.replace(index, updated)?;

        if triggers_expansion {
            Ok(index + self.expand_at(index))
        } else {
            Ok(index)
        }
    }

    /// Merge a preset bundle into the list; returns the number of tasks added
    pub fn apply_preset(&mut self, bundle: &PresetBundle) -> usize {
        let merged = presets::merge(&bundle.tasks, &self.spec.tasks);
        let added = merged.len();
        self.spec.tasks.extend(merged);
        info!(
            "Applied preset '{}': {} of {} task(s) added",
            bundle.name,
            added,
            bundle.tasks.len()
        );
        added
    }

    // ------------------------------------------------------------------------
    // Output
    // ------------------------------------------------------------------------

    /// Document structure for the current state
    pub fn document(&self) -> PlaybookDocument<'_> {
        playbook::synthesize(&self.spec)
    }

    /// Rendered YAML for the current state
    pub fn render(&self) -> Result<String> {
        playbook::render(&self.spec)
    }

    fn task_at(&self, index: usize) -> Result<&Task> {
        self.spec
            .tasks
            .get(index)
            .ok_or(PlaybookError::IndexOutOfRange {
                index,
                len: self.spec.tasks.len(),
            })
    }

    /// Insert the expansion for the apt task at `index` ahead of it.
    ///
    /// The trigger is already in the list, so a companion equal to the
    /// trigger's own package is skipped. Returns the number of inserted tasks.
    fn expand_at(&mut self, index: usize) -> usize {
        let Some(package) = self
            .spec
            .tasks
            .get(index)
            .and_then(Task::apt_package)
            .map(str::to_string)
        else {
            return 0;
        };
        let dependencies = expansion::expand(&package, &self.spec.tasks);
        let count = dependencies.len();
        if count > 0 {
            info!("Adding {} dependency task(s) for {}", count, package);
            self.spec.tasks.insert_all(index, dependencies);
        }
        count
    }
}
