//! Ordered task list.
//!
//! Insertion order is execution order in the emitted playbook. The list also
//! owns the apt uniqueness check: no two `apt` tasks may name the same
//! package. The check runs when tasks are added or edited, not as a standing
//! background sweep.

use serde::Serialize;
use tracing::debug;

use crate::error::{PlaybookError, Result};
use crate::task::Task;

/// Ordered sequence of tasks
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct TaskList {
    tasks: Vec<Task>,
}

impl TaskList {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.tasks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tasks.is_empty()
    }

    pub fn tasks(&self) -> &[Task] {
        &self.tasks
    }

    pub fn get(&self, index: usize) -> Option<&Task> {
        self.tasks.get(index)
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Task> {
        self.tasks.iter()
    }

    /// Package names of all `apt` tasks, in list order
    pub fn apt_packages(&self) -> impl Iterator<Item = &str> {
        self.tasks.iter().filter_map(Task::apt_package)
    }

    /// Whether an `apt` task installs `package`, ignoring the task at `skip`
    pub fn has_apt_package(&self, package: &str, skip: Option<usize>) -> bool {
        self.tasks
            .iter()
            .enumerate()
            .any(|(i, t)| Some(i) != skip && t.apt_package() == Some(package))
    }

    /// Insert `task` at `position` (clamped to the end) without any checks
    pub fn insert(&mut self, position: usize, task: Task) {
        let position = position.min(self.tasks.len());
        debug!("Inserting task '{}' at {}", task.name, position);
        self.tasks.insert(position, task);
    }

    /// Insert several tasks starting at `position`, preserving their order
    pub fn insert_all(&mut self, position: usize, tasks: Vec<Task>) {
        let position = position.min(self.tasks.len());
        for (offset, task) in tasks.into_iter().enumerate() {
            self.tasks.insert(position + offset, task);
        }
    }

    /// Append `task`, failing with `DuplicatePackage` if it would install
    /// an apt package already in the list. Empty package names never clash.
    pub fn add(&mut self, task: Task) -> Result<()> {
        self.check_unique(&task, None)?;
        let position = self.tasks.len();
        self.insert(position, task);
        Ok(())
    }

    /// Append tasks that were already deduplicated by a merge pass
    pub fn extend(&mut self, tasks: Vec<Task>) {
        self.tasks.extend(tasks);
    }

    /// Remove and return the task at `index`
    pub fn remove_at(&mut self, index: usize) -> Result<Task> {
        if index >= self.tasks.len() {
            return Err(PlaybookError::IndexOutOfRange {
                index,
                len: self.tasks.len(),
            });
        }
        let removed = self.tasks.remove(index);
        debug!("Removed task '{}' from {}", removed.name, index);
        Ok(removed)
    }

    /// Replace the task at `index`, enforcing apt uniqueness against the
    /// rest of the list. The list is unchanged on error.
    pub fn replace(&mut self, index: usize, task: Task) -> Result<Task> {
        let len = self.tasks.len();
        if index >= len {
            return Err(PlaybookError::IndexOutOfRange { index, len });
        }
        self.check_unique(&task, Some(index))?;
        Ok(std::mem::replace(&mut self.tasks[index], task))
    }

    fn check_unique(&self, task: &Task, skip: Option<usize>) -> Result<()> {
        match task.apt_package() {
            Some(package) if !package.is_empty() && self.has_apt_package(package, skip) => {
                Err(PlaybookError::duplicate_package(package))
            }
            _ => Ok(()),
        }
    }
}

impl<'a> IntoIterator for &'a TaskList {
    type Item = &'a Task;
    type IntoIter = std::slice::Iter<'a, Task>;

    fn into_iter(self) -> Self::IntoIter {
        self.tasks.iter()
    }
}

impl From<Vec<Task>> for TaskList {
    fn from(tasks: Vec<Task>) -> Self {
        Self { tasks }
    }
}
