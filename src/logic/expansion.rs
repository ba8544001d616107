//! Dependency expansion
//!
//! Translates "the user is adding package X" into the prerequisite tasks X
//! needs: signing keys, then APT sources, then companion packages.
//!
//! # Design
//!
//! - **Pure logic**: No prompting, no mutation. Whether to expand is decided by
//!   the caller before calling `expand`.
//! - **Fixed order**: keys, repositories, packages. Trust must exist before a
//!   source is registered, and a source before anything is installed from it.
//! - **Apt dedup only**: companion packages already in the list are skipped.
//!   Keys and repositories are emitted every time; repeated triggering of the
//!   same package duplicates them.

use tracing::debug;

use crate::catalog::{self, DependencyEntry};
use crate::task::{ModuleParams, Task};
use crate::task_list::TaskList;
use crate::types::ModuleKind;

// ============================================================================
// Expansion
// ============================================================================

/// Tasks to insert ahead of the task that installs `package`.
///
/// Returns an empty list when the package has no catalog entry.
pub fn expand(package: &str, current: &TaskList) -> Vec<Task> {
    let Some(entry) = catalog::lookup(package) else {
        return Vec::new();
    };

    let mut tasks = Vec::new();
    tasks.extend(key_tasks(entry));
    tasks.extend(repository_tasks(entry));

    let mut queued: Vec<&str> = Vec::new();
    for &pkg in entry.packages {
        if current.has_apt_package(pkg, None) || queued.contains(&pkg) {
            debug!("Skipping dependency {} of {}: already present", pkg, package);
            continue;
        }
        queued.push(pkg);
        tasks.push(companion_task(pkg));
    }

    debug!("Expanded {} into {} task(s)", package, tasks.len());
    tasks
}

// ============================================================================
// Helpers
// ============================================================================

fn key_tasks(entry: &DependencyEntry) -> impl Iterator<Item = Task> + '_ {
    entry.keys.iter().map(|url| {
        let mut task = Task::new(
            format!("Add GPG key for {}", entry.package_name),
            ModuleKind::AptKey,
        );
        if let ModuleParams::AptKey(params) = &mut task.module {
            params.url = (*url).to_string();
            params.state = "present".to_string();
        }
        task
    })
}

fn repository_tasks(entry: &DependencyEntry) -> impl Iterator<Item = Task> + '_ {
    entry.repositories.iter().map(|repo| {
        let mut task = Task::new(
            format!("Add repository for {}", entry.package_name),
            ModuleKind::AptRepository,
        );
        if let ModuleParams::AptRepository(params) = &mut task.module {
            params.repo = (*repo).to_string();
            params.state = "present".to_string();
            params.filename = entry.source_filename().to_string();
        }
        task
    })
}

fn companion_task(package: &str) -> Task {
    let mut task = Task::new(format!("Install dependency {}", package), ModuleKind::Apt);
    if let ModuleParams::Apt(params) = &mut task.module {
        params.name = package.to_string();
        params.state = "present".to_string();
        params.update_cache = "yes".to_string();
    }
    task
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn apt(package: &str) -> Task {
        Task::new(package, ModuleKind::Apt)
            .with_param("name", package)
            .unwrap()
    }

    #[test]
    fn test_expand_unknown_package_is_empty() {
        assert!(expand("htop", &TaskList::new()).is_empty());
    }

    #[test]
    fn test_expand_docker_order() {
        let tasks = expand("docker-ce", &TaskList::new());
        let kinds: Vec<ModuleKind> = tasks.iter().map(Task::kind).collect();
        assert_eq!(
            kinds,
            vec![
                ModuleKind::AptKey,
                ModuleKind::AptRepository,
                ModuleKind::Apt,
                ModuleKind::Apt,
                ModuleKind::Apt,
            ]
        );
    }

    #[test]
    fn test_expand_names_and_params() {
        let tasks = expand("docker-ce", &TaskList::new());

        assert_eq!(tasks[0].name, "Add GPG key for docker-ce");
        assert_eq!(
            tasks[0].module.get("url"),
            Some("https://download.docker.com/linux/ubuntu/gpg")
        );
        assert_eq!(tasks[0].module.get("state"), Some("present"));

        assert_eq!(tasks[1].name, "Add repository for docker-ce");
        assert_eq!(tasks[1].module.get("filename"), Some("docker"));

        assert_eq!(tasks[2].name, "Install dependency docker-ce");
        assert_eq!(tasks[2].module.get("update_cache"), Some("yes"));
    }

    #[test]
    fn test_expand_skips_present_companions() {
        let current = TaskList::from(vec![apt("containerd.io")]);
        let tasks = expand("docker-ce", &current);
        let packages: Vec<&str> = tasks.iter().filter_map(Task::apt_package).collect();
        assert_eq!(packages, vec!["docker-ce", "docker-ce-cli"]);
    }

    #[test]
    fn test_expand_without_companions() {
        let tasks = expand("nginx", &TaskList::new());
        assert_eq!(tasks.len(), 2);
        assert_eq!(tasks[1].module.get("filename"), Some("nginx"));
    }

    #[test]
    fn test_expand_repeats_keys_and_repositories() {
        let first = expand("nginx", &TaskList::new());
        let current = TaskList::from(first.clone());
        let second = expand("nginx", &current);
        assert_eq!(first, second);
    }
}
