//! Property-Based Tests for the playbook engine
//!
//! Uses proptest for invariants that must hold after any sequence of
//! operations:
//! - Task params always match the module schema
//! - No two apt tasks install the same package
//! - Rendering is deterministic
//! - Merging an apt bundle twice equals merging it once

use proptest::prelude::*;
use strum::IntoEnumIterator;

use playbook_builder::{merge, ModuleKind, PlaybookError, Session, Task, TaskList};

// =============================================================================
// Strategies
// =============================================================================

fn module_strategy() -> impl Strategy<Value = ModuleKind> {
    prop::sample::select(ModuleKind::iter().collect::<Vec<_>>())
}

fn package_strategy() -> impl Strategy<Value = String> {
    prop::sample::select(vec![
        "nginx",
        "git",
        "curl",
        "docker-ce",
        "docker-ce-cli",
        "containerd.io",
        "postgresql",
        "nodejs",
    ])
    .prop_map(str::to_string)
}

fn apt(package: &str) -> Task {
    Task::new(package, ModuleKind::Apt)
        .with_param("name", package)
        .unwrap()
}

#[derive(Debug, Clone)]
enum Op {
    AddApt(String, bool),
    AddOther(ModuleKind),
    SetName(usize, String, bool),
    ChangeModule(usize, ModuleKind),
    Remove(usize),
    Preset(Vec<String>),
}

fn op_strategy() -> impl Strategy<Value = Op> {
    prop_oneof![
        (package_strategy(), any::<bool>()).prop_map(|(p, e)| Op::AddApt(p, e)),
        module_strategy().prop_map(Op::AddOther),
        (0usize..12, package_strategy(), any::<bool>()).prop_map(|(i, p, e)| Op::SetName(i, p, e)),
        (0usize..12, module_strategy()).prop_map(|(i, m)| Op::ChangeModule(i, m)),
        (0usize..12).prop_map(Op::Remove),
        prop::collection::vec(package_strategy(), 0..5).prop_map(Op::Preset),
    ]
}

fn apply(session: &mut Session, op: &Op) {
    // Rejected mutations are expected; only the invariants matter here.
    let _ = match op {
        Op::AddApt(p, true) => session.add_task_with_dependencies(apt(p)).map(|_| ()),
        Op::AddApt(p, false) => session.add_task(apt(p)),
        Op::AddOther(kind) => session.add_task(Task::new("other", *kind)),
        Op::SetName(i, p, expand) => session.set_param_at(*i, "name", p, *expand).map(|_| ()),
        Op::ChangeModule(i, kind) => session.change_module_at(*i, *kind),
        Op::Remove(i) => session.remove_task_at(*i).map(|_| ()),
        Op::Preset(packages) => {
            let tasks: Vec<Task> = packages.iter().map(|p| apt(p)).collect();
            let merged = merge(&tasks, session.tasks());
            for task in merged {
                session.add_task(task).expect("merged tasks never clash");
            }
            Ok(())
        }
    };
}

fn assert_invariants(session: &Session) -> Result<(), TestCaseError> {
    for task in session.tasks() {
        let names: Vec<&str> = task.module.entries().into_iter().map(|(k, _)| k).collect();
        let schema: Vec<&str> = task.kind().fields().iter().map(|f| f.name).collect();
        prop_assert_eq!(names, schema);
    }

    let mut packages: Vec<&str> = session
        .tasks()
        .apt_packages()
        .filter(|p| !p.is_empty())
        .collect();
    let total = packages.len();
    packages.sort();
    packages.dedup();
    prop_assert_eq!(packages.len(), total, "duplicate apt package in task list");
    Ok(())
}

// =============================================================================
// Invariant Properties
// =============================================================================

proptest! {
    /// Schema shape and apt uniqueness hold after any operation sequence
    #[test]
    fn invariants_hold_after_operations(ops in prop::collection::vec(op_strategy(), 0..25)) {
        let mut session = Session::new();
        for op in &ops {
            apply(&mut session, op);
            assert_invariants(&session)?;
        }
    }

    /// Rendering the same state twice yields identical text
    #[test]
    fn render_is_deterministic(ops in prop::collection::vec(op_strategy(), 0..15)) {
        let mut session = Session::new();
        for op in &ops {
            apply(&mut session, op);
        }
        prop_assert_eq!(session.render().unwrap(), session.render().unwrap());
    }

    /// Merging an apt bundle a second time adds nothing
    #[test]
    fn merge_is_idempotent(
        existing in prop::collection::vec(package_strategy(), 0..4),
        bundle in prop::collection::vec(package_strategy(), 0..8),
    ) {
        let mut list = TaskList::new();
        for p in &existing {
            let _ = list.add(apt(p));
        }
        let bundle: Vec<Task> = bundle.iter().map(|p| apt(p)).collect();

        let first = merge(&bundle, &list);
        list.extend(first);
        let once = list.clone();

        let second = merge(&bundle, &list);
        prop_assert!(second.is_empty());
        list.extend(second);
        prop_assert_eq!(list, once);
    }

    /// Setting a select field to a value outside its allowed set always fails
    #[test]
    fn invalid_select_values_rejected(kind in module_strategy(), value in "[A-Z]{1,8}") {
        let task = Task::new("t", kind);
        for field in kind.fields().iter().filter(|f| !f.allowed_values.is_empty()) {
            let result = task.with_param(field.name, &value);
            let is_invalid_value = matches!(result, Err(PlaybookError::InvalidValue { .. }));
            prop_assert!(is_invalid_value);
        }
    }

    /// Switching modules always yields exactly the target's defaults
    #[test]
    fn change_module_resets_to_defaults(from in module_strategy(), to in module_strategy()) {
        let task = Task::new("t", from).with_module(to);
        prop_assert_eq!(task, Task::new("t", to));
    }
}
