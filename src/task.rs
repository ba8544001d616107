//! Task model.
//!
//! A task is a name bound to exactly one module invocation. The invocation is
//! a tagged union, so "which module is this" is answered by `match`, and each
//! variant carries exactly the fields its schema declares.
//!
//! All operations are copy-on-write: they take `&self` and hand back a new
//! `Task`, leaving the original untouched for readers such as a live preview.

use serde::Serialize;

use crate::error::{PlaybookError, Result};
use crate::schema;
use crate::types::ModuleKind;

/// Parameters of an `apt` invocation
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct AptParams {
    pub name: String,
    pub state: String,
    pub update_cache: String,
}

/// Parameters of an `apt_repository` invocation
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct AptRepositoryParams {
    pub repo: String,
    pub state: String,
    pub filename: String,
}

/// Parameters of an `apt_key` invocation
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct AptKeyParams {
    pub url: String,
    pub state: String,
}

/// Parameters of a `service` invocation
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ServiceParams {
    pub name: String,
    pub state: String,
    pub enabled: String,
}

/// Parameters of a `command` invocation
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct CommandParams {
    pub cmd: String,
}

/// Parameters of a `file` invocation
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct FileParams {
    pub path: String,
    pub state: String,
    pub mode: String,
    pub owner: String,
    pub group: String,
}

/// One module invocation.
///
/// Serializes as a single-key map `{ <module>: { <params> } }`. Struct field
/// order matches schema field order, which keeps output deterministic.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ModuleParams {
    Apt(AptParams),
    AptRepository(AptRepositoryParams),
    AptKey(AptKeyParams),
    Service(ServiceParams),
    Command(CommandParams),
    File(FileParams),
}

impl ModuleParams {
    /// Canonical default parameters for `kind`
    pub fn defaults(kind: ModuleKind) -> Self {
        let mut params = match kind {
            ModuleKind::Apt => Self::Apt(AptParams::default()),
            ModuleKind::AptRepository => Self::AptRepository(AptRepositoryParams::default()),
            ModuleKind::AptKey => Self::AptKey(AptKeyParams::default()),
            ModuleKind::Service => Self::Service(ServiceParams::default()),
            ModuleKind::Command => Self::Command(CommandParams::default()),
            ModuleKind::File => Self::File(FileParams::default()),
        };
        for (field, value) in kind.schema().defaults {
            if let Some(slot) = params.slot_mut(field) {
                *slot = (*value).to_string();
            }
        }
        params
    }

    /// Module identifier of this invocation
    pub fn kind(&self) -> ModuleKind {
        match self {
            Self::Apt(_) => ModuleKind::Apt,
            Self::AptRepository(_) => ModuleKind::AptRepository,
            Self::AptKey(_) => ModuleKind::AptKey,
            Self::Service(_) => ModuleKind::Service,
            Self::Command(_) => ModuleKind::Command,
            Self::File(_) => ModuleKind::File,
        }
    }

    /// All `(field, value)` pairs in schema order
    pub fn entries(&self) -> Vec<(&'static str, &str)> {
        match self {
            Self::Apt(p) => vec![
                ("name", p.name.as_str()),
                ("state", p.state.as_str()),
                ("update_cache", p.update_cache.as_str()),
            ],
            Self::AptRepository(p) => vec![
                ("repo", p.repo.as_str()),
                ("state", p.state.as_str()),
                ("filename", p.filename.as_str()),
            ],
            Self::AptKey(p) => vec![("url", p.url.as_str()), ("state", p.state.as_str())],
            Self::Service(p) => vec![
                ("name", p.name.as_str()),
                ("state", p.state.as_str()),
                ("enabled", p.enabled.as_str()),
            ],
            Self::Command(p) => vec![("cmd", p.cmd.as_str())],
            Self::File(p) => vec![
                ("path", p.path.as_str()),
                ("state", p.state.as_str()),
                ("mode", p.mode.as_str()),
                ("owner", p.owner.as_str()),
                ("group", p.group.as_str()),
            ],
        }
    }

    /// Current value of `field`, if declared for this module
    pub fn get(&self, field: &str) -> Option<&str> {
        self.entries()
            .into_iter()
            .find(|(name, _)| *name == field)
            .map(|(_, value)| value)
    }

    /// Validate and store one field value
    pub fn set(&mut self, field: &str, value: &str) -> Result<()> {
        let definition = schema::field_of(self.kind(), field)?;
        if !definition.accepts(value) {
            return Err(PlaybookError::InvalidValue {
                field: field.to_string(),
                value: value.to_string(),
                allowed: definition.allowed_values.join(", "),
            });
        }
        let kind = self.kind();
        let slot = self
            .slot_mut(field)
            .ok_or_else(|| PlaybookError::unknown_field(kind.as_str(), field))?;
        *slot = value.to_string();
        Ok(())
    }

    fn slot_mut(&mut self, field: &str) -> Option<&mut String> {
        match (self, field) {
            (Self::Apt(p), "name") => Some(&mut p.name),
            (Self::Apt(p), "state") => Some(&mut p.state),
            (Self::Apt(p), "update_cache") => Some(&mut p.update_cache),
            (Self::AptRepository(p), "repo") => Some(&mut p.repo),
            (Self::AptRepository(p), "state") => Some(&mut p.state),
            (Self::AptRepository(p), "filename") => Some(&mut p.filename),
            (Self::AptKey(p), "url") => Some(&mut p.url),
            (Self::AptKey(p), "state") => Some(&mut p.state),
            (Self::Service(p), "name") => Some(&mut p.name),
            (Self::Service(p), "state") => Some(&mut p.state),
            (Self::Service(p), "enabled") => Some(&mut p.enabled),
            (Self::Command(p), "cmd") => Some(&mut p.cmd),
            (Self::File(p), "path") => Some(&mut p.path),
            (Self::File(p), "state") => Some(&mut p.state),
            (Self::File(p), "mode") => Some(&mut p.mode),
            (Self::File(p), "owner") => Some(&mut p.owner),
            (Self::File(p), "group") => Some(&mut p.group),
            _ => None,
        }
    }
}

/// A named unit of work bound to exactly one module invocation
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Task {
    pub name: String,
    #[serde(flatten)]
    pub module: ModuleParams,
}

impl Task {
    /// New task whose params are exactly the module defaults
    pub fn new(name: impl Into<String>, kind: ModuleKind) -> Self {
        Self {
            name: name.into(),
            module: ModuleParams::defaults(kind),
        }
    }

    /// Module identifier of this task
    pub fn kind(&self) -> ModuleKind {
        self.module.kind()
    }

    /// Copy with a new name; params untouched
    pub fn renamed(&self, name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            module: self.module.clone(),
        }
    }

    /// Copy with one parameter replaced.
    ///
    /// Fails with `UnknownField` for undeclared fields and `InvalidValue` for
    /// select values outside the allowed set.
    pub fn with_param(&self, field: &str, value: &str) -> Result<Self> {
        let mut updated = self.clone();
        updated.module.set(field, value)?;
        Ok(updated)
    }

    /// Copy bound to `kind`, params reset to its defaults.
    ///
    /// Previous values are discarded even when switching to the same module.
    pub fn with_module(&self, kind: ModuleKind) -> Self {
        Self::new(self.name.clone(), kind)
    }

    /// Package name if this is an `apt` task
    pub fn apt_package(&self) -> Option<&str> {
        match &self.module {
            ModuleParams::Apt(p) => Some(p.name.as_str()),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use strum::IntoEnumIterator;

    fn field_names(task: &Task) -> Vec<&'static str> {
        task.module.entries().into_iter().map(|(k, _)| k).collect()
    }

    fn schema_names(kind: ModuleKind) -> Vec<&'static str> {
        kind.fields().iter().map(|f| f.name).collect()
    }

    #[test]
    fn test_new_task_uses_defaults() {
        for kind in ModuleKind::iter() {
            let task = Task::new("t", kind);
            assert_eq!(task.kind(), kind);
            assert_eq!(field_names(&task), schema_names(kind));
            for (field, default) in kind.schema().defaults {
                assert_eq!(task.module.get(field), Some(*default));
            }
        }
    }

    #[test]
    fn test_renamed_keeps_params() {
        let task = Task::new("old", ModuleKind::Apt)
            .with_param("name", "nginx")
            .unwrap();
        let renamed = task.renamed("new");
        assert_eq!(renamed.name, "new");
        assert_eq!(renamed.module, task.module);
        assert_eq!(task.name, "old");
    }

    #[test]
    fn test_with_param_is_copy_on_write() {
        let task = Task::new("t", ModuleKind::Service);
        let updated = task.with_param("state", "stopped").unwrap();
        assert_eq!(updated.module.get("state"), Some("stopped"));
        assert_eq!(task.module.get("state"), Some("started"));
        assert_eq!(updated.module.get("enabled"), Some("yes"));
    }

    #[test]
    fn test_with_param_unknown_field() {
        let task = Task::new("t", ModuleKind::Apt);
        let err = task.with_param("version", "1.0").unwrap_err();
        assert!(matches!(err, PlaybookError::UnknownField { .. }));
    }

    #[test]
    fn test_with_param_invalid_select_value() {
        let task = Task::new("t", ModuleKind::Apt);
        let err = task.with_param("state", "installed").unwrap_err();
        match err {
            PlaybookError::InvalidValue { field, allowed, .. } => {
                assert_eq!(field, "state");
                assert_eq!(allowed, "present, absent, latest");
            }
            other => panic!("Expected InvalidValue, got {other:?}"),
        }
    }

    #[test]
    fn test_text_field_accepts_anything() {
        let task = Task::new("t", ModuleKind::Command)
            .with_param("cmd", "echo 'hi' && true")
            .unwrap();
        assert_eq!(task.module.get("cmd"), Some("echo 'hi' && true"));
    }

    #[test]
    fn test_with_module_resets_params() {
        let task = Task::new("t", ModuleKind::Apt)
            .with_param("name", "nginx")
            .unwrap()
            .with_param("state", "latest")
            .unwrap();
        let changed = task.with_module(ModuleKind::Service);
        assert_eq!(changed.name, "t");
        assert_eq!(changed.module, ModuleParams::defaults(ModuleKind::Service));
        assert_eq!(changed.module.get("name"), Some(""));
    }

    #[test]
    fn test_apt_package() {
        let apt = Task::new("t", ModuleKind::Apt).with_param("name", "git").unwrap();
        assert_eq!(apt.apt_package(), Some("git"));
        let svc = Task::new("t", ModuleKind::Service).with_param("name", "git").unwrap();
        assert_eq!(svc.apt_package(), None);
    }

    #[test]
    fn test_task_serializes_single_module_key() {
        let task = Task::new("install", ModuleKind::AptKey);
        let value = serde_json::to_value(&task).unwrap();
        let object = value.as_object().unwrap();
        assert_eq!(object.len(), 2);
        assert_eq!(object["name"], "install");
        assert_eq!(object["apt_key"]["state"], "present");
    }
}
