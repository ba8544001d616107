//! Module schema registry.
//!
//! Static parameter definitions for every supported module. Field order here
//! is the field order of the emitted document, so it must not be shuffled.
//!
//! | Module           | Fields                                   |
//! |------------------|------------------------------------------|
//! | `apt`            | name, state, update_cache                |
//! | `apt_repository` | repo, state, filename                    |
//! | `apt_key`        | url, state                               |
//! | `service`        | name, state, enabled                     |
//! | `command`        | cmd                                      |
//! | `file`           | path, state, mode, owner, group          |

use serde::Serialize;

use crate::error::{PlaybookError, Result};
use crate::types::{FieldKind, ModuleKind};

/// One parameter of a module
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ModuleField {
    pub name: &'static str,
    pub kind: FieldKind,
    /// Allowed values, in display order. Empty for text fields.
    pub allowed_values: &'static [&'static str],
    pub label: &'static str,
}

impl ModuleField {
    const fn text(name: &'static str, label: &'static str) -> Self {
        Self {
            name,
            kind: FieldKind::Text,
            allowed_values: &[],
            label,
        }
    }

    const fn select(
        name: &'static str,
        allowed_values: &'static [&'static str],
        label: &'static str,
    ) -> Self {
        Self {
            name,
            kind: FieldKind::Select,
            allowed_values,
            label,
        }
    }

    /// Whether `value` may be stored in this field
    pub fn accepts(&self, value: &str) -> bool {
        match self.kind {
            FieldKind::Text => true,
            FieldKind::Select => self.allowed_values.contains(&value),
        }
    }
}

/// Field definitions plus canonical defaults for one module
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ModuleSchema {
    pub module: ModuleKind,
    pub fields: &'static [ModuleField],
    /// Field name to default value, in field order
    pub defaults: &'static [(&'static str, &'static str)],
}

impl ModuleSchema {
    /// Look up a declared field by name
    pub fn field(&self, name: &str) -> Option<&'static ModuleField> {
        self.fields.iter().find(|f| f.name == name)
    }
}

const YES_NO: &[&str] = &["yes", "no"];
const PRESENT_ABSENT: &[&str] = &["present", "absent"];

static APT: ModuleSchema = ModuleSchema {
    module: ModuleKind::Apt,
    fields: &[
        ModuleField::text("name", "Package Name"),
        ModuleField::select("state", &["present", "absent", "latest"], "State"),
        ModuleField::select("update_cache", YES_NO, "Update Cache"),
    ],
    defaults: &[("name", ""), ("state", "present"), ("update_cache", "yes")],
};

static APT_REPOSITORY: ModuleSchema = ModuleSchema {
    module: ModuleKind::AptRepository,
    fields: &[
        ModuleField::text("repo", "Repository URL"),
        ModuleField::select("state", PRESENT_ABSENT, "State"),
        ModuleField::text("filename", "Source File Name"),
    ],
    defaults: &[("repo", ""), ("state", "present"), ("filename", "")],
};

static APT_KEY: ModuleSchema = ModuleSchema {
    module: ModuleKind::AptKey,
    fields: &[
        ModuleField::text("url", "Key URL"),
        ModuleField::select("state", PRESENT_ABSENT, "State"),
    ],
    defaults: &[("url", ""), ("state", "present")],
};

static SERVICE: ModuleSchema = ModuleSchema {
    module: ModuleKind::Service,
    fields: &[
        ModuleField::text("name", "Service Name"),
        ModuleField::select("state", &["started", "stopped", "restarted"], "State"),
        ModuleField::select("enabled", YES_NO, "Enabled at Boot"),
    ],
    defaults: &[("name", ""), ("state", "started"), ("enabled", "yes")],
};

static COMMAND: ModuleSchema = ModuleSchema {
    module: ModuleKind::Command,
    fields: &[ModuleField::text("cmd", "Command")],
    defaults: &[("cmd", "")],
};

static FILE: ModuleSchema = ModuleSchema {
    module: ModuleKind::File,
    fields: &[
        ModuleField::text("path", "Path"),
        ModuleField::select("state", &["directory", "touch", "absent"], "State"),
        ModuleField::text("mode", "Mode"),
        ModuleField::text("owner", "Owner"),
        ModuleField::text("group", "Group"),
    ],
    defaults: &[
        ("path", ""),
        ("state", "directory"),
        ("mode", "0755"),
        ("owner", ""),
        ("group", ""),
    ],
};

impl ModuleKind {
    /// Schema for this module
    pub fn schema(&self) -> &'static ModuleSchema {
        match self {
            ModuleKind::Apt => &APT,
            ModuleKind::AptRepository => &APT_REPOSITORY,
            ModuleKind::AptKey => &APT_KEY,
            ModuleKind::Service => &SERVICE,
            ModuleKind::Command => &COMMAND,
            ModuleKind::File => &FILE,
        }
    }

    /// Ordered field definitions for this module
    pub fn fields(&self) -> &'static [ModuleField] {
        self.schema().fields
    }
}

/// Field definitions for a module identifier.
///
/// Fails with `UnknownModule` if the identifier is not registered.
pub fn fields_for(module: &str) -> Result<&'static [ModuleField]> {
    Ok(ModuleKind::parse(module)?.fields())
}

/// Default parameters for a module identifier, in field order.
///
/// Fails with `UnknownModule` if the identifier is not registered.
pub fn default_params_for(module: &str) -> Result<&'static [(&'static str, &'static str)]> {
    Ok(ModuleKind::parse(module)?.schema().defaults)
}

/// Look up a field of `module`, failing with `UnknownField`
pub fn field_of(module: ModuleKind, field: &str) -> Result<&'static ModuleField> {
    module
        .schema()
        .field(field)
        .ok_or_else(|| PlaybookError::unknown_field(module.as_str(), field))
}

#[cfg(test)]
mod tests {
    use super::*;
    use strum::IntoEnumIterator;

    #[test]
    fn test_defaults_cover_exactly_declared_fields() {
        for module in ModuleKind::iter() {
            let schema = module.schema();
            let field_names: Vec<&str> = schema.fields.iter().map(|f| f.name).collect();
            let default_names: Vec<&str> = schema.defaults.iter().map(|(k, _)| *k).collect();
            assert_eq!(field_names, default_names, "defaults out of sync for {module}");
        }
    }

    #[test]
    fn test_select_defaults_are_allowed() {
        for module in ModuleKind::iter() {
            let schema = module.schema();
            for (name, default) in schema.defaults {
                let field = schema.field(name).unwrap();
                assert!(
                    field.accepts(default),
                    "{module}.{name} default '{default}' not allowed"
                );
            }
        }
    }

    #[test]
    fn test_text_fields_have_no_allowed_values() {
        for module in ModuleKind::iter() {
            for field in module.fields() {
                match field.kind {
                    FieldKind::Text => assert!(field.allowed_values.is_empty()),
                    FieldKind::Select => assert!(!field.allowed_values.is_empty()),
                }
            }
        }
    }

    #[test]
    fn test_fields_for_apt() {
        let fields = fields_for("apt").unwrap();
        let names: Vec<&str> = fields.iter().map(|f| f.name).collect();
        assert_eq!(names, vec!["name", "state", "update_cache"]);
        assert_eq!(fields[1].allowed_values, &["present", "absent", "latest"]);
    }

    #[test]
    fn test_unknown_module_lookup() {
        assert!(matches!(
            fields_for("pacman"),
            Err(PlaybookError::UnknownModule { .. })
        ));
        assert!(matches!(
            default_params_for(""),
            Err(PlaybookError::UnknownModule { .. })
        ));
    }

    #[test]
    fn test_file_defaults() {
        let defaults = default_params_for("file").unwrap();
        assert_eq!(defaults[2], ("mode", "0755"));
        assert_eq!(defaults[3], ("owner", ""));
    }

    #[test]
    fn test_field_of_unknown_field() {
        let err = field_of(ModuleKind::Command, "chdir").unwrap_err();
        assert!(matches!(err, PlaybookError::UnknownField { field, .. } if field == "chdir"));
    }
}
