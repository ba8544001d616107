//! Error handling module for the playbook builder
//!
//! Provides centralized error handling with proper error types using thiserror.
//! Every engine operation that can reject a mutation returns one of these; a
//! rejected mutation never leaves the task list half-modified.

use thiserror::Error;

/// Main error type for the playbook engine
#[derive(Error, Debug)]
pub enum PlaybookError {
    /// Module identifier is not in the schema registry
    #[error("Unknown module: {module}")]
    UnknownModule { module: String },

    /// Field is not declared for the task's module
    #[error("Unknown field '{field}' for module {module}")]
    UnknownField { module: String, field: String },

    /// Select field received a value outside its allowed set
    #[error("Invalid value '{value}' for field '{field}' (allowed: {allowed})")]
    InvalidValue {
        field: String,
        value: String,
        allowed: String,
    },

    /// Positional operation outside `[0, len)`
    #[error("Index {index} out of range for task list of length {len}")]
    IndexOutOfRange { index: usize, len: usize },

    /// Preset entry could not be turned into a task
    #[error("Invalid preset entry '{entry}': {reason}")]
    InvalidPresetEntry { entry: String, reason: String },

    /// A direct add would install the same apt package twice
    #[error("Package \"{package}\" is already in the task list")]
    DuplicatePackage { package: String },

    /// IO errors (catalog and build files)
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization/deserialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// YAML serialization errors
    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),
}

/// Result type alias for engine operations
pub type Result<T> = std::result::Result<T, PlaybookError>;

// Convenient error constructors
impl PlaybookError {
    /// Create an unknown module error
    pub fn unknown_module(module: impl Into<String>) -> Self {
        Self::UnknownModule {
            module: module.into(),
        }
    }

    /// Create an unknown field error
    pub fn unknown_field(module: impl Into<String>, field: impl Into<String>) -> Self {
        Self::UnknownField {
            module: module.into(),
            field: field.into(),
        }
    }

    /// Create an invalid preset entry error
    pub fn invalid_preset(entry: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidPresetEntry {
            entry: entry.into(),
            reason: reason.into(),
        }
    }

    /// Create a duplicate package error
    pub fn duplicate_package(package: impl Into<String>) -> Self {
        Self::DuplicatePackage {
            package: package.into(),
        }
    }
}
