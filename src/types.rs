//! Type-safe identifiers for the playbook builder
//!
//! Module identifiers are a closed set; string identifiers from presets and
//! build files are parsed into `ModuleKind` once, at the boundary.

use serde::{Deserialize, Serialize};
use std::str::FromStr;
use strum::{Display, EnumIter, EnumString, IntoStaticStr};

use crate::error::{PlaybookError, Result};

/// Task module identifier
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[derive(Display, EnumString, EnumIter, IntoStaticStr)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum ModuleKind {
    /// Debian package install/removal
    Apt,
    /// APT source registration
    AptRepository,
    /// APT signing key trust
    AptKey,
    /// Service state management
    Service,
    /// Arbitrary shell command
    Command,
    /// File/directory state
    File,
}

impl ModuleKind {
    /// Parse a module identifier, failing with `UnknownModule`
    pub fn parse(id: &str) -> Result<Self> {
        Self::from_str(id).map_err(|_| PlaybookError::unknown_module(id))
    }

    /// The identifier as it appears in the emitted document
    pub fn as_str(&self) -> &'static str {
        self.into()
    }
}

/// Input kind of a module field
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Display)]
#[strum(serialize_all = "lowercase")]
pub enum FieldKind {
    /// Free-form text
    Text,
    /// One of a fixed list of values
    Select,
}
