//! Playbook synthesis.
//!
//! Turns playbook settings plus the ordered task list into the emitted
//! document: a one-element YAML sequence holding the play.
//!
//! ```yaml
//! - name: my-playbook
//!   hosts: all
//!   become: true
//!   tasks:
//!   - name: nginx
//!     apt:
//!       name: nginx
//!       state: present
//!       update_cache: 'yes'
//! ```
//!
//! Synthesis is a pure function of its input. Key order comes from struct
//! declaration order, never from a hash map, so re-rendering an unchanged
//! spec yields byte-identical text.

use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::task::Task;
use crate::task_list::TaskList;

pub const DEFAULT_PLAYBOOK_NAME: &str = "my-playbook";
pub const DEFAULT_HOSTS: &str = "all";

/// Everything needed to emit one playbook
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlaybookSpec {
    pub name: String,
    pub hosts: String,
    /// Run tasks with privilege elevation
    pub r#become: bool,
    pub tasks: TaskList,
}

impl Default for PlaybookSpec {
    fn default() -> Self {
        Self {
            name: DEFAULT_PLAYBOOK_NAME.to_string(),
            hosts: DEFAULT_HOSTS.to_string(),
            r#become: true,
            tasks: TaskList::new(),
        }
    }
}

/// One play of the emitted document
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Play<'a> {
    pub name: &'a str,
    pub hosts: &'a str,
    pub r#become: bool,
    pub tasks: &'a [Task],
}

/// The emitted document: a sequence holding exactly one play
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct PlaybookDocument<'a> {
    plays: Vec<Play<'a>>,
}

impl PlaybookDocument<'_> {
    pub fn plays(&self) -> &[Play<'_>] {
        &self.plays
    }

    /// Serialize to block-style YAML
    pub fn to_yaml(&self) -> Result<String> {
        Ok(serde_yaml::to_string(self)?)
    }
}

/// Build the document structure for `spec`. Total for any spec.
pub fn synthesize(spec: &PlaybookSpec) -> PlaybookDocument<'_> {
    PlaybookDocument {
        plays: vec![Play {
            name: &spec.name,
            hosts: &spec.hosts,
            r#become: spec.r#become,
            tasks: spec.tasks.tasks(),
        }],
    }
}

/// Synthesize and serialize in one step
pub fn render(spec: &PlaybookSpec) -> Result<String> {
    synthesize(spec).to_yaml()
}

/// Playbook-level settings as they appear in a build file
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlaybookSettings {
    pub name: String,
    pub hosts: String,
    pub r#become: bool,
}

impl Default for PlaybookSettings {
    fn default() -> Self {
        Self {
            name: DEFAULT_PLAYBOOK_NAME.to_string(),
            hosts: DEFAULT_HOSTS.to_string(),
            r#become: true,
        }
    }
}
