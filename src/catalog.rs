//! Dependency catalog and preset categories.
//!
//! Both tables are fixed data compiled into the binary. Packages listed here
//! pull in their signing keys, APT sources and companion packages when
//! dependency expansion is requested.
//!
//! | Package       | Keys | Repositories | Companion packages                      |
//! |---------------|------|--------------|-----------------------------------------|
//! | `nginx`       | 1    | 1            | -                                       |
//! | `postgresql`  | 1    | 1            | -                                       |
//! | `mongodb-org` | 1    | 1            | -                                       |
//! | `nodejs`      | 1    | 1            | -                                       |
//! | `docker-ce`   | 1    | 1            | docker-ce, docker-ce-cli, containerd.io |

use serde::Serialize;

/// Prerequisites of one known package
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct DependencyEntry {
    pub package_name: &'static str,
    pub repositories: &'static [&'static str],
    pub keys: &'static [&'static str],
    pub packages: &'static [&'static str],
}

impl DependencyEntry {
    /// APT source file name: the package name up to its first hyphen
    pub fn source_filename(&self) -> &'static str {
        source_filename(self.package_name)
    }
}

/// Portion of `package` before its first hyphen
pub fn source_filename(package: &str) -> &str {
    package.split('-').next().unwrap_or(package)
}

pub const DEPENDENCY_CATALOG: &[DependencyEntry] = &[
    DependencyEntry {
        package_name: "nginx",
        repositories: &["deb https://nginx.org/packages/ubuntu/ focal nginx"],
        keys: &["https://nginx.org/keys/nginx_signing.key"],
        packages: &[],
    },
    DependencyEntry {
        package_name: "postgresql",
        repositories: &["deb http://apt.postgresql.org/pub/repos/apt focal-pgdg main"],
        keys: &["https://www.postgresql.org/media/keys/ACCC4CF8.asc"],
        packages: &[],
    },
    DependencyEntry {
        package_name: "mongodb-org",
        repositories: &[
            "deb [ arch=amd64,arm64 ] https://repo.mongodb.org/apt/ubuntu focal/mongodb-org/6.0 multiverse",
        ],
        keys: &["https://www.mongodb.org/static/pgp/server-6.0.asc"],
        packages: &[],
    },
    DependencyEntry {
        package_name: "nodejs",
        repositories: &["deb https://deb.nodesource.com/node_20.x focal main"],
        keys: &["https://deb.nodesource.com/gpgkey/nodesource.gpg.key"],
        packages: &[],
    },
    DependencyEntry {
        package_name: "docker-ce",
        repositories: &["deb https://download.docker.com/linux/ubuntu focal stable"],
        keys: &["https://download.docker.com/linux/ubuntu/gpg"],
        packages: &["docker-ce", "docker-ce-cli", "containerd.io"],
    },
];

/// Catalog entry for `package`, if it has known prerequisites
pub fn lookup(package: &str) -> Option<&'static DependencyEntry> {
    DEPENDENCY_CATALOG.iter().find(|e| e.package_name == package)
}

// ============================================================================
// Preset categories
// ============================================================================

const PRESET_REPO: &str = "DevShedLabs/DeployPackages";

/// A named group of preset bundles published as one JSON document
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct PresetCategory {
    pub key: &'static str,
    pub name: &'static str,
    /// File name of the category document in the preset repository
    pub file: &'static str,
}

impl PresetCategory {
    /// CDN location of the category document.
    ///
    /// Fetching is left to the caller; the engine only consumes payloads.
    pub fn url(&self) -> String {
        format!("https://cdn.jsdelivr.net/gh/{}@main/{}", PRESET_REPO, self.file)
    }
}

pub const PRESET_CATEGORIES: &[PresetCategory] = &[
    PresetCategory {
        key: "databases",
        name: "Databases",
        file: "presets-databases.json",
    },
    PresetCategory {
        key: "languages",
        name: "Programming Languages",
        file: "presets-languages.json",
    },
    PresetCategory {
        key: "webservers",
        name: "Web Servers",
        file: "presets-servers.json",
    },
];

/// Preset category by key
pub fn preset_category(key: &str) -> Option<&'static PresetCategory> {
    PRESET_CATEGORIES.iter().find(|c| c.key == key)
}
