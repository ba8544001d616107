use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Playbook Builder - assemble configuration tasks into an automation playbook
#[derive(Parser)]
#[command(name = "playbook-builder")]
#[command(about = "Assemble package, repository, service and file tasks into a YAML playbook")]
#[command(version)]
pub struct Cli {
    /// Verbose logging (debug level unless RUST_LOG is set).
    ///
    /// Logs go to stderr; stdout only ever carries the rendered playbook.
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Generate a playbook from a build file
    Generate {
        /// Path to the build file (JSON)
        #[arg(short, long)]
        config: PathBuf,

        /// Preset catalog (JSON) used for the build file's `presets`
        #[arg(short, long)]
        presets: Option<PathBuf>,

        /// Write the playbook here instead of stdout
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// Validate a build file
    Validate {
        /// Path to the build file to validate
        config: PathBuf,
    },
    /// List modules, or show one module's fields and defaults
    Modules {
        /// Module identifier (e.g., apt_repository)
        module: Option<String>,
    },
    /// Show the prerequisite tasks added for a package
    Deps {
        /// Package name (e.g., docker-ce)
        package: String,
    },
    /// List the bundles in a preset catalog
    Presets {
        /// Preset catalog (JSON)
        #[arg(short, long)]
        presets: PathBuf,
    },
}

impl Cli {
    pub fn parse_args() -> Self {
        <Self as clap::Parser>::parse()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;

    #[test]
    fn test_cli_requires_command() {
        let result = Cli::try_parse_from(["playbook-builder"]);
        assert!(result.is_err());
    }

    #[test]
    fn test_cli_generate() {
        let result = Cli::try_parse_from([
            "playbook-builder",
            "generate",
            "--config",
            "/path/to/build.json",
            "--presets",
            "/path/to/presets.json",
        ]);
        assert!(result.is_ok());
        let cli = result.unwrap();
        match cli.command {
            Commands::Generate {
                config,
                presets,
                output,
            } => {
                assert_eq!(config.to_str().unwrap(), "/path/to/build.json");
                assert_eq!(presets.unwrap().to_str().unwrap(), "/path/to/presets.json");
                assert!(output.is_none());
            }
            _ => panic!("Expected Generate command"),
        }
    }

    #[test]
    fn test_cli_validate_command() {
        let cli = Cli::try_parse_from(["playbook-builder", "validate", "build.json"]).unwrap();
        match cli.command {
            Commands::Validate { config } => {
                assert_eq!(config.to_str().unwrap(), "build.json");
            }
            _ => panic!("Expected Validate command"),
        }
    }

    #[test]
    fn test_cli_modules_optional_argument() {
        let cli = Cli::try_parse_from(["playbook-builder", "modules"]).unwrap();
        assert!(matches!(cli.command, Commands::Modules { module: None }));

        let cli = Cli::try_parse_from(["playbook-builder", "modules", "apt"]).unwrap();
        assert!(matches!(cli.command, Commands::Modules { module: Some(m) } if m == "apt"));
    }

    #[test]
    fn test_cli_deps_with_verbose() {
        let cli = Cli::try_parse_from(["playbook-builder", "deps", "docker-ce", "-v"]).unwrap();
        assert!(cli.verbose);
        assert!(matches!(cli.command, Commands::Deps { package } if package == "docker-ce"));
    }
}
