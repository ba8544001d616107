//! Playbook Builder - Main entry point
//!
//! Headless front end over the playbook engine: build files in, YAML out.

use anyhow::{Context, Result};
use std::fs;
use strum::IntoEnumIterator;
use tracing::{debug, error, info};

use playbook_builder::cli::{Cli, Commands};
use playbook_builder::{
    expand, BuildConfig, ModuleKind, PlaybookSpec, PresetCatalog, TaskList,
};

/// Initialize the tracing subscriber; RUST_LOG overrides the default level
fn init_logger(verbose: bool) {
    let fallback = if verbose { "debug" } else { "info" };
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .or_else(|_| tracing_subscriber::EnvFilter::try_new(fallback))
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info"));

    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .try_init();
}

/// Main application entry point
fn main() -> Result<()> {
    let cli = Cli::parse_args();
    init_logger(cli.verbose);
    debug!("CLI arguments parsed");

    match cli.command {
        Commands::Generate {
            config,
            presets,
            output,
        } => generate(&config, presets.as_deref(), output.as_deref())?,
        Commands::Validate { config } => {
            info!("Validating build file: {:?}", config);
            let result = BuildConfig::load_from_file(&config).and_then(|c| c.validate());
            match result {
                Ok(()) => println!("✓ Build file is valid: {}", config.display()),
                Err(e) => {
                    error!("Build file validation failed: {:#}", e);
                    eprintln!("✗ Build file validation failed: {:#}", e);
                    std::process::exit(1);
                }
            }
        }
        Commands::Modules { module } => list_modules(module.as_deref())?,
        Commands::Deps { package } => {
            let tasks = expand(&package, &TaskList::new());
            if tasks.is_empty() {
                println!("No known dependencies for {}", package);
            } else {
                let spec = PlaybookSpec {
                    tasks: TaskList::from(tasks),
                    ..PlaybookSpec::default()
                };
                print!("{}", playbook_builder::render(&spec)?);
            }
        }
        Commands::Presets { presets } => {
            let catalog = PresetCatalog::load_from_file(&presets)
                .with_context(|| format!("Failed to load preset catalog {:?}", presets))?;
            for (key, bundle) in catalog.iter() {
                println!("{:<32} {} ({} tasks)", key, bundle.name, bundle.tasks.len());
            }
        }
    }

    Ok(())
}

/// Build a session from a build file and emit the playbook
fn generate(
    config_path: &std::path::Path,
    presets_path: Option<&std::path::Path>,
    output: Option<&std::path::Path>,
) -> Result<()> {
    info!("Loading build file: {:?}", config_path);
    let config = BuildConfig::load_from_file(config_path)?;

    let catalog = presets_path
        .map(|path| {
            PresetCatalog::load_from_file(path)
                .with_context(|| format!("Failed to load preset catalog {:?}", path))
        })
        .transpose()?;

    let session = config.build_session(catalog.as_ref())?;
    let yaml = session.render()?;

    match output {
        Some(path) => {
            fs::write(path, &yaml)
                .with_context(|| format!("Failed to write playbook to {:?}", path))?;
            info!("Playbook written to {:?}", path);
        }
        None => print!("{}", yaml),
    }
    Ok(())
}

/// Print the module registry
fn list_modules(module: Option<&str>) -> Result<()> {
    let Some(id) = module else {
        for kind in ModuleKind::iter() {
            let fields: Vec<&str> = kind.fields().iter().map(|f| f.name).collect();
            println!("{:<16} {}", kind, fields.join(", "));
        }
        return Ok(());
    };

    let kind = ModuleKind::parse(id)?;
    let schema = kind.schema();
    for field in schema.fields {
        let default = schema
            .defaults
            .iter()
            .find(|(name, _)| *name == field.name)
            .map(|(_, value)| *value)
            .unwrap_or_default();
        let allowed = if field.allowed_values.is_empty() {
            String::new()
        } else {
            format!(" [{}]", field.allowed_values.join("|"))
        };
        println!(
            "{:<14} {:<6} {:<18} default={:?}{}",
            field.name, field.kind, field.label, default, allowed
        );
    }
    Ok(())
}
