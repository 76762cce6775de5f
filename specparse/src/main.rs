//! specparse - RPM spec file metadata extraction
//!
//! A CLI tool that parses RPM spec files and prints their package metadata
//! and changelog as YAML or JSON.

#![deny(unsafe_code)]
#![cfg_attr(all(not(debug_assertions), not(test)), deny(clippy::all))]
#![cfg_attr(all(not(debug_assertions), not(test)), deny(clippy::pedantic))]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::missing_errors_doc)]

mod cli;

use anyhow::{Context, Result};
use clap::Parser;
use cli::{Cli, Commands, CommonArgs};
use specparse::output::{self, OutputFormat};
use specparse::pipeline::{self, ParsedSpec};
use specparse::{ParserConfig, UnknownFieldPolicy};
use std::path::{Path, PathBuf};

/// Main entry point for the specparse CLI application
fn main() {
    let cli = Cli::parse();

    let level = if cli.command.common().verbose {
        log::LevelFilter::Info
    } else {
        log::LevelFilter::Warn
    };
    env_logger::Builder::new()
        .filter_level(level)
        .parse_default_env()
        .init();

    match run(cli) {
        Ok(true) => {}
        Ok(false) => std::process::exit(1),
        Err(e) => {
            eprintln!("Error: {:?}", e);
            std::process::exit(2);
        }
    }
}

/// Run the CLI application, returning whether every spec file parsed
fn run(cli: Cli) -> Result<bool> {
    match cli.command {
        Commands::Parse {
            common,
            format,
            output,
        } => handle_parse_command(&common, format, output),
        Commands::Validate { common } => handle_validate_command(&common),
    }
}

/// Resolve the configuration, applying command-line overrides
fn load_config(common: &CommonArgs) -> Result<ParserConfig> {
    let mut config = match &common.config {
        Some(path) => ParserConfig::load(path)
            .with_context(|| format!("Failed to load configuration {}", path.display()))?,
        None => {
            let dir = if common.input.is_dir() {
                common.input.as_path()
            } else {
                common.input.parent().unwrap_or(Path::new("."))
            };
            ParserConfig::discover(dir)
                .with_context(|| format!("Failed to load configuration from {}", dir.display()))?
        }
    };

    if common.no_preprocess {
        config.preprocessor.enabled = false;
    }
    if common.skip_unknown {
        config.parser.unknown_fields = UnknownFieldPolicy::Skip;
    }
    log::debug!("configuration: {:?}", config);
    Ok(config)
}

/// Parse every spec file below the input path
fn parse_specs(common: &CommonArgs) -> Result<Vec<ParsedSpec>> {
    let config = load_config(common)?;
    let preprocessor = config.preprocessor();
    pipeline::parse_path(
        &common.input,
        preprocessor.as_ref(),
        config.parser.unknown_fields,
    )
    .with_context(|| format!("Failed to parse specs from {}", common.input.display()))
}

/// Report failed files on stderr and return how many there were
fn report_failures(specs: &[ParsedSpec]) -> usize {
    let mut failed = 0;
    for spec in specs {
        if let Err(e) = &spec.result {
            eprintln!("✗ {}: {}", spec.path.display(), e);
            failed += 1;
        }
    }
    failed
}

/// Handle the parse command
fn handle_parse_command(
    common: &CommonArgs,
    format: OutputFormat,
    output_path: Option<PathBuf>,
) -> Result<bool> {
    let specs = parse_specs(common)?;
    let failed = report_failures(&specs);

    let rendered = output::render(&specs, format).context("Failed to serialize documents")?;
    match output_path {
        Some(path) => {
            std::fs::write(&path, rendered)
                .with_context(|| format!("Failed to write {}", path.display()))?;
            log::info!("wrote {}", path.display());
        }
        None => print!("{}", rendered),
    }

    Ok(failed == 0)
}

/// Handle the validate command
fn handle_validate_command(common: &CommonArgs) -> Result<bool> {
    let specs = parse_specs(common)?;

    for spec in specs.iter().filter(|s| s.is_ok()) {
        println!("✓ {}", spec.path.display());
    }
    let failed = report_failures(&specs);

    println!(
        "\n{} spec files checked, {} failed",
        specs.len(),
        failed
    );
    Ok(failed == 0)
}
