//! Command-line interface definitions for specparse

use clap::{Args, Parser, Subcommand};
use specparse::output::OutputFormat;
use std::path::PathBuf;

/// CLI structure for the specparse application
#[derive(Parser)]
#[command(name = "specparse")]
#[command(version)]
#[command(about = "Extract package metadata from RPM spec files", long_about = None)]
pub struct Cli {
    /// The subcommand to execute
    #[command(subcommand)]
    pub command: Commands,
}

/// Options shared by all subcommands
#[derive(Args, Debug, Clone)]
pub struct CommonArgs {
    /// Spec file or directory to search for *.spec files
    #[arg(value_name = "PATH", default_value = ".")]
    pub input: PathBuf,

    /// Configuration file (defaults to specparse.toml in the input directory)
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Read spec files as is instead of running the macro preprocessor
    #[arg(long)]
    pub no_preprocess: bool,

    /// Skip unknown header fields instead of failing the file
    #[arg(long)]
    pub skip_unknown: bool,

    /// Verbose output
    #[arg(short, long)]
    pub verbose: bool,
}

/// Available subcommands for specparse
#[derive(Subcommand)]
pub enum Commands {
    /// Parse spec files and print their metadata
    Parse {
        #[command(flatten)]
        common: CommonArgs,

        /// Output format
        #[arg(short, long, value_enum, default_value = "yaml")]
        format: OutputFormat,

        /// Write to a file instead of stdout
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Check that spec files parse, reporting every failure
    Validate {
        #[command(flatten)]
        common: CommonArgs,
    },
}

impl Commands {
    /// Options shared by every subcommand
    pub fn common(&self) -> &CommonArgs {
        match self {
            Commands::Parse { common, .. } | Commands::Validate { common } => common,
        }
    }
}
