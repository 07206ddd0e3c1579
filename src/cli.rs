//! Command-line interface argument parsing.
//!
//! This module handles all CLI argument parsing using clap,
//! including validation and default values.

use clap::Parser;
use std::path::PathBuf;

/// instdoc - reference documentation for JSON-LD instance libraries
///
/// Groups terminologies, content types, licenses, brain atlases and
/// common coordinate spaces into reStructuredText pages.
///
/// Examples:
///   instdoc --input ./instances
///   instdoc --input ./instances --instances-version v3.0 --output build
///   instdoc --input ./instances --dry-run
///   instdoc --init-config
#[derive(Parser, Debug, Clone)]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Args {
    /// Root directory of the instance files
    ///
    /// The first folder below the root (usually the instances version)
    /// is ignored when classifying documents.
    #[arg(short, long, value_name = "DIR", required_unless_present = "init_config")]
    pub input: Option<PathBuf>,

    /// Instances version to document
    ///
    /// Used in the output path and in every documentation link.
    /// Defaults to the config file value, then "latest".
    #[arg(short = 'r', long, value_name = "VERSION", env = "INSTDOC_VERSION")]
    pub instances_version: Option<String>,

    /// Output root directory
    ///
    /// Documents are written below <OUTPUT>/<VERSION>/docs/libraries.
    #[arg(short, long, value_name = "DIR")]
    pub output: Option<PathBuf>,

    /// Base URL of the published documentation site
    #[arg(long, value_name = "URL", env = "INSTDOC_BASE_URL")]
    pub base_url: Option<String>,

    /// Path to configuration file
    ///
    /// If not specified, looks for .instdoc.toml in the current directory
    #[arg(short, long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Instance file extension (default: jsonld)
    #[arg(long, value_name = "EXT")]
    pub extension: Option<String>,

    /// Names to exclude from scanning (comma-separated)
    ///
    /// Example: --exclude "drafts,archive"
    #[arg(long, value_name = "NAMES", value_delimiter = ',')]
    pub exclude: Option<Vec<String>>,

    /// Common types to collect from graphStructures/common (comma-separated)
    #[arg(long = "common-type", value_name = "NAMES", value_delimiter = ',')]
    pub common_types: Option<Vec<String>>,

    /// Enable verbose logging output
    #[arg(short, long)]
    pub verbose: bool,

    /// Run in quiet mode (minimal output)
    #[arg(short, long)]
    pub quiet: bool,

    /// Dry run: scan and aggregate without writing documents
    #[arg(long)]
    pub dry_run: bool,

    /// Generate a default .instdoc.toml configuration file
    #[arg(long)]
    pub init_config: bool,
}

impl Args {
    /// Parse command-line arguments.
    pub fn parse_args() -> Self {
        Self::parse()
    }

    /// Validate the parsed arguments.
    pub fn validate(&self) -> Result<(), String> {
        // Skip validation for --init-config
        if self.init_config {
            return Ok(());
        }

        // Check for conflicting options
        if self.verbose && self.quiet {
            return Err("Cannot use both --verbose and --quiet".to_string());
        }

        match self.input {
            Some(ref input) => {
                if !input.exists() {
                    return Err(format!("Input directory does not exist: {}", input.display()));
                }
                if !input.is_dir() {
                    return Err(format!("Input path is not a directory: {}", input.display()));
                }
            }
            None => return Err("An input directory is required (--input)".to_string()),
        }

        Ok(())
    }

    /// Returns the log level based on verbosity settings.
    pub fn log_level(&self) -> tracing::Level {
        if self.quiet {
            tracing::Level::ERROR
        } else if self.verbose {
            tracing::Level::DEBUG
        } else {
            tracing::Level::INFO
        }
    }
}
