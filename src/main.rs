//! instdoc - instance library documentation generator
//!
//! A CLI tool that reads a tree of JSON-LD instance documents, groups them
//! into libraries (terminologies, content types, licenses, brain atlases,
//! common coordinate spaces) and renders reStructuredText reference pages.
//!
//! Exit codes:
//!   0 - Success
//!   1 - Runtime error (invalid arguments, config, unreadable input, write failure)

mod cli;
mod config;
mod error;
mod library;
mod models;
mod report;
mod scanner;

use anyhow::{Context, Result};
use cli::Args;
use config::{Config, CONFIG_FILE};
use indicatif::{ProgressBar, ProgressStyle};
use library::Library;
use models::InputDocument;
use report::{BuildOptions, DocBuilder};
use std::path::{Path, PathBuf};
use std::time::Instant;
use tracing::{debug, error, info, warn};
use tracing_subscriber::FmtSubscriber;

fn main() -> Result<()> {
    // Parse command-line arguments
    let args = Args::parse_args();

    // Validate arguments
    if let Err(e) = args.validate() {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }

    // Handle --init-config early (no logging needed)
    if args.init_config {
        return handle_init_config();
    }

    // Load configuration before logging so `general.verbose` is honoured
    let config = match load_config(&args) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Error: {:#}", e);
            std::process::exit(1);
        }
    };

    if let Err(e) = config.validate() {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }

    // Initialize logging
    init_logging(&args, &config);

    info!("instdoc v{}", env!("CARGO_PKG_VERSION"));
    debug!("Arguments: {:?}", args);
    debug!("Configuration: {:?}", config);

    match run(&args, &config) {
        Ok(()) => Ok(()),
        Err(e) => {
            error!("Documentation build failed: {:#}", e);
            eprintln!("\n❌ Error: {:#}", e);
            std::process::exit(1);
        }
    }
}

/// Handle --init-config: generate a default .instdoc.toml.
fn handle_init_config() -> Result<()> {
    let path = Path::new(CONFIG_FILE);

    if path.exists() {
        eprintln!("⚠️  {} already exists. Remove it first or edit it manually.", CONFIG_FILE);
        std::process::exit(1);
    }

    let content = Config::default_toml();
    std::fs::write(path, &content).with_context(|| format!("Failed to write {}", CONFIG_FILE))?;

    println!("✅ Created {} with default settings.", CONFIG_FILE);
    println!("   Edit it to customize the version, output folder and links.");
    Ok(())
}

/// Initialize logging based on verbosity settings.
fn init_logging(args: &Args, config: &Config) {
    let level = if config.general.verbose && !args.quiet {
        tracing::Level::DEBUG
    } else {
        args.log_level()
    };

    let subscriber = FmtSubscriber::builder()
        .with_max_level(level)
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .with_line_number(false)
        .compact()
        .finish();

    tracing::subscriber::set_global_default(subscriber).expect("Failed to set tracing subscriber");
}

/// Load configuration from file or use defaults, then apply CLI overrides.
fn load_config(args: &Args) -> Result<Config> {
    let mut config = if let Some(ref config_path) = args.config {
        Config::load(config_path)?
    } else {
        match Config::load_default() {
            Ok(Some(config)) => config,
            Ok(None) => Config::default(),
            Err(e) => {
                eprintln!("⚠️  Ignoring {}: {:#}", CONFIG_FILE, e);
                Config::default()
            }
        }
    };

    config.merge_with_args(args);
    Ok(config)
}

/// Run the scan, aggregation and rendering stages.
fn run(args: &Args, config: &Config) -> Result<()> {
    let start_time = Instant::now();
    let input = args
        .input
        .clone()
        .context("An input directory is required (--input)")?;

    // Step 1: Find instance files
    println!("🔍 Scanning instances in {}", input.display());
    let scan_config = scanner::ScanConfig::from(&config.scanner);
    let files = scanner::FileScanner::new(input.clone(), scan_config).scan()?;
    info!("Found {} instance files", files.len());

    if files.is_empty() {
        warn!("No .{} files found under {}", config.scanner.extension, input.display());
    }

    // Step 2: Aggregate
    let library = load_library(&files, &input, config, !args.quiet)?;
    let counts = library.counts();

    println!("\n📚 Library contents:");
    println!(
        "   Terminologies: {} ({} terms)",
        counts.terminologies, counts.terms
    );
    println!("   Content types: {}", counts.content_types);
    println!("   Licenses: {}", counts.licenses);
    println!(
        "   Brain atlases: {} ({} versions, {} parcellation entities)",
        counts.brain_atlases, counts.atlas_versions, counts.parcellation_entities
    );
    println!(
        "   Common coordinate spaces: {} ({} versions)",
        counts.common_coordinate_spaces, counts.space_versions
    );

    for group in library.incomplete_groups() {
        warn!("Group {} has no defining document", group);
    }

    if args.dry_run {
        println!("\n✅ Dry run complete. No documents were written.");
        return Ok(());
    }

    // Step 3: Render
    println!("\n📝 Generating documentation...");
    let options = BuildOptions {
        version: config.general.version.clone(),
        base_url: config.docs.base_url.clone(),
        output_dir: PathBuf::from(&config.general.output_dir),
    };
    let written = DocBuilder::new(&library, options).build()?;

    for path in &written {
        debug!("  {}", path.display());
    }

    println!(
        "\n✅ Wrote {} documents to {} in {:.1}s",
        written.len(),
        Path::new(&config.general.output_dir)
            .join(&config.general.version)
            .join("docs")
            .join("libraries")
            .display(),
        start_time.elapsed().as_secs_f64()
    );

    Ok(())
}

/// Load every file and fold it into a new library.
fn load_library(files: &[PathBuf], root: &Path, config: &Config, show_progress: bool) -> Result<Library> {
    let mut library = Library::new();
    for common_type in &config.library.common_types {
        library.seed_common_type(common_type.as_str());
    }

    let progress_bar = if show_progress {
        let pb = ProgressBar::new(files.len() as u64);
        pb.set_style(
            ProgressStyle::default_bar()
                .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len}")
                .context("Invalid progress bar template")?
                .progress_chars("#>-"),
        );
        Some(pb)
    } else {
        None
    };

    for file in files {
        let document = InputDocument::load(file, root)
            .with_context(|| format!("Failed to load {}", file.display()))?;
        library.ingest(document);

        if let Some(ref pb) = progress_bar {
            pb.inc(1);
        }
    }

    if let Some(pb) = progress_bar {
        pb.finish_and_clear();
    }

    Ok(library)
}
