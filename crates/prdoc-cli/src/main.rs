//! PRDoc - machine-checkable change documentation CLI
//!
//! The `prdoc` command manages `.prdoc` records in a multi-package
//! workspace and derives the project changelog from them.
//!
//! ## Commands
//!
//! - `validate`: check every record against the workspace topology
//! - `generate`: merge validated records into the changelog's owned block
//! - `scaffold`: draft records from commit history for human refinement

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use tracing::{info, warn, Level};

use prdoc_core::{
    build_entries, discover_packages, load_records, render_block, scaffold_drafts,
    update_changelog, CommitLog, GitLog, PackageMap,
};

/// Record directory, relative to the workspace root.
const RECORDS_DIR: &str = "prdoc";

/// Draft directory for scaffolded records, under the record directory.
const DRAFTS_DIR: &str = "prdoc/drafts";

const CHANGELOG_FILE: &str = "CHANGELOG.md";

#[derive(Parser)]
#[command(name = "prdoc")]
#[command(author = "Stevedores Org")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Machine-checkable change documentation", long_about = None)]
struct Cli {
    /// Workspace root holding Cargo.toml, the prdoc/ directory, and CHANGELOG.md
    #[arg(long, global = true, default_value = ".")]
    root: PathBuf,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Emit JSON-formatted log lines
    #[arg(long, global = true)]
    json: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Validate all .prdoc records against the workspace
    Validate,

    /// Generate the changelog's PRDocs block from all valid records
    ///
    /// Refuses to run while any record is invalid.
    Generate,

    /// Draft .prdoc records from git history
    Scaffold {
        /// Revision to start from (tag, branch, or hash); defaults to the latest tag
        #[arg(long)]
        since: Option<String>,
    },
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let level = if cli.verbose {
        Level::DEBUG
    } else {
        Level::INFO
    };
    prdoc_core::init_tracing(cli.json, level);

    let outcome = match &cli.command {
        Commands::Validate => cmd_validate(&cli.root),
        Commands::Generate => cmd_generate(&cli.root),
        Commands::Scaffold { since } => cmd_scaffold(&cli.root, since.as_deref()),
    };

    match outcome {
        Ok(code) => code,
        Err(err) => {
            eprintln!("Error: {err:#}");
            ExitCode::FAILURE
        }
    }
}

/// Resolve the package set once per invocation; every subcommand threads
/// the explicit root through, never the ambient working directory.
fn resolve_packages(root: &Path) -> PackageMap {
    let packages = discover_packages(root);
    if packages.is_empty() {
        warn!(root = %root.display(), "no packages discovered; records naming crates will not validate");
    }
    info!(count = packages.len(), "discovered workspace packages");
    packages
}

/// Validate all records and report every violation
fn cmd_validate(root: &Path) -> Result<ExitCode> {
    let packages = resolve_packages(root);
    let loaded = load_records(&root.join(RECORDS_DIR), &packages);

    if !loaded.errors.is_empty() {
        eprintln!("Validation errors found:");
        for error in &loaded.errors {
            eprintln!("  - {error}");
        }
        return Ok(ExitCode::FAILURE);
    }

    println!("Validated {} PRDoc file(s).", loaded.records.len());
    Ok(ExitCode::SUCCESS)
}

/// Regenerate the owned changelog block from all currently-valid records
fn cmd_generate(root: &Path) -> Result<ExitCode> {
    let packages = resolve_packages(root);
    let loaded = load_records(&root.join(RECORDS_DIR), &packages);

    if !loaded.errors.is_empty() {
        eprintln!("Cannot generate {CHANGELOG_FILE} due to validation errors:");
        for error in &loaded.errors {
            eprintln!("  - {error}");
        }
        return Ok(ExitCode::FAILURE);
    }

    let block = render_block(&build_entries(&loaded.records));
    update_changelog(&root.join(CHANGELOG_FILE), &block)
        .with_context(|| format!("failed to update {CHANGELOG_FILE}"))?;

    println!("Updated {CHANGELOG_FILE}.");
    Ok(ExitCode::SUCCESS)
}

/// Draft records for every package-affecting commit since a revision
fn cmd_scaffold(root: &Path, since: Option<&str>) -> Result<ExitCode> {
    let packages = resolve_packages(root);
    let log = GitLog::new(root);

    let since = match since {
        Some(revision) => revision.to_string(),
        None => log
            .latest_tag()
            .context("failed to query the latest tag")?
            .ok_or_else(|| {
                anyhow::anyhow!("no release tag found and --since was not provided")
            })?,
    };

    println!("Scaffolding PRDocs for changes since {since}...");
    let written = scaffold_drafts(&log, &since, &packages, &root.join(DRAFTS_DIR))
        .context("failed to scaffold draft records")?;

    if written.is_empty() {
        println!("No changes found since the specified revision.");
        return Ok(ExitCode::SUCCESS);
    }

    for path in &written {
        if let Some(name) = path.file_name() {
            println!("  - Scaffolded {}", name.to_string_lossy());
        }
    }
    println!(
        "\nSuccessfully scaffolded {} draft PRDoc(s) in {DRAFTS_DIR}/",
        written.len()
    );
    println!("Please review, refine, and move them to the main {RECORDS_DIR}/ directory.");
    Ok(ExitCode::SUCCESS)
}
