//! PRDoc Core Library
//!
//! Machine-checkable change documentation for a multi-package workspace:
//! discovers the package topology, validates independently-authored
//! `.prdoc` records against it, and merges the validated records into the
//! owned block of the project changelog. The scaffolder drafts new records
//! from commit history for human refinement.

pub mod aggregate;
pub mod changelog;
pub mod error;
pub mod git;
pub mod record;
pub mod scaffold;
pub mod store;
pub mod telemetry;
pub mod validate;
pub mod workspace;

pub use aggregate::{build_entries, render_block, Entries};
pub use changelog::{splice_block, update_changelog, BLOCK_HEADER, UNRELEASED_HEADER};
pub use error::{PrdocError, Result, SchemaViolation};
pub use git::{Commit, CommitLog, GitLog};
pub use record::{Bump, Impact, Record, Section};
pub use scaffold::{scaffold_drafts, DRAFT_PLACEHOLDER_DOC};
pub use store::{collect_record_files, load_records, LoadedRecords};
pub use telemetry::init_tracing;
pub use validate::validate_record;
pub use workspace::{affected_packages, discover_packages, PackageMap};

/// PRDoc version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
