//! Draft record synthesis from commit history.
//!
//! Drafts are a starting point for human refinement, not final records:
//! every affected package defaults to section `Changed` and bump `patch`,
//! and the doc falls back to a placeholder when a commit has no body.
//! Commits touching no sub-package produce no draft at all.

use std::fs;
use std::path::{Path, PathBuf};

use serde::Serialize;
use tracing::info;

use crate::error::Result;
use crate::git::CommitLog;
use crate::record::{Bump, Impact, Section};
use crate::workspace::{affected_packages, PackageMap};

/// Doc body written when a commit message has no body to carry over.
pub const DRAFT_PLACEHOLDER_DOC: &str = "Detailed description of the change.";

const SLUG_MAX_LEN: usize = 30;
const HASH_PREFIX_LEN: usize = 8;

/// Draft record shape as serialised to disk.
///
/// The `audience` tag is extra metadata validation ignores; it survives a
/// hand-promoted draft unchanged.
#[derive(Debug, Serialize)]
struct Draft {
    title: String,
    doc: String,
    audience: Vec<String>,
    crates: Vec<Impact>,
}

/// Synthesize one draft record per package-affecting commit since `since`.
///
/// Returns the paths written, in commit-log order. Commits whose changed
/// files map to no sub-package are skipped entirely.
pub fn scaffold_drafts(
    log: &dyn CommitLog,
    since: &str,
    packages: &PackageMap,
    draft_dir: &Path,
) -> Result<Vec<PathBuf>> {
    let commits = log.commits_since(since)?;
    let mut written = Vec::new();

    for commit in commits {
        let files = log.changed_files(&commit.hash)?;
        let affected = affected_packages(&files, packages);
        if affected.is_empty() {
            continue;
        }

        let draft = Draft {
            title: commit.subject.clone(),
            doc: if commit.body.is_empty() {
                DRAFT_PLACEHOLDER_DOC.to_string()
            } else {
                commit.body.clone()
            },
            audience: vec!["Developer".to_string()],
            crates: affected
                .into_iter()
                .map(|name| Impact {
                    name,
                    section: Section::Changed,
                    note: commit.subject.clone(),
                    bump: Bump::Patch,
                })
                .collect(),
        };

        fs::create_dir_all(draft_dir)?;
        let path = draft_dir.join(draft_file_name(&commit.hash, &commit.subject));
        let yaml = serde_yaml::to_string(&draft)?;
        fs::write(&path, yaml)?;
        info!(draft = %path.display(), "scaffolded draft record");
        written.push(path);
    }

    Ok(written)
}

/// Deterministic draft file name: short hash prefix plus slugified subject,
/// so reruns collide with themselves and the directory stays browsable.
fn draft_file_name(hash: &str, subject: &str) -> String {
    let prefix = &hash[..hash.len().min(HASH_PREFIX_LEN)];
    format!("draft-{prefix}-{}.prdoc", slugify(subject))
}

/// Lowercase the subject, collapse non-alphanumeric runs to single `-`,
/// trim separators, and truncate.
fn slugify(subject: &str) -> String {
    let mut slug = String::new();
    let mut pending_dash = false;
    for c in subject.chars() {
        if c.is_ascii_alphanumeric() {
            if pending_dash && !slug.is_empty() {
                slug.push('-');
            }
            pending_dash = false;
            slug.push(c.to_ascii_lowercase());
        } else {
            pending_dash = true;
        }
    }
    slug.truncate(SLUG_MAX_LEN);
    while slug.ends_with('-') {
        slug.pop();
    }
    slug
}
