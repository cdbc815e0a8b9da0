//! Workspace package discovery and changed-path attribution.
//!
//! [`discover_packages`] walks the manifest graph from an explicit
//! workspace root (always a parameter, never the ambient working
//! directory) and [`affected_packages`] maps changed file paths back to
//! the most specific owning package.

use std::collections::{BTreeSet, HashSet};
use std::fs;
use std::path::{Path, PathBuf};

use tracing::debug;

/// Root-relative directory of every discovered package, keyed by name.
///
/// The workspace root package maps to the empty string. A `BTreeMap` keeps
/// iteration deterministic by construction.
pub type PackageMap = std::collections::BTreeMap<String, String>;

/// Discover all packages reachable from the workspace root manifest.
///
/// Follows `workspace.members` transitively, including glob members: a
/// member containing `*` expands to every immediate subdirectory of the
/// pre-`*` prefix that itself contains a `Cargo.toml`. A visited set keyed
/// by canonical directory path guards against duplicate references and
/// membership cycles.
///
/// Discovery is best-effort: a missing or malformed manifest is skipped
/// (with a debug note), never fatal, so validation reporting is never
/// blocked by one broken member. A manifest without `package.name` (a pure
/// aggregator) contributes only its members.
pub fn discover_packages(root: &Path) -> PackageMap {
    let mut packages = PackageMap::new();
    let mut queue: Vec<PathBuf> = vec![root.to_path_buf()];
    let mut visited: HashSet<PathBuf> = HashSet::new();

    while let Some(dir) = queue.pop() {
        let visit_key = dir.canonicalize().unwrap_or_else(|_| dir.clone());
        if !visited.insert(visit_key) {
            continue;
        }

        let manifest_path = dir.join("Cargo.toml");
        let Ok(text) = fs::read_to_string(&manifest_path) else {
            continue;
        };
        let value: toml::Value = match text.parse() {
            Ok(value) => value,
            Err(err) => {
                debug!(manifest = %manifest_path.display(), %err, "skipping malformed manifest");
                continue;
            }
        };

        if let Some(name) = value
            .get("package")
            .and_then(|pkg| pkg.get("name"))
            .and_then(|name| name.as_str())
        {
            if let Some(rel) = relative_dir(root, &dir) {
                packages.insert(name.to_string(), rel);
            }
        }

        let members = value
            .get("workspace")
            .and_then(|ws| ws.get("members"))
            .and_then(|members| members.as_array());
        for member in members.into_iter().flatten() {
            let Some(member) = member.as_str() else {
                continue;
            };
            if member.contains('*') {
                expand_glob_member(&dir, member, &mut queue);
            } else {
                queue.push(dir.join(member));
            }
        }
    }

    packages
}

/// Expand a glob member into every immediate subdirectory of the pre-`*`
/// prefix that contains a manifest.
fn expand_glob_member(dir: &Path, member: &str, queue: &mut Vec<PathBuf>) {
    let base = member.split('*').next().unwrap_or_default();
    let base_dir = dir.join(base);
    let Ok(entries) = fs::read_dir(&base_dir) else {
        return;
    };
    for entry in entries.flatten() {
        let candidate = entry.path();
        if candidate.is_dir() && candidate.join("Cargo.toml").exists() {
            queue.push(candidate);
        }
    }
}

/// Root-relative directory with `/` separators; `None` for directories
/// outside the root (a member escaping the workspace cannot own changed
/// paths, which are always root-relative).
fn relative_dir(root: &Path, dir: &Path) -> Option<String> {
    let rel = dir.strip_prefix(root).ok()?;
    let mut out = String::new();
    for component in rel.components() {
        if !out.is_empty() {
            out.push('/');
        }
        out.push_str(&component.as_os_str().to_string_lossy());
    }
    Some(out)
}

/// Map changed file paths to the packages that own them.
///
/// A path is owned by the package whose directory is its longest prefix on
/// a path-segment boundary: `a/b/file.rs` belongs to a package at `a/b`,
/// not the one at `a`, and `ab/file.rs` never matches a package at `a`.
/// The workspace root package (empty path) is excluded: only sub-packages
/// are reported as affected. Paths owned by no sub-package contribute
/// nothing.
///
/// Candidates are ranked by path length with lexical name as tie-break, so
/// the result never depends on map iteration order. The returned names are
/// distinct and lexically sorted.
pub fn affected_packages(files: &[String], packages: &PackageMap) -> Vec<String> {
    let mut ranked: Vec<(&str, &str)> = packages
        .iter()
        .filter(|(_, path)| !path.is_empty())
        .map(|(name, path)| (name.as_str(), path.as_str()))
        .collect();
    ranked.sort_by(|a, b| b.1.len().cmp(&a.1.len()).then_with(|| a.0.cmp(b.0)));

    let mut affected: BTreeSet<&str> = BTreeSet::new();
    for file in files {
        let owner = ranked.iter().find(|(_, path)| {
            file.strip_prefix(path)
                .is_some_and(|rest| rest.starts_with('/'))
        });
        if let Some((name, _)) = owner {
            affected.insert(name);
        }
    }

    affected.into_iter().map(str::to_string).collect()
}
