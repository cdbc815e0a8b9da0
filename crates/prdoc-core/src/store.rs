//! Loading and batch-validating the PRDoc record directory.

use std::fs;
use std::path::{Path, PathBuf};

use crate::record::Record;
use crate::validate::validate_record;
use crate::workspace::PackageMap;

/// Outcome of loading a record directory.
///
/// `records` holds `(file name, record)` pairs for every clean record, in
/// sorted path order; `errors` holds one human-readable line per violation,
/// prefixed with the offending file's path relative to the record
/// directory. A file contributes to exactly one of the two.
#[derive(Debug, Default)]
pub struct LoadedRecords {
    pub records: Vec<(String, Record)>,
    pub errors: Vec<String>,
}

/// All `*.prdoc` files under `dir`, recursively, sorted by path.
///
/// The sort keys aggregation order, so changelog output is stable across
/// runs and filesystems. A missing directory is an empty record set.
pub fn collect_record_files(dir: &Path) -> Vec<PathBuf> {
    let mut files = Vec::new();
    collect_into(dir, &mut files);
    files.sort();
    files
}

fn collect_into(dir: &Path, files: &mut Vec<PathBuf>) {
    let Ok(entries) = fs::read_dir(dir) else {
        return;
    };
    for entry in entries.flatten() {
        let path = entry.path();
        if path.is_dir() {
            collect_into(&path, files);
        } else if path.extension().is_some_and(|ext| ext == "prdoc") {
            files.push(path);
        }
    }
}

/// Load and validate every record under `dir` against the package set.
///
/// Parse failures are reported like any other validation finding for that
/// file; they never abort the batch.
pub fn load_records(dir: &Path, packages: &PackageMap) -> LoadedRecords {
    let mut loaded = LoadedRecords::default();
    for path in collect_record_files(dir) {
        let label = display_name(dir, &path);
        let text = match fs::read_to_string(&path) {
            Ok(text) => text,
            Err(err) => {
                loaded.errors.push(format!("{label}: {err}"));
                continue;
            }
        };
        let value: serde_yaml::Value = match serde_yaml::from_str(&text) {
            Ok(value) => value,
            Err(err) => {
                loaded.errors.push(format!("{label}: {err}"));
                continue;
            }
        };
        match validate_record(&value, packages) {
            Ok(record) => {
                let file_name = path
                    .file_name()
                    .map(|name| name.to_string_lossy().into_owned())
                    .unwrap_or_else(|| label.clone());
                loaded.records.push((file_name, record));
            }
            Err(violations) => {
                for violation in violations {
                    loaded.errors.push(format!("{label}: {violation}"));
                }
            }
        }
    }
    loaded
}

/// Path relative to the record directory, for error reporting.
fn display_name(dir: &Path, path: &Path) -> String {
    path.strip_prefix(dir)
        .unwrap_or(path)
        .to_string_lossy()
        .replace('\\', "/")
}
