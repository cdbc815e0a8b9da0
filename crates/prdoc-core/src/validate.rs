//! Schema validation for PRDoc records.
//!
//! The validator is an explicit checklist over a raw YAML value evaluated
//! against the discovered package set: no reflection, no partial accepts.
//! Every violation is collected so one batch run reports everything;
//! unknown top-level keys (e.g. an `audience` tag) are permitted and
//! ignored.

use serde_yaml::Value;

use crate::error::SchemaViolation;
use crate::record::{Bump, Impact, Record, Section};
use crate::workspace::PackageMap;

/// Validate one parsed record against the workspace package set.
///
/// Returns either a fully-typed [`Record`] or a non-empty list of
/// violations, never both. Two short-circuits: a non-mapping
/// document yields a single terminal violation, and a missing or empty
/// `crates` array skips the per-entry checks (there is nothing to check
/// per entry). Everything else is collected exhaustively.
pub fn validate_record(
    value: &Value,
    packages: &PackageMap,
) -> Result<Record, Vec<SchemaViolation>> {
    if value.as_mapping().is_none() {
        return Err(vec![SchemaViolation::NotAMapping]);
    }

    let mut violations = Vec::new();

    let title = non_empty_str(value, "title");
    if title.is_none() {
        violations.push(SchemaViolation::MissingString { field: "title" });
    }
    let doc = non_empty_str(value, "doc");
    if doc.is_none() {
        violations.push(SchemaViolation::MissingString { field: "doc" });
    }

    let entries = value.get("crates").and_then(Value::as_sequence);
    let entries = match entries {
        Some(seq) if !seq.is_empty() => seq,
        _ => {
            violations.push(SchemaViolation::EmptyCrates);
            return Err(violations);
        }
    };

    let mut impacts = Vec::with_capacity(entries.len());
    for (index, entry) in entries.iter().enumerate() {
        if let Some(impact) = check_impact(index, entry, packages, &mut violations) {
            impacts.push(impact);
        }
    }

    if violations.is_empty() {
        Ok(Record {
            title: title.unwrap_or_default().to_string(),
            doc: doc.unwrap_or_default().to_string(),
            crates: impacts,
        })
    } else {
        Err(violations)
    }
}

/// Check one `crates[index]` entry, pushing every violation found.
///
/// Returns the typed impact only when the entry is individually clean; the
/// caller discards it unless the whole record is clean.
fn check_impact(
    index: usize,
    entry: &Value,
    packages: &PackageMap,
    violations: &mut Vec<SchemaViolation>,
) -> Option<Impact> {
    if entry.as_mapping().is_none() {
        violations.push(SchemaViolation::ImpactNotAMapping { index });
        return None;
    }

    let mut clean = true;

    let name = non_empty_str(entry, "name");
    match name {
        None => {
            violations.push(SchemaViolation::ImpactMissingString {
                index,
                field: "name",
            });
            clean = false;
        }
        Some(name) if !packages.contains_key(name) => {
            violations.push(SchemaViolation::UnknownPackage {
                index,
                name: name.to_string(),
            });
            clean = false;
        }
        Some(_) => {}
    }

    let section = match non_empty_str(entry, "section") {
        None => {
            violations.push(SchemaViolation::ImpactMissingString {
                index,
                field: "section",
            });
            clean = false;
            None
        }
        Some(raw) => {
            let parsed = Section::parse(raw);
            if parsed.is_none() {
                violations.push(SchemaViolation::UnknownSection {
                    index,
                    value: raw.to_string(),
                });
                clean = false;
            }
            parsed
        }
    };

    let note = non_empty_str(entry, "note");
    if note.is_none() {
        violations.push(SchemaViolation::ImpactMissingString {
            index,
            field: "note",
        });
        clean = false;
    }

    let bump = non_empty_str(entry, "bump").and_then(Bump::parse);
    if bump.is_none() {
        violations.push(SchemaViolation::InvalidBump { index });
        clean = false;
    }

    if !clean {
        return None;
    }
    Some(Impact {
        name: non_empty_str(entry, "name")?.to_string(),
        section: section?,
        note: note?.to_string(),
        bump: bump?,
    })
}

/// Fetch a field as a non-empty string; `None` for missing, non-string, or
/// empty values alike.
fn non_empty_str<'a>(value: &'a Value, field: &str) -> Option<&'a str> {
    value
        .get(field)
        .and_then(Value::as_str)
        .filter(|s| !s.is_empty())
}
