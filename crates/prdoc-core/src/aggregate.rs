//! Aggregation of validated records into changelog entries.

use std::collections::BTreeMap;

use crate::record::{Record, Section};

/// Per-package, per-section changelog entries.
///
/// Rebuilt from scratch every run and only ever rendered into the owned
/// changelog block. Packages iterate lexically; sections iterate in
/// canonical order (the `Section` derive); notes keep insertion order.
pub type Entries = BTreeMap<String, BTreeMap<Section, Vec<String>>>;

/// Merge validated records into per-package, per-section entries.
///
/// Appends `"{note} ({record-id})"` in input order, records outermost,
/// impact entries within a record innermost. That insertion order is the
/// sole ordering guarantee for notes inside one bucket; they are never
/// re-sorted.
pub fn build_entries(records: &[(String, Record)]) -> Entries {
    let mut entries = Entries::new();
    for (id, record) in records {
        for impact in &record.crates {
            entries
                .entry(impact.name.clone())
                .or_default()
                .entry(impact.section)
                .or_default()
                .push(format!("{} ({id})", impact.note));
        }
    }
    entries
}

/// Render the owned changelog block, one element per line.
///
/// Empty sections and packages with no populated sections are omitted
/// entirely; an empty aggregate still renders the block header so the
/// changelog keeps exactly one owned block.
pub fn render_block(entries: &Entries) -> Vec<String> {
    let mut block = vec!["### PRDocs".to_string()];
    if entries.is_empty() {
        block.push("- No entries.".to_string());
        return block;
    }

    for (package, sections) in entries {
        block.push(format!("#### {package}"));
        for (section, notes) in sections {
            if notes.is_empty() {
                continue;
            }
            block.push(format!("##### {}", section.as_str()));
            for note in notes {
                block.push(format!("- {note}"));
            }
        }
    }
    block
}
