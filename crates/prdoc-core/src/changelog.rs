//! Idempotent splicing of the generated block into the changelog.
//!
//! The changelog is treated as a line sequence with Markdown-style headers.
//! This module owns exactly one block, the `### PRDocs` sub-block of the
//! `## [Unreleased]` section, and must leave every other line untouched:
//! prior releases, hand-written notes, everything. All edits are line-range
//! replacements bounded by header-level comparison, never substring search,
//! so look-alike text inside hand-written sections cannot be corrupted.

use std::fs;
use std::path::Path;

use crate::error::Result;

/// Header line opening the one mutable section.
pub const UNRELEASED_HEADER: &str = "## [Unreleased]";

/// Header line opening the owned generated block.
pub const BLOCK_HEADER: &str = "### PRDocs";

/// Skeleton used when no changelog exists yet.
const SKELETON: [&str; 3] = ["# Changelog", "", UNRELEASED_HEADER];

/// Markdown header level of a line (`# ` = 1 … `###### ` = 6), `None` for
/// non-header lines.
fn header_level(line: &str) -> Option<usize> {
    let hashes = line.bytes().take_while(|b| *b == b'#').count();
    if (1..=6).contains(&hashes) && line.as_bytes().get(hashes) == Some(&b' ') {
        Some(hashes)
    } else {
        None
    }
}

/// Splice the rendered block into a document, returning the new document.
///
/// `existing` is the current changelog text, or `None` when the file does
/// not exist yet. The result always ends in exactly one trailing newline.
///
/// Splicing twice with the same block is byte-stable, and splicing a new
/// block touches only the owned line range.
pub fn splice_block(existing: Option<&str>, block: &[String]) -> String {
    let mut lines: Vec<String> = match existing {
        Some(text) => text.lines().map(str::to_string).collect(),
        None => SKELETON.iter().map(|s| s.to_string()).collect(),
    };

    let unreleased = match lines.iter().position(|l| l.trim() == UNRELEASED_HEADER) {
        Some(index) => index,
        None => synthesize_unreleased(&mut lines),
    };

    // The Unreleased section runs to the next header of the same or higher
    // level, or to the end of the document.
    let section_start = unreleased + 1;
    let section_end = (section_start..lines.len())
        .find(|&i| header_level(&lines[i]).is_some_and(|level| level <= 2))
        .unwrap_or(lines.len());

    let owned_start = (section_start..section_end).find(|&i| lines[i].trim() == BLOCK_HEADER);
    match owned_start {
        Some(start) => {
            // Replace exactly the previously generated block: marker line
            // through the line before the next same-or-higher header inside
            // the section.
            let end = (start + 1..section_end)
                .find(|&i| header_level(&lines[i]).is_some_and(|level| level <= 3))
                .unwrap_or(section_end);
            lines.splice(start..end, block.iter().cloned());
        }
        None => {
            let mut insertion = Vec::with_capacity(block.len() + 1);
            if !lines[section_end - 1].trim().is_empty() {
                insertion.push(String::new());
            }
            insertion.extend(block.iter().cloned());
            lines.splice(section_end..section_end, insertion);
        }
    }

    let mut rendered = lines.join("\n");
    rendered.push('\n');
    rendered
}

/// Insert an Unreleased header into a document that lacks one, returning
/// its line index.
///
/// Goes immediately after a leading title line when there is one;
/// otherwise a synthesized title and header are prepended, pushing all
/// existing content down rather than destroying it.
fn synthesize_unreleased(lines: &mut Vec<String>) -> usize {
    if lines.first().is_some_and(|l| header_level(l) == Some(1)) {
        lines.insert(1, String::new());
        lines.insert(2, UNRELEASED_HEADER.to_string());
        2
    } else {
        for (i, line) in SKELETON.iter().enumerate() {
            lines.insert(i, line.to_string());
        }
        2
    }
}

/// Read, splice, and rewrite the changelog file.
///
/// The new document is computed fully in memory before the single write,
/// so a failure mid-run never leaves a partially rewritten file.
pub fn update_changelog(path: &Path, block: &[String]) -> Result<()> {
    let existing = match fs::read_to_string(path) {
        Ok(text) => Some(text),
        Err(err) if err.kind() == std::io::ErrorKind::NotFound => None,
        Err(err) => return Err(err.into()),
    };
    let rendered = splice_block(existing.as_deref(), block);
    fs::write(path, rendered)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn block() -> Vec<String> {
        vec![
            "### PRDocs".to_string(),
            "#### pkg-a".to_string(),
            "##### Added".to_string(),
            "- Add feature X (R1.prdoc)".to_string(),
        ]
    }

    #[test]
    fn test_header_level_requires_space() {
        assert_eq!(header_level("# Changelog"), Some(1));
        assert_eq!(header_level("## [Unreleased]"), Some(2));
        assert_eq!(header_level("##### Added"), Some(5));
        assert_eq!(header_level("#hashtag"), None);
        assert_eq!(header_level("plain text"), None);
        assert_eq!(header_level(""), None);
    }

    #[test]
    fn test_missing_document_gets_skeleton() {
        let doc = splice_block(None, &block());
        assert_eq!(
            doc,
            "# Changelog\n\n## [Unreleased]\n\n### PRDocs\n#### pkg-a\n##### Added\n- Add feature X (R1.prdoc)\n"
        );
    }

    #[test]
    fn test_missing_unreleased_inserted_after_title() {
        let existing = "# My Project\n\n## [1.0.0]\n- old note\n";
        let doc = splice_block(Some(existing), &block());
        assert!(doc.starts_with("# My Project\n\n## [Unreleased]\n"));
        assert!(doc.contains("## [1.0.0]\n- old note\n"));
    }

    #[test]
    fn test_no_title_prepends_synthesized_preamble() {
        let existing = "some hand-written preamble\n- a stray list\n";
        let doc = splice_block(Some(existing), &block());
        assert!(doc.starts_with("# Changelog\n\n## [Unreleased]\n"));
        // Pre-existing content is pushed down, never destroyed.
        assert!(doc.contains("some hand-written preamble\n- a stray list\n"));
    }

    #[test]
    fn test_splice_is_idempotent() {
        let first = splice_block(None, &block());
        let second = splice_block(Some(&first), &block());
        assert_eq!(first, second);
    }

    #[test]
    fn test_replaces_only_the_owned_block() {
        let existing = "\
# Changelog

## [Unreleased]
- hand-written unreleased note

### PRDocs
#### pkg-a
##### Added
- stale entry (R0.prdoc)

### Hand Section
- keep me

## [1.0.0]
- released note
";
        let doc = splice_block(Some(existing), &block());
        assert!(doc.contains("- hand-written unreleased note"));
        assert!(doc.contains("### Hand Section\n- keep me"));
        assert!(doc.contains("## [1.0.0]\n- released note"));
        assert!(doc.contains("- Add feature X (R1.prdoc)"));
        assert!(!doc.contains("stale entry"));
        // Still exactly one owned block.
        assert_eq!(doc.matches(BLOCK_HEADER).count(), 1);
    }

    #[test]
    fn test_append_goes_to_end_of_unreleased_section() {
        let existing = "\
# Changelog

## [Unreleased]
- hand-written note

## [1.0.0]
- released note
";
        let doc = splice_block(Some(existing), &block());
        let unreleased_at = doc.find("- hand-written note").unwrap();
        let block_at = doc.find("### PRDocs").unwrap();
        let release_at = doc.find("## [1.0.0]").unwrap();
        assert!(unreleased_at < block_at);
        assert!(block_at < release_at);
    }

    #[test]
    fn test_lookalike_marker_in_released_section_untouched() {
        let existing = "\
# Changelog

## [Unreleased]

## [1.0.0]

### PRDocs
#### pkg-a
##### Fixed
- released entry (R9.prdoc)
";
        let doc = splice_block(Some(existing), &block());
        // The released copy of the marker is outside the Unreleased
        // boundary and must survive verbatim.
        assert!(doc.contains("- released entry (R9.prdoc)"));
        assert_eq!(doc.matches(BLOCK_HEADER).count(), 2);
    }

    #[test]
    fn test_update_changelog_writes_file_once_absent() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("CHANGELOG.md");
        update_changelog(&path, &block()).unwrap();
        let first = fs::read_to_string(&path).unwrap();
        assert!(first.starts_with("# Changelog\n"));

        update_changelog(&path, &block()).unwrap();
        let second = fs::read_to_string(&path).unwrap();
        assert_eq!(first, second);
    }
}
