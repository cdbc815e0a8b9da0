//! PRDoc record data model.
//!
//! A record is one independently-authored unit of change documentation:
//! a title, a free-form description, and one [`Impact`] entry per affected
//! workspace package. Records are read-only once authored; this crate only
//! parses and aggregates them.

use serde::{Deserialize, Serialize};

/// Changelog section a change belongs to.
///
/// The declaration order is the canonical render order, so the derived
/// `Ord` makes ordered maps iterate sections the way the changelog lists
/// them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Section {
    Breaking,
    Added,
    Changed,
    Fixed,
    Removed,
    Deprecated,
    Security,
}

impl Section {
    /// All sections in canonical render order.
    pub const ALL: [Section; 7] = [
        Section::Breaking,
        Section::Added,
        Section::Changed,
        Section::Fixed,
        Section::Removed,
        Section::Deprecated,
        Section::Security,
    ];

    /// Parse a section name as written in a record; `None` if unrecognised.
    pub fn parse(value: &str) -> Option<Section> {
        match value {
            "Breaking" => Some(Section::Breaking),
            "Added" => Some(Section::Added),
            "Changed" => Some(Section::Changed),
            "Fixed" => Some(Section::Fixed),
            "Removed" => Some(Section::Removed),
            "Deprecated" => Some(Section::Deprecated),
            "Security" => Some(Section::Security),
            _ => None,
        }
    }

    /// Section name as rendered in the changelog.
    pub fn as_str(&self) -> &'static str {
        match self {
            Section::Breaking => "Breaking",
            Section::Added => "Added",
            Section::Changed => "Changed",
            Section::Fixed => "Fixed",
            Section::Removed => "Removed",
            Section::Deprecated => "Deprecated",
            Section::Security => "Security",
        }
    }
}

/// Requested semantic-version escalation for one package.
///
/// Recorded for external release tooling to consume; this crate never
/// resolves version numbers itself.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Bump {
    Patch,
    Minor,
    Major,
    None,
}

impl Bump {
    /// Parse a bump value as written in a record; `None` if unrecognised.
    pub fn parse(value: &str) -> Option<Bump> {
        match value {
            "patch" => Some(Bump::Patch),
            "minor" => Some(Bump::Minor),
            "major" => Some(Bump::Major),
            "none" => Some(Bump::None),
            _ => None,
        }
    }
}

/// One workspace package impacted by a change.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Impact {
    /// Name of an existing workspace package.
    pub name: String,
    /// Changelog section the note belongs to.
    pub section: Section,
    /// Human-readable changelog note.
    pub note: String,
    /// Semantic-version escalation this change requires for the package.
    pub bump: Bump,
}

/// A validated PRDoc record.
///
/// Identity is the source file name, tracked by the caller; the record
/// itself carries only content.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Record {
    /// Change title (one line).
    pub title: String,
    /// Free-form description of the change.
    pub doc: String,
    /// Affected packages, in authored order.
    pub crates: Vec<Impact>,
}
