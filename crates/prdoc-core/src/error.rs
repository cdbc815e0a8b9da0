//! Domain-level error taxonomy for PRDoc tooling.

/// A single schema violation found while validating one PRDoc record.
///
/// Violations are collected per record and reported as a batch; they are
/// data, not control flow. The `Display` output carries the field path
/// (`crates[{index}]...`) so a batch report stays actionable.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SchemaViolation {
    #[error("document is not a mapping")]
    NotAMapping,

    #[error("{field} must be a non-empty string")]
    MissingString { field: &'static str },

    #[error("crates must be a non-empty array")]
    EmptyCrates,

    #[error("crates[{index}] must be a mapping")]
    ImpactNotAMapping { index: usize },

    #[error("crates[{index}].{field} must be a non-empty string")]
    ImpactMissingString { index: usize, field: &'static str },

    #[error("crates[{index}].name `{name}` is not a workspace package")]
    UnknownPackage { index: usize, name: String },

    #[error("crates[{index}].section `{value}` is not one of Breaking, Added, Changed, Fixed, Removed, Deprecated, Security")]
    UnknownSection { index: usize, value: String },

    #[error("crates[{index}].bump must be one of major, minor, none, patch")]
    InvalidBump { index: usize },
}

/// PRDoc terminal errors.
///
/// Validation findings never appear here; they are reported through
/// [`SchemaViolation`] batches instead.
#[derive(Debug, thiserror::Error)]
pub enum PrdocError {
    #[error("git error: {0}")]
    Git(String),

    #[error("yaml error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type for PRDoc operations.
pub type Result<T> = std::result::Result<T, PrdocError>;
