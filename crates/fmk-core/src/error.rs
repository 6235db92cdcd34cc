use serde::Serialize;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum FmkError {
    #[error("Not found: {0}")]
    NotFound(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(String),

    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error("No valid record collection at '{path}'")]
    RecordSourceInvalid { path: String },

    #[error("Failed to write '{key}' on {path}: {reason}")]
    WriteFailure {
        path: String,
        key: String,
        reason: String,
    },
}

/// A single field that failed board configuration validation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldViolation {
    /// Dotted path of the offending field, e.g. `filter.lastUpdated.unit`.
    pub field: String,
    pub message: String,
}

impl FieldViolation {
    pub fn new(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            message: message.into(),
        }
    }
}

impl std::fmt::Display for FieldViolation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.field, self.message)
    }
}

/// Errors produced while turning raw configuration text into a board config.
///
/// These are the only errors surfaced to the end user directly; every other
/// failure is recovered locally and logged.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    #[error("Malformed board configuration: {message}")]
    Malformed { message: String },

    #[error("Invalid board configuration: {}", join_violations(.violations))]
    SchemaViolation { violations: Vec<FieldViolation> },
}

impl ConfigError {
    pub fn violations(&self) -> &[FieldViolation] {
        match self {
            Self::Malformed { .. } => &[],
            Self::SchemaViolation { violations } => violations,
        }
    }

    /// Names of every field that failed validation, in report order.
    pub fn fields(&self) -> Vec<&str> {
        match self {
            Self::Malformed { .. } => Vec::new(),
            Self::SchemaViolation { violations } => {
                violations.iter().map(|v| v.field.as_str()).collect()
            }
        }
    }
}

fn join_violations(violations: &[FieldViolation]) -> String {
    violations
        .iter()
        .map(|v| v.to_string())
        .collect::<Vec<_>>()
        .join("; ")
}
