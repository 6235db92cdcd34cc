use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Opaque reference to a record in the record source.
///
/// The board never looks inside `path`; it is handed back to the record
/// source and attribute store verbatim.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct RecordHandle {
    pub path: String,
    pub basename: String,
    pub modified: DateTime<Utc>,
}

impl RecordHandle {
    pub fn new(path: impl Into<String>, basename: impl Into<String>, modified: DateTime<Utc>) -> Self {
        Self {
            path: path.into(),
            basename: basename.into(),
            modified,
        }
    }
}
