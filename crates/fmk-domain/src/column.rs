use serde::{Deserialize, Serialize};

/// Column ids are the attribute values the board writes into front matter.
pub type ColumnId = String;

/// Id of the synthetic column collecting tasks that match no configured column.
pub const UNASSIGNED_COLUMN_ID: &str = "Not Assigned";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Column {
    pub id: ColumnId,
    pub title: String,
}

impl Column {
    pub fn new(id: impl Into<ColumnId>, title: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
        }
    }

    /// Column titled after its own attribute value.
    pub fn from_value(value: impl Into<ColumnId>) -> Self {
        let id = value.into();
        Self {
            title: id.clone(),
            id,
        }
    }

    pub fn update_title(&mut self, title: String) {
        self.title = title;
    }
}
