//! Record discovery and filtering.
//!
//! Decides which records of the configured origin become cards on the board.

pub mod discovery;
pub mod record_filter;

pub use discovery::{select_relevant, select_relevant_at};
pub use record_filter::{AnyOfFilter, PropertyExclusionFilter, RecordFilter, UpdatedSinceFilter};
