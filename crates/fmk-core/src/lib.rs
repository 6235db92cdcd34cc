pub mod color;
pub mod config;
pub mod error;
pub mod record;
pub mod result;
pub mod traits;

pub use color::{contrast_color, ContrastColor};
pub use config::AppConfig;
pub use error::{ConfigError, FieldViolation, FmkError};
pub use record::RecordHandle;
pub use result::FmkResult;
pub use traits::{AttributeStore, RecordSource};
