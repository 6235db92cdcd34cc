pub mod frontmatter;
pub mod store;

pub use frontmatter::FrontmatterDocument;
pub use store::*;
