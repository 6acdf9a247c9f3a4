//! Content module - front matter, schemas, and collection loading

mod entry;
mod error;
pub mod frontmatter;
pub mod loader;
mod schema;

pub use entry::{Collection, Collections, Entry, Note, Post};
pub use error::LoadError;
pub use frontmatter::FrontMatterError;
pub use schema::{coerce_date, PostData, Problem, SchemaError};
