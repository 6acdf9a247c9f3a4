//! Errors raised while loading a collection

use std::path::PathBuf;
use thiserror::Error;

use super::frontmatter::FrontMatterError;
use super::schema::SchemaError;

/// A collection load failed. Loading is all-or-nothing, so a single bad file
/// fails the whole collection.
#[derive(Debug, Error)]
pub enum LoadError {
    #[error("invalid glob pattern `{pattern}`: {source}")]
    Pattern {
        pattern: String,
        source: glob::PatternError,
    },

    #[error("failed to scan {}: {source}", path.display())]
    Walk {
        path: PathBuf,
        source: walkdir::Error,
    },

    #[error("failed to read {}: {source}", path.display())]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("invalid front matter in {}: {source}", path.display())]
    FrontMatter {
        path: PathBuf,
        source: FrontMatterError,
    },

    #[error("{}: {source}", path.display())]
    Schema { path: PathBuf, source: SchemaError },

    #[error("duplicate slug `{slug}` produced by {first} and {second}")]
    DuplicateSlug {
        slug: String,
        first: String,
        second: String,
    },
}
