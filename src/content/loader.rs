//! Content loader - loads collections from their base directories

use glob::{MatchOptions, Pattern};
use serde_yaml::{Mapping, Value};
use std::fs;
use std::path::{Path, PathBuf};
use walkdir::{DirEntry, WalkDir};

use super::{frontmatter, Collection, Collections, Entry, LoadError, PostData, SchemaError};
use crate::config::CollectionConfig;
use crate::Site;

const MATCH_OPTIONS: MatchOptions = MatchOptions {
    case_sensitive: true,
    require_literal_separator: true,
    require_literal_leading_dot: true,
};

/// A file that belongs to a collection
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceFile {
    /// Full path on disk
    pub path: PathBuf,
    /// Path relative to the collection base, `/`-separated
    pub relative: String,
}

/// Loads content from the configured collection directories
pub struct ContentLoader<'a> {
    site: &'a Site,
}

impl<'a> ContentLoader<'a> {
    /// Create a new content loader
    pub fn new(site: &'a Site) -> Self {
        Self { site }
    }

    /// Load every collection
    pub fn load_all(&self) -> Result<Collections, LoadError> {
        let posts = self.load_posts()?;
        let notes = self.load_notes()?;

        tracing::info!("Loaded {} posts and {} notes", posts.len(), notes.len());

        Ok(Collections { posts, notes })
    }

    /// Load the `posts` collection, validating each file against the post schema
    pub fn load_posts(&self) -> Result<Collection<PostData>, LoadError> {
        self.load(&self.site.config.collections.posts, PostData::from_front_matter)
    }

    /// Load the `notes` collection; front matter is kept as-is
    pub fn load_notes(&self) -> Result<Collection<Mapping>, LoadError> {
        self.load(&self.site.config.collections.notes, |fm| Ok(fm.clone()))
    }

    fn load<T, F>(&self, collection: &CollectionConfig, validate: F) -> Result<Collection<T>, LoadError>
    where
        F: Fn(&Mapping) -> Result<T, SchemaError>,
    {
        let base = self.site.base_dir.join(&collection.base);
        let files = matching_files(&base, &collection.pattern)?;

        let entries = files
            .iter()
            .map(|file| load_entry(file, &validate))
            .collect::<Result<Vec<_>, _>>()?;

        Collection::from_entries(entries)
    }
}

/// Load a single entry from a file
fn load_entry<T, F>(file: &SourceFile, validate: F) -> Result<Entry<T>, LoadError>
where
    F: Fn(&Mapping) -> Result<T, SchemaError>,
{
    let content = fs::read_to_string(&file.path).map_err(|source| LoadError::Io {
        path: file.path.clone(),
        source,
    })?;

    let (fm, body) = frontmatter::parse(&content).map_err(|source| LoadError::FrontMatter {
        path: file.path.clone(),
        source,
    })?;

    let data = validate(&fm).map_err(|source| LoadError::Schema {
        path: file.path.clone(),
        source,
    })?;

    let id = match fm.get("slug").and_then(Value::as_str).map(str::trim) {
        Some(slug) if !slug.is_empty() => slug.to_string(),
        _ => derive_slug(&file.relative),
    };

    tracing::debug!("Loaded {} as `{}`", file.relative, id);

    Ok(Entry {
        id,
        source: file.relative.clone(),
        data,
        body: body.to_string(),
    })
}

/// Find the files under `base` whose relative path matches `pattern`.
///
/// Results are sorted by relative path. Hidden files and directories, and
/// names starting with `_`, are skipped. A missing `base` yields no files.
pub fn matching_files(base: &Path, pattern: &str) -> Result<Vec<SourceFile>, LoadError> {
    let glob = Pattern::new(pattern).map_err(|source| LoadError::Pattern {
        pattern: pattern.to_string(),
        source,
    })?;

    if !base.is_dir() {
        tracing::debug!("Collection directory {:?} does not exist", base);
        return Ok(Vec::new());
    }

    let mut files = Vec::new();

    for entry in WalkDir::new(base)
        .follow_links(true)
        .into_iter()
        .filter_entry(|e| e.depth() == 0 || !is_ignored(e))
    {
        let entry = entry.map_err(|source| LoadError::Walk {
            path: base.to_path_buf(),
            source,
        })?;
        if !entry.file_type().is_file() {
            continue;
        }

        let relative = relative_path(base, entry.path());
        if glob.matches_with(&relative, MATCH_OPTIONS) {
            files.push(SourceFile {
                path: entry.path().to_path_buf(),
                relative,
            });
        }
    }

    files.sort_by(|a, b| a.relative.cmp(&b.relative));
    Ok(files)
}

fn is_ignored(entry: &DirEntry) -> bool {
    entry
        .file_name()
        .to_str()
        .map(|name| name.starts_with('.') || name.starts_with('_'))
        .unwrap_or(false)
}

fn relative_path(base: &Path, path: &Path) -> String {
    path.strip_prefix(base)
        .unwrap_or(path)
        .components()
        .map(|c| c.as_os_str().to_string_lossy())
        .collect::<Vec<_>>()
        .join("/")
}

/// Derive a slug from a path relative to the collection base.
///
/// Each segment of the path (extension removed) is slugified, and a trailing
/// `index` segment is dropped so `guides/index.md` becomes `guides`.
pub fn derive_slug(relative: &str) -> String {
    let without_ext = match relative.rfind('.') {
        Some(dot) if !relative[dot..].contains('/') => &relative[..dot],
        _ => relative,
    };

    let mut segments: Vec<String> = without_ext.split('/').map(slug::slugify).collect();
    if segments.len() > 1 && segments.last().map(String::as_str) == Some("index") {
        segments.pop();
    }

    segments.join("/")
}
