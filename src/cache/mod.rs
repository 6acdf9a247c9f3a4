//! Content store
//!
//! Keeps the most recently loaded collections in memory together with a
//! fingerprint of the files they were loaded from. A load is only repeated
//! when the fingerprint changes, so callers can ask for the collections on
//! every request and pay for a reload only after an edit.

use std::collections::hash_map::DefaultHasher;
use std::fs;
use std::hash::{Hash, Hasher};
use std::sync::Arc;

use crate::content::loader::{matching_files, ContentLoader};
use crate::content::{Collections, LoadError};
use crate::Site;

/// In-memory table of loaded collections, rebuilt on demand
pub struct ContentStore {
    site: Site,
    fingerprint: Option<u64>,
    snapshot: Option<Arc<Collections>>,
}

impl ContentStore {
    pub fn new(site: Site) -> Self {
        Self {
            site,
            fingerprint: None,
            snapshot: None,
        }
    }

    pub fn site(&self) -> &Site {
        &self.site
    }

    /// Swap in a new site (e.g. after the config file changed) and force a
    /// reload on the next `get`
    pub fn set_site(&mut self, site: Site) {
        self.site = site;
        self.invalidate();
    }

    /// Current collections, reloading them if any source file changed.
    ///
    /// A failed reload keeps the previous snapshot in place.
    pub fn get(&mut self) -> Result<Arc<Collections>, LoadError> {
        let fingerprint = fingerprint(&self.site)?;

        if let (Some(snapshot), Some(previous)) = (&self.snapshot, self.fingerprint) {
            if previous == fingerprint {
                tracing::debug!("Content unchanged, reusing loaded collections");
                return Ok(Arc::clone(snapshot));
            }
        }

        let collections = Arc::new(ContentLoader::new(&self.site).load_all()?);
        self.fingerprint = Some(fingerprint);
        self.snapshot = Some(Arc::clone(&collections));
        Ok(collections)
    }

    /// Most recent successfully loaded collections, if any
    pub fn snapshot(&self) -> Option<Arc<Collections>> {
        self.snapshot.clone()
    }

    /// Force the next `get` to reload
    pub fn invalidate(&mut self) {
        self.fingerprint = None;
    }
}

/// Calculate a hash for file content
pub fn hash_content(content: &[u8]) -> u64 {
    let mut hasher = DefaultHasher::new();
    content.hash(&mut hasher);
    hasher.finish()
}

/// Fingerprint every file that belongs to a collection: relative path and
/// content hash, in sorted order
pub fn fingerprint(site: &Site) -> Result<u64, LoadError> {
    let mut hasher = DefaultHasher::new();

    let collections = &site.config.collections;
    for collection in [&collections.posts, &collections.notes] {
        collection.base.hash(&mut hasher);
        collection.pattern.hash(&mut hasher);

        let base = site.base_dir.join(&collection.base);
        for file in matching_files(&base, &collection.pattern)? {
            let content = fs::read(&file.path).map_err(|source| LoadError::Io {
                path: file.path.clone(),
                source,
            })?;
            file.relative.hash(&mut hasher);
            hash_content(&content).hash(&mut hasher);
        }
    }

    Ok(hasher.finish())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::SiteConfig;
    use tempfile::TempDir;

    fn write(dir: &TempDir, relative: &str, content: &str) {
        let path = dir.path().join(relative);
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(path, content).unwrap();
    }

    const POST: &str = "---\ntitle: One\npublished: 2024-01-01\n---\n";

    #[test]
    fn test_unchanged_tree_is_not_reloaded() {
        let dir = TempDir::new().unwrap();
        write(&dir, "src/posts/one.md", POST);

        let mut store = ContentStore::new(Site::with_config(dir.path(), SiteConfig::default()));
        let first = store.get().unwrap();
        let second = store.get().unwrap();
        assert!(Arc::ptr_eq(&first, &second));
    }

    #[test]
    fn test_added_file_triggers_reload() {
        let dir = TempDir::new().unwrap();
        write(&dir, "src/posts/one.md", POST);

        let mut store = ContentStore::new(Site::with_config(dir.path(), SiteConfig::default()));
        assert_eq!(store.get().unwrap().posts.len(), 1);

        write(
            &dir,
            "src/posts/two.md",
            "---\ntitle: Two\npublished: 2024-02-01\n---\n",
        );
        let reloaded = store.get().unwrap();
        assert_eq!(reloaded.posts.len(), 2);
    }

    #[test]
    fn test_failed_reload_keeps_snapshot() {
        let dir = TempDir::new().unwrap();
        write(&dir, "src/posts/one.md", POST);

        let mut store = ContentStore::new(Site::with_config(dir.path(), SiteConfig::default()));
        let good = store.get().unwrap();

        write(&dir, "src/posts/broken.md", "---\ntitle: Broken\n---\n");
        assert!(store.get().is_err());
        assert!(Arc::ptr_eq(&good, &store.snapshot().unwrap()));
    }

    #[test]
    fn test_invalidate_forces_reload() {
        let dir = TempDir::new().unwrap();
        write(&dir, "src/posts/one.md", POST);

        let mut store = ContentStore::new(Site::with_config(dir.path(), SiteConfig::default()));
        let first = store.get().unwrap();
        store.invalidate();
        let second = store.get().unwrap();
        assert!(!Arc::ptr_eq(&first, &second));
        assert_eq!(first, second);
    }

    #[test]
    fn test_hash_content() {
        assert_eq!(hash_content(b"same"), hash_content(b"same"));
        assert_ne!(hash_content(b"one"), hash_content(b"two"));
    }
}
