//! Entry and collection models

use indexmap::IndexMap;
use serde::Serialize;
use serde_yaml::Mapping;

use super::schema::PostData;
use super::LoadError;

/// A single content file, validated into `T`
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Entry<T> {
    /// Slug, unique within the collection
    pub id: String,

    /// Source path relative to the collection base, `/`-separated
    pub source: String,

    /// Front matter, validated against the collection schema
    pub data: T,

    /// Raw markdown following the front matter
    pub body: String,
}

/// A blog post
pub type Post = Entry<PostData>;

/// A note: front matter passes through unvalidated
pub type Note = Entry<Mapping>;

/// A loaded collection keyed by slug, iterated in ascending slug order
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(transparent)]
pub struct Collection<T> {
    entries: IndexMap<String, Entry<T>>,
}

impl<T> Default for Collection<T> {
    fn default() -> Self {
        Self {
            entries: IndexMap::new(),
        }
    }
}

impl<T> Collection<T> {
    /// Build a collection, rejecting entries that share a slug
    pub fn from_entries(mut entries: Vec<Entry<T>>) -> Result<Self, LoadError> {
        entries.sort_by(|a, b| a.id.cmp(&b.id).then_with(|| a.source.cmp(&b.source)));

        let mut map: IndexMap<String, Entry<T>> = IndexMap::with_capacity(entries.len());
        for entry in entries {
            if let Some(existing) = map.get(&entry.id) {
                return Err(LoadError::DuplicateSlug {
                    slug: entry.id,
                    first: existing.source.clone(),
                    second: entry.source,
                });
            }
            map.insert(entry.id.clone(), entry);
        }

        Ok(Self { entries: map })
    }

    /// Look up an entry by slug
    pub fn get(&self, slug: &str) -> Option<&Entry<T>> {
        self.entries.get(slug)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Entry<T>> {
        self.entries.values()
    }

    pub fn slugs(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }
}

impl<'a, T> IntoIterator for &'a Collection<T> {
    type Item = &'a Entry<T>;
    type IntoIter = indexmap::map::Values<'a, String, Entry<T>>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.values()
    }
}

/// Every collection of the site
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Collections {
    pub posts: Collection<PostData>,
    pub notes: Collection<Mapping>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(id: &str, source: &str) -> Entry<()> {
        Entry {
            id: id.to_string(),
            source: source.to_string(),
            data: (),
            body: String::new(),
        }
    }

    #[test]
    fn test_sorted_by_slug() {
        let collection = Collection::from_entries(vec![
            entry("zebra", "zebra.md"),
            entry("apple", "apple.md"),
            entry("mango", "fruit/mango.md"),
        ])
        .unwrap();
        let slugs: Vec<_> = collection.slugs().collect();
        assert_eq!(slugs, vec!["apple", "mango", "zebra"]);
        assert_eq!(collection.get("mango").unwrap().source, "fruit/mango.md");
    }

    #[test]
    fn test_duplicate_slug() {
        let err = Collection::from_entries(vec![
            entry("hello", "Hello.md"),
            entry("hello", "hello.md"),
        ])
        .unwrap_err();
        match err {
            LoadError::DuplicateSlug {
                slug,
                first,
                second,
            } => {
                assert_eq!(slug, "hello");
                assert_eq!(first, "Hello.md");
                assert_eq!(second, "hello.md");
            }
            other => panic!("unexpected error: {}", other),
        }
    }
}
