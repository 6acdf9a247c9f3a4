//! Site configuration (_config.yml)

use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// Main site configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SiteConfig {
    // Site
    pub title: String,
    pub description: String,

    // URL
    /// Absolute base URL of the deployed site, e.g. `https://example.com`
    pub site: Option<String>,
    /// Path prefix the site is served under
    pub root: String,

    // Directory
    pub public_dir: String,

    pub collections: CollectionsConfig,
    pub feed: FeedConfig,
}

impl Default for SiteConfig {
    fn default() -> Self {
        Self {
            title: "My Site".to_string(),
            description: String::new(),

            site: None,
            root: "/".to_string(),

            public_dir: "dist".to_string(),

            collections: CollectionsConfig::default(),
            feed: FeedConfig::default(),
        }
    }
}

impl SiteConfig {
    /// Load configuration from a file
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = fs::read_to_string(path.as_ref())?;
        if content.trim().is_empty() {
            return Ok(Self::default());
        }
        let config: SiteConfig = serde_yaml::from_str(&content)?;
        Ok(config)
    }

    /// Title of the feed channel, falling back to the site title
    pub fn feed_title(&self) -> &str {
        self.feed.title.as_deref().unwrap_or(&self.title)
    }

    /// Description of the feed channel, falling back to the site description
    pub fn feed_description(&self) -> &str {
        self.feed
            .description
            .as_deref()
            .unwrap_or(&self.description)
    }
}

/// Locations of the two content collections
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CollectionsConfig {
    pub posts: CollectionConfig,
    pub notes: CollectionConfig,
}

impl Default for CollectionsConfig {
    fn default() -> Self {
        Self {
            posts: CollectionConfig::new("src/posts"),
            notes: CollectionConfig::new("src/notes"),
        }
    }
}

/// Where a collection's files live and which of them belong to it
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct CollectionConfig {
    /// Directory relative to the site root
    pub base: String,
    /// Glob matched against paths relative to `base`
    #[serde(default = "default_pattern")]
    pub pattern: String,
}

impl CollectionConfig {
    pub fn new(base: &str) -> Self {
        Self {
            base: base.to_string(),
            pattern: default_pattern(),
        }
    }
}

fn default_pattern() -> String {
    "**/*.md".to_string()
}

/// RSS feed configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct FeedConfig {
    pub enable: bool,
    /// Output path under `public_dir`, also the dev server route
    pub path: String,
    pub title: Option<String>,
    pub description: Option<String>,
    /// Route segment posts are published under
    pub route: String,
    /// Value of the `src` query parameter appended to item links
    pub source: String,
}

impl Default for FeedConfig {
    fn default() -> Self {
        Self {
            enable: true,
            path: "feed.xml".to_string(),
            title: None,
            description: None,
            route: "posts".to_string(),
            source: "rss".to_string(),
        }
    }
}
