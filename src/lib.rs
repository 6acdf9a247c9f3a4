//! folio: markdown content collections and an RSS feed for a personal site
//!
//! Markdown files are loaded into named collections (`posts`, validated
//! against a schema, and `notes`, kept as free-form front matter), and the
//! `posts` collection is syndicated as an RSS 2.0 feed.

pub mod cache;
pub mod commands;
pub mod config;
pub mod content;
pub mod feed;
pub mod generator;
pub mod helpers;
pub mod server;
pub mod watch;

use anyhow::Result;
use std::path::{Path, PathBuf};

/// Name of the site configuration file
pub const CONFIG_FILE: &str = "_config.yml";

/// A site rooted at a directory
#[derive(Debug, Clone)]
pub struct Site {
    /// Site configuration
    pub config: config::SiteConfig,
    /// Base directory
    pub base_dir: PathBuf,
    /// Public (output) directory
    pub public_dir: PathBuf,
}

impl Site {
    /// Create a new site from a directory, reading `_config.yml` if present
    pub fn new<P: AsRef<Path>>(base_dir: P) -> Result<Self> {
        let base_dir = base_dir.as_ref().to_path_buf();
        let config_path = base_dir.join(CONFIG_FILE);

        let config = if config_path.exists() {
            config::SiteConfig::load(&config_path)?
        } else {
            config::SiteConfig::default()
        };

        Ok(Self::with_config(base_dir, config))
    }

    /// Create a site with an explicit configuration
    pub fn with_config<P: AsRef<Path>>(base_dir: P, config: config::SiteConfig) -> Self {
        let base_dir = base_dir.as_ref().to_path_buf();
        let public_dir = base_dir.join(&config.public_dir);
        Self {
            config,
            base_dir,
            public_dir,
        }
    }

    pub fn config_path(&self) -> PathBuf {
        self.base_dir.join(CONFIG_FILE)
    }

    /// Directories the collections are loaded from
    pub fn content_dirs(&self) -> Vec<PathBuf> {
        let collections = &self.config.collections;
        vec![
            self.base_dir.join(&collections.posts.base),
            self.base_dir.join(&collections.notes.base),
        ]
    }

    /// Where the generated feed is written
    pub fn feed_output_path(&self) -> PathBuf {
        self.public_dir
            .join(self.config.feed.path.trim_start_matches('/'))
    }

    /// Load and validate every collection
    pub fn load_collections(&self) -> Result<content::Collections> {
        Ok(content::loader::ContentLoader::new(self).load_all()?)
    }

    /// Render the RSS feed for the current content
    pub fn build_feed(&self) -> Result<String> {
        let collections = self.load_collections()?;
        Ok(feed::render(&self.config, &collections.posts)?)
    }

    /// Generate the static outputs
    pub fn generate(&self) -> Result<()> {
        commands::generate::run(self)
    }

    /// Clean the public directory
    pub fn clean(&self) -> Result<()> {
        commands::clean::run(self)
    }

    /// Create a new post or note, optionally at `path` within its collection
    pub fn new_entry(&self, title: &str, layout: &str, path: Option<&str>) -> Result<PathBuf> {
        commands::new::create_entry(self, title, layout, path)
    }
}
