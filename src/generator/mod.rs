//! Generator module - writes derived files into the public directory

use anyhow::Result;
use std::fs;
use std::path::PathBuf;

use crate::content::Collections;
use crate::feed;
use crate::Site;

/// Writes the outputs derived from loaded collections
pub struct Generator {
    site: Site,
}

impl Generator {
    /// Create a new generator
    pub fn new(site: &Site) -> Self {
        Self { site: site.clone() }
    }

    /// Generate every output, returning the paths written
    pub fn generate(&self, collections: &Collections) -> Result<Vec<PathBuf>> {
        // Ensure public directory exists
        fs::create_dir_all(&self.site.public_dir)?;

        let mut written = Vec::new();
        if let Some(path) = self.generate_feed(collections)? {
            written.push(path);
        }

        Ok(written)
    }

    /// Generate the RSS feed
    fn generate_feed(&self, collections: &Collections) -> Result<Option<PathBuf>> {
        let feed_config = &self.site.config.feed;
        if !feed_config.enable {
            tracing::info!("Feed disabled, skipping");
            return Ok(None);
        }

        let xml = feed::render(&self.site.config, &collections.posts)?;

        let output_path = self.site.feed_output_path();
        if let Some(parent) = output_path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(&output_path, xml)?;
        tracing::info!(
            "Generated {} ({} posts)",
            feed_config.path,
            collections.posts.len()
        );

        Ok(Some(output_path))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::SiteConfig;
    use crate::content::loader::ContentLoader;
    use tempfile::TempDir;

    fn site(dir: &TempDir, site_url: Option<&str>) -> Site {
        let config = SiteConfig {
            site: site_url.map(str::to_string),
            ..SiteConfig::default()
        };
        Site::with_config(dir.path(), config)
    }

    #[test]
    fn test_writes_feed() {
        let dir = TempDir::new().unwrap();
        let posts_dir = dir.path().join("src/posts");
        fs::create_dir_all(&posts_dir).unwrap();
        fs::write(
            posts_dir.join("hello-world.md"),
            "---\ntitle: Hello\npublished: 2024-01-01\n---\n",
        )
        .unwrap();

        let site = site(&dir, Some("https://example.com"));
        let collections = ContentLoader::new(&site).load_all().unwrap();
        let written = Generator::new(&site).generate(&collections).unwrap();

        assert_eq!(written, vec![dir.path().join("dist/feed.xml")]);
        let xml = fs::read_to_string(&written[0]).unwrap();
        assert!(xml.contains("https://example.com/posts/hello-world?src=rss"));
    }

    #[test]
    fn test_disabled_feed() {
        let dir = TempDir::new().unwrap();
        let mut site = site(&dir, None);
        site.config.feed.enable = false;

        let written = Generator::new(&site)
            .generate(&Collections::default())
            .unwrap();
        assert!(written.is_empty());
        assert!(dir.path().join("dist").is_dir());
    }

    #[test]
    fn test_missing_site_fails() {
        let dir = TempDir::new().unwrap();
        let site = site(&dir, None);
        let err = Generator::new(&site)
            .generate(&Collections::default())
            .unwrap_err();
        assert!(err.to_string().contains("`site`"));
    }
}
