//! Initialize a new site

use anyhow::Result;
use std::fs;
use std::path::Path;

use crate::CONFIG_FILE;

const CONFIG_TEMPLATE: &str = r#"# Site
title: My Site
description: ''

# URL
## Absolute base URL, required for the RSS feed
site: https://example.com
root: /

# Directory
public_dir: dist

# Collections
collections:
  posts:
    base: src/posts
    pattern: '**/*.md'
  notes:
    base: src/notes
    pattern: '**/*.md'

# Feed
feed:
  enable: true
  path: feed.xml
  route: posts
  source: rss
"#;

const POST_SCAFFOLD: &str = "---
title: {{ title }}
published: {{ date }}
tags: []
---
";

const NOTE_SCAFFOLD: &str = "---
title: {{ title }}
---
";

/// Initialize a new site in the given directory
pub fn init_site(target_dir: &Path) -> Result<()> {
    let config_path = target_dir.join(CONFIG_FILE);
    if config_path.exists() {
        anyhow::bail!("{:?} already exists", config_path);
    }

    // Create directory structure
    fs::create_dir_all(target_dir.join("src/posts"))?;
    fs::create_dir_all(target_dir.join("src/notes"))?;
    fs::create_dir_all(target_dir.join("scaffolds"))?;

    fs::write(&config_path, CONFIG_TEMPLATE)?;

    // Create scaffold templates
    fs::write(target_dir.join("scaffolds/post.md"), POST_SCAFFOLD)?;
    fs::write(target_dir.join("scaffolds/note.md"), NOTE_SCAFFOLD)?;

    // Create a sample post
    let now = chrono::Local::now();
    let sample_post = format!(
        r#"---
title: Hello World
published: {}
tags: [meta]
---

This is your first post. Create another with

```bash
$ folio new "My New Post"
```

then run `folio generate` to write the feed, or `folio server` to preview it.
"#,
        now.format("%Y-%m-%d")
    );

    fs::write(target_dir.join("src/posts/hello-world.md"), sample_post)?;

    tracing::debug!("Initialized site at {:?}", target_dir);

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Site;
    use tempfile::TempDir;

    #[test]
    fn test_init_creates_valid_site() {
        let dir = TempDir::new().unwrap();
        init_site(dir.path()).unwrap();

        let site = Site::new(dir.path()).unwrap();
        assert_eq!(site.config.site.as_deref(), Some("https://example.com"));

        let collections = site.load_collections().unwrap();
        assert!(collections.posts.get("hello-world").is_some());

        let xml = site.build_feed().unwrap();
        assert!(xml.contains("https://example.com/posts/hello-world?src=rss"));
    }

    #[test]
    fn test_init_refuses_existing_site() {
        let dir = TempDir::new().unwrap();
        init_site(dir.path()).unwrap();
        assert!(init_site(dir.path()).is_err());
    }
}
