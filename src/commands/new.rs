//! Create a new post or note

use anyhow::Result;
use chrono::SecondsFormat;
use std::fs;
use std::path::{Component, Path, PathBuf};

use crate::helpers::yaml_quote;
use crate::Site;

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

/// Create a new post or note and return its path.
///
/// `layout` is `post` or `note`. A `scaffolds/<layout>.md` file in the site
/// overrides the built-in template; `{{ title }}` is replaced by the quoted
/// title and `{{ date }}` by the current time.
pub fn create_entry(site: &Site, title: &str, layout: &str, path: Option<&str>) -> Result<PathBuf> {
    let collections = &site.config.collections;
    let (target_dir, default_scaffold) = match layout {
        "post" => (site.base_dir.join(&collections.posts.base), POST_SCAFFOLD),
        "note" => (site.base_dir.join(&collections.notes.base), NOTE_SCAFFOLD),
        other => anyhow::bail!("Unknown layout: {}. Available: post, note", other),
    };

    let name = match path {
        Some(p) => {
            check_relative(p)?;
            p.trim_end_matches(".md").to_string()
        }
        None => slug::slugify(title),
    };
    if name.is_empty() {
        anyhow::bail!("Cannot derive a file name from title {:?}", title);
    }
    let file_path = target_dir.join(format!("{}.md", name));

    // Check if file already exists
    if file_path.exists() {
        anyhow::bail!("File already exists: {:?}", file_path);
    }

    // Load scaffold template
    let scaffold_path = site
        .base_dir
        .join("scaffolds")
        .join(format!("{}.md", layout));
    let scaffold = if scaffold_path.exists() {
        fs::read_to_string(&scaffold_path)?
    } else {
        default_scaffold.to_string()
    };

    let now = chrono::Local::now();
    let content = scaffold
        .replace("{{ title }}", &yaml_quote(title))
        .replace(
            "{{ date }}",
            &now.to_rfc3339_opts(SecondsFormat::Secs, false),
        );

    if let Some(parent) = file_path.parent() {
        fs::create_dir_all(parent)?;
    }
    fs::write(&file_path, content)?;

    tracing::info!("Created {:?}", file_path);

    Ok(file_path)
}

/// `--path` must stay inside the collection directory
fn check_relative(path: &str) -> Result<()> {
    let path = Path::new(path);
    let escapes = path.is_absolute()
        || path.components().any(|c| {
            matches!(
                c,
                Component::ParentDir | Component::RootDir | Component::Prefix(_)
            )
        });
    if escapes {
        anyhow::bail!(
            "Path must be relative to the collection directory: {:?}",
            path
        );
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::SiteConfig;
    use crate::content::loader::ContentLoader;
    use tempfile::TempDir;

    #[test]
    fn test_new_post_is_loadable() {
        let dir = TempDir::new().unwrap();
        let site = Site::with_config(dir.path(), SiteConfig::default());

        let path = create_entry(&site, "Hello: World", "post", None).unwrap();
        assert_eq!(path, dir.path().join("src/posts/hello-world.md"));

        let posts = ContentLoader::new(&site).load_posts().unwrap();
        let post = posts.get("hello-world").unwrap();
        assert_eq!(post.data.title, "Hello: World");
        assert!(post.data.tags.is_empty());
    }

    #[test]
    fn test_new_note_with_path() {
        let dir = TempDir::new().unwrap();
        let site = Site::with_config(dir.path(), SiteConfig::default());

        let path = site.new_entry("Quick thought", "note", Some("2024/thought")).unwrap();
        assert_eq!(path, dir.path().join("src/notes/2024/thought.md"));

        let notes = ContentLoader::new(&site).load_notes().unwrap();
        assert!(notes.get("2024/thought").is_some());
    }

    #[test]
    fn test_refuses_overwrite() {
        let dir = TempDir::new().unwrap();
        let site = Site::with_config(dir.path(), SiteConfig::default());

        create_entry(&site, "Once", "post", None).unwrap();
        assert!(create_entry(&site, "Once", "post", None).is_err());
    }

    #[test]
    fn test_custom_scaffold() {
        let dir = TempDir::new().unwrap();
        fs::create_dir_all(dir.path().join("scaffolds")).unwrap();
        fs::write(
            dir.path().join("scaffolds/post.md"),
            "---\ntitle: {{ title }}\npublished: {{ date }}\ntags: [draft]\n---\n",
        )
        .unwrap();
        let site = Site::with_config(dir.path(), SiteConfig::default());

        create_entry(&site, "Scaffolded", "post", None).unwrap();
        let posts = ContentLoader::new(&site).load_posts().unwrap();
        assert_eq!(posts.get("scaffolded").unwrap().data.tags, vec!["draft"]);
    }

    #[test]
    fn test_unknown_layout() {
        let dir = TempDir::new().unwrap();
        let site = Site::with_config(dir.path(), SiteConfig::default());
        assert!(create_entry(&site, "Page", "page", None).is_err());
    }

    #[test]
    fn test_path_cannot_leave_collection() {
        let dir = TempDir::new().unwrap();
        let site = Site::with_config(dir.path().join("site"), SiteConfig::default());

        assert!(create_entry(&site, "Escape", "post", Some("../../outside")).is_err());
        assert!(!dir.path().join("outside.md").exists());

        let absolute = dir.path().join("absolute");
        let absolute = absolute.to_str().unwrap();
        assert!(create_entry(&site, "Escape", "note", Some(absolute)).is_err());
        assert!(!dir.path().join("absolute.md").exists());

        assert!(create_entry(&site, "Nested", "note", Some("a/../b")).is_err());
    }
}
