//! List site content

use anyhow::Result;
use indexmap::IndexMap;
use serde_json::Value as JsonValue;
use serde_yaml::Value as YamlValue;
use std::io::Write;

use crate::content::{Collections, Entry};
use crate::feed;
use crate::Site;

/// List site content by type
pub fn run(site: &Site, content_type: &str, json: bool) -> Result<()> {
    let collections = site.load_collections()?;
    let stdout = std::io::stdout();
    let mut out = stdout.lock();
    render(&collections, content_type, json, &mut out)
}

/// Write a listing of one content type to `out`
pub fn render<W: Write>(
    collections: &Collections,
    content_type: &str,
    json: bool,
    out: &mut W,
) -> Result<()> {
    match content_type {
        "post" | "posts" => {
            let posts = feed::sorted_posts(&collections.posts);
            if json {
                serde_json::to_writer_pretty(&mut *out, &posts)?;
                writeln!(out)?;
                return Ok(());
            }
            writeln!(out, "Posts ({}):", posts.len())?;
            for post in posts {
                writeln!(
                    out,
                    "  {} - {} [{}]",
                    post.data.published.format("%Y-%m-%d"),
                    post.data.title,
                    post.source
                )?;
            }
        }
        "note" | "notes" => {
            if json {
                let notes: IndexMap<&str, Entry<JsonValue>> = collections
                    .notes
                    .iter()
                    .map(|note| {
                        let entry = Entry {
                            id: note.id.clone(),
                            source: note.source.clone(),
                            data: yaml_to_json(&YamlValue::Mapping(note.data.clone())),
                            body: note.body.clone(),
                        };
                        (note.id.as_str(), entry)
                    })
                    .collect();
                serde_json::to_writer_pretty(&mut *out, &notes)?;
                writeln!(out)?;
                return Ok(());
            }
            writeln!(out, "Notes ({}):", collections.notes.len())?;
            for note in &collections.notes {
                writeln!(out, "  {} [{}]", note.id, note.source)?;
            }
        }
        "tag" | "tags" => {
            let tags = tag_counts(collections);
            if json {
                serde_json::to_writer_pretty(&mut *out, &tags)?;
                writeln!(out)?;
                return Ok(());
            }
            writeln!(out, "Tags ({}):", tags.len())?;
            for (tag, count) in tags {
                writeln!(out, "  {} ({})", tag, count)?;
            }
        }
        _ => {
            anyhow::bail!(
                "Unknown type: {}. Available: post, note, tag",
                content_type
            );
        }
    }

    Ok(())
}

/// Tags across all posts with their post counts, most used first
pub fn tag_counts(collections: &Collections) -> IndexMap<String, usize> {
    let mut tags: IndexMap<String, usize> = IndexMap::new();
    for post in &collections.posts {
        for tag in &post.data.tags {
            *tags.entry(tag.clone()).or_insert(0) += 1;
        }
    }
    tags.sort_by(|a_tag, a_count, b_tag, b_count| {
        b_count.cmp(a_count).then_with(|| a_tag.cmp(b_tag))
    });
    tags
}

/// Convert free-form front matter to JSON. YAML allows non-string mapping
/// keys (`2024: x`), JSON does not, so keys are written out as strings.
fn yaml_to_json(value: &YamlValue) -> JsonValue {
    match value {
        YamlValue::Null => JsonValue::Null,
        YamlValue::Bool(b) => JsonValue::Bool(*b),
        YamlValue::Number(n) => {
            if let Some(i) = n.as_i64() {
                JsonValue::from(i)
            } else if let Some(u) = n.as_u64() {
                JsonValue::from(u)
            } else {
                n.as_f64()
                    .and_then(serde_json::Number::from_f64)
                    .map(JsonValue::Number)
                    .unwrap_or(JsonValue::Null)
            }
        }
        YamlValue::String(s) => JsonValue::String(s.clone()),
        YamlValue::Sequence(seq) => JsonValue::Array(seq.iter().map(yaml_to_json).collect()),
        YamlValue::Mapping(map) => JsonValue::Object(
            map.iter()
                .map(|(k, v)| (key_string(k), yaml_to_json(v)))
                .collect(),
        ),
        YamlValue::Tagged(tagged) => yaml_to_json(&tagged.value),
    }
}

fn key_string(key: &YamlValue) -> String {
    match key {
        YamlValue::String(s) => s.clone(),
        YamlValue::Number(n) => n.to_string(),
        YamlValue::Bool(b) => b.to_string(),
        YamlValue::Null => "null".to_string(),
        other => serde_yaml::to_string(other)
            .map(|s| s.trim_end().to_string())
            .unwrap_or_default(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::content::{Collection, Entry, PostData};
    use chrono::{TimeZone, Utc};

    fn collections() -> Collections {
        let post = |id: &str, day: u32, tags: &[&str]| Entry {
            id: id.to_string(),
            source: format!("{}.md", id),
            data: PostData {
                title: id.to_uppercase(),
                published: Utc.with_ymd_and_hms(2024, 1, day, 0, 0, 0).unwrap(),
                tags: tags.iter().map(|t| t.to_string()).collect(),
            },
            body: String::new(),
        };
        Collections {
            posts: Collection::from_entries(vec![
                post("a", 1, &["rust", "web"]),
                post("b", 2, &["rust"]),
                post("c", 3, &[]),
            ])
            .unwrap(),
            notes: Collection::default(),
        }
    }

    #[test]
    fn test_tag_counts() {
        let tags = tag_counts(&collections());
        let tags: Vec<_> = tags.into_iter().collect();
        assert_eq!(
            tags,
            vec![("rust".to_string(), 2), ("web".to_string(), 1)]
        );
    }

    #[test]
    fn test_list_posts_newest_first() {
        let mut out = Vec::new();
        render(&collections(), "posts", false, &mut out).unwrap();
        let text = String::from_utf8(out).unwrap();
        let lines: Vec<_> = text.lines().collect();
        assert_eq!(lines[0], "Posts (3):");
        assert_eq!(lines[1], "  2024-01-03 - C [c.md]");
        assert_eq!(lines[3], "  2024-01-01 - A [a.md]");
    }

    #[test]
    fn test_list_json() {
        let mut out = Vec::new();
        render(&collections(), "post", true, &mut out).unwrap();
        let value: serde_json::Value = serde_json::from_slice(&out).unwrap();
        assert_eq!(value[0]["id"], "c");
        assert_eq!(value[0]["data"]["title"], "C");
    }

    #[test]
    fn test_unknown_type() {
        let mut out = Vec::new();
        assert!(render(&collections(), "page", false, &mut out).is_err());
    }

    #[test]
    fn test_list_notes_json_with_non_string_keys() {
        let data: serde_yaml::Mapping =
            serde_yaml::from_str("title: Years
2024: x
true: yes
nested:
  1: one
").unwrap();
        let note = Entry {
            id: "years".to_string(),
            source: "years.md".to_string(),
            data,
            body: "Body".to_string(),
        };
        let collections = Collections {
            posts: Collection::default(),
            notes: Collection::from_entries(vec![note]).unwrap(),
        };

        let mut out = Vec::new();
        render(&collections, "notes", true, &mut out).unwrap();
        let value: serde_json::Value = serde_json::from_slice(&out).unwrap();
        let data = &value["years"]["data"];
        assert_eq!(data["title"], "Years");
        assert_eq!(data["2024"], "x");
        assert_eq!(data["true"], "yes");
        assert_eq!(data["nested"]["1"], "one");
        assert_eq!(value["years"]["body"], "Body");
    }
}
