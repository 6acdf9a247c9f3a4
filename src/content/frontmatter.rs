//! Front-matter parsing

use serde_yaml::{Mapping, Value};
use thiserror::Error;

/// Errors raised while reading a front-matter block
#[derive(Debug, Error)]
pub enum FrontMatterError {
    #[error("invalid YAML: {0}")]
    Yaml(#[from] serde_yaml::Error),
    #[error("invalid TOML: {0}")]
    Toml(#[from] toml::de::Error),
    #[error("front matter must be a mapping of keys to values")]
    NotMapping,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Fence {
    Yaml,
    Toml,
}

impl Fence {
    fn marker(self) -> &'static str {
        match self {
            Fence::Yaml => "---",
            Fence::Toml => "+++",
        }
    }
}

/// Parse front-matter from content string
/// Returns (front_matter, remaining_content)
///
/// A file without a front-matter block yields an empty mapping and the
/// whole content as body. A block that is present but malformed is an error.
pub fn parse(content: &str) -> Result<(Mapping, &str), FrontMatterError> {
    let trimmed = content.trim_start();

    for fence in [Fence::Yaml, Fence::Toml] {
        if let Some((block, body)) = split_block(trimmed, fence.marker()) {
            let front_matter = match fence {
                Fence::Yaml => parse_yaml(block)?,
                Fence::Toml => parse_toml(block)?,
            };
            return Ok((front_matter, body));
        }
    }

    Ok((Mapping::new(), content))
}

/// Split `content` into the text between a pair of fence lines and the body
/// following the closing fence
fn split_block<'a>(content: &'a str, marker: &str) -> Option<(&'a str, &'a str)> {
    let rest = content.strip_prefix(marker)?;
    // The opening fence must stand alone on its line
    let rest = rest
        .strip_prefix("\r\n")
        .or_else(|| rest.strip_prefix('\n'))?;

    let mut offset = 0;
    for line in rest.split_inclusive('\n') {
        if line.trim_end() == marker {
            let block = &rest[..offset];
            let body = &rest[offset + line.len()..];
            return Some((block, body.trim_start_matches(['\n', '\r'])));
        }
        offset += line.len();
    }

    // No closing fence, treat as no front-matter
    None
}

fn parse_yaml(block: &str) -> Result<Mapping, FrontMatterError> {
    if block.trim().is_empty() {
        return Ok(Mapping::new());
    }

    match serde_yaml::from_str::<Value>(block)? {
        Value::Mapping(mapping) => Ok(mapping),
        Value::Null => Ok(Mapping::new()),
        _ => Err(FrontMatterError::NotMapping),
    }
}

fn parse_toml(block: &str) -> Result<Mapping, FrontMatterError> {
    let table: toml::Table = toml::from_str(block)?;
    Ok(table
        .into_iter()
        .map(|(key, value)| (Value::String(key), toml_to_yaml(value)))
        .collect())
}

/// Convert TOML values into the YAML value model so both front-matter
/// flavours validate the same way. Datetimes become their textual form.
fn toml_to_yaml(value: toml::Value) -> Value {
    match value {
        toml::Value::String(s) => Value::String(s),
        toml::Value::Integer(i) => Value::Number(i.into()),
        toml::Value::Float(f) => Value::Number(f.into()),
        toml::Value::Boolean(b) => Value::Bool(b),
        toml::Value::Datetime(dt) => Value::String(dt.to_string()),
        toml::Value::Array(items) => Value::Sequence(items.into_iter().map(toml_to_yaml).collect()),
        toml::Value::Table(table) => Value::Mapping(
            table
                .into_iter()
                .map(|(key, value)| (Value::String(key), toml_to_yaml(value)))
                .collect(),
        ),
    }
}
