//! Post schema: the typed shape every file in the `posts` collection must have

use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use serde::Serialize;
use serde_yaml::{Mapping, Value};
use thiserror::Error;

/// The first constraint a record's front matter violates
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("field `{field}`: {problem}")]
pub struct SchemaError {
    pub field: String,
    pub problem: Problem,
}

impl SchemaError {
    fn new(field: impl Into<String>, problem: Problem) -> Self {
        Self {
            field: field.into(),
            problem,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Problem {
    #[error("required field is missing")]
    Missing,
    #[error("expected {expected}, found {found}")]
    WrongType {
        expected: &'static str,
        found: &'static str,
    },
    #[error("must not be empty")]
    Empty,
    #[error("`{0}` is not a valid date")]
    InvalidDate(String),
}

/// Validated front matter of a post
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PostData {
    pub title: String,
    pub published: DateTime<Utc>,
    pub tags: Vec<String>,
}

impl PostData {
    /// Validate front matter against the post schema.
    ///
    /// Fields are checked in declaration order (`title`, `published`,
    /// `tags`) and the first violation is returned. Keys outside the schema
    /// are ignored.
    pub fn from_front_matter(fm: &Mapping) -> Result<Self, SchemaError> {
        let title = match fm.get("title") {
            None => return Err(SchemaError::new("title", Problem::Missing)),
            Some(Value::String(s)) if s.trim().is_empty() => {
                return Err(SchemaError::new("title", Problem::Empty))
            }
            Some(Value::String(s)) => s.clone(),
            Some(other) => {
                return Err(SchemaError::new(
                    "title",
                    Problem::WrongType {
                        expected: "string",
                        found: value_kind(other),
                    },
                ))
            }
        };

        let published = match fm.get("published") {
            None | Some(Value::Null) => return Err(SchemaError::new("published", Problem::Missing)),
            Some(value) => coerce_date(value).map_err(|p| SchemaError::new("published", p))?,
        };

        let tags = match fm.get("tags") {
            None | Some(Value::Null) => Vec::new(),
            Some(Value::Sequence(items)) => items
                .iter()
                .enumerate()
                .map(|(i, item)| match item {
                    Value::String(s) => Ok(s.clone()),
                    other => Err(SchemaError::new(
                        format!("tags[{}]", i),
                        Problem::WrongType {
                            expected: "string",
                            found: value_kind(other),
                        },
                    )),
                })
                .collect::<Result<Vec<_>, _>>()?,
            Some(other) => {
                return Err(SchemaError::new(
                    "tags",
                    Problem::WrongType {
                        expected: "list of strings",
                        found: value_kind(other),
                    },
                ))
            }
        };

        Ok(Self {
            title,
            published,
            tags,
        })
    }
}

/// Coerce a date-like front-matter value into a UTC timestamp.
///
/// Strings are parsed in a handful of common formats; integers are read as
/// milliseconds since the Unix epoch.
pub fn coerce_date(value: &Value) -> Result<DateTime<Utc>, Problem> {
    match value {
        Value::String(s) => parse_date_string(s).ok_or_else(|| Problem::InvalidDate(s.clone())),
        Value::Number(n) => {
            let millis = n.as_i64().or_else(|| {
                n.as_f64()
                    .filter(|f| f.is_finite())
                    .map(|f| f.trunc() as i64)
            });
            millis
                .and_then(DateTime::from_timestamp_millis)
                .ok_or_else(|| Problem::InvalidDate(n.to_string()))
        }
        other => Err(Problem::WrongType {
            expected: "date",
            found: value_kind(other),
        }),
    }
}

/// Parse a date string in various formats
fn parse_date_string(s: &str) -> Option<DateTime<Utc>> {
    let s = s.trim();
    if s.is_empty() {
        return None;
    }

    // RFC 3339 / ISO 8601 with offset
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Some(dt.with_timezone(&Utc));
    }
    if let Ok(dt) = DateTime::parse_from_str(s, "%Y-%m-%dT%H:%M:%S%z") {
        return Some(dt.with_timezone(&Utc));
    }

    // Timestamps without an offset are taken as UTC
    let datetime_formats = [
        "%Y-%m-%d %H:%M:%S",
        "%Y/%m/%d %H:%M:%S",
        "%Y-%m-%d %H:%M",
        "%Y/%m/%d %H:%M",
        "%Y-%m-%dT%H:%M:%S",
        "%Y-%m-%dT%H:%M:%S%.f",
        "%Y-%m-%dT%H:%M",
    ];
    for fmt in datetime_formats {
        if let Ok(dt) = NaiveDateTime::parse_from_str(s, fmt) {
            return Some(dt.and_utc());
        }
    }

    for fmt in ["%Y-%m-%d", "%Y/%m/%d"] {
        if let Ok(d) = NaiveDate::parse_from_str(s, fmt) {
            return d.and_hms_opt(0, 0, 0).map(|dt| dt.and_utc());
        }
    }

    None
}

fn value_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Sequence(_) => "list",
        Value::Mapping(_) => "mapping",
        Value::Tagged(_) => "tagged value",
    }
}
