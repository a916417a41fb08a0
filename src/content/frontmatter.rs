//! Front-matter parsing

use chrono::{DateTime, NaiveDate, NaiveDateTime};
use serde::{Deserialize, Deserializer, Serialize};
use std::collections::HashMap;
use thiserror::Error;

/// Errors raised while reading a content file's front-matter
#[derive(Debug, Error)]
pub enum FrontMatterError {
    #[error("file does not start with a `---` front-matter block")]
    Missing,

    #[error("front-matter block is never closed with `---`")]
    Unterminated,

    #[error("invalid YAML front-matter: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("missing required field `{0}`")]
    MissingField(&'static str),

    #[error("unrecognized date `{0}` in publishedAt")]
    InvalidDate(String),
}

/// Custom deserializer that accepts a comma-separated string or a list of strings.
/// Lists are joined back into the comma-separated form.
fn string_or_joined<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    use serde::de::{self, SeqAccess, Visitor};
    use std::fmt;

    struct StringOrJoined;

    impl<'de> Visitor<'de> for StringOrJoined {
        type Value = Option<String>;

        fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
            formatter.write_str("a comma-separated string or a list of strings")
        }

        fn visit_str<E>(self, value: &str) -> Result<Self::Value, E>
        where
            E: de::Error,
        {
            Ok(Some(value.to_string()))
        }

        fn visit_string<E>(self, value: String) -> Result<Self::Value, E>
        where
            E: de::Error,
        {
            Ok(Some(value))
        }

        fn visit_seq<S>(self, mut seq: S) -> Result<Self::Value, S::Error>
        where
            S: SeqAccess<'de>,
        {
            let mut items = Vec::new();
            while let Some(item) = seq.next_element::<String>()? {
                items.push(item);
            }
            Ok(Some(items.join(", ")))
        }

        fn visit_none<E>(self) -> Result<Self::Value, E>
        where
            E: de::Error,
        {
            Ok(None)
        }

        fn visit_unit<E>(self) -> Result<Self::Value, E>
        where
            E: de::Error,
        {
            Ok(None)
        }
    }

    deserializer.deserialize_any(StringOrJoined)
}

/// External links of a content item
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Links {
    pub github: Option<String>,
    pub website: Option<String>,
}

/// Front-matter exactly as written, before validation
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct RawFrontMatter {
    title: Option<String>,
    description: Option<String>,
    image: Option<String>,
    #[serde(rename = "publishedAt", alias = "published_at", alias = "date")]
    published_at: Option<String>,
    active: Option<bool>,
    links: Option<Links>,
    #[serde(deserialize_with = "string_or_joined")]
    tags: Option<String>,

    #[serde(flatten)]
    extra: HashMap<String, serde_yaml::Value>,
}

/// Validated metadata of a project, work or blog entry
#[derive(Debug, Clone, Serialize)]
pub struct ItemMetadata {
    pub title: String,
    pub description: String,
    pub image: String,
    #[serde(rename = "publishedAt")]
    pub published_at: Option<NaiveDate>,
    pub active: Option<bool>,
    pub links: Links,
    /// Raw comma-separated tag string
    pub tags: Option<String>,

    /// Additional custom fields
    #[serde(flatten)]
    pub extra: HashMap<String, serde_yaml::Value>,
}

impl ItemMetadata {
    /// Parse front-matter from content string
    /// Returns (metadata, remaining_content)
    pub fn parse(content: &str) -> Result<(Self, &str), FrontMatterError> {
        let (yaml, body) = split(content)?;

        let raw: RawFrontMatter = if yaml.trim().is_empty() {
            RawFrontMatter::default()
        } else {
            serde_yaml::from_str(yaml)?
        };

        Ok((Self::validate(raw)?, body))
    }

    fn validate(raw: RawFrontMatter) -> Result<Self, FrontMatterError> {
        let title = required(raw.title, "title")?;
        let description = required(raw.description, "description")?;
        let image = required(raw.image, "image")?;

        let published_at = match raw.published_at {
            Some(s) if !s.trim().is_empty() => Some(
                parse_date_string(&s).ok_or_else(|| FrontMatterError::InvalidDate(s.clone()))?,
            ),
            _ => None,
        };

        Ok(Self {
            title,
            description,
            image,
            published_at,
            active: raw.active,
            links: raw.links.unwrap_or_default(),
            tags: raw.tags,
            extra: raw.extra,
        })
    }

    /// Items without an explicit `active: true` are shown as inactive
    pub fn is_active(&self) -> bool {
        self.active.unwrap_or(false)
    }
}

fn required(value: Option<String>, field: &'static str) -> Result<String, FrontMatterError> {
    match value {
        Some(v) if !v.trim().is_empty() => Ok(v),
        _ => Err(FrontMatterError::MissingField(field)),
    }
}

/// Split a file into its YAML block and the markdown body.
/// Both delimiters must be lines holding exactly `---`.
fn split(content: &str) -> Result<(&str, &str), FrontMatterError> {
    let content = content.trim_start_matches('\u{feff}').trim_start();

    let (opening, rest) = content.split_once('\n').unwrap_or((content, ""));
    if !is_delimiter(opening) {
        return Err(FrontMatterError::Missing);
    }

    let mut offset = 0;
    for line in rest.split_inclusive('\n') {
        if is_delimiter(line) {
            let yaml = &rest[..offset];
            let body = rest[offset + line.len()..].trim_start_matches(['\n', '\r']);
            return Ok((yaml, body));
        }
        offset += line.len();
    }

    Err(FrontMatterError::Unterminated)
}

fn is_delimiter(line: &str) -> bool {
    line.trim_end() == "---"
}

/// Parse a date string in various formats
pub(crate) fn parse_date_string(s: &str) -> Option<NaiveDate> {
    let s = s.trim();

    if let Ok(d) = NaiveDate::parse_from_str(s, "%Y-%m-%d") {
        return Some(d);
    }
    if let Ok(d) = NaiveDate::parse_from_str(s, "%Y/%m/%d") {
        return Some(d);
    }

    let formats = [
        "%Y-%m-%d %H:%M:%S",
        "%Y/%m/%d %H:%M:%S",
        "%Y-%m-%d %H:%M",
        "%Y-%m-%dT%H:%M:%S",
        "%Y-%m-%dT%H:%M:%S%.f",
    ];

    for fmt in formats {
        if let Ok(dt) = NaiveDateTime::parse_from_str(s, fmt) {
            return Some(dt.date());
        }
    }

    // RFC 3339 / ISO 8601 with offset
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Some(dt.date_naive());
    }

    None
}
