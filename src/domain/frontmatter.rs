//! Frontmatter parsing for MDX content files.
//!
//! A content file starts with a YAML block fenced by `---` lines, followed
//! by the MDX body:
//!
//! ```text
//! ---
//! title: Opening a business bank account
//! date: 2024-03-02
//! tags: [banking, setup]
//! ---
//!
//! Body text...
//! ```

use std::collections::BTreeMap;

use serde::{Deserialize, Deserializer};
use serde_yaml::Value;
use thiserror::Error;

/// Errors raised while splitting or parsing a frontmatter block
#[derive(Debug, Error)]
pub enum FrontmatterError {
    #[error("Missing frontmatter (file must start with ---)")]
    Missing,

    #[error("Missing frontmatter end delimiter (---)")]
    Unterminated,

    #[error("Invalid frontmatter YAML: {0}")]
    Yaml(#[from] serde_yaml::Error),
}

/// Parsed frontmatter of a content file
///
/// Textual fields accept any YAML scalar. Keys the pipeline doesn't know
/// about are kept in `extra`.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Frontmatter {
    #[serde(default, deserialize_with = "scalar_string")]
    pub title: Option<String>,

    #[serde(default, deserialize_with = "scalar_string")]
    pub description: Option<String>,

    #[serde(default, alias = "publishDate", deserialize_with = "scalar_string")]
    pub date: Option<String>,

    #[serde(default, alias = "last_updated", deserialize_with = "scalar_string")]
    pub last_updated: Option<String>,

    #[serde(default, deserialize_with = "scalar_string")]
    pub author: Option<String>,

    #[serde(default, deserialize_with = "scalar_string")]
    pub category: Option<String>,

    #[serde(default, deserialize_with = "scalar_string")]
    pub excerpt: Option<String>,

    #[serde(default, deserialize_with = "string_list")]
    pub tags: Vec<String>,

    #[serde(default, deserialize_with = "flag")]
    pub draft: bool,

    /// Unrecognized keys
    #[serde(flatten)]
    pub extra: BTreeMap<String, Value>,
}

impl Frontmatter {
    /// Parse a YAML frontmatter block (without the `---` fences)
    pub fn from_yaml(yaml: &str) -> Result<Self, FrontmatterError> {
        if yaml.trim().is_empty() {
            return Ok(Self::default());
        }

        Ok(serde_yaml::from_str(yaml)?)
    }

    /// The title, if present and not blank
    pub fn title(&self) -> Option<&str> {
        non_blank(self.title.as_deref())
    }

    pub fn description(&self) -> Option<&str> {
        non_blank(self.description.as_deref())
    }

    pub fn excerpt(&self) -> Option<&str> {
        non_blank(self.excerpt.as_deref())
    }

    pub fn date(&self) -> Option<&str> {
        non_blank(self.date.as_deref())
    }

    pub fn last_updated(&self) -> Option<&str> {
        non_blank(self.last_updated.as_deref())
    }

    pub fn author(&self) -> Option<&str> {
        non_blank(self.author.as_deref())
    }

    pub fn category(&self) -> Option<&str> {
        non_blank(self.category.as_deref())
    }
}

fn non_blank(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|v| !v.is_empty())
}

/// Split a content file into its frontmatter block and body
///
/// Returns `(yaml, body)`. The opening fence must be the first non-blank
/// line; the block ends at the next line consisting solely of `---`.
pub fn split_frontmatter(source: &str) -> Result<(&str, &str), FrontmatterError> {
    let content = source.trim_start_matches('\u{feff}').trim_start();

    let rest = content
        .strip_prefix("---")
        .ok_or(FrontmatterError::Missing)?;

    // The opening fence must stand on its own line
    let (opening_tail, rest) = match rest.find('\n') {
        Some(pos) => (&rest[..pos], &rest[pos + 1..]),
        None => (rest, ""),
    };
    if !opening_tail.trim().is_empty() {
        return Err(FrontmatterError::Missing);
    }

    let mut offset = 0;
    for line in rest.split_inclusive('\n') {
        if line.trim_end() == "---" {
            let yaml = &rest[..offset];
            let body = &rest[offset + line.len()..];
            return Ok((yaml, body));
        }
        offset += line.len();
    }

    Err(FrontmatterError::Unterminated)
}

/// Split and parse a content file into frontmatter and body
pub fn parse_document(source: &str) -> Result<(Frontmatter, &str), FrontmatterError> {
    let (yaml, body) = split_frontmatter(source)?;
    let frontmatter = Frontmatter::from_yaml(yaml)?;
    Ok((frontmatter, body))
}

fn scalar_to_string(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        Value::Tagged(tagged) => scalar_to_string(&tagged.value),
        Value::Null | Value::Sequence(_) | Value::Mapping(_) => None,
    }
}

fn scalar_string<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(value.as_ref().and_then(scalar_to_string))
}

/// Tags may be a YAML sequence or a single comma-separated string
fn string_list<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;

    let tags = match value {
        Some(Value::Sequence(items)) => items
            .iter()
            .filter_map(scalar_to_string)
            .map(|t| t.trim().to_string())
            .filter(|t| !t.is_empty())
            .collect(),
        Some(other) => scalar_to_string(&other)
            .map(|s| {
                s.split(',')
                    .map(|t| t.trim().to_string())
                    .filter(|t| !t.is_empty())
                    .collect()
            })
            .unwrap_or_default(),
        None => Vec::new(),
    };

    Ok(tags)
}

fn flag<'de, D>(deserializer: D) -> Result<bool, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;

    Ok(match value {
        Some(Value::Bool(b)) => b,
        Some(Value::String(s)) => s.trim().eq_ignore_ascii_case("true"),
        _ => false,
    })
}
