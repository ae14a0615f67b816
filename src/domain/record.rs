//! Content records: the normalized, indexable form of a content file.

use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use serde::{Deserialize, Serialize};

use super::frontmatter::Frontmatter;

/// Category used for articles (and root-level tutorials) that don't declare one
pub const UNCATEGORISED: &str = "Uncategorised";

/// Maximum length of an excerpt-derived description before it is ellipsized
pub const EXCERPT_MAX_CHARS: usize = 160;

/// Kind of content, which decides where it lives and how it is routed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ContentKind {
    /// Blog article, routed as `/blog/{slug}`
    Article,

    /// Learn tutorial, grouped by category: `/learn/{category}/{slug}`
    Tutorial,
}

impl ContentKind {
    /// All kinds, in summary order
    pub const ALL: [ContentKind; 2] = [ContentKind::Article, ContentKind::Tutorial];

    pub fn as_str(self) -> &'static str {
        match self {
            ContentKind::Article => "article",
            ContentKind::Tutorial => "tutorial",
        }
    }

    /// Site section the kind is published under
    pub fn route_prefix(self) -> &'static str {
        match self {
            ContentKind::Article => "/blog",
            ContentKind::Tutorial => "/learn",
        }
    }

    /// Human-readable label used in the index summary
    pub fn label(self) -> &'static str {
        match self {
            ContentKind::Article => "Blog articles",
            ContentKind::Tutorial => "Learn tutorials",
        }
    }

    /// Route path for an item of this kind
    pub fn route_path(self, category: &str, slug: &str) -> String {
        match self {
            ContentKind::Article => format!("{}/{}", self.route_prefix(), slug),
            ContentKind::Tutorial => format!("{}/{}/{}", self.route_prefix(), category, slug),
        }
    }

    /// Composite key used in the module map
    pub fn module_key(self, category: &str, slug: &str) -> String {
        match self {
            ContentKind::Article => format!("{}/{}", self.as_str(), slug),
            ContentKind::Tutorial => format!("{}/{}/{}", self.as_str(), category, slug),
        }
    }
}

impl std::fmt::Display for ContentKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Values applied when a content file leaves a field out
#[derive(Debug, Clone)]
pub struct RecordDefaults {
    /// Author for files without an `author`
    pub author: String,

    /// Publish date for files without a `date` (RFC 3339)
    pub now: String,
}

impl RecordDefaults {
    pub fn new(author: impl Into<String>) -> Self {
        Self {
            author: author.into(),
            now: Utc::now().to_rfc3339(),
        }
    }
}

/// One indexed content item, serialized as an element of the content index
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContentRecord {
    /// Article or tutorial
    #[serde(rename = "type")]
    pub kind: ContentKind,

    /// File name without extension
    pub slug: String,

    pub category: String,

    /// Site route
    #[serde(rename = "path")]
    pub route_path: String,

    /// Source file relative to the project root (diagnostics only)
    #[serde(rename = "filePath")]
    pub source_path: String,

    pub title: String,

    pub description: String,

    /// Publish date as written in the source, or the build time
    #[serde(rename = "date")]
    pub publish_date: String,

    /// Tutorials only
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_updated: Option<String>,

    pub author: String,

    #[serde(default)]
    pub tags: Vec<String>,

    pub excerpt: String,
}

impl ContentRecord {
    /// Build a record from a parsed file
    ///
    /// `dir_category` is the category implied by the file's location (only
    /// tutorials have one). Returns `None` when the frontmatter has no title.
    pub fn from_document(
        kind: ContentKind,
        slug: &str,
        dir_category: Option<&str>,
        source_path: impl Into<String>,
        frontmatter: &Frontmatter,
        body: &str,
        defaults: &RecordDefaults,
    ) -> Option<Self> {
        let title = frontmatter.title()?.to_string();

        let category = match kind {
            ContentKind::Tutorial => dir_category.or_else(|| frontmatter.category()),
            ContentKind::Article => frontmatter.category(),
        }
        .unwrap_or(UNCATEGORISED)
        .to_string();

        let excerpt = frontmatter
            .excerpt()
            .map(str::to_string)
            .or_else(|| derive_excerpt(body))
            .unwrap_or_default();
        let description = match frontmatter.description() {
            Some(description) => description.to_string(),
            None if !excerpt.is_empty() => truncate_excerpt(&excerpt),
            None => title.clone(),
        };

        let publish_date = frontmatter
            .date()
            .map(str::to_string)
            .unwrap_or_else(|| defaults.now.clone());
        let last_updated = match kind {
            ContentKind::Tutorial => Some(
                frontmatter
                    .last_updated()
                    .map(str::to_string)
                    .unwrap_or_else(|| publish_date.clone()),
            ),
            ContentKind::Article => None,
        };

        let author = frontmatter
            .author()
            .map(str::to_string)
            .unwrap_or_else(|| defaults.author.clone());

        Some(Self {
            kind,
            slug: slug.to_string(),
            route_path: kind.route_path(&category, slug),
            category,
            source_path: source_path.into(),
            title,
            description,
            publish_date,
            last_updated,
            author,
            tags: frontmatter.tags.clone(),
            excerpt,
        })
    }

    /// Composite key of this record in the module map
    pub fn module_key(&self) -> String {
        self.kind.module_key(&self.category, &self.slug)
    }

    /// Publish date as a timestamp, if it can be parsed
    pub fn published_at(&self) -> Option<DateTime<Utc>> {
        parse_date(&self.publish_date)
    }
}

/// Parse the date formats content authors actually write
///
/// Accepts RFC 3339 timestamps, bare `YYYY-MM-DD` dates (midnight UTC) and
/// naive `YYYY-MM-DD[T ]HH:MM:SS` timestamps (taken as UTC).
pub fn parse_date(value: &str) -> Option<DateTime<Utc>> {
    let value = value.trim();

    if let Ok(dt) = DateTime::parse_from_rfc3339(value) {
        return Some(dt.with_timezone(&Utc));
    }

    if let Ok(date) = NaiveDate::parse_from_str(value, "%Y-%m-%d") {
        return date.and_hms_opt(0, 0, 0).map(|dt| dt.and_utc());
    }

    ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f", "%Y-%m-%dT%H:%M"]
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(value, fmt).ok())
        .map(|dt| dt.and_utc())
}

/// Excerpt derived from the body's first paragraph
///
/// MDX `import`/`export` lines and headings ahead of the first paragraph are
/// skipped. Whitespace inside the paragraph is collapsed. The paragraph is
/// kept whole; only the description fallback is cut with [`truncate_excerpt`].
pub fn derive_excerpt(body: &str) -> Option<String> {
    let mut paragraph: Vec<&str> = Vec::new();

    for line in body.lines() {
        let trimmed = line.trim();

        if trimmed.is_empty() {
            if paragraph.is_empty() {
                continue;
            }
            break;
        }

        if paragraph.is_empty() && is_structural_line(trimmed) {
            continue;
        }

        paragraph.push(trimmed);
    }

    if paragraph.is_empty() {
        return None;
    }

    let text = paragraph
        .iter()
        .flat_map(|line| line.split_whitespace())
        .collect::<Vec<_>>()
        .join(" ");

    Some(text)
}

fn is_structural_line(line: &str) -> bool {
    line.starts_with('#') || line.starts_with("import ") || line.starts_with("export ")
}

/// Cut `text` to [`EXCERPT_MAX_CHARS`] characters, marking the cut with `...`
pub fn truncate_excerpt(text: &str) -> String {
    if text.chars().count() <= EXCERPT_MAX_CHARS {
        return text.to_string();
    }

    let cut: String = text.chars().take(EXCERPT_MAX_CHARS).collect();
    format!("{}...", cut.trim_end())
}
