//! The content index: the searchable JSON array served to the page layer.

use std::path::Path;

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};

use super::artifact::write_artifact;
use crate::domain::ContentRecord;

/// Ordered collection of indexed content
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ContentIndex {
    records: Vec<ContentRecord>,
}

impl ContentIndex {
    /// Create an index from records, applying the publish-date ordering
    pub fn new(mut records: Vec<ContentRecord>) -> Self {
        sort_by_publish_date(&mut records);
        Self { records }
    }

    /// Records in index order
    pub fn records(&self) -> &[ContentRecord] {
        &self.records
    }

    /// Get the number of records
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Check if the index is empty
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Pretty-printed JSON array
    pub fn to_json(&self) -> Result<String> {
        let mut json =
            serde_json::to_string_pretty(&self.records).context("Failed to serialize content index")?;
        json.push('\n');
        Ok(json)
    }

    /// Write the index artifact
    pub async fn save(&self, path: &Path) -> Result<()> {
        write_artifact(path, self.to_json()?).await
    }

    /// Load a previously written index artifact
    pub async fn load(path: &Path) -> Result<Self> {
        let content = tokio::fs::read_to_string(path)
            .await
            .with_context(|| format!("Failed to read content index: {}", path.display()))?;

        let records = serde_json::from_str(&content).context("Failed to parse content index JSON")?;
        Ok(Self { records })
    }
}

/// Sort records by publish date, newest first
///
/// Records whose date can't be parsed compare equal to everything, so they
/// keep their position while the dated records are ordered around them.
pub fn sort_by_publish_date(records: &mut [ContentRecord]) {
    let dates: Vec<Option<DateTime<Utc>>> = records.iter().map(|r| r.published_at()).collect();

    let slots: Vec<usize> = dates
        .iter()
        .enumerate()
        .filter_map(|(i, date)| date.map(|_| i))
        .collect();

    let mut dated: Vec<(DateTime<Utc>, ContentRecord)> = slots
        .iter()
        .filter_map(|&i| dates[i].map(|date| (date, records[i].clone())))
        .collect();

    // Stable, so equal dates keep discovery order
    dated.sort_by(|a, b| b.0.cmp(&a.0));

    for (slot, (_, record)) in slots.into_iter().zip(dated) {
        records[slot] = record;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::ContentKind;

    fn record(slug: &str, date: &str) -> ContentRecord {
        ContentRecord {
            kind: ContentKind::Article,
            slug: slug.to_string(),
            category: "News".to_string(),
            route_path: format!("/blog/{}", slug),
            source_path: format!("src/content/blog/{}.mdx", slug),
            title: slug.to_string(),
            description: slug.to_string(),
            publish_date: date.to_string(),
            last_updated: None,
            author: "Team".to_string(),
            tags: Vec::new(),
            excerpt: String::new(),
        }
    }

    fn slugs(index: &ContentIndex) -> Vec<&str> {
        index.records().iter().map(|r| r.slug.as_str()).collect()
    }

    #[test]
    fn test_sorted_newest_first() {
        let index = ContentIndex::new(vec![
            record("old", "2023-01-01"),
            record("new", "2024-06-01T09:00:00Z"),
            record("mid", "2024-01-01"),
        ]);

        assert_eq!(slugs(&index), vec!["new", "mid", "old"]);
    }

    #[test]
    fn test_unparsable_dates_keep_their_position() {
        let index = ContentIndex::new(vec![
            record("a", "2022-01-01"),
            record("undated", "sometime"),
            record("b", "2024-01-01"),
            record("c", "2023-01-01"),
        ]);

        assert_eq!(slugs(&index), vec!["b", "undated", "c", "a"]);
    }

    #[test]
    fn test_equal_dates_keep_discovery_order() {
        let index = ContentIndex::new(vec![
            record("first", "2024-01-01"),
            record("second", "2024-01-01"),
        ]);

        assert_eq!(slugs(&index), vec!["first", "second"]);
    }

    #[test]
    fn test_empty_index_serializes_to_empty_array() {
        let index = ContentIndex::default();
        let json = index.to_json().unwrap();

        let parsed: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, serde_json::json!([]));
    }
}
