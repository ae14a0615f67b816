//! Domain types for the content pipeline.
//!
//! This module contains the core data structures:
//! - Frontmatter: The metadata block at the top of each content file
//! - ContentRecord: One normalized, indexable entry per content file

pub mod frontmatter;
pub mod record;

// Re-export commonly used types
pub use frontmatter::{parse_document, split_frontmatter, Frontmatter, FrontmatterError};
pub use record::{
    derive_excerpt, parse_date, truncate_excerpt, ContentKind, ContentRecord, RecordDefaults,
    EXCERPT_MAX_CHARS, UNCATEGORISED,
};
