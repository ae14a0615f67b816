//! content-pipeline - Build-time MDX content seeder and indexer
//!
//! Two batch jobs prepare the site's blog and learn content before the page
//! build:
//!
//! - `seed-content` writes a baseline set of sample MDX files that are missing
//! - `index-content` scans the content tree and emits the searchable JSON
//!   index plus a module map of lazy loaders for each item's body
//!
//! # Modules
//!
//! - `config`: Config file discovery and path resolution
//! - `domain`: Data structures (Frontmatter, ContentRecord)
//! - `ingest`: Content discovery and concurrent reads
//! - `library`: Build artifacts (ContentIndex, ModuleMap)
//! - `core`: The Seeder and Indexer jobs
//! - `cli`: Executable entry points
//!
//! # Usage
//!
//! ```bash
//! # Make sure the sample content exists, then rebuild the index
//! seed-content
//! index-content
//! ```

pub mod cli;
pub mod config;
pub mod core;
pub mod domain;
pub mod ingest;
pub mod library;

// Re-export main types at crate root for convenience
pub use config::{load_config, load_config_from, ResolvedConfig};
pub use core::{IndexReport, Indexer, SeedManifest, SeedReport, Seeder};
pub use domain::{ContentKind, ContentRecord, Frontmatter};
pub use library::{ContentIndex, ModuleMap};
