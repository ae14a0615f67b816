//! Content discovery and reading.
//!
//! Ingestion feeds the indexer:
//!
//! 1. **Discover**: Glob each content root for files with the content extension
//! 2. **Read**: Load all discovered files concurrently, keeping discovery order
//!
//! # Layout
//!
//! ```text
//! src/content/
//! ├── blog/                 # Articles (flat)
//! │   └── <slug>.mdx
//! └── learn/                # Tutorials (grouped by category directory)
//!     └── <category>/
//!         └── <slug>.mdx
//! ```

pub mod discover;

// Re-export key types
pub use discover::{
    discover, discover_root, read_sources, Discovery, DiscoveredFile, DiscoveryError, SourceFile,
};
