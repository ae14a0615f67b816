//! Build artifacts consumed by the page layer.
//!
//! The indexer emits two files that always agree on membership:
//!
//! # Artifacts
//!
//! ```text
//! src/generated/
//! ├── content-index.json    # Searchable array of content records
//! └── content-modules.ts    # Composite key -> lazy import of the MDX body
//! ```

pub mod artifact;
pub mod catalog;
pub mod modules;

pub use artifact::write_artifact;
pub use catalog::{sort_by_publish_date, ContentIndex};
pub use modules::{ModuleMap, MODULE_EXPORT_NAME};
