//! Core pipeline jobs.
//!
//! This module contains:
//! - Seeder: Writes baseline content files that are missing
//! - Indexer: Scans content and writes the index and module map artifacts

pub mod indexer;
pub mod seeder;

// Re-export commonly used types
pub use indexer::{
    build_index, FileError, IndexAccumulator, IndexOutput, IndexReport, IndexSettings, Indexer,
    KindCounts, SkippedFile,
};
pub use seeder::{seed_builtin, SeedEntry, SeedManifest, SeedReport, Seeder};
