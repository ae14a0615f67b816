//! Glob-based discovery of content files.
//!
//! Articles are matched directly under their root; tutorials are matched
//! recursively so that subdirectories become categories.

use std::io;
use std::path::{Path, PathBuf};

use glob::{MatchOptions, Pattern};
use thiserror::Error;
use tokio::task::JoinSet;
use tracing::{debug, warn};

use crate::config::paths::to_slash;
use crate::domain::ContentKind;

/// Errors that prevent a content root from being scanned
#[derive(Debug, Error)]
pub enum DiscoveryError {
    #[error("Content root does not exist: {0}")]
    RootNotFound(PathBuf),

    #[error("Content root is unreadable: {path}: {source}")]
    Unreadable {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("Content root is not valid UTF-8: {0}")]
    NonUtf8Root(PathBuf),

    #[error("Invalid discovery pattern {pattern}: {source}")]
    Pattern {
        pattern: String,
        #[source]
        source: glob::PatternError,
    },

    #[error("Failed to scan {path}: {source}")]
    Entry {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("Discovery task failed: {0}")]
    Task(#[from] tokio::task::JoinError),
}

/// A content file found on disk
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DiscoveredFile {
    pub kind: ContentKind,

    /// Location of the file
    pub path: PathBuf,

    /// File name without extension
    pub slug: String,

    /// Subdirectory path relative to the content root, `/`-joined.
    /// Always `None` for articles and for tutorials at the root.
    pub dir_category: Option<String>,
}

impl DiscoveredFile {
    /// Describe a file found under `root`
    ///
    /// Returns `None` if the path has no usable file stem.
    pub fn from_path(kind: ContentKind, root: &Path, path: PathBuf) -> Option<Self> {
        let slug = path.file_stem()?.to_str()?.to_string();
        if slug.is_empty() {
            return None;
        }

        let dir_category = match kind {
            ContentKind::Article => None,
            ContentKind::Tutorial => path
                .parent()
                .and_then(|parent| parent.strip_prefix(root).ok())
                .map(to_slash)
                .filter(|category| !category.is_empty()),
        };

        Some(Self {
            kind,
            path,
            slug,
            dir_category,
        })
    }
}

/// Result of scanning one content root
#[derive(Debug, Default)]
pub struct Discovery {
    /// Matched files, sorted by path
    pub files: Vec<DiscoveredFile>,

    /// Entries that couldn't be scanned (the rest of the root still was)
    pub errors: Vec<DiscoveryError>,
}

/// Find all content files of `kind` under `root`
///
/// Fails only when the root itself can't be scanned; unreadable entries
/// below it are collected in [`Discovery::errors`].
pub fn discover(kind: ContentKind, root: &Path, extension: &str) -> Result<Discovery, DiscoveryError> {
    if !root.exists() {
        return Err(DiscoveryError::RootNotFound(root.to_path_buf()));
    }

    // Open the root so an unreadable directory is reported as such instead
    // of silently matching nothing
    std::fs::read_dir(root).map_err(|source| DiscoveryError::Unreadable {
        path: root.to_path_buf(),
        source,
    })?;

    let root_str = root
        .to_str()
        .ok_or_else(|| DiscoveryError::NonUtf8Root(root.to_path_buf()))?;

    let pattern = match kind {
        ContentKind::Article => format!("{}/*.{}", Pattern::escape(root_str), extension),
        ContentKind::Tutorial => format!("{}/**/*.{}", Pattern::escape(root_str), extension),
    };

    let options = MatchOptions {
        require_literal_leading_dot: true,
        ..MatchOptions::new()
    };

    let entries = glob::glob_with(&pattern, options).map_err(|source| DiscoveryError::Pattern {
        pattern: pattern.clone(),
        source,
    })?;

    let mut discovery = Discovery::default();

    for entry in entries {
        match entry {
            Ok(path) => {
                if !path.is_file() {
                    continue;
                }
                match DiscoveredFile::from_path(kind, root, path) {
                    Some(file) => discovery.files.push(file),
                    None => debug!("Ignoring content file without a usable name"),
                }
            }
            Err(err) => {
                let path = err.path().to_path_buf();
                discovery.errors.push(DiscoveryError::Entry {
                    path,
                    source: err.into(),
                });
            }
        }
    }

    discovery.files.sort_by(|a, b| a.path.cmp(&b.path));
    Ok(discovery)
}

/// Run [`discover`] on the blocking pool
///
/// Globbing walks the directory tree synchronously, so async callers go
/// through here.
pub async fn discover_root(
    kind: ContentKind,
    root: PathBuf,
    extension: String,
) -> Result<Discovery, DiscoveryError> {
    tokio::task::spawn_blocking(move || discover(kind, &root, &extension)).await?
}

/// A discovered file together with the outcome of reading it
#[derive(Debug)]
pub struct SourceFile {
    pub file: DiscoveredFile,
    pub contents: io::Result<String>,
}

impl SourceFile {
    /// A source whose contents are already in memory
    pub fn in_memory(file: DiscoveredFile, contents: impl Into<String>) -> Self {
        Self {
            file,
            contents: Ok(contents.into()),
        }
    }
}

/// Read every discovered file concurrently
///
/// The returned sources are in the same order as `files`, one per file.
pub async fn read_sources(files: Vec<DiscoveredFile>) -> Vec<SourceFile> {
    let mut tasks = JoinSet::new();

    for (position, file) in files.iter().enumerate() {
        let path = file.path.clone();
        tasks.spawn(async move { (position, tokio::fs::read_to_string(&path).await) });
    }

    let mut contents = Vec::with_capacity(files.len());
    while let Some(joined) = tasks.join_next().await {
        match joined {
            Ok(read) => contents.push(read),
            Err(err) => warn!("Content read task failed: {}", err),
        }
    }

    pair_sources(files, contents)
}

/// Match read results back to their files by position
///
/// A file with no result (its read task never finished) gets a read error,
/// so it is still reported rather than dropped.
fn pair_sources(files: Vec<DiscoveredFile>, contents: Vec<(usize, io::Result<String>)>) -> Vec<SourceFile> {
    let mut slots: Vec<Option<io::Result<String>>> = files.iter().map(|_| None).collect();
    for (position, read) in contents {
        if let Some(slot) = slots.get_mut(position) {
            *slot = Some(read);
        }
    }

    files
        .into_iter()
        .zip(slots)
        .map(|(file, read)| {
            let contents = read.unwrap_or_else(|| {
                Err(io::Error::new(io::ErrorKind::Other, "read task did not complete"))
            });
            SourceFile { file, contents }
        })
        .collect()
}
