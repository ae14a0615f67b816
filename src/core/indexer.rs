//! The content indexer.
//!
//! Scans the article and tutorial roots, turns every publishable file into a
//! [`ContentRecord`], and writes the content index and the module map.
//!
//! Content-authoring mistakes never fail a run: a bad file is logged,
//! recorded in the [`IndexReport`] and left out of both artifacts.

use std::collections::{BTreeMap, HashMap};
use std::path::PathBuf;

use anyhow::Result;
use thiserror::Error;
use tokio::fs;
use tracing::{debug, info, warn};

use crate::config::paths::display_relative;
use crate::config::ResolvedConfig;
use crate::domain::{parse_document, ContentKind, ContentRecord, FrontmatterError, RecordDefaults};
use crate::ingest::{discover_root, read_sources, DiscoveryError, SourceFile};
use crate::library::{ContentIndex, ModuleMap};

/// Why a single content file was left out of the index
#[derive(Debug, Error)]
pub enum FileError {
    #[error("Failed to read file: {0}")]
    Read(#[from] std::io::Error),

    #[error(transparent)]
    Frontmatter(#[from] FrontmatterError),

    #[error("Missing required `title` in frontmatter")]
    MissingTitle,

    #[error("Route {route} is already used by {existing}")]
    DuplicateRoute { route: String, existing: String },
}

/// Per-kind tallies for the run summary
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct KindCounts {
    /// Files found on disk
    pub discovered: usize,

    /// Files skipped because they are drafts
    pub drafts: usize,

    /// Files that failed to parse or validate
    pub skipped: usize,

    /// Records emitted
    pub indexed: usize,
}

/// A file left out of the index because of a problem
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SkippedFile {
    pub kind: ContentKind,

    /// Path relative to the project root
    pub path: String,

    pub reason: String,
}

/// What happened during an index run
#[derive(Debug, Clone, Default)]
pub struct IndexReport {
    pub counts: BTreeMap<ContentKind, KindCounts>,

    /// Files excluded with a warning
    pub skipped: Vec<SkippedFile>,

    /// Roots (or parts of roots) that couldn't be scanned
    pub discovery_failures: Vec<String>,

    /// Artifact locations, set once written
    pub index_path: Option<PathBuf>,
    pub modules_path: Option<PathBuf>,
}

impl IndexReport {
    /// Tallies for a kind (zero if nothing of that kind was seen)
    pub fn counts(&self, kind: ContentKind) -> KindCounts {
        self.counts.get(&kind).copied().unwrap_or_default()
    }

    /// Total records emitted
    pub fn indexed(&self) -> usize {
        self.counts.values().map(|c| c.indexed).sum()
    }

    /// Whether the run recorded a warning for the file at `path`
    pub fn was_skipped(&self, path: &str) -> bool {
        self.skipped.iter().any(|s| s.path == path)
    }

    fn counts_mut(&mut self, kind: ContentKind) -> &mut KindCounts {
        self.counts.entry(kind).or_default()
    }
}

/// Settings that shape records built by the accumulator
#[derive(Debug, Clone)]
pub struct IndexSettings {
    /// Project root; record source paths are relative to it
    pub root: PathBuf,

    pub defaults: RecordDefaults,
}

impl IndexSettings {
    pub fn from_config(config: &ResolvedConfig) -> Self {
        Self {
            root: config.root.clone(),
            defaults: RecordDefaults::new(config.default_author.clone()),
        }
    }
}

/// Everything an index run produces
#[derive(Debug)]
pub struct IndexOutput {
    pub index: ContentIndex,
    pub modules: ModuleMap,
    pub report: IndexReport,
}

enum Outcome {
    Indexed,
    Draft,
}

/// Accumulates records and module entries one source file at a time
///
/// Records and module-map entries are only ever added together, so the two
/// artifacts agree on membership. Nothing is final until [`finish`] sorts
/// the collection.
///
/// [`finish`]: IndexAccumulator::finish
#[derive(Debug)]
pub struct IndexAccumulator {
    settings: IndexSettings,
    records: Vec<ContentRecord>,
    modules: ModuleMap,
    /// route -> source path of the record that claimed it
    routes: HashMap<String, String>,
    report: IndexReport,
}

impl IndexAccumulator {
    pub fn new(settings: IndexSettings) -> Self {
        let mut report = IndexReport::default();
        for kind in ContentKind::ALL {
            report.counts_mut(kind);
        }

        Self {
            settings,
            records: Vec::new(),
            modules: ModuleMap::new(),
            routes: HashMap::new(),
            report,
        }
    }

    /// Fold one source file into the collection
    pub fn ingest(&mut self, source: SourceFile) {
        let kind = source.file.kind;
        let path = display_relative(&self.settings.root, &source.file.path);
        self.report.counts_mut(kind).discovered += 1;

        match self.process(source, &path) {
            Ok(Outcome::Indexed) => {
                self.report.counts_mut(kind).indexed += 1;
            }
            Ok(Outcome::Draft) => {
                debug!(path = %path, "Skipping draft");
                self.report.counts_mut(kind).drafts += 1;
            }
            Err(err) => {
                warn!(path = %path, "Skipping {}: {}", kind, err);
                self.report.counts_mut(kind).skipped += 1;
                self.report.skipped.push(SkippedFile {
                    kind,
                    path,
                    reason: err.to_string(),
                });
            }
        }
    }

    /// Record a root that could not be (fully) scanned
    pub fn discovery_failed(&mut self, kind: ContentKind, err: &DiscoveryError) {
        warn!("Could not scan {} content: {}", kind, err);
        self.report
            .discovery_failures
            .push(format!("{}: {}", kind, err));
    }

    fn process(&mut self, source: SourceFile, path: &str) -> Result<Outcome, FileError> {
        let text = source.contents?;
        let (frontmatter, body) = parse_document(&text)?;

        if frontmatter.draft {
            return Ok(Outcome::Draft);
        }

        let file = &source.file;
        let record = ContentRecord::from_document(
            file.kind,
            &file.slug,
            file.dir_category.as_deref(),
            path,
            &frontmatter,
            body,
            &self.settings.defaults,
        )
        .ok_or(FileError::MissingTitle)?;

        if let Some(existing) = self.routes.get(&record.route_path) {
            return Err(FileError::DuplicateRoute {
                route: record.route_path.clone(),
                existing: existing.clone(),
            });
        }

        let key = record.module_key();
        if !self.modules.insert(key.clone(), file.path.clone()) {
            return Err(FileError::DuplicateRoute {
                route: record.route_path.clone(),
                existing: key,
            });
        }

        self.routes
            .insert(record.route_path.clone(), path.to_string());
        self.records.push(record);

        Ok(Outcome::Indexed)
    }

    /// Sort the collection and hand back the finished artifacts
    pub fn finish(self) -> IndexOutput {
        IndexOutput {
            index: ContentIndex::new(self.records),
            modules: self.modules,
            report: self.report,
        }
    }
}

/// Build both artifacts from sources already in memory
pub fn build_index(settings: IndexSettings, sources: impl IntoIterator<Item = SourceFile>) -> IndexOutput {
    let mut accumulator = IndexAccumulator::new(settings);
    for source in sources {
        accumulator.ingest(source);
    }
    accumulator.finish()
}

/// Runs a full index build for a project
pub struct Indexer {
    config: ResolvedConfig,
}

impl Indexer {
    pub fn new(config: ResolvedConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &ResolvedConfig {
        &self.config
    }

    /// Scan, index and write both artifacts
    ///
    /// Only failing to write an artifact is an error; every content problem
    /// is reported and skipped.
    pub async fn run(&self) -> Result<IndexReport> {
        self.ensure_dirs().await;

        let mut accumulator = IndexAccumulator::new(IndexSettings::from_config(&self.config));
        let mut files = Vec::new();

        for kind in ContentKind::ALL {
            let root = self.config.kind_dir(kind);
            match discover_root(kind, root.to_path_buf(), self.config.extension.clone()).await {
                Ok(discovery) => {
                    info!(
                        "Found {} {} file(s) in {}",
                        discovery.files.len(),
                        kind,
                        display_relative(&self.config.root, root)
                    );
                    for err in &discovery.errors {
                        accumulator.discovery_failed(kind, err);
                    }
                    files.extend(discovery.files);
                }
                Err(err) => accumulator.discovery_failed(kind, &err),
            }
        }

        for source in read_sources(files).await {
            accumulator.ingest(source);
        }

        let output = accumulator.finish();
        let mut report = output.report;

        output.index.save(&self.config.index_output).await?;
        output.modules.save(&self.config.modules_output).await?;
        info!(
            "Wrote {} record(s) and {} module loader(s)",
            output.index.len(),
            output.modules.len()
        );

        report.index_path = Some(self.config.index_output.clone());
        report.modules_path = Some(self.config.modules_output.clone());
        Ok(report)
    }

    /// Create the content roots and category directories that are missing
    async fn ensure_dirs(&self) {
        for dir in self.config.required_dirs() {
            if let Err(err) = fs::create_dir_all(&dir).await {
                warn!(
                    "Failed to create {}: {}",
                    display_relative(&self.config.root, &dir),
                    err
                );
            }
        }
    }
}
