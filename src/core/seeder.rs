//! Seeding of baseline content.
//!
//! Guarantees a minimum set of content files exists before indexing. Files
//! that already exist are never compared or overwritten, so running the
//! seeder again is always safe.

use std::io::ErrorKind;
use std::path::PathBuf;

use anyhow::{Context, Result};
use tokio::fs::{self, OpenOptions};
use tokio::io::AsyncWriteExt;
use tracing::{debug, info};

use crate::config::paths::display_relative;
use crate::config::ResolvedConfig;
use crate::domain::ContentKind;

/// One file the seeder guarantees
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SeedEntry {
    /// Directory the file belongs in
    pub target_dir: PathBuf,

    pub file_name: String,

    /// Full file contents, written verbatim
    pub content: String,
}

impl SeedEntry {
    pub fn new(
        target_dir: impl Into<PathBuf>,
        file_name: impl Into<String>,
        content: impl Into<String>,
    ) -> Self {
        Self {
            target_dir: target_dir.into(),
            file_name: file_name.into(),
            content: content.into(),
        }
    }

    pub fn path(&self) -> PathBuf {
        self.target_dir.join(&self.file_name)
    }
}

/// (kind, subdirectory, file name, contents)
const BUILTIN_SEEDS: &[(ContentKind, &str, &str, &str)] = &[
    (
        ContentKind::Article,
        "",
        "limited-company-or-sole-trader.mdx",
        include_str!("../../seed/blog/limited-company-or-sole-trader.mdx"),
    ),
    (
        ContentKind::Tutorial,
        "company-formation",
        "register-a-limited-company.mdx",
        include_str!("../../seed/learn/company-formation/register-a-limited-company.mdx"),
    ),
    (
        ContentKind::Tutorial,
        "banking",
        "open-a-business-bank-account.mdx",
        include_str!("../../seed/learn/banking/open-a-business-bank-account.mdx"),
    ),
    (
        ContentKind::Tutorial,
        "business-credit",
        "build-business-credit.mdx",
        include_str!("../../seed/learn/business-credit/build-business-credit.mdx"),
    ),
];

/// Ordered list of files to guarantee
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SeedManifest {
    entries: Vec<SeedEntry>,
}

impl SeedManifest {
    pub fn new(entries: Vec<SeedEntry>) -> Self {
        Self { entries }
    }

    /// The built-in sample content, placed under the configured roots
    pub fn builtin(config: &ResolvedConfig) -> Self {
        let entries = BUILTIN_SEEDS
            .iter()
            .map(|(kind, subdir, file_name, content)| {
                let mut dir = config.kind_dir(*kind).to_path_buf();
                if !subdir.is_empty() {
                    dir.push(subdir);
                }
                SeedEntry::new(dir, *file_name, *content)
            })
            .collect();

        Self { entries }
    }

    pub fn entries(&self) -> &[SeedEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Outcome of a seeding run
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SeedReport {
    /// Files created by this run
    pub written: Vec<PathBuf>,

    /// Files that already existed
    pub skipped: Vec<PathBuf>,
}

impl SeedReport {
    pub fn written_count(&self) -> usize {
        self.written.len()
    }
}

/// Writes missing manifest entries to disk
pub struct Seeder {
    manifest: SeedManifest,
}

impl Seeder {
    pub fn new(manifest: SeedManifest) -> Self {
        Self { manifest }
    }

    /// Write every manifest entry that doesn't exist yet
    ///
    /// The first filesystem error aborts the run. Files written before it
    /// stay in place; rerunning picks up where it stopped.
    pub async fn run(&self) -> Result<SeedReport> {
        let mut report = SeedReport::default();

        for entry in self.manifest.entries() {
            let path = entry.path();

            let exists = fs::try_exists(&path)
                .await
                .with_context(|| format!("Failed to check {}", path.display()))?;
            if exists {
                debug!("Exists, skipping: {}", path.display());
                report.skipped.push(path);
                continue;
            }

            fs::create_dir_all(&entry.target_dir)
                .await
                .with_context(|| {
                    format!("Failed to create directory: {}", entry.target_dir.display())
                })?;

            // create_new guards against a file appearing between the check
            // and the write
            let file = OpenOptions::new()
                .write(true)
                .create_new(true)
                .open(&path)
                .await;

            let mut file = match file {
                Ok(file) => file,
                Err(err) if err.kind() == ErrorKind::AlreadyExists => {
                    report.skipped.push(path);
                    continue;
                }
                Err(err) => {
                    return Err(err).with_context(|| format!("Failed to create {}", path.display()))
                }
            };

            file.write_all(entry.content.as_bytes())
                .await
                .with_context(|| format!("Failed to write {}", path.display()))?;
            file.flush().await?;

            info!("Seeded {}", path.display());
            report.written.push(path);
        }

        Ok(report)
    }
}

/// Seed the built-in sample content for a project
pub async fn seed_builtin(config: &ResolvedConfig) -> Result<SeedReport> {
    let manifest = SeedManifest::builtin(config);
    let report = Seeder::new(manifest).run().await?;

    info!(
        "Seeded {} file(s) under {}, {} already present",
        report.written_count(),
        display_relative(&config.root, &config.content_root),
        report.skipped.len()
    );

    Ok(report)
}
