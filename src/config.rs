//! Configuration for content pipeline paths.
//!
//! Configuration sources (highest priority first):
//! 1. Config file (`content-pipeline.yaml`)
//! 2. Defaults (relative to the current directory)
//!
//! Config file discovery:
//! - Searches the start directory and its parents for `content-pipeline.yaml`
//! - The directory holding the config file becomes the project root
//! - Paths in the config file are relative to the project root

pub mod paths;

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::Deserialize;

use crate::domain::ContentKind;

/// Name of the config file searched for in the project tree
pub const CONFIG_FILE_NAME: &str = "content-pipeline.yaml";

/// Author used when a content file does not name one
pub const DEFAULT_AUTHOR: &str = "Formations Editorial Team";

/// Raw config file schema (matches YAML structure)
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ConfigFile {
    #[serde(default)]
    pub version: Option<String>,
    #[serde(default)]
    pub paths: PathsConfig,
    #[serde(default)]
    pub content: ContentConfig,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct PathsConfig {
    /// Content root (relative to project root)
    pub content_root: Option<String>,
    /// Article directory (relative to content root)
    pub articles: Option<String>,
    /// Tutorial directory (relative to content root)
    pub tutorials: Option<String>,
    /// JSON index artifact (relative to project root)
    pub index_output: Option<String>,
    /// Module map artifact (relative to project root)
    pub modules_output: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ContentConfig {
    pub extension: Option<String>,
    pub default_author: Option<String>,
    pub tutorial_categories: Option<Vec<String>>,
}

/// Resolved configuration with absolute paths
#[derive(Debug, Clone)]
pub struct ResolvedConfig {
    /// Project root (directory of the config file, or the start directory)
    pub root: PathBuf,
    /// Absolute path to the content root
    pub content_root: PathBuf,
    /// Absolute path to the article directory
    pub articles_dir: PathBuf,
    /// Absolute path to the tutorial directory
    pub tutorials_dir: PathBuf,
    /// Absolute path of the JSON index artifact
    pub index_output: PathBuf,
    /// Absolute path of the module map artifact
    pub modules_output: PathBuf,
    /// Content file extension, without the dot
    pub extension: String,
    /// Author for records that don't declare one
    pub default_author: String,
    /// Tutorial category directories that must always exist
    pub tutorial_categories: Vec<String>,
    /// Path to config file (if found)
    pub config_file: Option<PathBuf>,
}

impl ResolvedConfig {
    /// Build the default configuration rooted at `root`
    pub fn with_root(root: impl Into<PathBuf>) -> Self {
        Self::resolve(root.into(), ConfigFile::default(), None)
    }

    /// Get the root directory for a content kind
    pub fn kind_dir(&self, kind: ContentKind) -> &Path {
        match kind {
            ContentKind::Article => &self.articles_dir,
            ContentKind::Tutorial => &self.tutorials_dir,
        }
    }

    /// Directories the indexer guarantees before scanning
    pub fn required_dirs(&self) -> Vec<PathBuf> {
        let mut dirs = vec![self.articles_dir.clone(), self.tutorials_dir.clone()];
        dirs.extend(
            self.tutorial_categories
                .iter()
                .map(|category| self.tutorials_dir.join(category)),
        );
        dirs
    }

    fn resolve(root: PathBuf, file: ConfigFile, config_file: Option<PathBuf>) -> Self {
        let content_root = root.join(
            file.paths
                .content_root
                .as_deref()
                .unwrap_or("src/content"),
        );
        let articles_dir = content_root.join(file.paths.articles.as_deref().unwrap_or("blog"));
        let tutorials_dir =
            content_root.join(file.paths.tutorials.as_deref().unwrap_or("learn"));
        let index_output = root.join(
            file.paths
                .index_output
                .as_deref()
                .unwrap_or("src/generated/content-index.json"),
        );
        let modules_output = root.join(
            file.paths
                .modules_output
                .as_deref()
                .unwrap_or("src/generated/content-modules.ts"),
        );

        let extension = file
            .content
            .extension
            .map(|ext| ext.trim_start_matches('.').to_string())
            .filter(|ext| !ext.is_empty())
            .unwrap_or_else(|| "mdx".to_string());

        let default_author = file
            .content
            .default_author
            .filter(|author| !author.trim().is_empty())
            .unwrap_or_else(|| DEFAULT_AUTHOR.to_string());

        let tutorial_categories = file.content.tutorial_categories.unwrap_or_else(|| {
            ["company-formation", "banking", "business-credit"]
                .iter()
                .map(|s| s.to_string())
                .collect()
        });

        Self {
            root,
            content_root,
            articles_dir,
            tutorials_dir,
            index_output,
            modules_output,
            extension,
            default_author,
            tutorial_categories,
            config_file,
        }
    }
}

/// Find config file by searching `start` and its parents
fn find_config_file(start: &Path) -> Option<PathBuf> {
    let mut current = start.to_path_buf();

    loop {
        let config_path = current.join(CONFIG_FILE_NAME);
        if config_path.exists() {
            return Some(config_path);
        }

        if !current.pop() {
            break;
        }
    }

    None
}

/// Load and parse config file
fn load_config_file(path: &Path) -> Result<ConfigFile> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read config file: {}", path.display()))?;

    // An empty file is a valid "all defaults" config
    if content.trim().is_empty() {
        return Ok(ConfigFile::default());
    }

    serde_yaml::from_str(&content)
        .with_context(|| format!("Failed to parse config file: {}", path.display()))
}

/// Load configuration starting the search at `start`
pub fn load_config_from(start: &Path) -> Result<ResolvedConfig> {
    match find_config_file(start) {
        Some(config_path) => {
            let file = load_config_file(&config_path)?;
            let root = config_path
                .parent()
                .map(Path::to_path_buf)
                .unwrap_or_else(|| start.to_path_buf());
            Ok(ResolvedConfig::resolve(root, file, Some(config_path)))
        }
        None => Ok(ResolvedConfig::with_root(start)),
    }
}

/// Load configuration for the current working directory
pub fn load_config() -> Result<ResolvedConfig> {
    let cwd = std::env::current_dir().context("Failed to determine current directory")?;
    load_config_from(&cwd)
}
