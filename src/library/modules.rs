//! The module map: composite content key -> deferred import of the body.
//!
//! The index only carries metadata. Page code resolves a record's body on
//! demand through this map, so no MDX body is compiled while indexing.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};

use super::artifact::write_artifact;
use crate::config::paths::relative_path;

/// Name of the binding exported by the generated module
pub const MODULE_EXPORT_NAME: &str = "contentModules";

/// Mapping from composite key to the content file that holds the body
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ModuleMap {
    entries: BTreeMap<String, PathBuf>,
}

impl ModuleMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add an entry; returns `false` (leaving the map unchanged) if the key
    /// is already taken
    pub fn insert(&mut self, key: impl Into<String>, source: impl Into<PathBuf>) -> bool {
        let key = key.into();
        if self.entries.contains_key(&key) {
            return false;
        }
        self.entries.insert(key, source.into());
        true
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.entries.contains_key(key)
    }

    /// Content file referenced by `key`
    pub fn get(&self, key: &str) -> Option<&Path> {
        self.entries.get(key).map(PathBuf::as_path)
    }

    /// Keys in sorted order
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Render the TypeScript module, with import specifiers relative to
    /// `module_dir` (the directory the module is written to)
    pub fn render(&self, module_dir: &Path) -> Result<String> {
        let mut out = String::new();
        out.push_str("// Generated by index-content. Do not edit.\n\n");
        out.push_str(&format!(
            "export const {}: Record<string, () => Promise<unknown>> = {{",
            MODULE_EXPORT_NAME
        ));

        if self.entries.is_empty() {
            out.push_str("};\n");
            return Ok(out);
        }

        out.push('\n');
        for (key, source) in &self.entries {
            // JSON string literals are valid JS string literals
            let key_literal = serde_json::to_string(key).context("Failed to encode module key")?;
            let specifier = serde_json::to_string(&relative_path(module_dir, source))
                .context("Failed to encode import path")?;
            out.push_str(&format!("  {}: () => import({}),\n", key_literal, specifier));
        }
        out.push_str("};\n");

        Ok(out)
    }

    /// Write the module artifact
    pub async fn save(&self, path: &Path) -> Result<()> {
        let module_dir = path.parent().unwrap_or_else(|| Path::new("."));
        write_artifact(path, self.render(module_dir)?).await
    }
}
