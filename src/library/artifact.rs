//! Atomic artifact writes.

use std::io::Write;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use tempfile::NamedTempFile;
use tokio::fs;

/// Write `contents` to `path`, creating parent directories as needed
///
/// The file is written to a temp file beside the target and renamed into
/// place, so readers never observe a half-written artifact.
pub async fn write_artifact(path: &Path, contents: String) -> Result<()> {
    let parent = path
        .parent()
        .filter(|p| !p.as_os_str().is_empty())
        .map(Path::to_path_buf)
        .unwrap_or_else(|| PathBuf::from("."));

    fs::create_dir_all(&parent)
        .await
        .with_context(|| format!("Failed to create directory: {}", parent.display()))?;

    let target = path.to_path_buf();
    tokio::task::spawn_blocking(move || -> Result<()> {
        let mut temp = NamedTempFile::new_in(&parent)
            .with_context(|| format!("Failed to create temp file in {}", parent.display()))?;
        temp.write_all(contents.as_bytes())
            .with_context(|| format!("Failed to write temp file for {}", target.display()))?;
        temp.flush()?;
        temp.persist(&target)
            .with_context(|| format!("Failed to write artifact: {}", target.display()))?;
        Ok(())
    })
    .await
    .context("Artifact write task failed")?
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[tokio::test]
    async fn test_write_artifact_creates_parents_and_replaces() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("generated").join("out.json");

        write_artifact(&path, "[]".to_string()).await.unwrap();
        assert_eq!(std::fs::read_to_string(&path).unwrap(), "[]");

        write_artifact(&path, "[1]".to_string()).await.unwrap();
        assert_eq!(std::fs::read_to_string(&path).unwrap(), "[1]");

        // Only the artifact remains, no stray temp files
        let entries = std::fs::read_dir(temp.path().join("generated")).unwrap().count();
        assert_eq!(entries, 1);
    }
}
