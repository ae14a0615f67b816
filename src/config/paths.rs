//! Path helpers shared by the seeder, the indexer and the artifact writers.
//!
//! Everything emitted into an artifact uses forward slashes, whatever the
//! host platform, because the page layer resolves these strings as URLs and
//! ES module specifiers.

use std::path::{Component, Path, PathBuf};

/// Join path components with `/`
pub fn to_slash(path: &Path) -> String {
    path.components()
        .filter_map(|c| match c {
            Component::Normal(part) => Some(part.to_string_lossy().into_owned()),
            Component::ParentDir => Some("..".to_string()),
            _ => None,
        })
        .collect::<Vec<_>>()
        .join("/")
}

/// Express `path` relative to `root`, falling back to the full path when
/// `path` lives outside of `root`
pub fn display_relative(root: &Path, path: &Path) -> String {
    match path.strip_prefix(root) {
        Ok(rel) => to_slash(rel),
        Err(_) => path.to_string_lossy().replace('\\', "/"),
    }
}

/// Relative path from directory `from_dir` to `target`, e.g. for an import
/// specifier written into a module that lives in `from_dir`
///
/// Both paths are expected to be absolute (or both relative to the same
/// base). The result always starts with `./` or `../`.
pub fn relative_path(from_dir: &Path, target: &Path) -> String {
    let from: Vec<Component> = from_dir
        .components()
        .filter(|c| !matches!(c, Component::CurDir))
        .collect();
    let to: Vec<Component> = target
        .components()
        .filter(|c| !matches!(c, Component::CurDir))
        .collect();

    let common = from
        .iter()
        .zip(to.iter())
        .take_while(|(a, b)| a == b)
        .count();

    let mut rel = PathBuf::new();
    for _ in common..from.len() {
        rel.push("..");
    }
    for part in &to[common..] {
        rel.push(part.as_os_str());
    }

    let rel = to_slash(&rel);
    if rel.starts_with("..") {
        rel
    } else {
        format!("./{}", rel)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_to_slash_joins_components() {
        let path: PathBuf = ["company-formation", "register.mdx"].iter().collect();
        assert_eq!(to_slash(&path), "company-formation/register.mdx");
        assert_eq!(to_slash(Path::new("")), "");
    }

    #[test]
    fn test_display_relative() {
        let root = Path::new("/site");
        assert_eq!(
            display_relative(root, Path::new("/site/src/content/blog/a.mdx")),
            "src/content/blog/a.mdx"
        );
        assert_eq!(
            display_relative(root, Path::new("/elsewhere/a.mdx")),
            "/elsewhere/a.mdx"
        );
    }

    #[test]
    fn test_relative_path_sibling_tree() {
        assert_eq!(
            relative_path(
                Path::new("/site/src/generated"),
                Path::new("/site/src/content/learn/banking/open-account.mdx")
            ),
            "../content/learn/banking/open-account.mdx"
        );
    }

    #[test]
    fn test_relative_path_same_dir() {
        assert_eq!(
            relative_path(Path::new("/site/out"), Path::new("/site/out/a.mdx")),
            "./a.mdx"
        );
    }
}
