//! Path normalization utilities
//!
//! Relative paths are reported with '/' as separator for display and sorting
//! only; files are always opened through the path the walk produced.

use std::path::{Component, Path, PathBuf};

/// Normalize a path to use '/' as separator (for cross-platform consistency)
pub fn normalize_path(path: &Path) -> String {
    path.to_string_lossy().replace('\\', "/")
}

/// Make a path relative to the root directory
pub fn make_relative(path: &Path, root: &Path) -> Option<String> {
    path.strip_prefix(root).ok().map(normalize_path)
}

/// Make a path absolute against the current directory and drop `.`/`..`
/// components lexically, without touching the filesystem
pub fn absolutize(path: &Path) -> PathBuf {
    let joined = if path.is_absolute() {
        path.to_path_buf()
    } else {
        std::env::current_dir()
            .map(|cwd| cwd.join(path))
            .unwrap_or_else(|_| path.to_path_buf())
    };

    let mut out = PathBuf::new();
    for component in joined.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => {
                out.pop();
            }
            other => out.push(other.as_os_str()),
        }
    }
    out
}

/// Resolve a path to its canonical form when it exists, or lexically otherwise
///
/// For a file that does not exist yet, the parent is canonicalized and the
/// file name re-attached, so it still compares equal to scanned paths.
pub fn resolve(path: &Path) -> PathBuf {
    if let Ok(canonical) = path.canonicalize() {
        return canonical;
    }
    let abs = absolutize(path);
    if let (Some(parent), Some(name)) = (abs.parent(), abs.file_name()) {
        if let Ok(canonical_parent) = parent.canonicalize() {
            return canonical_parent.join(name);
        }
    }
    abs
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_path() {
        let path = Path::new("lectures/week1.md");
        assert_eq!(normalize_path(path), "lectures/week1.md");
    }

    #[test]
    fn test_make_relative() {
        let root = Path::new("/content");
        let path = Path::new("/content/lectures/week1.md");
        assert_eq!(
            make_relative(path, root),
            Some("lectures/week1.md".to_string())
        );
    }

    #[test]
    fn test_make_relative_not_under_root() {
        let root = Path::new("/content");
        let path = Path::new("/other/file.md");
        assert_eq!(make_relative(path, root), None);
    }

    #[test]
    fn test_absolutize_drops_dot_components() {
        let p = absolutize(Path::new("/content/./a/../b.md"));
        assert_eq!(p, PathBuf::from("/content/b.md"));
    }

    #[test]
    fn test_absolutize_relative_uses_cwd() {
        let p = absolutize(Path::new("out.md"));
        assert!(p.is_absolute());
        assert!(p.ends_with("out.md"));
    }

    #[test]
    fn test_resolve_missing_file_in_existing_dir() {
        let temp = tempfile::tempdir().unwrap();
        let missing = temp.path().join("output.md");
        let resolved = resolve(&missing);
        assert_eq!(resolved, temp.path().canonicalize().unwrap().join("output.md"));
    }

    #[test]
    fn test_resolve_existing_file() {
        let temp = tempfile::tempdir().unwrap();
        let file = temp.path().join("a.md");
        std::fs::write(&file, "x").unwrap();
        assert_eq!(resolve(&file), file.canonicalize().unwrap());
    }
}
