//! Directory scanning backend
//!
//! Uses walkdir to list every regular file under the input root

use std::io;
use std::path::Path;
use tracing::{debug, trace};
use walkdir::WalkDir;

use crate::core::error::{Result, WeaveError};
use crate::core::model::ScannedFile;
use crate::core::paths::make_relative;

/// Scan all regular files under `root`
///
/// Results are in traversal order, which is filesystem dependent. Hidden
/// files are included, symlinks are not followed, and `exclude` (the output
/// file, when it lives under the root) is skipped. Each entry keeps the walked
/// path untouched; the '/'-normalized relative form is for display and sorting.
pub fn scan_files(root: &Path, exclude: Option<&Path>) -> Result<Vec<ScannedFile>> {
    let meta = std::fs::metadata(root).map_err(|e| WeaveError::filesystem(root, e))?;
    if !meta.is_dir() {
        return Err(WeaveError::filesystem(
            root,
            io::Error::other("not a directory"),
        ));
    }

    let mut files = Vec::new();

    for entry in WalkDir::new(root).follow_links(false) {
        let entry = entry.map_err(|e| {
            let path = e
                .path()
                .map(Path::to_path_buf)
                .unwrap_or_else(|| root.to_path_buf());
            let source = e
                .into_io_error()
                .unwrap_or_else(|| io::Error::other("filesystem loop detected"));
            WeaveError::filesystem(path, source)
        })?;

        if !entry.file_type().is_file() {
            continue;
        }

        let path = entry.path();
        if exclude == Some(path) {
            debug!(path = %path.display(), "skipping output file inside input tree");
            continue;
        }

        let relative = match make_relative(path, root) {
            Some(r) => r,
            None => continue,
        };

        trace!(file = %relative, "scanned");
        files.push(ScannedFile {
            relative,
            path: path.to_path_buf(),
        });
    }

    debug!(root = %root.display(), count = files.len(), "scan complete");
    Ok(files)
}
