//! Concatenation and output
//!
//! Ties the pipeline together: scan, resolve the order, read every file again
//! in that order, and write the result in one atomic step.

use anyhow::{Context, Result as AnyResult};
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

use crate::backends::scan::scan_files;
use crate::core::config::{PipelineConfig, SeparatorPolicy};
use crate::core::error::{Result, WeaveError};
use crate::core::model::{Meta, OrderedManifest, ResultItem, ResultSet};
use crate::core::paths::resolve;
use crate::core::render::{RenderConfig, Renderer};
use crate::core::util::hash_bytes;
use crate::flows::order::resolve_order;

/// What a successful build produced
#[derive(Debug, Clone)]
pub struct BuildSummary {
    pub manifest: OrderedManifest,
    pub output: PathBuf,
    pub size: u64,
    pub hash: String,
}

impl BuildSummary {
    /// Manifest listing followed by one output item
    pub fn to_result_set(&self) -> ResultSet {
        let mut set = ResultSet::from_manifest(&self.manifest);
        set.push(
            ResultItem::output(self.output.to_string_lossy()).with_meta(Meta {
                size: Some(self.size),
                hash: Some(self.hash.clone()),
                files: Some(self.manifest.len()),
                skipped: Some(self.manifest.skipped),
            }),
        );
        set
    }
}

/// Scan the input tree and resolve the output order, without reading bodies
pub fn plan(config: &PipelineConfig) -> Result<OrderedManifest> {
    let root = config
        .input_dir
        .canonicalize()
        .map_err(|e| WeaveError::filesystem(&config.input_dir, e))?;
    let output = resolve(&config.output_file);

    let files = scan_files(&root, Some(&output))?;
    let manifest = resolve_order(files, config)?;
    if manifest.is_empty() {
        warn!(root = %root.display(), "no weighted files found");
    }

    info!(
        root = %root.display(),
        files = manifest.len(),
        skipped = manifest.skipped,
        "resolved order"
    );
    Ok(manifest)
}

/// Read every manifest file in order and join them
pub fn concatenate(manifest: &OrderedManifest, separator: SeparatorPolicy) -> Result<Vec<u8>> {
    let mut combined = Vec::new();

    for path in manifest.paths() {
        let content = fs::read(path).map_err(|e| WeaveError::filesystem(path, e))?;
        combined.extend_from_slice(&content);

        let needs_newline = match separator {
            SeparatorPolicy::Always => true,
            SeparatorPolicy::Normalize => !content.ends_with(b"\n"),
        };
        if needs_newline {
            combined.push(b'\n');
        }
        debug!(file = %path.display(), bytes = content.len(), "appended");
    }

    Ok(combined)
}

/// Replace `path` with `content` atomically
///
/// The content goes to a temporary file next to the destination, is synced,
/// then renamed over it; on any error the destination is left untouched.
pub fn write_output(path: &Path, content: &[u8]) -> Result<()> {
    let dir = match path.parent() {
        Some(p) if !p.as_os_str().is_empty() => p,
        _ => Path::new("."),
    };
    fs::create_dir_all(dir).map_err(|e| WeaveError::filesystem(dir, e))?;

    let mut temp =
        tempfile::NamedTempFile::new_in(dir).map_err(|e| WeaveError::filesystem(dir, e))?;

    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        temp.as_file()
            .set_permissions(fs::Permissions::from_mode(0o644))
            .map_err(|e| WeaveError::filesystem(temp.path(), e))?;
    }

    temp.write_all(content)
        .map_err(|e| WeaveError::filesystem(temp.path(), e))?;
    temp.as_file()
        .sync_all()
        .map_err(|e| WeaveError::filesystem(temp.path(), e))?;
    temp.persist(path)
        .map_err(|e| WeaveError::filesystem(path, e.error))?;

    Ok(())
}

/// Run the whole pipeline and write the output
pub fn build(config: &PipelineConfig) -> Result<BuildSummary> {
    let manifest = plan(config)?;
    let combined = concatenate(&manifest, config.separator)?;
    write_output(&config.output_file, &combined)?;

    let summary = BuildSummary {
        output: config.output_file.clone(),
        size: combined.len() as u64,
        hash: hash_bytes(&combined),
        manifest,
    };
    info!(
        output = %summary.output.display(),
        files = summary.manifest.len(),
        bytes = summary.size,
        hash = %summary.hash,
        "wrote output"
    );
    Ok(summary)
}

/// Run the build command
pub fn run_build(config: &PipelineConfig, render: RenderConfig) -> AnyResult<()> {
    let summary = build(config).with_context(|| {
        format!(
            "Failed to assemble {} into {}",
            config.input_dir.display(),
            config.output_file.display()
        )
    })?;

    let renderer = Renderer::with_config(render);
    println!("{}", renderer.render(&summary.to_result_set()));

    Ok(())
}

/// Run the manifest command (dry run: nothing is written)
pub fn run_manifest(config: &PipelineConfig, render: RenderConfig) -> AnyResult<()> {
    let manifest = plan(config)
        .with_context(|| format!("Failed to resolve order in {}", config.input_dir.display()))?;

    let renderer = Renderer::with_config(render);
    println!("{}", renderer.render(&ResultSet::from_manifest(&manifest)));

    Ok(())
}
