//! Ordering resolver
//!
//! Turns scan results into an [`OrderedManifest`]: each file's front matter is
//! decoded, its `weight` checked, and the survivors sorted ascending by weight.

use std::path::{Path, PathBuf};
use tracing::{debug, warn};

use crate::backends::frontmatter::{describe, read_front_matter};
use crate::core::config::{ErrorMode, PipelineConfig, TieBreak, UnweightedPolicy};
use crate::core::error::{Result, WeaveError};
use crate::core::model::{Metadata, OrderedManifest, ScannedFile, Weight, WeightedFile};

/// Front-matter key holding the ordering hint
pub const WEIGHT_KEY: &str = "weight";

/// Outcome of inspecting one scanned file
struct Inspection {
    relative: String,
    path: PathBuf,
    weight: Result<Option<Weight>>,
}

/// Read the `weight` entry of decoded front matter
///
/// `Ok(None)` means the key is absent. Anything other than a number (or a
/// NaN) is a schema error.
pub fn extract_weight(path: &Path, meta: &Metadata) -> Result<Option<Weight>> {
    let value = match meta.get(WEIGHT_KEY) {
        Some(v) => v,
        None => return Ok(None),
    };

    match value {
        serde_yaml::Value::Number(n) => {
            if let Some(i) = n.as_i64() {
                return Ok(Some(Weight::Int(i)));
            }
            match n.as_f64() {
                Some(f) if !f.is_nan() => Ok(Some(Weight::Float(f))),
                _ => Err(WeaveError::schema(path, "weight is not a comparable number")),
            }
        }
        other => Err(WeaveError::schema(
            path,
            format!("weight must be a number, found {}", describe(other)),
        )),
    }
}

fn inspect(file: ScannedFile) -> Inspection {
    let ScannedFile { relative, path } = file;
    let weight = read_front_matter(&path).and_then(|meta| match meta {
        Some(meta) => extract_weight(&path, &meta),
        None => Ok(None),
    });
    Inspection {
        relative,
        path,
        weight,
    }
}

#[cfg(not(feature = "parallel"))]
fn inspect_all(files: Vec<ScannedFile>) -> impl Iterator<Item = Inspection> {
    files.into_iter().map(inspect)
}

/// Inspect on the rayon pool; results keep scan order
#[cfg(feature = "parallel")]
fn inspect_all(files: Vec<ScannedFile>) -> impl Iterator<Item = Inspection> {
    use rayon::prelude::*;

    let inspected: Vec<Inspection> = files.into_par_iter().map(inspect).collect();
    inspected.into_iter()
}

/// Resolve scanned files (in scan order) into output order
pub fn resolve_order(files: Vec<ScannedFile>, config: &PipelineConfig) -> Result<OrderedManifest> {
    let mut weighted = Vec::new();
    let mut unweighted = Vec::new();
    let mut errors = Vec::new();
    let mut skipped = 0;

    for inspection in inspect_all(files) {
        let Inspection {
            relative,
            path,
            weight,
        } = inspection;

        let outcome = match weight {
            Ok(Some(weight)) => {
                debug!(file = %relative, %weight, "weighted");
                weighted.push(WeightedFile {
                    relative,
                    path,
                    weight: Some(weight),
                });
                continue;
            }
            Ok(None) => match config.unweighted {
                UnweightedPolicy::Exclude => {
                    debug!(file = %relative, "no weight, excluded");
                    skipped += 1;
                    continue;
                }
                UnweightedPolicy::Append => {
                    debug!(file = %relative, "no weight, appended");
                    unweighted.push(WeightedFile {
                        relative,
                        path,
                        weight: None,
                    });
                    continue;
                }
                UnweightedPolicy::Error => WeaveError::schema(
                    path,
                    format!("no '{}' in front matter", WEIGHT_KEY),
                ),
            },
            Err(e) => e,
        };

        if !outcome.is_per_file() || config.error_mode == ErrorMode::FailFast {
            return Err(outcome);
        }
        warn!("{}", outcome);
        errors.push(outcome);
    }

    if !errors.is_empty() {
        return Err(WeaveError::aggregate(errors));
    }

    match config.tie_break {
        TieBreak::Path => weighted.sort_by(|a, b| {
            a.weight
                .cmp(&b.weight)
                .then_with(|| a.relative.cmp(&b.relative))
        }),
        TieBreak::Scan => weighted.sort_by(|a, b| a.weight.cmp(&b.weight)),
    }
    unweighted.sort_by(|a, b| a.relative.cmp(&b.relative));
    weighted.extend(unweighted);

    Ok(OrderedManifest {
        files: weighted,
        skipped,
    })
}
