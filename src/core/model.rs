//! Pipeline data model
//!
//! Weighted files flow from the resolver into the concatenator; everything
//! printed to stdout is mapped into a [`ResultSet`] before rendering.

use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::fmt;
use std::path::PathBuf;

/// Decoded front matter: string keys to arbitrary YAML values
pub type Metadata = serde_yaml::Mapping;

/// Numeric ordering hint taken from the `weight` front-matter key
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Weight {
    Int(i64),
    Float(f64),
}

/// 2^63 as f64; every float strictly inside (-2^63, 2^63) truncates to an i64
const I64_BOUND: f64 = 9_223_372_036_854_775_808.0;

/// Exact comparison of an integer against a float, without rounding `i`
fn cmp_int_float(i: i64, f: f64) -> Ordering {
    if f.is_nan() {
        // Matches total_cmp: positive NaN sorts above every number
        return if f.is_sign_negative() {
            Ordering::Greater
        } else {
            Ordering::Less
        };
    }
    if f >= I64_BOUND {
        return Ordering::Less;
    }
    if f < -I64_BOUND {
        return Ordering::Greater;
    }

    let whole = f.trunc();
    match i.cmp(&(whole as i64)) {
        Ordering::Equal => whole.partial_cmp(&f).unwrap_or(Ordering::Equal),
        other => other,
    }
}

/// Numeric order where 0.0 and -0.0 are equal; NaN falls back to total_cmp
fn cmp_floats(a: f64, b: f64) -> Ordering {
    a.partial_cmp(&b).unwrap_or_else(|| a.total_cmp(&b))
}

impl Ord for Weight {
    fn cmp(&self, other: &Self) -> Ordering {
        match (*self, *other) {
            (Weight::Int(a), Weight::Int(b)) => a.cmp(&b),
            (Weight::Int(a), Weight::Float(b)) => cmp_int_float(a, b),
            (Weight::Float(a), Weight::Int(b)) => cmp_int_float(b, a).reverse(),
            (Weight::Float(a), Weight::Float(b)) => cmp_floats(a, b),
        }
    }
}

impl PartialOrd for Weight {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl PartialEq for Weight {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for Weight {}

impl fmt::Display for Weight {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Weight::Int(v) => write!(f, "{}", v),
            Weight::Float(v) => write!(f, "{}", v),
        }
    }
}

/// A regular file found under the input root
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScannedFile {
    /// Path relative to the input root, using '/' as separator (display only)
    pub relative: String,

    /// Real path as returned by the walk
    pub path: PathBuf,
}

/// A file selected for the output
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WeightedFile {
    /// Path relative to the input root, using '/' as separator
    pub relative: String,

    /// Real path as returned by the walk
    pub path: PathBuf,

    /// `None` only for unweighted files kept by the append policy
    pub weight: Option<Weight>,
}

/// Files in output order
#[derive(Debug, Clone, Default)]
pub struct OrderedManifest {
    pub files: Vec<WeightedFile>,

    /// Files dropped because they carry no weight
    pub skipped: usize,
}

impl OrderedManifest {
    pub fn len(&self) -> usize {
        self.files.len()
    }

    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }

    pub fn paths(&self) -> impl Iterator<Item = &PathBuf> {
        self.files.iter().map(|f| &f.path)
    }
}

/// The kind of result item
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Kind {
    /// An input file, in manifest order
    File,
    /// The written output file
    Output,
}

/// Metadata for a result item
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Meta {
    /// Size in bytes
    #[serde(skip_serializing_if = "Option::is_none")]
    pub size: Option<u64>,

    /// Content hash (XXH3)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hash: Option<String>,

    /// Number of files concatenated into the output
    #[serde(skip_serializing_if = "Option::is_none")]
    pub files: Option<usize>,

    /// Number of unweighted files left out
    #[serde(skip_serializing_if = "Option::is_none")]
    pub skipped: Option<usize>,
}

/// A single line of command output
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ResultItem {
    pub kind: Kind,

    /// Path relative to the input root, or the output path as given
    pub path: String,

    /// Position in the manifest, starting at 1
    #[serde(skip_serializing_if = "Option::is_none")]
    pub position: Option<usize>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub weight: Option<Weight>,

    #[serde(default)]
    pub meta: Meta,
}

impl ResultItem {
    /// Create an entry for one manifest file
    pub fn file(position: usize, file: &WeightedFile) -> Self {
        Self {
            kind: Kind::File,
            path: file.relative.clone(),
            position: Some(position),
            weight: file.weight,
            meta: Meta::default(),
        }
    }

    /// Create the summary entry for the written output
    pub fn output(path: impl Into<String>) -> Self {
        Self {
            kind: Kind::Output,
            path: path.into(),
            position: None,
            weight: None,
            meta: Meta::default(),
        }
    }

    /// Set metadata
    pub fn with_meta(mut self, meta: Meta) -> Self {
        self.meta = meta;
        self
    }
}

/// Ordered collection of result items
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ResultSet {
    pub items: Vec<ResultItem>,
}

impl ResultSet {
    pub fn push(&mut self, item: ResultItem) {
        self.items.push(item);
    }

    /// Build the listing of a manifest, one item per file
    pub fn from_manifest(manifest: &OrderedManifest) -> Self {
        let items = manifest
            .files
            .iter()
            .enumerate()
            .map(|(i, f)| ResultItem::file(i + 1, f))
            .collect();
        Self { items }
    }
}
