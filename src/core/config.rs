//! Pipeline configuration
//!
//! Values come from three layers: CLI flags override the optional TOML file,
//! which overrides the built-in defaults.
//!
//! ```toml
//! [input]
//! dir = "content/lectures"
//!
//! [output]
//! file = "build/lectures.md"
//! separator = "always"
//!
//! [policy]
//! unweighted = "exclude"
//! errors = "fail-fast"
//! tie_break = "path"
//! ```

use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use crate::core::error::{Result, WeaveError};

/// Default input directory
pub const DEFAULT_INPUT_DIR: &str = "content";

/// Default output file
pub const DEFAULT_OUTPUT_FILE: &str = "output.md";

/// What to do with files that have no `weight`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum UnweightedPolicy {
    /// Leave them out of the output
    #[default]
    Exclude,
    /// Place them after every weighted file, ordered by path
    Append,
    /// Treat each one as an error
    Error,
}

/// How per-file decode and schema errors abort the run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ErrorMode {
    /// Stop at the first error
    #[default]
    FailFast,
    /// Examine every file, then report all errors together
    Collect,
}

/// Secondary ordering for files with equal weights
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum TieBreak {
    /// Relative path, lexicographically
    #[default]
    Path,
    /// Directory traversal order
    Scan,
}

/// Newline handling between concatenated files
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SeparatorPolicy {
    /// Exactly one newline after every file
    #[default]
    Always,
    /// A newline only after files not already ending in one
    Normalize,
}

macro_rules! policy_str {
    ($ty:ty { $($name:literal => $variant:path),+ $(,)? }) => {
        impl FromStr for $ty {
            type Err = String;

            fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
                match s.to_lowercase().as_str() {
                    $($name => Ok($variant),)+
                    _ => Err(format!(
                        "unknown value '{}' (expected one of: {})",
                        s,
                        [$($name),+].join(", ")
                    )),
                }
            }
        }

        impl fmt::Display for $ty {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                let name = match self {
                    $($variant => $name,)+
                };
                f.write_str(name)
            }
        }
    };
}

policy_str!(UnweightedPolicy {
    "exclude" => UnweightedPolicy::Exclude,
    "append" => UnweightedPolicy::Append,
    "error" => UnweightedPolicy::Error,
});

policy_str!(ErrorMode {
    "fail-fast" => ErrorMode::FailFast,
    "collect" => ErrorMode::Collect,
});

policy_str!(TieBreak {
    "path" => TieBreak::Path,
    "scan" => TieBreak::Scan,
});

policy_str!(SeparatorPolicy {
    "always" => SeparatorPolicy::Always,
    "normalize" => SeparatorPolicy::Normalize,
});

/// Fully resolved settings for one run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PipelineConfig {
    pub input_dir: PathBuf,
    pub output_file: PathBuf,
    pub unweighted: UnweightedPolicy,
    pub error_mode: ErrorMode,
    pub tie_break: TieBreak,
    pub separator: SeparatorPolicy,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            input_dir: PathBuf::from(DEFAULT_INPUT_DIR),
            output_file: PathBuf::from(DEFAULT_OUTPUT_FILE),
            unweighted: UnweightedPolicy::default(),
            error_mode: ErrorMode::default(),
            tie_break: TieBreak::default(),
            separator: SeparatorPolicy::default(),
        }
    }
}

/// Values given on the command line; `None` means "not given"
#[derive(Debug, Clone, Default)]
pub struct ConfigOverrides {
    pub input_dir: Option<PathBuf>,
    pub output_file: Option<PathBuf>,
    pub unweighted: Option<UnweightedPolicy>,
    pub error_mode: Option<ErrorMode>,
    pub tie_break: Option<TieBreak>,
    pub separator: Option<SeparatorPolicy>,
}

/// On-disk TOML layout
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct FileConfig {
    #[serde(default)]
    pub input: InputSection,

    #[serde(default)]
    pub output: OutputSection,

    #[serde(default)]
    pub policy: PolicySection,
}

/// `[input]` section
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct InputSection {
    pub dir: Option<PathBuf>,
}

/// `[output]` section
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct OutputSection {
    pub file: Option<PathBuf>,
    pub separator: Option<SeparatorPolicy>,
}

/// `[policy]` section
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct PolicySection {
    pub unweighted: Option<UnweightedPolicy>,
    pub errors: Option<ErrorMode>,
    pub tie_break: Option<TieBreak>,
}

impl FileConfig {
    /// Load a config file; relative paths inside it are taken relative to
    /// the file's own directory
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| {
            WeaveError::config(format!("cannot read {}: {}", path.display(), e))
        })?;
        let mut config = Self::from_toml_str(&content)
            .map_err(|e| WeaveError::config(format!("{}: {}", path.display(), e)))?;

        if let Some(base) = path.parent() {
            config.rebase(base);
        }
        Ok(config)
    }

    /// Parse config from a TOML string
    pub fn from_toml_str(content: &str) -> std::result::Result<Self, toml::de::Error> {
        toml::from_str(content)
    }

    fn rebase(&mut self, base: &Path) {
        for p in [&mut self.input.dir, &mut self.output.file]
            .into_iter()
            .flatten()
        {
            if p.is_relative() {
                *p = base.join(&*p);
            }
        }
    }
}

impl PipelineConfig {
    /// Layer defaults, an optional config file, and CLI overrides
    pub fn resolve(config_file: Option<&Path>, overrides: ConfigOverrides) -> Result<Self> {
        let file = match config_file {
            Some(path) => FileConfig::from_file(path)?,
            None => FileConfig::default(),
        };
        Ok(Self::layer(file, overrides))
    }

    fn layer(file: FileConfig, overrides: ConfigOverrides) -> Self {
        let defaults = Self::default();
        Self {
            input_dir: overrides
                .input_dir
                .or(file.input.dir)
                .unwrap_or(defaults.input_dir),
            output_file: overrides
                .output_file
                .or(file.output.file)
                .unwrap_or(defaults.output_file),
            unweighted: overrides
                .unweighted
                .or(file.policy.unweighted)
                .unwrap_or(defaults.unweighted),
            error_mode: overrides
                .error_mode
                .or(file.policy.errors)
                .unwrap_or(defaults.error_mode),
            tie_break: overrides
                .tie_break
                .or(file.policy.tie_break)
                .unwrap_or(defaults.tie_break),
            separator: overrides
                .separator
                .or(file.output.separator)
                .unwrap_or(defaults.separator),
        }
    }
}
