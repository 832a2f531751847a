//! Error types for the assembly pipeline
//!
//! Pipeline stages return [`WeaveError`]; the CLI layer wraps it with `anyhow`.

use std::path::PathBuf;

/// Everything that can abort a run
#[derive(Debug, thiserror::Error)]
pub enum WeaveError {
    /// Directory or file not found, unreadable, or not writable
    #[error("filesystem error at {}: {source}", path.display())]
    Filesystem {
        path: PathBuf,
        source: std::io::Error,
    },

    /// A header block exists but cannot be decoded
    #[error("decode error in {}: {message}", path.display())]
    Decode { path: PathBuf, message: String },

    /// A weight is present but unusable, or missing where one is required
    #[error("schema error in {}: {message}", path.display())]
    Schema { path: PathBuf, message: String },

    /// Configuration file unreadable or invalid
    #[error("config error: {message}")]
    Config { message: String },

    /// Every per-file error found in collect mode
    #[error("{} file(s) failed:\n{}", errors.len(), list_errors(errors))]
    Aggregate { errors: Vec<WeaveError> },
}

pub type Result<T> = std::result::Result<T, WeaveError>;

impl WeaveError {
    pub fn filesystem(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Filesystem {
            path: path.into(),
            source,
        }
    }

    pub fn decode(path: impl Into<PathBuf>, message: impl Into<String>) -> Self {
        Self::Decode {
            path: path.into(),
            message: message.into(),
        }
    }

    pub fn schema(path: impl Into<PathBuf>, message: impl Into<String>) -> Self {
        Self::Schema {
            path: path.into(),
            message: message.into(),
        }
    }

    pub fn config(message: impl Into<String>) -> Self {
        Self::Config {
            message: message.into(),
        }
    }

    /// Collapse a list of errors: a single error is returned as is
    pub fn aggregate(mut errors: Vec<WeaveError>) -> Self {
        if errors.len() == 1 {
            return errors.remove(0);
        }
        Self::Aggregate { errors }
    }

    /// Whether this error belongs to a single file and may be collected
    pub fn is_per_file(&self) -> bool {
        matches!(self, Self::Decode { .. } | Self::Schema { .. })
    }
}

fn list_errors(errors: &[WeaveError]) -> String {
    errors
        .iter()
        .map(|e| format!("  - {}", e))
        .collect::<Vec<_>>()
        .join("\n")
}
