//! Error types for zenn2qiita.

use std::path::{Path, PathBuf};
use thiserror::Error;

/// Label used in place of a path for the document being converted.
pub const INPUT_ORIGIN: &str = "<input>";

/// Main error type for conversion operations.
#[derive(Error, Debug)]
pub enum ConvertError {
    #[error("Malformed document {origin}: {message}")]
    MalformedDocument { origin: PathBuf, message: String },

    #[error("Failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("YAML serialize error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("Invalid config {path}: {message}")]
    Config { path: PathBuf, message: String },
}

impl ConvertError {
    pub(crate) fn malformed(origin: &Path, message: impl Into<String>) -> Self {
        ConvertError::MalformedDocument {
            origin: origin.to_path_buf(),
            message: message.into(),
        }
    }

    pub(crate) fn io(path: &Path, source: std::io::Error) -> Self {
        ConvertError::Io {
            path: path.to_path_buf(),
            source,
        }
    }

    /// Whether the error came from a document that could not be parsed.
    pub fn is_malformed(&self) -> bool {
        matches!(self, ConvertError::MalformedDocument { .. })
    }
}

/// Result type alias for conversion operations.
pub type Result<T> = std::result::Result<T, ConvertError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_malformed_display() {
        let err = ConvertError::malformed(Path::new(INPUT_ORIGIN), "missing closing delimiter");
        assert_eq!(
            err.to_string(),
            "Malformed document <input>: missing closing delimiter"
        );
        assert!(err.is_malformed());
    }

    #[test]
    fn test_io_keeps_source() {
        let io = std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied");
        let err = ConvertError::io(Path::new("public/a.md"), io);
        assert!(!err.is_malformed());
        assert!(err.to_string().contains("public/a.md"));
        assert!(std::error::Error::source(&err).is_some());
    }
}
