//! Unified error types for sbom-guard.
//!
//! Tooling failures (unreadable files, malformed documents, invalid policy
//! schemas) surface through [`SbomGuardError`]. A failed policy or drift
//! check is NOT an error: it is a successful evaluation with
//! `passed = false` / `has_drift = true`, and callers translate that into a
//! distinct exit code.

use std::path::PathBuf;
use thiserror::Error;

/// Main error type for sbom-guard operations.
#[derive(Error, Debug)]
#[non_exhaustive]
pub enum SbomGuardError {
    /// A referenced inventory, baseline, or policy file does not exist
    #[error("Not found: {path}")]
    NotFound { path: String },

    /// Errors during document parsing
    #[error("Failed to parse {context}")]
    Parse {
        context: String,
        #[source]
        source: ParseErrorKind,
    },

    /// Policy document fails schema validation
    #[error("Validation failed: {0}")]
    Validation(String),

    /// IO errors with path context
    #[error("IO error at {path:?}: {message}")]
    Io {
        path: Option<PathBuf>,
        message: String,
        #[source]
        source: std::io::Error,
    },
}

/// Specific parse error kinds
#[derive(Error, Debug)]
#[non_exhaustive]
pub enum ParseErrorKind {
    #[error("Invalid JSON structure: {0}")]
    InvalidJson(String),

    #[error("Invalid YAML structure: {0}")]
    InvalidYaml(String),
}

/// Convenient Result type for sbom-guard operations
pub type Result<T> = std::result::Result<T, SbomGuardError>;

impl SbomGuardError {
    /// Create a not-found error for a missing file
    pub fn not_found(path: impl Into<String>) -> Self {
        Self::NotFound { path: path.into() }
    }

    /// Create a parse error with context
    pub fn parse(context: impl Into<String>, source: ParseErrorKind) -> Self {
        Self::Parse {
            context: context.into(),
            source,
        }
    }

    /// Create an IO error with path context
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        let path = path.into();
        let message = format!("{source}");
        Self::Io {
            path: Some(path),
            message,
            source,
        }
    }

    /// Create a validation error
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation(message.into())
    }

    /// Classify a file-read failure: `NotFound` for missing files,
    /// `Io` for everything else.
    pub fn from_read(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        let path = path.into();
        if source.kind() == std::io::ErrorKind::NotFound {
            Self::NotFound {
                path: path.display().to_string(),
            }
        } else {
            Self::io(path, source)
        }
    }
}

impl From<std::io::Error> for SbomGuardError {
    fn from(err: std::io::Error) -> Self {
        Self::Io {
            path: None,
            message: format!("{err}"),
            source: err,
        }
    }
}

impl From<serde_json::Error> for SbomGuardError {
    fn from(err: serde_json::Error) -> Self {
        Self::parse(
            "JSON deserialization",
            ParseErrorKind::InvalidJson(err.to_string()),
        )
    }
}

impl From<serde_yaml::Error> for SbomGuardError {
    fn from(err: serde_yaml::Error) -> Self {
        Self::parse(
            "YAML deserialization",
            ParseErrorKind::InvalidYaml(err.to_string()),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = SbomGuardError::not_found("missing.baseline.json");
        assert!(err.to_string().contains("missing.baseline.json"));

        let err = SbomGuardError::validation("policy version is required");
        assert!(err.to_string().contains("version is required"));
    }

    #[test]
    fn test_io_error_carries_path() {
        let io_err = std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied");
        let err = SbomGuardError::io("/path/to/file.json", io_err);
        assert!(err.to_string().contains("/path/to/file.json"));
    }

    #[test]
    fn test_from_read_classifies_not_found() {
        let missing = std::io::Error::new(std::io::ErrorKind::NotFound, "no such file");
        match SbomGuardError::from_read("gone.json", missing) {
            SbomGuardError::NotFound { path } => assert_eq!(path, "gone.json"),
            other => panic!("Expected NotFound, got {other:?}"),
        }

        let denied = std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied");
        assert!(matches!(
            SbomGuardError::from_read("locked.json", denied),
            SbomGuardError::Io { .. }
        ));
    }
}
