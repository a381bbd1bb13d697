//! Custom error types for aegis
//!
//! This module defines the error hierarchy for the sealing engine using
//! thiserror for ergonomic error definitions. Variants carry strings rather
//! than source errors so that an error can be cloned into a per-file report.

use std::path::PathBuf;

use thiserror::Error;

/// The main error type for aegis operations
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum AegisError {
    /// Configuration-related errors
    #[error("Configuration error: {0}")]
    Config(String),

    /// File I/O errors
    #[error("I/O error: {0}")]
    Io(String),

    /// JSON serialization/deserialization errors
    #[error("JSON error: {0}")]
    Json(String),

    /// Password capture errors (prompt failed, confirmation mismatch)
    #[error("Password error: {0}")]
    Password(String),

    /// The KDF refused to run (invalid parameters or resource exhaustion)
    #[error("Key derivation failed: {0}")]
    KeyDerivation(String),

    /// Artifact too short to hold a salt and a nonce
    #[error("Malformed artifact: {len} bytes, need at least {min}")]
    MalformedArtifact { len: usize, min: usize },

    /// AEAD tag mismatch: wrong password or corrupted data
    #[error("Authentication failed: wrong password or corrupted data")]
    AuthenticationFailed,

    /// AEAD sealing errors
    #[error("Encryption error: {0}")]
    Encryption(String),

    /// Extension that cannot be embedded or safely restored
    #[error("Invalid extension: {0}")]
    InvalidExtension(String),

    /// The computed output path is already taken
    #[error("Output already exists: {}", .0.display())]
    OutputExists(PathBuf),

    /// The directory walk itself failed; aborts the whole run
    #[error("Traversal error at {}: {message}", .path.display())]
    Traversal { path: PathBuf, message: String },
}

impl AegisError {
    /// Create an I/O error that names the path involved
    pub fn io_at(path: impl AsRef<std::path::Path>, err: impl std::fmt::Display) -> Self {
        Self::Io(format!("{}: {}", path.as_ref().display(), err))
    }

    /// Check if this error must abort the whole run
    pub fn is_fatal(&self) -> bool {
        matches!(self, Self::Traversal { .. })
    }

    /// Check if this is an authentication failure
    pub fn is_authentication(&self) -> bool {
        matches!(self, Self::AuthenticationFailed)
    }
}

// Implement From traits for common error types

impl From<std::io::Error> for AegisError {
    fn from(err: std::io::Error) -> Self {
        Self::Io(err.to_string())
    }
}

impl From<serde_json::Error> for AegisError {
    fn from(err: serde_json::Error) -> Self {
        Self::Json(err.to_string())
    }
}

impl From<walkdir::Error> for AegisError {
    fn from(err: walkdir::Error) -> Self {
        let path = err.path().map(PathBuf::from).unwrap_or_default();
        let message = match err.io_error() {
            Some(io) => io.to_string(),
            None => err.to_string(),
        };
        Self::Traversal { path, message }
    }
}

/// Result type alias for aegis operations
pub type AegisResult<T> = Result<T, AegisError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = AegisError::Config("test error".into());
        assert_eq!(err.to_string(), "Configuration error: test error");
    }

    #[test]
    fn test_malformed_artifact_display() {
        let err = AegisError::MalformedArtifact { len: 10, min: 28 };
        assert_eq!(
            err.to_string(),
            "Malformed artifact: 10 bytes, need at least 28"
        );
    }

    #[test]
    fn test_only_traversal_is_fatal() {
        let fatal = AegisError::Traversal {
            path: PathBuf::from("/missing"),
            message: "No such file or directory".into(),
        };
        assert!(fatal.is_fatal());
        assert!(!AegisError::AuthenticationFailed.is_fatal());
        assert!(!AegisError::Io("denied".into()).is_fatal());
        assert!(!AegisError::OutputExists(PathBuf::from("a.aegis")).is_fatal());
    }

    #[test]
    fn test_from_io_error() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "file not found");
        let aegis_err: AegisError = io_err.into();
        assert!(matches!(aegis_err, AegisError::Io(_)));
    }

    #[test]
    fn test_walkdir_error_is_fatal() {
        let temp_dir = tempfile::TempDir::new().unwrap();
        let missing = temp_dir.path().join("missing");
        let err = walkdir::WalkDir::new(&missing)
            .into_iter()
            .next()
            .unwrap()
            .unwrap_err();

        let aegis_err: AegisError = err.into();
        assert!(aegis_err.is_fatal());
        assert!(aegis_err.to_string().contains("missing"));
    }
}
