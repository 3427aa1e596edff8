//! Archive Error Types
//!
//! This module provides structured errors using `exn` for automatic location
//! tracking and error tree construction.

use derive_more::{Display, Error};
use std::path::PathBuf;

/// An archive error with automatic location tracking.
pub type Error = exn::Exn<ErrorKind>;
/// Result type alias for archive operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Actionable error categories.
///
/// These describe what the caller should *do*, not what went wrong internally.
#[derive(Debug, Display, Error, Clone, PartialEq, Eq)]
pub enum ErrorKind {
    /// Neither the hashed nor the literal `config.mlve` member exists. The
    /// file is not an LPK archive (or is damaged beyond use).
    #[display("package manifest not found")]
    ManifestNotFound,
    /// The manifest member exists but is not a JSON object.
    #[display("package manifest is not valid JSON")]
    InvalidManifest,
    /// The manifest declares a format this tool cannot derive keys for.
    ///
    /// Only raised by direct [`derive_key`](crate::derive_key) calls: such
    /// manifests take the legacy route, which never asks for a derived key.
    #[display("unsupported package format: {_0}")]
    UnsupportedFormat(#[error(not(source))] String),
    /// Steam workshop packages need the external companion metadata file.
    #[display("steam workshop package requires companion metadata")]
    MissingCompanionMetadata,
    /// The companion metadata file could not be read or parsed.
    #[display("invalid companion metadata: {}", _0.display())]
    InvalidCompanion(#[error(not(source))] PathBuf),
    /// A member referenced by name does not exist in the archive.
    #[display("archive member not found: {_0}")]
    MemberNotFound(#[error(not(source))] String),
    /// The zip container itself is unreadable.
    #[display("corrupted archive")]
    Corrupted,
    /// A member name would escape the output directory.
    #[display("invalid member path: {}", _0.display())]
    InvalidPath(#[error(not(source))] PathBuf),
    /// An I/O operation failed.
    #[display("I/O error")]
    Io,
}

impl ErrorKind {
    /// Returns `true` if retrying might succeed.
    pub fn is_retryable(&self) -> bool {
        matches!(self, ErrorKind::Io)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use exn::ResultExt;

    #[test]
    fn error_kind_display() {
        assert_eq!(ErrorKind::ManifestNotFound.to_string(), "package manifest not found");
        assert_eq!(ErrorKind::UnsupportedFormat("XYZ_9".to_string()).to_string(), "unsupported package format: XYZ_9");
        assert_eq!(
            ErrorKind::MemberNotFound("0123.bin".to_string()).to_string(),
            "archive member not found: 0123.bin"
        );
    }

    #[test]
    fn error_kind_retryable() {
        assert!(ErrorKind::Io.is_retryable());
        assert!(!ErrorKind::ManifestNotFound.is_retryable());
        assert!(!ErrorKind::MissingCompanionMetadata.is_retryable());
    }

    #[test]
    fn error_from_result() {
        let result: std::result::Result<(), std::io::Error> =
            Err(std::io::Error::new(std::io::ErrorKind::NotFound, "archive missing"));
        let err: Result<()> = result.or_raise(|| ErrorKind::Io);
        assert_eq!(*err.unwrap_err(), ErrorKind::Io);
    }
}
