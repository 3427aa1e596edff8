//! Unpack Error Types
//!
//! This module provides structured errors using `exn` for automatic location
//! tracking and error tree construction.

use derive_more::{Display, Error};
use lpk_archive::error::{Error as ArchiveError, ErrorKind as ArchiveErrorKind};
use std::path::PathBuf;

/// An unpack error with automatic location tracking.
pub type Error = exn::Exn<ErrorKind>;
/// Result type alias for unpack operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Actionable error categories.
///
/// ### Fatal for the whole archive
/// - [`ErrorKind::Archive`] (except a missing member, see below)
/// - [`ErrorKind::KeyRecoveryFailed`]
/// - [`ErrorKind::IoFailure`]
/// - [`ErrorKind::LegacyExtractionFailed`]
///
/// ### Fatal for one costume or sub-graph only
/// - [`ErrorKind::CorruptGraph`]
/// - [`ErrorKind::Archive`] wrapping
///   [`MemberNotFound`](ArchiveErrorKind::MemberNotFound)
///
/// See [`ErrorKind::is_skippable`].
#[derive(Debug, Display, Error)]
pub enum ErrorKind {
    /// Archive, manifest, companion or key derivation failure.
    #[display("archive error: {_0}")]
    Archive(ArchiveErrorKind),
    /// The Steam workshop file id is wrong and could not be recovered.
    #[display("could not recover the workshop file id needed to decrypt the package")]
    KeyRecoveryFailed,
    /// A model graph did not decrypt to UTF-8 JSON.
    #[display("corrupt model graph: {_0}")]
    CorruptGraph(#[error(not(source))] String),
    /// Recovered output could not be written, even under fallback names.
    #[display("failed to write output: {}", _0.display())]
    IoFailure(#[error(not(source))] PathBuf),
    /// A member of a legacy archive could not be copied or decrypted.
    #[display("legacy extraction failed at member: {_0}")]
    LegacyExtractionFailed(#[error(not(source))] String),
}

impl ErrorKind {
    /// Convert an archive error into an unpack error, preserving the archive
    /// crate's `Exn` frame as a child in the error tree.
    #[track_caller]
    pub fn archive(err: ArchiveError) -> Error {
        let inner = (*err).clone();
        err.raise(ErrorKind::Archive(inner))
    }

    /// Returns `true` if the error only invalidates the costume or sub-graph
    /// being extracted, and sibling costumes should still be attempted.
    pub fn is_skippable(&self) -> bool {
        matches!(self, Self::CorruptGraph(_) | Self::Archive(ArchiveErrorKind::MemberNotFound(_)))
    }

    /// Returns `true` if retrying might succeed.
    pub fn is_retryable(&self) -> bool {
        match self {
            Self::Archive(kind) => kind.is_retryable(),
            Self::IoFailure(_) => true,
            _ => false,
        }
    }
}
