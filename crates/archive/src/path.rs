//! Member path validation.
//!
//! Legacy archives are copied member-by-member using the member's own name
//! as its output path, so names must not be able to escape the output root.

use std::path::PathBuf;

use crate::error::{ErrorKind, Result};
use exn::OptionExt;

const SEPARATORS: [char; 2] = ['/', '\\'];

/// Turns an archive member name into a relative output path.
///
/// Zip member names are `/`-separated; archives written by some Windows
/// tools use `\`, so both split segments. Empty and `.` segments are
/// dropped and `..` removes the segment before it. Names that are absolute,
/// start with a drive letter, contain a NUL byte, climb above the root or
/// name nothing are rejected.
///
/// # Examples
///
/// ```
/// use std::path::Path;
/// use lpk_archive::validate_member_path;
/// assert!(validate_member_path("textures/a.png").is_ok());
/// assert!(validate_member_path("../etc/passwd").is_err());
/// assert_eq!(validate_member_path("a/./b/../c.png").unwrap(), Path::new("a/c.png"));
/// ```
pub fn validate(name: &str) -> Result<PathBuf> {
    let invalid = || ErrorKind::InvalidPath(PathBuf::from(name));
    if name.starts_with(SEPARATORS) || name.contains('\0') || has_drive(name) {
        exn::bail!(invalid());
    }
    let mut segments = Vec::new();
    for segment in name.split(SEPARATORS) {
        match segment {
            "" | "." => {},
            ".." => {
                segments.pop().ok_or_raise(invalid)?;
            },
            segment => segments.push(segment),
        }
    }
    match segments.is_empty() {
        true => exn::bail!(invalid()),
        false => Ok(segments.into_iter().collect()),
    }
}

/// `C:` and friends, which `PathBuf::join` would treat as absolute on Windows.
fn has_drive(name: &str) -> bool {
    matches!(name.as_bytes(), [letter, b':', ..] if letter.is_ascii_alphabetic())
}
