//! Recovering the Steam workshop file id when the supplied one is wrong.

use lpk_archive::CompanionMetadata;
use std::fmt;
use std::path::Path;

const ARCHIVE_EXTENSION: &str = ".lpk";

/// Asks someone for the workshop file id of an archive.
///
/// Implementations may block, e.g. on a terminal. Returning `None` gives up.
pub trait FileIdPrompt {
    fn file_id(&mut self, archive: &Path) -> Option<String>;
}

impl<F> FileIdPrompt for F
where
    F: FnMut(&Path) -> Option<String>,
{
    fn file_id(&mut self, archive: &Path) -> Option<String> {
        self(archive)
    }
}

/// How far extraction may go to find a working file id for an encrypted
/// Steam workshop package.
#[derive(Default)]
pub enum KeyRecoveryStrategy {
    /// Retry once with the id derived from the archive file name, then fail
    /// with [`KeyRecoveryFailed`](crate::error::ErrorKind::KeyRecoveryFailed).
    #[default]
    Deterministic,
    /// As [`Deterministic`](Self::Deterministic), then ask the prompt once.
    Interactive(Box<dyn FileIdPrompt>),
}

impl KeyRecoveryStrategy {
    pub fn interactive(prompt: impl FileIdPrompt + 'static) -> Self {
        Self::Interactive(Box::new(prompt))
    }

    pub(crate) fn prompt(&mut self, archive: &Path) -> Option<String> {
        match self {
            Self::Deterministic => None,
            Self::Interactive(prompt) => prompt
                .file_id(archive)
                .map(|id| id.trim().to_string())
                .filter(|id| !id.is_empty()),
        }
    }
}

impl fmt::Debug for KeyRecoveryStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Deterministic => f.write_str("Deterministic"),
            Self::Interactive(_) => f.write_str("Interactive"),
        }
    }
}

/// The workshop file id a package most likely has: the archive name the
/// companion metadata records, else the archive's own file name, either way
/// without its `.lpk` extension.
pub(crate) fn candidate_file_id(companion: Option<&CompanionMetadata>, archive: &Path) -> Option<String> {
    let recorded = companion.and_then(|c| c.lpk_file.as_deref()).map(str::trim).filter(|f| !f.is_empty());
    let file_name = match recorded {
        Some(recorded) => recorded.to_string(),
        None => archive.file_name()?.to_string_lossy().into_owned(),
    };
    let stem = match file_name.len().checked_sub(ARCHIVE_EXTENSION.len()) {
        Some(split) if file_name.is_char_boundary(split) && file_name[split..].eq_ignore_ascii_case(ARCHIVE_EXTENSION) => {
            &file_name[..split]
        },
        _ => file_name.as_str(),
    };
    match stem.is_empty() {
        true => None,
        false => Some(stem.to_string()),
    }
}
