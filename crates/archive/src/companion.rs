use crate::error::{ErrorKind, Result};
use exn::ResultExt;
use serde::{Deserialize, Deserializer, de::Error as _};
use serde_json::Value;
use std::path::Path;
use tracing::instrument;

/// Externally supplied metadata for Steam workshop packages.
///
/// Steam workshop archives derive their keys from values that are *not*
/// stored in the archive: the workshop file id and an opaque metadata
/// string. A wrong `file_id` is the usual cause of undecryptable packages.
#[derive(Clone, Debug, Default, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct CompanionMetadata {
    #[serde(deserialize_with = "string_or_number")]
    pub file_id: String,
    #[serde(default, deserialize_with = "string_or_number")]
    pub meta_data: String,
    #[serde(default)]
    pub title: Option<String>,
    /// Archive file name as recorded by the workshop, if known.
    #[serde(default)]
    pub lpk_file: Option<String>,
}

impl CompanionMetadata {
    /// Reads companion metadata from a JSON file.
    #[instrument]
    pub fn load(path: &Path) -> Result<Self> {
        let bytes = std::fs::read(path).or_raise(|| ErrorKind::InvalidCompanion(path.to_path_buf()))?;
        Self::from_slice(&bytes).or_raise(|| ErrorKind::InvalidCompanion(path.to_path_buf()))
    }

    /// Parses companion metadata, tolerating a leading UTF-8 byte-order mark.
    pub fn from_slice(bytes: &[u8]) -> std::result::Result<Self, serde_json::Error> {
        let bytes = bytes.strip_prefix(b"\xEF\xBB\xBF").unwrap_or(bytes);
        serde_json::from_slice(bytes)
    }

    /// Returns a copy with a different workshop file id.
    #[must_use]
    pub fn with_file_id(&self, file_id: impl Into<String>) -> Self {
        Self { file_id: file_id.into(), ..self.clone() }
    }

    /// The title, if present and not blank.
    #[must_use]
    pub fn title(&self) -> Option<&str> {
        self.title.as_deref().map(str::trim).filter(|t| !t.is_empty())
    }
}

fn string_or_number<'de, D: Deserializer<'de>>(deserializer: D) -> std::result::Result<String, D::Error> {
    match Value::deserialize(deserializer)? {
        Value::String(s) => Ok(s),
        Value::Number(n) => Ok(n.to_string()),
        Value::Null => Ok(String::new()),
        other => Err(D::Error::custom(format!("expected a string or number, found {other}"))),
    }
}
