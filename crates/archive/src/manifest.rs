use crate::error::{ErrorKind, Result};
use exn::ResultExt;
use serde::Deserialize;
use serde_json::Value;
use std::fmt::{Display, Formatter, Result as FmtResult};

/// Package format variant declared by the manifest's `type` field.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Format {
    /// `STM_1_0`: keys also depend on external companion metadata.
    SteamWorkshop,
    /// `STD2_0`
    StandardV2,
    /// `STD_1_0`
    StandardV1,
    /// Missing or unrecognised `type`.
    LegacyUnknown,
}
impl Format {
    /// Maps the manifest's `type` value to a format. Unknown values are not
    /// an error here; they select the legacy path.
    #[must_use]
    pub fn from_declared(declared: Option<&str>) -> Self {
        match declared {
            Some("STM_1_0") => Format::SteamWorkshop,
            Some("STD2_0") => Format::StandardV2,
            Some("STD_1_0") => Format::StandardV1,
            _ => Format::LegacyUnknown,
        }
    }

    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Format::SteamWorkshop => "steam-workshop",
            Format::StandardV2 => "standard-v2",
            Format::StandardV1 => "standard-v1",
            Format::LegacyUnknown => "legacy",
        }
    }
}
impl Display for Format {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        write!(f, "{}", self.as_str())
    }
}

/// One character entry of the manifest's `list`.
#[derive(Clone, Debug, Default, Deserialize, PartialEq, Eq)]
pub struct Character {
    /// Display name; may be empty.
    #[serde(default, rename = "character")]
    pub name: String,
    #[serde(default, rename = "costume")]
    pub costumes: Vec<Costume>,
}

/// One costume of a character. An empty `model_ref` means "nothing to extract".
#[derive(Clone, Debug, Default, Deserialize, PartialEq, Eq)]
pub struct Costume {
    /// Content-hash name of the costume's entry model graph.
    #[serde(default, rename = "path")]
    pub model_ref: String,
}

/// The manifest's `encrypt` value, kept close to what was written.
///
/// The format rules compare it against the exact strings `"true"` and
/// `"false"`, so `"TRUE"` or a JSON boolean matches neither.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub enum Encrypt {
    /// Missing or `null`.
    #[default]
    Unspecified,
    /// Exactly `"true"`.
    True,
    /// Exactly `"false"`.
    False,
    /// Any other value: strings verbatim, everything else as JSON text.
    Other(String),
}
impl Encrypt {
    fn from_value(value: Option<Value>) -> Self {
        match value {
            None | Some(Value::Null) => Encrypt::Unspecified,
            Some(Value::String(s)) if s == "true" => Encrypt::True,
            Some(Value::String(s)) if s == "false" => Encrypt::False,
            Some(Value::String(s)) => Encrypt::Other(s),
            Some(other) => Encrypt::Other(other.to_string()),
        }
    }

    /// Steam workshop members use derived keys only for `"true"`. A missing
    /// flag counts as encrypted.
    #[must_use]
    pub fn keys_steam_members(&self) -> bool {
        matches!(self, Encrypt::True | Encrypt::Unspecified)
    }

    /// Legacy members are copied verbatim only for exactly `"false"`.
    #[must_use]
    pub fn is_false(&self) -> bool {
        *self == Encrypt::False
    }
}
impl Display for Encrypt {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        match self {
            Encrypt::Unspecified => f.write_str("unspecified"),
            Encrypt::True => f.write_str("true"),
            Encrypt::False => f.write_str("false"),
            Encrypt::Other(raw) => write!(f, "other({raw})"),
        }
    }
}

/// The package manifest (`config.mlve`).
///
/// Immutable once loaded; it describes one archive for the duration of one
/// extraction.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Manifest {
    pub format: Format,
    /// Raw `type` value, kept for error reporting.
    pub declared_type: Option<String>,
    pub package_id: String,
    pub encrypt: Encrypt,
    /// `None` when the manifest has no usable character list.
    pub characters: Option<Vec<Character>>,
}

#[derive(Deserialize)]
struct RawManifest {
    #[serde(default, rename = "type")]
    kind: Option<Value>,
    #[serde(default)]
    id: Option<Value>,
    #[serde(default)]
    encrypt: Option<Value>,
    #[serde(default)]
    list: Option<Value>,
}

impl Manifest {
    /// Parses manifest bytes, tolerating a leading UTF-8 byte-order mark.
    pub fn from_slice(bytes: &[u8]) -> Result<Self> {
        let bytes = bytes.strip_prefix(b"\xEF\xBB\xBF").unwrap_or(bytes);
        let raw: RawManifest = serde_json::from_slice(bytes).or_raise(|| ErrorKind::InvalidManifest)?;
        let declared_type = raw.kind.as_ref().and_then(scalar_string);
        let format = Format::from_declared(declared_type.as_deref());
        let encrypt = Encrypt::from_value(raw.encrypt);
        if let Encrypt::Other(value) = &encrypt {
            tracing::debug!(%value, "Manifest `encrypt` is neither \"true\" nor \"false\"");
        }
        let characters = match raw.list {
            None | Some(Value::Null) => None,
            Some(list) => match serde_json::from_value::<Vec<Character>>(list) {
                Ok(characters) => Some(characters),
                Err(e) => {
                    tracing::warn!(error = %e, "Manifest character list has an unrecognised shape");
                    None
                },
            },
        };
        Ok(Self {
            format,
            declared_type,
            package_id: raw.id.as_ref().and_then(scalar_string).unwrap_or_default(),
            encrypt,
            characters,
        })
    }

    /// Returns `true` when the structured (model graph) path applies.
    #[must_use]
    pub fn is_structured(&self) -> bool {
        self.format != Format::LegacyUnknown && self.characters.is_some()
    }
}

fn scalar_string(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}
