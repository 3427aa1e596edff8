//! Access to LPK archives: member lookup, the package manifest, the
//! external companion metadata used by Steam workshop packages, and the
//! per-member cipher key rules.
//!
//! An LPK file is a zip container. Its manifest hides under the MD5 digest
//! of `config.mlve` and every encrypted payload is named after a content
//! hash (`^[0-9a-f]{32}\.bin3?$`). Nothing here decrypts or writes files;
//! that is the job of `lpk-unpack`.

mod archive;
mod companion;
mod consts;
pub mod error;
mod key;
mod manifest;
#[cfg(feature = "mock")]
pub mod mock;
mod path;

pub use crate::archive::Archive;
pub use crate::companion::CompanionMetadata;
pub use crate::consts::{MANIFEST_NAME, find_content_hash, hashed_name, is_content_hash};
pub use crate::key::{derive_key, legacy_key};
pub use crate::manifest::{Character, Costume, Encrypt, Format, Manifest};
pub use crate::path::validate as validate_member_path;
