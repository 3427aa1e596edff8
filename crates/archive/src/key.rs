use crate::CompanionMetadata;
use crate::error::{ErrorKind, Result};
use crate::manifest::{Format, Manifest};
use exn::OptionExt;
use lpk_cipher::hash;

/// Derives the cipher key for archive member `target`.
///
/// | Format | Key |
/// |---|---|
/// | Steam workshop, `encrypt` other than `"true"` | `0` |
/// | Steam workshop | `hash(id + fileId + target + metaData)` |
/// | Standard v1/v2 | `hash(id + target)` |
/// | Legacy without a `type` | `hash(id + target)` (best effort) |
///
/// Keys are cheap, so callers derive one per decrypted member instead of
/// caching them.
///
/// # Errors
///
/// - [`MissingCompanionMetadata`](ErrorKind::MissingCompanionMetadata) for an
///   encrypted Steam workshop package without `companion`.
/// - [`UnsupportedFormat`](ErrorKind::UnsupportedFormat) when the manifest
///   declares a `type` that is not recognised.
pub fn derive_key(manifest: &Manifest, companion: Option<&CompanionMetadata>, target: &str) -> Result<i64> {
    match manifest.format {
        Format::SteamWorkshop if !manifest.encrypt.keys_steam_members() => Ok(0),
        Format::SteamWorkshop => {
            let companion = companion.ok_or_raise(|| ErrorKind::MissingCompanionMetadata)?;
            Ok(hash(&format!(
                "{}{}{}{}",
                manifest.package_id, companion.file_id, target, companion.meta_data
            )))
        },
        Format::StandardV2 | Format::StandardV1 => Ok(legacy_key(manifest, target)),
        Format::LegacyUnknown => match &manifest.declared_type {
            None => Ok(legacy_key(manifest, target)),
            Some(declared) => exn::bail!(ErrorKind::UnsupportedFormat(declared.clone())),
        },
    }
}

/// The standard-v1 key rule, applied unconditionally by the legacy bulk path.
#[must_use]
pub fn legacy_key(manifest: &Manifest, target: &str) -> i64 {
    hash(&format!("{}{}", manifest.package_id, target))
}
