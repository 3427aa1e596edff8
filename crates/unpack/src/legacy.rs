//! Bulk extraction for archives without a usable character list.
//!
//! Every member is written under its own name. Unlike the structured path
//! there is no partial success: the first member that fails aborts the run.

use crate::error::{ErrorKind, Result};
use exn::ResultExt;
use lpk_archive::{Archive, Manifest, legacy_key, validate_member_path};
use std::io::{Read, Seek};
use std::path::Path;
use tracing::instrument;

/// Extensions of members stored in plain text even in encrypted packages.
const PLAIN_EXTENSIONS: [&str; 3] = ["json", "mlve", "txt"];

fn is_plain(name: &str) -> bool {
    Path::new(name)
        .extension()
        .and_then(|e| e.to_str())
        .is_some_and(|e| PLAIN_EXTENSIONS.iter().any(|p| e.eq_ignore_ascii_case(p)))
}

/// Copies or decrypts every member into `output`, returning how many files
/// were written.
#[instrument(skip(archive, manifest), fields(encrypt = %manifest.encrypt))]
pub(crate) fn extract<R: Read + Seek>(archive: &mut Archive<R>, manifest: &Manifest, output: &Path) -> Result<usize> {
    let manifest_member = archive.manifest_member();
    let mut written = 0;
    for name in archive.member_names() {
        let failed = || ErrorKind::LegacyExtractionFailed(name.clone());
        let relative = validate_member_path(&name).or_raise(failed)?;
        let target = output.join(&relative);
        if name.ends_with('/') {
            std::fs::create_dir_all(&target).or_raise(failed)?;
            continue;
        }
        let data = archive.read(&name).or_raise(failed)?;
        let verbatim = manifest.encrypt.is_false() || is_plain(&name) || manifest_member.as_deref() == Some(name.as_str());
        let data = match verbatim {
            true => data,
            false => lpk_cipher::transform(legacy_key(manifest, &name), &data),
        };
        if let Some(parent) = target.parent() {
            std::fs::create_dir_all(parent).or_raise(failed)?;
        }
        std::fs::write(&target, &data).or_raise(failed)?;
        tracing::debug!(member = %name, bytes = data.len(), decrypted = !verbatim, "Wrote member");
        written += 1;
    }
    Ok(written)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("config.json", true)]
    #[case("sub/readme.TXT", true)]
    #[case("config.mlve", true)]
    #[case("texture.png", false)]
    #[case("model.moc", false)]
    #[case("json", false)]
    fn test_is_plain(#[case] name: &str, #[case] expected: bool) {
        assert_eq!(is_plain(name), expected);
    }
}
