//! Archive builder for tests.
//!
//! Writes real zip files shaped like LPK packages, encrypting members with
//! the same key rules the unpacker uses to decrypt them. Panics on any setup
//! failure: if test setup is wrong, then the test should not pass.

use crate::consts::{MANIFEST_NAME, hashed_name};
use crate::{CompanionMetadata, Manifest, derive_key, legacy_key};
use serde_json::Value;
use std::fs::File;
use std::io::Write;
use std::path::Path;
use zip::write::SimpleFileOptions;

enum Payload {
    /// Encrypt with the manifest's key rule.
    Derived(Vec<u8>),
    /// Encrypt with the legacy (standard-v1) key rule.
    Legacy(Vec<u8>),
    /// Store as given.
    Raw(Vec<u8>),
    Directory,
}

/// Builds LPK archives on disk.
///
/// # Examples
///
/// ```
/// use lpk_archive::{Archive, mock::MockArchive};
/// use serde_json::json;
///
/// let dir = tempfile::tempdir().unwrap();
/// let path = dir.path().join("package.lpk");
/// MockArchive::new(json!({"type": "STD2_0", "id": "pkg", "list": []}))
///     .member("0123456789abcdef0123456789abcdef.bin", b"{}")
///     .write(&path);
/// let mut archive = Archive::open(&path).unwrap();
/// assert!(archive.manifest().unwrap().is_structured());
/// ```
pub struct MockArchive {
    manifest: Vec<u8>,
    manifest_member: Option<String>,
    companion: Option<CompanionMetadata>,
    members: Vec<(String, Payload)>,
}

impl MockArchive {
    /// Starts an archive whose manifest is stored under the hashed member name.
    pub fn new(manifest: Value) -> Self {
        Self::with_manifest_bytes(serde_json::to_vec(&manifest).expect("serializable manifest"))
    }

    /// Starts an archive from raw manifest bytes (e.g. with a byte-order mark).
    pub fn with_manifest_bytes(manifest: impl Into<Vec<u8>>) -> Self {
        Self {
            manifest: manifest.into(),
            manifest_member: Some(hashed_name(MANIFEST_NAME)),
            companion: None,
            members: Vec::new(),
        }
    }

    /// Stores the manifest under the literal `config.mlve` name instead.
    pub fn literal_manifest(mut self) -> Self {
        self.manifest_member = Some(MANIFEST_NAME.to_string());
        self
    }

    /// Leaves the manifest out of the archive entirely.
    pub fn without_manifest(mut self) -> Self {
        self.manifest_member = None;
        self
    }

    /// Companion metadata used to encrypt Steam workshop members.
    pub fn companion(mut self, companion: CompanionMetadata) -> Self {
        self.companion = Some(companion);
        self
    }

    /// Adds a member encrypted with the key the manifest's format derives.
    pub fn member(mut self, name: impl Into<String>, plaintext: impl AsRef<[u8]>) -> Self {
        self.members.push((name.into(), Payload::Derived(plaintext.as_ref().to_vec())));
        self
    }

    /// Adds a member encrypted with the legacy bulk-path key rule.
    pub fn legacy_member(mut self, name: impl Into<String>, plaintext: impl AsRef<[u8]>) -> Self {
        self.members.push((name.into(), Payload::Legacy(plaintext.as_ref().to_vec())));
        self
    }

    /// Adds a member stored without encryption.
    pub fn raw_member(mut self, name: impl Into<String>, bytes: impl AsRef<[u8]>) -> Self {
        self.members.push((name.into(), Payload::Raw(bytes.as_ref().to_vec())));
        self
    }

    pub fn directory(mut self, name: impl Into<String>) -> Self {
        self.members.push((name.into(), Payload::Directory));
        self
    }

    /// Writes the archive to `path`.
    pub fn write(self, path: &Path) {
        let parsed = Manifest::from_slice(&self.manifest).ok();
        let file = File::create(path).expect("create mock archive");
        let mut zip = zip::ZipWriter::new(file);
        let options = SimpleFileOptions::default().compression_method(zip::CompressionMethod::Stored);
        if let Some(member) = &self.manifest_member {
            zip.start_file(member.as_str(), options).expect("start manifest member");
            zip.write_all(&self.manifest).expect("write manifest member");
        }
        for (name, payload) in self.members {
            let bytes = match payload {
                Payload::Directory => {
                    zip.add_directory(name.as_str(), options).expect("add directory");
                    continue;
                },
                Payload::Raw(bytes) => bytes,
                Payload::Derived(plain) => {
                    let manifest = parsed.as_ref().expect("derived keys need a valid manifest");
                    let key = derive_key(manifest, self.companion.as_ref(), &name).expect("derivable key");
                    lpk_cipher::transform(key, &plain)
                },
                Payload::Legacy(plain) => {
                    let manifest = parsed.as_ref().expect("legacy keys need a valid manifest");
                    lpk_cipher::transform(legacy_key(manifest, &name), &plain)
                },
            };
            zip.start_file(name.as_str(), options).expect("start member");
            zip.write_all(&bytes).expect("write member");
        }
        zip.finish().expect("finish mock archive");
    }
}
