use crate::consts::{MANIFEST_NAME, hashed_name};
use crate::error::{ErrorKind, Result};
use crate::manifest::Manifest;
use exn::ResultExt;
use std::fs::File;
use std::io::{BufReader, Read, Seek};
use std::path::{Path, PathBuf};
use tracing::instrument;
use zip::ZipArchive;
use zip::result::ZipError;

/// Upper bound on the buffer reserved up front for one member. The declared
/// size comes from the archive and may be arbitrarily large.
const MAX_PREALLOCATION: usize = 1 << 20;

/// Read-only, random-access view of an LPK container.
///
/// Members are read whole; LPK payloads are small enough that streaming
/// buys nothing and the cipher needs the full buffer anyway.
pub struct Archive<R> {
    zip: ZipArchive<R>,
    path: Option<PathBuf>,
}

impl Archive<BufReader<File>> {
    /// Opens the archive at `path`.
    #[instrument]
    pub fn open(path: &Path) -> Result<Self> {
        let file = File::open(path).or_raise(|| ErrorKind::Io)?;
        let mut archive = Self::from_reader(BufReader::new(file))?;
        archive.path = Some(path.to_path_buf());
        Ok(archive)
    }
}

impl<R: Read + Seek> Archive<R> {
    pub fn from_reader(reader: R) -> Result<Self> {
        let zip = ZipArchive::new(reader).or_raise(|| ErrorKind::Corrupted)?;
        Ok(Self { zip, path: None })
    }

    /// Filesystem location, when opened with [`open`](Archive::open).
    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.zip.index_for_name(name).is_some()
    }

    /// All member names in container order (directories end with `/`).
    pub fn member_names(&self) -> Vec<String> {
        self.zip.file_names().map(str::to_string).collect()
    }

    /// Reads member `name` in full.
    pub fn read(&mut self, name: &str) -> Result<Vec<u8>> {
        let mut file = match self.zip.by_name(name) {
            Ok(file) => file,
            Err(ZipError::FileNotFound) => exn::bail!(ErrorKind::MemberNotFound(name.to_string())),
            Err(e) => return Err(e).or_raise(|| ErrorKind::Corrupted),
        };
        let mut buffer = Vec::with_capacity(initial_capacity(file.size()));
        file.read_to_end(&mut buffer).or_raise(|| ErrorKind::Corrupted)?;
        Ok(buffer)
    }

    /// Name of the member holding the manifest: the MD5-disguised name if
    /// present, otherwise the literal `config.mlve`.
    pub fn manifest_member(&self) -> Option<String> {
        let hashed = hashed_name(MANIFEST_NAME);
        if self.contains(&hashed) {
            return Some(hashed);
        }
        self.contains(MANIFEST_NAME).then(|| MANIFEST_NAME.to_string())
    }

    /// Locates and parses the package manifest.
    ///
    /// # Errors
    ///
    /// [`ManifestNotFound`](ErrorKind::ManifestNotFound) if neither manifest
    /// member exists, [`InvalidManifest`](ErrorKind::InvalidManifest) if it is
    /// not a JSON object.
    #[instrument(skip(self), fields(member))]
    pub fn manifest(&mut self) -> Result<Manifest> {
        let member = match self.manifest_member() {
            Some(member) => member,
            None => exn::bail!(ErrorKind::ManifestNotFound),
        };
        tracing::Span::current().record("member", member.as_str());
        let bytes = self.read(&member)?;
        let manifest = Manifest::from_slice(&bytes)?;
        tracing::debug!(format = %manifest.format, package = %manifest.package_id, "Manifest loaded");
        Ok(manifest)
    }
}

fn initial_capacity(declared: u64) -> usize {
    usize::try_from(declared).map_or(MAX_PREALLOCATION, |size| size.min(MAX_PREALLOCATION))
}
