//! The recursive model graph walk.
//!
//! A [`GraphExtractor`] owns all state of one structured extraction run: the
//! translation table that memoizes every member already written, and the
//! model graphs whose references are rewritten once their character is done.

use crate::error::{ErrorKind, Result};
use crate::naming::{clean_hint, hashed_stem, unique_name};
use crate::recovery::{KeyRecoveryStrategy, candidate_file_id};
use crate::tables::{PendingOutputs, TranslationTable};
use crate::walk::{Reference, references};
use crate::{ExtractOptions, motion};
use exn::ResultExt;
use lpk_archive::error::ErrorKind as ArchiveErrorKind;
use lpk_archive::{Archive, CompanionMetadata, Format, Manifest, derive_key};
use serde_json::Value;
use std::io::{Read, Seek};
use std::path::{Path, PathBuf};
use tracing::instrument;

const MODEL_STEM: &str = "model";
const MODEL_EXTENSION: &str = ".json";
const MOTION_EXTENSION: &str = ".json";

pub(crate) struct GraphExtractor<'a, R> {
    archive: &'a mut Archive<R>,
    manifest: &'a Manifest,
    companion: Option<CompanionMetadata>,
    root: &'a Path,
    fix_motions: bool,
    translations: TranslationTable,
    pending: PendingOutputs,
    models: usize,
    resources: usize,
}

impl<'a, R: Read + Seek> GraphExtractor<'a, R> {
    pub(crate) fn new(
        archive: &'a mut Archive<R>,
        manifest: &'a Manifest,
        companion: Option<CompanionMetadata>,
        root: &'a Path,
        options: &ExtractOptions,
    ) -> Self {
        Self {
            archive,
            manifest,
            companion,
            root,
            fix_motions: options.fix_motions,
            translations: TranslationTable::default(),
            pending: PendingOutputs::default(),
            models: 0,
            resources: 0,
        }
    }

    pub(crate) fn models(&self) -> usize {
        self.models
    }

    pub(crate) fn resources(&self) -> usize {
        self.resources
    }

    fn decrypt(&mut self, name: &str) -> Result<Vec<u8>> {
        let key = derive_key(self.manifest, self.companion.as_ref(), name).map_err(ErrorKind::archive)?;
        let data = self.archive.read(name).map_err(ErrorKind::archive)?;
        Ok(lpk_cipher::transform(key, &data))
    }

    /// Whether `entry` decrypts to UTF-8 with the current key material.
    fn entry_decrypts(&mut self, entry: &str) -> Result<bool> {
        Ok(std::str::from_utf8(&self.decrypt(entry)?).is_ok())
    }

    fn try_file_id(&mut self, entry: &str, file_id: String) -> Result<bool> {
        let Some(companion) = &self.companion else {
            return Ok(false);
        };
        if companion.file_id == file_id {
            return Ok(false);
        }
        self.companion = Some(companion.with_file_id(file_id));
        self.entry_decrypts(entry)
    }

    /// Makes sure the entry model of a costume decrypts, replacing the
    /// companion's workshop file id if it does not.
    ///
    /// Only encrypted Steam workshop packages depend on external key
    /// material; every other format returns immediately.
    #[instrument(skip(self, strategy))]
    pub(crate) fn ensure_key(&mut self, entry: &str, archive: &Path, strategy: &mut KeyRecoveryStrategy) -> Result<()> {
        let keyed = self.manifest.format == Format::SteamWorkshop && self.manifest.encrypt.keys_steam_members();
        if !keyed || self.entry_decrypts(entry)? {
            return Ok(());
        }
        tracing::warn!("Entry model did not decrypt; the workshop file id looks wrong");
        if let Some(candidate) = candidate_file_id(self.companion.as_ref(), archive)
            && self.try_file_id(entry, candidate.clone())?
        {
            tracing::info!(file_id = %candidate, "Recovered workshop file id from the archive name");
            return Ok(());
        }
        if let Some(file_id) = strategy.prompt(archive)
            && self.try_file_id(entry, file_id.clone())?
        {
            tracing::info!(file_id = %file_id, "Using workshop file id from prompt");
            return Ok(());
        }
        exn::bail!(ErrorKind::KeyRecoveryFailed)
    }

    /// Decrypts the model graph `name`, recovers everything it references
    /// into `dir` (relative to the run's root) and queues the graph for the
    /// character's flush.
    ///
    /// Each member is extracted at most once per run; a graph is registered
    /// before its references are followed, so self-referencing and mutually
    /// referencing graphs terminate.
    #[instrument(skip(self), fields(dir = %dir.display()))]
    pub(crate) fn extract_graph(&mut self, name: &str, dir: &Path) -> Result<()> {
        if self.translations.contains(name) {
            tracing::debug!("Model graph already extracted");
            return Ok(());
        }
        let graph = parse_graph(name, self.decrypt(name)?)?;
        let translations = &self.translations;
        let model = unique_name(self.root, dir, MODEL_STEM, MODEL_EXTENSION, |p| translations.is_claimed(p));
        self.translations.insert(name, model.clone());

        for reference in references(&graph) {
            match reference {
                Reference::SubGraph(sub) => match self.extract_graph(&sub, dir) {
                    Ok(()) => {},
                    Err(err) if err.is_skippable() => {
                        tracing::warn!(member = %sub, error = %err, "Skipping unreadable sub-graph");
                    },
                    Err(err) => return Err(err),
                },
                Reference::Resource { name: resource, hint } => {
                    if !self.translations.contains(&resource) {
                        self.recover(&resource, &hint, dir)?;
                    }
                },
            }
        }

        let text = serde_json::to_string_pretty(&graph).or_raise(|| ErrorKind::CorruptGraph(name.to_string()))?;
        tracing::debug!(model = %model.display(), "Queued model graph");
        self.pending.push(model, text);
        self.models += 1;
        Ok(())
    }

    /// Decrypts a plain resource and writes it under a name cleaned from
    /// `hint`, with the extension its content suggests.
    ///
    /// A reference to a member the archive does not have is left as is.
    #[instrument(skip(self), fields(dir = %dir.display()))]
    fn recover(&mut self, name: &str, hint: &str, dir: &Path) -> Result<()> {
        let mut data = match self.decrypt(name) {
            Ok(data) => data,
            Err(err) if matches!(&*err, ErrorKind::Archive(ArchiveErrorKind::MemberNotFound(_))) => {
                tracing::warn!("Referenced member is missing from the archive; leaving reference unchanged");
                return Ok(());
            },
            Err(err) => return Err(err),
        };
        let extension = lpk_sniff::guess_extension(&data);
        if self.fix_motions && extension == MOTION_EXTENSION {
            data = motion::repair(data);
        }
        let path = self.write_recovered(dir, &clean_hint(hint), extension, &data)?;
        tracing::info!(path = %path.display(), bytes = data.len(), "Recovered resource");
        self.translations.insert(name, path);
        self.resources += 1;
        Ok(())
    }

    /// Writes recovered bytes, falling back to a content-hashed name in the
    /// same directory, then to the run's root directory.
    fn write_recovered(&self, dir: &Path, stem: &str, extension: &str, data: &[u8]) -> Result<PathBuf> {
        let hashed = hashed_stem(data);
        let attempts = [(dir, stem), (dir, hashed.as_str()), (Path::new(""), hashed.as_str())];
        let mut last = None;
        for (dir, stem) in attempts {
            let translations = &self.translations;
            let relative = unique_name(self.root, dir, stem, extension, |p| translations.is_claimed(p));
            let path = self.root.join(&relative);
            match std::fs::write(&path, data) {
                Ok(()) => return Ok(relative),
                Err(err) => {
                    tracing::warn!(path = %path.display(), error = %err, "Could not write recovered resource");
                    last = Some((path, err));
                },
            }
        }
        match last {
            Some((path, err)) => Err(err).or_raise(|| ErrorKind::IoFailure(path)),
            None => exn::bail!(ErrorKind::IoFailure(self.root.join(dir))),
        }
    }

    /// Writes every queued model graph with member names replaced by the
    /// paths of their recovered files.
    #[instrument(skip(self))]
    pub(crate) fn flush_character(&mut self) -> Result<()> {
        if self.pending.is_empty() {
            return Ok(());
        }
        tracing::debug!(translations = self.translations.len(), "Rewriting references");
        let pending: Vec<_> = self.pending.drain().collect();
        for (model, text) in pending {
            let from = model.parent().unwrap_or(Path::new(""));
            let text = self.translations.substitute(&text, from);
            let path = self.root.join(&model);
            std::fs::write(&path, text).or_raise(|| ErrorKind::IoFailure(path.clone()))?;
            tracing::info!(path = %path.display(), "Wrote model");
        }
        Ok(())
    }
}

fn parse_graph(name: &str, data: Vec<u8>) -> Result<Value> {
    let text = String::from_utf8(data).or_raise(|| ErrorKind::CorruptGraph(name.to_string()))?;
    let text = text.strip_prefix('\u{feff}').unwrap_or(&text);
    serde_json::from_str(text).or_raise(|| ErrorKind::CorruptGraph(name.to_string()))
}
