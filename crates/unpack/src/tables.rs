//! Per-run bookkeeping for the graph walk.

use crate::naming::relative_reference;
use std::collections::{HashMap, HashSet};
use std::collections::hash_map::Entry;
use std::path::{Path, PathBuf};

/// Maps content-hash member names to the output path (relative to the run's
/// root) that replaced them. Doubles as the memo and cycle guard of the walk.
#[derive(Debug, Default)]
pub(crate) struct TranslationTable {
    entries: HashMap<String, PathBuf>,
    claimed: HashSet<PathBuf>,
}

impl TranslationTable {
    pub(crate) fn contains(&self, name: &str) -> bool {
        self.entries.contains_key(name)
    }

    /// Records `name` once. Later assignments are ignored and return `false`.
    pub(crate) fn insert(&mut self, name: impl Into<String>, path: PathBuf) -> bool {
        match self.entries.entry(name.into()) {
            Entry::Occupied(_) => false,
            Entry::Vacant(slot) => {
                self.claimed.insert(path.clone());
                slot.insert(path);
                true
            },
        }
    }

    /// Whether some member already maps to `path`, written or not.
    pub(crate) fn is_claimed(&self, path: &Path) -> bool {
        self.claimed.contains(path)
    }

    pub(crate) fn len(&self) -> usize {
        self.entries.len()
    }

    /// Replaces every known member name in `text` with its output path,
    /// rendered relative to the directory `from`.
    ///
    /// Longer names are replaced first so a `.bin` name never clobbers part
    /// of the matching `.bin3` name.
    pub(crate) fn substitute(&self, text: &str, from: &Path) -> String {
        let mut names: Vec<&String> = self.entries.keys().collect();
        names.sort_by(|a, b| b.len().cmp(&a.len()).then_with(|| a.cmp(b)));
        names.into_iter().fold(text.to_string(), |text, name| {
            if !text.contains(name.as_str()) {
                return text;
            }
            text.replace(name.as_str(), &relative_reference(&self.entries[name], from))
        })
    }
}

/// Serialized model graphs waiting for the end of their character, when
/// every reference they contain is finally known.
#[derive(Debug, Default)]
pub(crate) struct PendingOutputs {
    entries: Vec<(PathBuf, String)>,
}

impl PendingOutputs {
    pub(crate) fn push(&mut self, path: PathBuf, text: String) {
        self.entries.push((path, text));
    }

    pub(crate) fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub(crate) fn drain(&mut self) -> std::vec::Drain<'_, (PathBuf, String)> {
        self.entries.drain(..)
    }
}
