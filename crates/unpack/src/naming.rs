//! Output naming: turning structural path hints into file names, keeping
//! names unique within a directory, and rendering references between outputs.

use lpk_archive::Character;
use std::path::{Component, Path, PathBuf};

const FALLBACK_RESOURCE: &str = "resource";
const FALLBACK_CHARACTER: &str = "character";
const REFERENCE_PREFIX: &str = "FileReferences_";
const FILE_SUFFIX: &str = "_File";

/// Cleans a structural path hint into a file stem.
///
/// Strips the `#<n>` sub-command marker, a leading `FileReferences_`
/// (any case) and a trailing `_File`. Motion group names, indices and the
/// `_Sound` suffix survive.
pub(crate) fn clean_hint(hint: &str) -> String {
    let hint = match hint.rsplit_once('#') {
        Some((head, marker)) if !marker.is_empty() && marker.bytes().all(|b| b.is_ascii_digit()) => head,
        _ => hint,
    };
    let hint = match hint.get(..REFERENCE_PREFIX.len()) {
        Some(prefix) if prefix.eq_ignore_ascii_case(REFERENCE_PREFIX) => &hint[REFERENCE_PREFIX.len()..],
        _ => hint,
    };
    let hint = hint.strip_suffix(FILE_SUFFIX).unwrap_or(hint);
    sanitize_component(hint).unwrap_or_else(|| FALLBACK_RESOURCE.to_string())
}

/// Makes `name` safe to use as a single path component.
///
/// Characters that are invalid in file names on common platforms become `_`.
/// Returns `None` if nothing usable is left.
pub(crate) fn sanitize_component(name: &str) -> Option<String> {
    let replaced: String = name
        .chars()
        .map(|c| match c {
            '<' | '>' | ':' | '"' | '/' | '\\' | '|' | '?' | '*' => '_',
            c if c.is_control() => '_',
            c => c,
        })
        .collect();
    let trimmed = replaced.trim().trim_end_matches(['.', ' ']);
    match trimmed {
        "" | "." | ".." => None,
        name => Some(name.to_string()),
    }
}

/// Chooses one output directory (relative to the run's root) per character.
///
/// A package title names the directory of a single-character package; with
/// several characters each directory becomes `<title>_<character>`.
pub(crate) fn character_dirs(characters: &[Character], title: Option<&str>) -> Vec<PathBuf> {
    let title = title.and_then(sanitize_component);
    characters
        .iter()
        .map(|character| {
            let name = sanitize_component(&character.name);
            let dir = match (&title, name) {
                (Some(title), _) if characters.len() == 1 => title.clone(),
                (Some(title), Some(name)) => format!("{title}_{name}"),
                (Some(title), None) => format!("{title}_{FALLBACK_CHARACTER}"),
                (None, Some(name)) => name,
                (None, None) => FALLBACK_CHARACTER.to_string(),
            };
            PathBuf::from(dir)
        })
        .collect()
}

/// Returns `<stem><extension>`, or the first free `<stem>_<n><extension>`,
/// as a path relative to `root`.
///
/// `taken` reports names that are already claimed but not yet on disk.
pub(crate) fn unique_name(
    root: &Path,
    dir: &Path,
    stem: &str,
    extension: &str,
    taken: impl Fn(&Path) -> bool,
) -> PathBuf {
    let free = |candidate: &Path| !root.join(candidate).exists() && !taken(candidate);
    let candidate = dir.join(format!("{stem}{extension}"));
    if free(candidate.as_path()) {
        return candidate;
    }
    (1..)
        .map(|n| dir.join(format!("{stem}_{n}{extension}")))
        .find(|candidate| free(candidate.as_path()))
        .unwrap_or(candidate)
}

/// Fallback file stem derived from the content itself.
pub(crate) fn hashed_stem(data: &[u8]) -> String {
    blake3::hash(data).to_hex()[..16].to_string()
}

/// Renders `target` as a forward-slash path relative to the directory
/// `from`. Both paths are relative to the same root.
pub(crate) fn relative_reference(target: &Path, from: &Path) -> String {
    let target: Vec<Component> = target.components().collect();
    let from: Vec<Component> = from.components().collect();
    let common = target.iter().zip(&from).take_while(|(a, b)| a == b).count();
    let ups = std::iter::repeat_n("..".to_string(), from.len() - common);
    let downs = target[common..].iter().map(|c| c.as_os_str().to_string_lossy().into_owned());
    ups.chain(downs).collect::<Vec<_>>().join("/")
}
