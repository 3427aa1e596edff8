use std::io::{BufRead, IsTerminal, Write};
use std::path::Path;

/// Asks on the terminal for the workshop file id of `archive`.
pub(crate) fn file_id(archive: &Path) -> Option<String> {
    if !std::io::stdin().is_terminal() {
        tracing::warn!("Standard input is not a terminal; not prompting for a workshop file id");
        return None;
    }
    tracing::warn!(
        "Steam workshop file ids are the folder names under steamapps/workshop/content/616720/ in the Steam library"
    );
    let mut stderr = std::io::stderr().lock();
    write!(stderr, "Workshop file id for {}: ", archive.display()).ok()?;
    stderr.flush().ok()?;
    let mut line = String::new();
    std::io::stdin().lock().read_line(&mut line).ok()?;
    Some(line)
}
