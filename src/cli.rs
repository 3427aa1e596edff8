use clap::{ArgAction, Parser};
use std::path::{Path, PathBuf};

/// Unpacks encrypted LPK model archives into plain Live2D model directories.
#[derive(Clone, Debug, Parser)]
#[command(name = "lpkunpacker", version, about, long_about = None)]
pub(crate) struct Args {
    /// The `.lpk` archive to unpack.
    pub archive: PathBuf,
    /// Output directory [default: configured output, else the archive's
    /// name next to the archive].
    pub output: Option<PathBuf>,
    /// Companion metadata (`config.json`) of a Steam workshop package.
    #[arg(value_name = "COMPANION", conflicts_with = "companion")]
    pub companion_file: Option<PathBuf>,
    /// Companion metadata (`config.json`) of a Steam workshop package.
    #[arg(short, long, value_name = "FILE")]
    pub companion: Option<PathBuf>,
    /// Configuration file to load after the user configuration.
    #[arg(long, value_name = "FILE")]
    pub config: Option<PathBuf>,
    /// Recount the summary counts of recovered motion files.
    #[arg(long)]
    pub fix_motions: bool,
    /// Never prompt for a workshop file id.
    #[arg(long)]
    pub non_interactive: bool,
    /// More logging (repeat for more).
    #[arg(short, long, action = ArgAction::Count, conflicts_with = "quiet")]
    pub verbose: u8,
    /// Only log errors.
    #[arg(short, long)]
    pub quiet: bool,
}

impl Args {
    pub(crate) fn companion(&self) -> Option<&Path> {
        self.companion.as_deref().or(self.companion_file.as_deref())
    }

    pub(crate) fn output(&self, configured: Option<&Path>) -> PathBuf {
        if let Some(output) = &self.output {
            return output.clone();
        }
        let stem = self.archive.file_stem().map(PathBuf::from).unwrap_or_else(|| PathBuf::from("lpk"));
        match configured {
            Some(dir) => dir.join(stem),
            None => self.archive.with_file_name(stem),
        }
    }

    /// Filter directive requested on the command line, if any.
    pub(crate) fn log_directive(&self) -> Option<&'static str> {
        match (self.quiet, self.verbose) {
            (true, _) => Some("error"),
            (false, 0) => None,
            (false, 1) => Some("debug"),
            (false, _) => Some("trace"),
        }
    }
}
