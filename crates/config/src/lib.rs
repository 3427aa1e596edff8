//! Layered configuration for the command-line unpacker.
//!
//! Sources, lowest precedence first: built-in defaults, the user's config
//! file in the platform configuration directory, then a file named
//! explicitly on the command line. TOML, YAML and JSON are understood; the
//! format is taken from the file extension.

mod error;

pub use crate::error::{Error, ErrorKind, Result};
use directories::ProjectDirs;
use exn::ResultExt;
use figment::Figment;
use figment::providers::{Format, Json, Serialized, Toml, Yaml};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::instrument;

const APPLICATION: &str = "lpkunpacker";
const FILE_STEM: &str = "config";
const EXTENSIONS: [&str; 4] = ["toml", "yaml", "yml", "json"];

#[derive(Clone, Debug, Deserialize, Serialize, PartialEq, Eq)]
#[serde(default)]
pub struct Config {
    /// Output directory used when none is given on the command line.
    pub output: Option<PathBuf>,
    /// Prompt for a Steam workshop file id when automatic recovery fails.
    pub interactive: bool,
    /// Recount the `Meta` section of recovered motion files.
    pub fix_motions: bool,
    /// Default `tracing` filter directive.
    pub log_level: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            output: None,
            interactive: true,
            fix_motions: false,
            log_level: "info".to_string(),
        }
    }
}

impl Config {
    /// The user's configuration directory, if the platform has one.
    pub fn directory() -> Option<PathBuf> {
        ProjectDirs::from("", "", APPLICATION).map(|dirs| dirs.config_dir().to_path_buf())
    }

    /// Loads defaults, then the user's config file, then `explicit`.
    #[instrument]
    pub fn load(explicit: Option<&Path>) -> Result<Self> {
        Self::load_from(Self::directory().as_deref(), explicit)
    }

    /// As [`load`](Self::load), looking for the user's config file in
    /// `directory` instead of the platform location.
    pub fn load_from(directory: Option<&Path>, explicit: Option<&Path>) -> Result<Self> {
        let mut figment = Figment::from(Serialized::defaults(Config::default()));
        if let Some(directory) = directory {
            for extension in EXTENSIONS {
                let path = directory.join(FILE_STEM).with_extension(extension);
                if path.is_file() {
                    tracing::debug!(path = %path.display(), "Merging user configuration");
                    figment = merge(figment, &path)?;
                }
            }
        }
        if let Some(path) = explicit {
            if !path.is_file() {
                exn::bail!(ErrorKind::NotFound(path.to_path_buf()));
            }
            figment = merge(figment, path)?;
        }
        figment.extract().or_raise(|| ErrorKind::Invalid)
    }
}

fn merge(figment: Figment, path: &Path) -> Result<Figment> {
    let extension = path.extension().and_then(|e| e.to_str()).map(str::to_ascii_lowercase);
    Ok(match extension.as_deref() {
        Some("toml") => figment.merge(Toml::file_exact(path)),
        Some("yaml" | "yml") => figment.merge(Yaml::file_exact(path)),
        Some("json") => figment.merge(Json::file_exact(path)),
        _ => exn::bail!(ErrorKind::UnsupportedFormat(path.to_path_buf())),
    })
}
