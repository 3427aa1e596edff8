//! Unpacks LPK archives into plain Live2D model directories.
//!
//! ```no_run
//! use lpk_unpack::{ExtractOptions, LpkLoader};
//! use std::path::Path;
//!
//! let mut loader = LpkLoader::open(Path::new("2812345678.lpk"), Some(Path::new("config.json")))?;
//! let summary = loader.extract(Path::new("out"), ExtractOptions::default())?;
//! println!("{} models, {} resources", summary.models, summary.resources);
//! # Ok::<(), lpk_unpack::error::Error>(())
//! ```
//!
//! Archives with a character list take the structured [`Route`]: each
//! costume's model graph is decrypted, every member it references is
//! recovered under a readable name, and references are rewritten to point at
//! the recovered files. Anything else is copied member by member.

pub mod error;
mod graph;
mod legacy;
mod loader;
mod motion;
mod naming;
mod recovery;
mod tables;
mod walk;

pub use crate::loader::{ExtractOptions, LpkLoader, Route, Summary};
pub use crate::recovery::{FileIdPrompt, KeyRecoveryStrategy};
pub use lpk_archive::{CompanionMetadata, Format, Manifest};
