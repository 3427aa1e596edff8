mod cli;
mod error;
mod logging;
mod prompt;

use crate::cli::Args;
use crate::error::{ErrorKind, Result};
use clap::Parser;
use exn::ResultExt;
use lpk_config::Config;
use lpk_unpack::{ExtractOptions, KeyRecoveryStrategy, LpkLoader, Summary};
use std::process::ExitCode;

fn main() -> ExitCode {
    let args = Args::parse();
    let config = Config::load(args.config.as_deref()).or_raise(|| ErrorKind::Config);
    let level = config.as_ref().map_or("info", |config| config.log_level.as_str());
    logging::init(args.log_directive(), level);
    let result = config.and_then(|config| run(&args, &config));
    match result {
        Ok(summary) => {
            tracing::info!(
                route = %summary.route,
                characters = summary.characters,
                models = summary.models,
                resources = summary.resources,
                copied = summary.copied,
                skipped = summary.skipped,
                "Unpacked {}",
                args.archive.display()
            );
            ExitCode::SUCCESS
        },
        Err(err) => {
            tracing::error!("{err:?}");
            ExitCode::FAILURE
        },
    }
}

fn run(args: &Args, config: &Config) -> Result<Summary> {
    let output = args.output(config.output.as_deref());
    let recovery = match config.interactive && !args.non_interactive {
        true => KeyRecoveryStrategy::interactive(prompt::file_id),
        false => KeyRecoveryStrategy::Deterministic,
    };
    let options = ExtractOptions { recovery, fix_motions: args.fix_motions || config.fix_motions };
    let failed = || ErrorKind::Unpack(args.archive.clone());
    let mut loader = LpkLoader::open(&args.archive, args.companion()).or_raise(failed)?;
    tracing::info!(output = %output.display(), "Unpacking {}", args.archive.display());
    loader.extract(&output, options).or_raise(failed)
}
