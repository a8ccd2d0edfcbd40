//! Savestate CLI: inspect and maintain a save folder.
//!
//! `savestate [flags] COMMAND` runs one command against the folder and
//! exits. Savestates are handled as `VersionedState<serde_json::Value>`, so
//! any JSON or MessagePack payload with a version can be read.

mod commands;
mod format;
mod parse;

use std::process;
use std::sync::Arc;

use anyhow::{bail, Context, Result};
use savestate_core::{serializer_for, VersionedState};
use savestate_durability::{SaveStreamer, StreamerConfig};
use tracing::Level;

use commands::build_cli;
use format::{format_outcome, format_status};
use parse::{folder_options, matches_to_action, CliAction, FolderOptions};

/// Savestate type the CLI operates on.
type Document = VersionedState<serde_json::Value>;

fn main() {
    let matches = build_cli().get_matches();
    let options = folder_options(&matches);
    init_logging(options.verbosity);

    let result = matches_to_action(&matches).and_then(|action| run(&options, action));
    if let Err(e) = result {
        eprintln!("(error) {:#}", e);
        process::exit(1);
    }
}

fn init_logging(verbosity: u8) {
    let level = match verbosity {
        0 => Level::WARN,
        1 => Level::INFO,
        _ => Level::DEBUG,
    };
    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_writer(std::io::stderr)
        .init();
}

fn open_streamer(options: &FolderOptions) -> Result<SaveStreamer<Document>> {
    let mut config = StreamerConfig::new(&options.dir, Document::clean(1, serde_json::Value::Null))
        .with_validation(!options.raw);
    if let Some(stem) = &options.stem {
        config = config.with_file_stem(stem.clone());
    }
    if let Some(backups) = options.backups {
        config = config.with_backup_count(backups);
    }

    let serializer = serializer_for::<Document>(&options.format)?;
    let streamer = SaveStreamer::builder(config)
        .serializer(Arc::from(serializer))
        .build()
        .context("Invalid save folder configuration")?;
    Ok(streamer)
}

fn run(options: &FolderOptions, action: CliAction) -> Result<()> {
    let streamer = open_streamer(options)?;

    match action {
        CliAction::Status => {
            println!("{}", format_status(&streamer.inspect()));
        }
        CliAction::Dump { slot } => {
            let text = streamer
                .debug_text(slot)
                .with_context(|| format!("Cannot dump {} slot", slot))?;
            println!("{}", text);
        }
        CliAction::Load => {
            let report = streamer.load_report();
            println!("{}", format_outcome(&report.outcome));
            println!("{}", serde_json::to_string_pretty(&report.state)?);
        }
        CliAction::Backup => {
            if streamer.create_backup()? {
                println!("OK");
            } else {
                println!("(nothing to back up)");
            }
        }
        CliAction::Clear { confirmed } => {
            if !confirmed {
                bail!(
                    "Refusing to delete saves in {} without --yes",
                    streamer.paths().root().display()
                );
            }
            let removed = streamer.delete_all_saves()?;
            println!("(removed) {} file(s)", removed);
        }
    }

    Ok(())
}
