//! ArgMatches → folder options and action conversion.

use std::path::PathBuf;

use anyhow::{anyhow, bail, Result};
use clap::ArgMatches;
use savestate_durability::SlotSource;

/// Save folder options shared by every subcommand.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FolderOptions {
    pub dir: PathBuf,
    pub stem: Option<String>,
    pub backups: Option<usize>,
    pub raw: bool,
    pub format: String,
    pub verbosity: u8,
}

/// The action requested on the command line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CliAction {
    Status,
    Dump { slot: SlotSource },
    Load,
    Backup,
    Clear { confirmed: bool },
}

/// Extract folder options from the global flags.
pub fn folder_options(matches: &ArgMatches) -> FolderOptions {
    FolderOptions {
        dir: matches
            .get_one::<String>("dir")
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from(".")),
        stem: matches.get_one::<String>("stem").cloned(),
        backups: matches.get_one::<usize>("backups").copied(),
        raw: matches.get_flag("raw"),
        format: matches
            .get_one::<String>("format")
            .cloned()
            .unwrap_or_else(|| "json".to_string()),
        verbosity: matches.get_count("verbose"),
    }
}

/// Convert the parsed subcommand into an action.
pub fn matches_to_action(matches: &ArgMatches) -> Result<CliAction> {
    let (sub_name, sub_matches) = matches
        .subcommand()
        .ok_or_else(|| anyhow!("No command provided"))?;

    match sub_name {
        "status" => Ok(CliAction::Status),
        "dump" => {
            let raw = sub_matches
                .get_one::<String>("slot")
                .map(String::as_str)
                .unwrap_or("main");
            Ok(CliAction::Dump {
                slot: parse_slot(raw)?,
            })
        }
        "load" => Ok(CliAction::Load),
        "backup" => Ok(CliAction::Backup),
        "clear" => Ok(CliAction::Clear {
            confirmed: sub_matches.get_flag("yes"),
        }),
        other => bail!("Unknown command: {}", other),
    }
}

/// Parse a slot name: `main` or a backup index.
pub fn parse_slot(raw: &str) -> Result<SlotSource> {
    if raw.eq_ignore_ascii_case("main") {
        return Ok(SlotSource::Main);
    }
    raw.parse::<usize>()
        .map(SlotSource::Backup)
        .map_err(|_| anyhow!("Invalid slot '{}': expected 'main' or a backup index", raw))
}
