//! Clap command tree definition.

use clap::{value_parser, Arg, ArgAction, Command};

/// Build the complete CLI command tree.
pub fn build_cli() -> Command {
    Command::new("savestate")
        .about("Inspect and maintain a savestate folder")
        .subcommand_required(true)
        .arg(
            Arg::new("dir")
                .long("dir")
                .short('d')
                .value_name("PATH")
                .help("Save folder (default: .)")
                .global(true),
        )
        .arg(
            Arg::new("stem")
                .long("stem")
                .value_name("NAME")
                .help("File stem of the save files (default: savestate)")
                .global(true),
        )
        .arg(
            Arg::new("backups")
                .long("backups")
                .value_name("N")
                .value_parser(value_parser!(usize))
                .help("Number of backup slots (default: 3)")
                .global(true),
        )
        .arg(
            Arg::new("raw")
                .long("raw")
                .help("Files carry no frame header (validation off)")
                .action(ArgAction::SetTrue)
                .global(true),
        )
        .arg(
            Arg::new("format")
                .long("format")
                .short('f')
                .value_parser(["json", "msgpack"])
                .default_value("json")
                .help("Payload encoding")
                .global(true),
        )
        .arg(
            Arg::new("verbose")
                .long("verbose")
                .short('v')
                .action(ArgAction::Count)
                .help("Log pipeline activity to stderr (-v info, -vv debug)")
                .global(true),
        )
        .subcommand(Command::new("status").about("Show the main file and every backup slot"))
        .subcommand(
            Command::new("dump")
                .about("Print a slot's payload as readable text")
                .arg(
                    Arg::new("slot")
                        .long("slot")
                        .short('s')
                        .value_name("main|N")
                        .default_value("main")
                        .help("Slot to dump: main or a backup index"),
                ),
        )
        .subcommand(Command::new("load").about("Run the load pipeline and print the result"))
        .subcommand(Command::new("backup").about("Copy the main file into backup slot 0"))
        .subcommand(
            Command::new("clear")
                .about("Delete the main file, all backups and the debug export")
                .arg(
                    Arg::new("yes")
                        .long("yes")
                        .short('y')
                        .action(ArgAction::SetTrue)
                        .help("Confirm deletion"),
                ),
        )
}
