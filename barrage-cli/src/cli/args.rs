//! CLI argument definitions for `barrage`.

use clap::{Arg, ArgAction, Command};

/// Build the CLI argument parser and command definitions.
pub fn build_cli() -> Command {
    // Build the CLI definition in one place to keep main.rs slim.
    Command::new("Barrage")
        .version("0.2.0")
        .about("Scroll bullet comments across your terminal")
        .arg(
            Arg::new("lanes")
                .long("lanes")
                .short('l')
                .value_name("COUNT")
                .default_value("3")
                .help("Number of parallel lanes"),
        )
        .arg(
            Arg::new("lane-gap")
                .long("lane-gap")
                .value_name("ROWS")
                .default_value("1")
                .help("Blank rows between adjacent lanes"),
        )
        .arg(
            Arg::new("safe-area")
                .long("safe-area")
                .value_name("ROWS")
                .default_value("0")
                .help("Rows reserved above the first lane"),
        )
        .arg(
            Arg::new("travel-secs")
                .long("travel-secs")
                .short('t')
                .value_name("SECONDS")
                .default_value("6")
                .help("Time one message takes to cross the terminal"),
        )
        .arg(
            Arg::new("interval-ms")
                .long("interval-ms")
                .short('i')
                .value_name("MS")
                .default_value("2000")
                .help("Interval between dispatch ticks"),
        )
        .arg(
            Arg::new("feed-ms")
                .long("feed-ms")
                .value_name("MS")
                .default_value("900")
                .help("Interval between demo messages entering the queue"),
        )
        .arg(
            Arg::new("message")
                .long("message")
                .short('m')
                .value_name("TEXT")
                .action(ArgAction::Append)
                .help("Message to cycle through (repeatable); replaces the built-in set"),
        )
        .arg(
            Arg::new("options-json")
                .long("options-json")
                .short('O')
                .value_name("PATH")
                .help("Path to a JSON file of engine options; geometry flags override it"),
        )
        .arg(
            Arg::new("quiet")
                .long("quiet")
                .short('q')
                .action(ArgAction::SetTrue)
                .help("Disable the status and log panels"),
        )
        .subcommand(
            Command::new("create").about("Create template files").subcommand(
                Command::new("options-json").about("Print a default engine options template"),
            ),
        )
}
