mod commands {
    pub mod default;
    pub mod inspect;
}
mod config;

use anyhow::Result;
use clap::{Arg, Command};
use std::str::FromStr;
use tracing::{subscriber::set_global_default, Level};

fn input_arg() -> Arg<'static> {
    Arg::new("input")
        .short('i')
        .long("input")
        .takes_value(true)
        .value_name("FILE")
        .help("CSV file to evaluate, without unique identifier columns")
}

fn exclude_arg() -> Arg<'static> {
    Arg::new("exclude")
        .short('x')
        .long("exclude")
        .takes_value(true)
        .multiple_occurrences(true)
        .value_name("COLUMN")
        .help("Identifier column to leave out of the analysis")
}

pub fn cli() -> Command<'static> {
    Command::new("traitscan")
        .version("0.1.0")
        .about("Estimates how easily each row of a dataset can be singled out")
        .arg(
            Arg::new("config")
                .long("config")
                .takes_value(true)
                .global(true)
                .help("Path to the config file to use"),
        )
        .arg(
            Arg::new("verbosity")
                .short('v')
                .long("verbosity")
                .takes_value(true)
                .global(true)
                .default_value("INFO")
                .help("Sets the level of verbosity"),
        )
        .arg(input_arg())
        .arg(exclude_arg())
        .arg(
            Arg::new("output")
                .short('o')
                .long("output")
                .takes_value(true)
                .value_name("FILE")
                .help("File to write the report to"),
        )
        .arg(
            Arg::new("workers")
                .short('n')
                .long("workers")
                .takes_value(true)
                .help("Number of worker threads to use"),
        )
        .arg(
            Arg::new("cutoff")
                .short('c')
                .long("cutoff")
                .takes_value(true)
                .help("Stop narrowing a row down once at most this many rows remain"),
        )
        .arg(
            Arg::new("checkpoint")
                .long("checkpoint")
                .takes_value(true)
                .help("Rows per shard, progress is reported once per shard"),
        )
        .arg(
            Arg::new("threshold")
                .short('t')
                .long("threshold")
                .takes_value(true)
                .help("Group size above which a row counts as not singled out"),
        )
        .subcommand(
            Command::new("inspect")
                .about("Prints column statistics and a starter config for a CSV file")
                .arg(input_arg())
                .arg(exclude_arg()),
        )
}

#[tokio::main]
async fn main() -> Result<()> {
    let matches = cli().get_matches();

    let tracing_level = Level::from_str(matches.value_of("verbosity").unwrap_or("INFO"))?;

    let collector = tracing_subscriber::fmt()
        .with_max_level(tracing_level)
        .finish();

    set_global_default(collector)?;

    match matches.subcommand() {
        Some(("inspect", inspect_matches)) => commands::inspect::execute(inspect_matches),
        _ => commands::default::execute(&matches).await,
    }
}
