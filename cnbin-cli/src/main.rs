mod bins;
mod call;
mod output;

use anyhow::Result;
use clap::{Command, arg};
use log::LevelFilter;

pub mod consts {
    pub const VERSION: &str = env!("CARGO_PKG_VERSION");
    pub const BIN_NAME: &str = "cnbin";
}

fn build_parser() -> Command {
    Command::new(consts::BIN_NAME)
        .bin_name(consts::BIN_NAME)
        .version(consts::VERSION)
        .about("Call per-bin copy-number status (loss, neutral, gain, unstable, uncallable) for every sample of a cohort.")
        .subcommand_required(true)
        .arg(arg!(-v --verbose "Log debug output (RUST_LOG still takes precedence)").global(true))
        .subcommand(bins::cli::create_bins_cli())
        .subcommand(call::cli::create_call_cli())
}

fn init_logging(verbose: bool) {
    let level = if verbose {
        LevelFilter::Debug
    } else {
        LevelFilter::Info
    };
    pretty_env_logger::formatted_builder()
        .filter_level(level)
        .parse_default_env()
        .init();
}

fn main() -> Result<()> {
    let app = build_parser();
    let matches = app.get_matches();

    init_logging(matches.get_flag("verbose"));

    match matches.subcommand() {
        //
        // BINS
        //
        Some((bins::cli::BINS_CMD, matches)) => {
            bins::handlers::run_bins(matches)?;
        }

        //
        // CALL
        //
        Some((call::cli::CALL_CMD, matches)) => {
            call::handlers::run_call(matches)?;
        }

        _ => unreachable!("Subcommand not found"),
    };

    Ok(())
}
