use anyhow::Result;
use clap::{Arg, ArgAction, ArgMatches, Command};

use gtop::commands;
use gtop::core::{CliOverrides, Config};

fn build_cli() -> Command {
    Command::new("gtop")
        .version(env!("CARGO_PKG_VERSION"))
        .about("Real-time GPU monitoring dashboard for the terminal")
        .arg(
            Arg::new("device-index")
                .short('d')
                .long("device-index")
                .value_name("INDEX")
                .help("Index of the GPU to display")
                .value_parser(clap::value_parser!(usize)),
        )
        .arg(
            Arg::new("update-time-interval")
                .short('u')
                .long("update-time-interval")
                .value_name("SECONDS")
                .help("Seconds between samples")
                .value_parser(clap::value_parser!(f64)),
        )
        .arg(
            Arg::new("text-mode")
                .short('t')
                .long("text-mode")
                .help("Print one summary line per sample instead of the dashboard")
                .action(ArgAction::SetTrue),
        )
        .arg(
            Arg::new("generate-config")
                .short('g')
                .long("generate-config")
                .help("Write the default configuration to ~/.gputoprc and exit")
                .action(ArgAction::SetTrue),
        )
}

/// Flags left off the command line stay `None` so the config file applies
fn overrides_from(matches: &ArgMatches) -> CliOverrides {
    CliOverrides {
        device_index: matches.get_one::<usize>("device-index").copied(),
        update_time_interval: matches.get_one::<f64>("update-time-interval").copied(),
        text_mode: matches.get_flag("text-mode").then_some(true),
    }
}

fn main() -> Result<()> {
    gtop::init_logging();

    let matches = build_cli().get_matches();

    if matches.get_flag("generate-config") {
        return commands::generate_config();
    }

    let config = Config::load()?.with_overrides(&overrides_from(&matches));
    config.validate()?;

    commands::monitor(config)
}
