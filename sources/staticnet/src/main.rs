/*!
# Introduction

staticnet is a command line front end for the static network configuration model.  Every
subcommand reads JSON and prints JSON:

* `validate`: check static IP values, printing any field errors
* `compile`: validate static IP values and print the backend update built from them
* `to-form`: print the static IP values for a stored backend configuration
* `info`: print the view and completeness of a stored backend configuration
* `steps`: print the wizard's steps for a host networking choice

An optional TOML file given with `--config` sets the interface name and the wizard features.
*/

#![deny(rust_2018_idioms)]

#[macro_use]
extern crate log;
#[macro_use]
extern crate serde_plain;

mod cli;

use argh::FromArgs;
use simplelog::{Config as LogConfig, LevelFilter, SimpleLogger};
use snafu::ResultExt;
use staticnet::Config;
use std::path::PathBuf;
use std::process;

/// Stores arguments
#[derive(FromArgs, PartialEq, Debug)]
struct Args {
    /// log-level trace|debug|info|warn|error
    #[argh(option)]
    log_level: Option<LevelFilter>,
    /// configuration file with the interface name and wizard features
    #[argh(option, short = 'c')]
    config: Option<PathBuf>,
    #[argh(subcommand)]
    subcommand: SubCommand,
}

#[derive(FromArgs, PartialEq, Debug)]
#[argh(subcommand)]
enum SubCommand {
    Validate(cli::ValidateArgs),
    Compile(cli::CompileArgs),
    ToForm(cli::ToFormArgs),
    Info(cli::InfoArgs),
    Steps(cli::StepsArgs),
}

fn setup_logger(args: &Args) -> cli::Result<()> {
    let log_level = args.log_level.unwrap_or(LevelFilter::Info);
    SimpleLogger::init(log_level, LogConfig::default()).context(cli::error::LoggerSnafu)
}

fn load_config(args: &Args) -> cli::Result<Config> {
    match &args.config {
        Some(path) => Config::from_path(path).context(cli::error::ConfigSnafu),
        None => Ok(Config::default()),
    }
}

fn run() -> cli::Result<()> {
    let args: Args = argh::from_env();
    setup_logger(&args)?;
    let config = load_config(&args)?;
    debug!("Using configuration: {:?}", config);

    match args.subcommand {
        SubCommand::Validate(args) => cli::validate::run(args),
        SubCommand::Compile(args) => cli::compile::run(args, &config),
        SubCommand::ToForm(args) => cli::to_form::run(args, &config),
        SubCommand::Info(args) => cli::info::run(args, &config),
        SubCommand::Steps(args) => cli::steps::run(args, &config),
    }
}

// Print the Display form of the error rather than the Debug form a returned Result would give
fn main() {
    if let Err(e) = run() {
        error!("{}", e);
        process::exit(1);
    }
}
