use super::{print_json, read_json, Result};
use argh::FromArgs;
use staticnet::{Config, StaticNetworkConfigUpdate};
use std::path::PathBuf;

#[derive(FromArgs, PartialEq, Debug)]
#[argh(subcommand, name = "info")]
/// Print the view and completeness of a stored backend configuration
pub(crate) struct InfoArgs {
    #[argh(option, short = 'f')]
    /// JSON file with the stored `staticNetworkConfig`
    network_file: PathBuf,
}

pub(crate) fn run(args: InfoArgs, config: &Config) -> Result<()> {
    let stored: StaticNetworkConfigUpdate = read_json(&args.network_file)?;
    let info = config
        .reconciler()
        .static_ip_info(&stored.static_network_config);
    print_json(&info)
}
