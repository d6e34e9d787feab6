use super::{print_json, read_json, Result};
use argh::FromArgs;
use staticnet::{Config, StaticNetworkConfigUpdate};
use std::path::PathBuf;

#[derive(FromArgs, PartialEq, Debug)]
#[argh(subcommand, name = "to-form")]
/// Print the static IP values for a stored backend configuration
pub(crate) struct ToFormArgs {
    #[argh(option, short = 'f')]
    /// JSON file with the stored `staticNetworkConfig`
    network_file: PathBuf,
}

pub(crate) fn run(args: ToFormArgs, config: &Config) -> Result<()> {
    let stored: StaticNetworkConfigUpdate = read_json(&args.network_file)?;
    let values = config
        .reconciler()
        .to_form_values(&stored.static_network_config);
    print_json(&values)
}
