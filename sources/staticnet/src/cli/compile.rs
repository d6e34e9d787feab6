use super::{error, print_json, read_json, Result};
use argh::FromArgs;
use snafu::ResultExt;
use staticnet::{Config, StaticIpValues};
use std::path::PathBuf;

#[derive(FromArgs, PartialEq, Debug)]
#[argh(subcommand, name = "compile")]
/// Validate static IP values and print the backend update built from them
pub(crate) struct CompileArgs {
    #[argh(option, short = 'f')]
    /// JSON file with the static IP values
    values_file: PathBuf,
}

pub(crate) fn run(args: CompileArgs, config: &Config) -> Result<()> {
    let values: StaticIpValues = read_json(&args.values_file)?;

    // Everything, hosts included, has to be valid before anything is sent
    if let Err(errors) = staticnet::validate(&values, true) {
        let count = errors.len();
        return Err(errors).context(error::InvalidSnafu { count });
    }

    let update = config
        .reconciler()
        .to_canonical(&values)
        .context(error::CompileSnafu)?;
    info!(
        "Compiled {} host(s) onto '{}'",
        update.static_network_config.len(),
        config.nic_name
    );
    print_json(&update)
}
