use super::{error, print_json, read_json, Result};
use argh::FromArgs;
use snafu::ResultExt;
use staticnet::wizard::{self, WizardStep};
use staticnet::StaticIpValues;
use std::path::PathBuf;

#[derive(FromArgs, PartialEq, Debug)]
#[argh(subcommand, name = "validate")]
/// Check static IP values and print every field error
pub(crate) struct ValidateArgs {
    #[argh(option, short = 'f')]
    /// JSON file with the static IP values
    values_file: PathBuf,

    #[argh(option, default = "WizardStep::StaticIpHostConfigurations")]
    /// wizard step the values are checked for; hosts are only checked on the host step
    step: WizardStep,
}

pub(crate) fn run(args: ValidateArgs) -> Result<()> {
    let values: StaticIpValues = read_json(&args.values_file)?;
    let validate_form_hosts = wizard::validate_form_hosts(args.step);
    info!(
        "Validating {} host(s) in the '{}' view",
        values.host_count(),
        values.config_type()
    );

    if let Err(errors) = staticnet::validate(&values, validate_form_hosts) {
        print_json(&errors)?;
        let count = errors.len();
        return Err(errors).context(error::InvalidSnafu { count });
    }

    println!("Static IP values are valid");
    Ok(())
}
