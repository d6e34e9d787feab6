use super::{print_json, Result};
use argh::FromArgs;
use serde::Deserialize;
use staticnet::wizard::{self, HostNetworking, WizardStep};
use staticnet::{Config, StaticIpView};

#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
#[serde(rename_all = "kebab-case")]
enum Networking {
    Dhcp,
    Form,
    Yaml,
}

// Implement `from_str()` so argh can attempt to deserialize args into their proper types
derive_fromstr_from_deserialize!(Networking);

impl From<Networking> for HostNetworking {
    fn from(networking: Networking) -> Self {
        match networking {
            Networking::Dhcp => HostNetworking::Dhcp,
            Networking::Form => HostNetworking::StaticIp(StaticIpView::Form),
            Networking::Yaml => HostNetworking::StaticIp(StaticIpView::Yaml),
        }
    }
}

#[derive(FromArgs, PartialEq, Debug)]
#[argh(subcommand, name = "steps")]
/// Print the wizard's steps
pub(crate) struct StepsArgs {
    #[argh(option)]
    /// host networking: dhcp|form|yaml
    networking: Option<Networking>,

    #[argh(option)]
    /// current step list, one option per step; the default list is used if none are given
    step: Vec<WizardStep>,
}

pub(crate) fn run(args: StepsArgs, config: &Config) -> Result<()> {
    let current = if args.step.is_empty() {
        None
    } else {
        Some(args.step.as_slice())
    };
    let steps = wizard::wizard_steps(
        current,
        args.networking.map(HostNetworking::from),
        &config.features,
    );
    print_json(&steps)
}
