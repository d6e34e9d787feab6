//! The wizard module decides which steps the installer wizard shows.  The static IP steps depend
//! on how host networking was chosen: the YAML view has one step, the form view has two (shared
//! settings, then hosts), and DHCP has none.
use crate::model::StaticIpView;
use log::debug;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum WizardStep {
    ClusterDetails,
    StaticIpYamlView,
    StaticIpNetworkWideConfigurations,
    StaticIpHostConfigurations,
    Operators,
    HostDiscovery,
    Storage,
    Networking,
    CustomManifests,
    Review,
}

derive_fromstr_from_deserialize!(WizardStep);
derive_display_from_serialize!(WizardStep);

/// The steps shown before anything about the cluster is known.
pub const DEFAULT_WIZARD_STEPS: &[WizardStep] = &[
    WizardStep::ClusterDetails,
    WizardStep::Operators,
    WizardStep::HostDiscovery,
    WizardStep::Storage,
    WizardStep::Networking,
    WizardStep::Review,
];

/// The form view's steps, in order.
pub const STATIC_IP_FORM_STEPS: &[WizardStep] = &[
    WizardStep::StaticIpNetworkWideConfigurations,
    WizardStep::StaticIpHostConfigurations,
];

/// How the user chose to configure host networking.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum HostNetworking {
    Dhcp,
    StaticIp(StaticIpView),
}

/// Toggles that change the wizard's steps.  These are passed in by the caller and never read
/// from the environment.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case", deny_unknown_fields)]
pub struct WizardFeatures {
    /// The cluster has custom manifests, so their step follows networking.
    #[serde(default)]
    pub custom_manifests: bool,
    /// Single-cluster deployments don't offer the operators step.
    #[serde(default)]
    pub single_cluster: bool,
}

impl WizardStep {
    pub fn is_static_ip_step(self) -> bool {
        matches!(
            self,
            WizardStep::StaticIpYamlView
                | WizardStep::StaticIpNetworkWideConfigurations
                | WizardStep::StaticIpHostConfigurations
        )
    }
}

/// Insert `to_add` right after `after`.  Nothing changes if `after` is missing, or if the first
/// step to add is already there.
fn add_steps_after(steps: &mut Vec<WizardStep>, after: WizardStep, to_add: &[WizardStep]) {
    let position = match steps.iter().position(|s| *s == after) {
        Some(p) => p,
        None => return,
    };
    if to_add.first().map_or(true, |first| steps.contains(first)) {
        return;
    }
    let tail = steps.split_off(position + 1);
    steps.extend_from_slice(to_add);
    steps.extend(tail);
}

/// Remove `count` steps starting at `first`, if it's present.
fn remove_steps(steps: &mut Vec<WizardStep>, first: WizardStep, count: usize) {
    if let Some(position) = steps.iter().position(|s| *s == first) {
        let end = (position + count).min(steps.len());
        steps.drain(position..end);
    }
}

/// Compose the wizard's steps from the current list, or the default list if there is none yet.
/// Without a networking choice the static IP steps are left as they are.
pub fn wizard_steps(
    current: Option<&[WizardStep]>,
    networking: Option<HostNetworking>,
    features: &WizardFeatures,
) -> Vec<WizardStep> {
    let mut steps = current.unwrap_or(DEFAULT_WIZARD_STEPS).to_vec();

    match networking {
        Some(HostNetworking::StaticIp(StaticIpView::Yaml)) => {
            remove_steps(
                &mut steps,
                WizardStep::StaticIpNetworkWideConfigurations,
                STATIC_IP_FORM_STEPS.len(),
            );
            add_steps_after(
                &mut steps,
                WizardStep::ClusterDetails,
                &[WizardStep::StaticIpYamlView],
            );
        }
        Some(HostNetworking::StaticIp(StaticIpView::Form)) => {
            remove_steps(&mut steps, WizardStep::StaticIpYamlView, 1);
            add_steps_after(&mut steps, WizardStep::ClusterDetails, STATIC_IP_FORM_STEPS);
        }
        Some(HostNetworking::Dhcp) => {
            remove_steps(
                &mut steps,
                WizardStep::StaticIpNetworkWideConfigurations,
                STATIC_IP_FORM_STEPS.len(),
            );
            remove_steps(&mut steps, WizardStep::StaticIpYamlView, 1);
        }
        None => {}
    }

    if features.custom_manifests {
        add_steps_after(
            &mut steps,
            WizardStep::Networking,
            &[WizardStep::CustomManifests],
        );
    } else {
        remove_steps(&mut steps, WizardStep::CustomManifests, 1);
    }

    if features.single_cluster {
        remove_steps(&mut steps, WizardStep::Operators, 1);
    }

    debug!(
        "Wizard steps: {}",
        steps
            .iter()
            .map(|s| s.to_string())
            .collect::<Vec<_>>()
            .join(", ")
    );
    steps
}

/// Host entries are only validated once the user reaches the host step.
pub fn validate_form_hosts(step: WizardStep) -> bool {
    step == WizardStep::StaticIpHostConfigurations
}

/// The step a static IP view starts at.
pub fn first_static_ip_step(view: StaticIpView) -> WizardStep {
    match view {
        StaticIpView::Form => WizardStep::StaticIpNetworkWideConfigurations,
        StaticIpView::Yaml => WizardStep::StaticIpYamlView,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use WizardStep::*;

    #[test]
    fn default_steps() {
        let steps = wizard_steps(None, None, &WizardFeatures::default());
        assert_eq!(steps, DEFAULT_WIZARD_STEPS);
    }

    #[test]
    fn yaml_view_steps() {
        let steps = wizard_steps(
            None,
            Some(HostNetworking::StaticIp(StaticIpView::Yaml)),
            &WizardFeatures::default(),
        );
        assert_eq!(
            steps,
            vec![
                ClusterDetails,
                StaticIpYamlView,
                Operators,
                HostDiscovery,
                Storage,
                Networking,
                Review
            ]
        );
    }

    #[test]
    fn switching_views_replaces_steps() {
        let features = WizardFeatures::default();
        let form = wizard_steps(
            None,
            Some(HostNetworking::StaticIp(StaticIpView::Form)),
            &features,
        );
        assert_eq!(
            &form[..3],
            &[
                ClusterDetails,
                StaticIpNetworkWideConfigurations,
                StaticIpHostConfigurations
            ]
        );

        let yaml = wizard_steps(
            Some(&form),
            Some(HostNetworking::StaticIp(StaticIpView::Yaml)),
            &features,
        );
        assert_eq!(&yaml[..3], &[ClusterDetails, StaticIpYamlView, Operators]);

        let form_again = wizard_steps(
            Some(&yaml),
            Some(HostNetworking::StaticIp(StaticIpView::Form)),
            &features,
        );
        assert_eq!(form_again, form);

        let dhcp = wizard_steps(Some(&form), Some(HostNetworking::Dhcp), &features);
        assert_eq!(dhcp, DEFAULT_WIZARD_STEPS);
    }

    #[test]
    fn steps_are_not_duplicated() {
        let features = WizardFeatures {
            custom_manifests: true,
            single_cluster: false,
        };
        let networking = Some(HostNetworking::StaticIp(StaticIpView::Form));
        let once = wizard_steps(None, networking, &features);
        let twice = wizard_steps(Some(&once), networking, &features);
        assert_eq!(once, twice);
    }

    #[test]
    fn feature_steps() {
        let features = WizardFeatures {
            custom_manifests: true,
            single_cluster: true,
        };
        let steps = wizard_steps(None, None, &features);
        assert_eq!(
            steps,
            vec![
                ClusterDetails,
                HostDiscovery,
                Storage,
                Networking,
                CustomManifests,
                Review
            ]
        );

        let without = wizard_steps(Some(&steps), None, &WizardFeatures::default());
        assert!(!without.contains(&CustomManifests));
    }

    #[test]
    fn host_validation_step() {
        assert!(validate_form_hosts(StaticIpHostConfigurations));
        assert!(!validate_form_hosts(StaticIpNetworkWideConfigurations));
        assert!(!validate_form_hosts(StaticIpYamlView));
    }

    #[test]
    fn static_ip_steps() {
        assert_eq!(
            first_static_ip_step(StaticIpView::Form),
            StaticIpNetworkWideConfigurations
        );
        assert_eq!(first_static_ip_step(StaticIpView::Yaml), StaticIpYamlView);
        assert!(StaticIpHostConfigurations.is_static_ip_step());
        assert!(!Networking.is_static_ip_step());
    }

    #[test]
    fn step_names() {
        assert_eq!(
            StaticIpNetworkWideConfigurations.to_string(),
            "static-ip-network-wide-configurations"
        );
        assert_eq!(
            "custom-manifests".parse::<WizardStep>().unwrap(),
            CustomManifests
        );
    }
}
