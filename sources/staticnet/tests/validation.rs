use staticnet::wizard::{self, WizardStep};
use staticnet::{FieldError, StaticIpValues};
use std::fs;
use std::path::PathBuf;

fn load_values(name: &str) -> StaticIpValues {
    let mut p = PathBuf::from(env!("CARGO_MANIFEST_DIR"));
    p.push("test_data");
    p.push(name);
    serde_json::from_str(&fs::read_to_string(p).unwrap()).unwrap()
}

fn paths(errors: Vec<FieldError>) -> Vec<String> {
    errors.into_iter().map(|e| e.path).collect()
}

#[test]
fn network_wide_errors_before_host_step() {
    let values = load_values("form_invalid.json");
    let step = WizardStep::StaticIpNetworkWideConfigurations;
    let errors = staticnet::validate(&values, wizard::validate_form_hosts(step)).unwrap_err();
    assert_eq!(
        paths(errors.into_inner()),
        vec![
            "formData.networkWideConfigurations.vlanId",
            "formData.networkWideConfigurations.ipv4.gateway",
        ]
    );
}

#[test]
fn host_errors_on_host_step() {
    let values = load_values("form_invalid.json");
    let step = WizardStep::StaticIpHostConfigurations;
    let errors = staticnet::validate(&values, wizard::validate_form_hosts(step)).unwrap_err();

    assert_eq!(
        errors
            .get("formData.networkWideConfigurations.ipv4.gateway")
            .unwrap()
            .message,
        "IP Address is outside of subnet 192.168.0.0/24"
    );
    assert_eq!(
        errors
            .get("formData.hostConfigurations[1].macAddress")
            .unwrap()
            .message,
        "MAC address has to be unique"
    );
    // Host addresses aren't tied to the subnet, and ipv6 is inactive
    assert_eq!(errors.len(), 3);
}

#[test]
fn error_display_lists_every_field() {
    let values = load_values("form_invalid.json");
    let errors = staticnet::validate(&values, false).unwrap_err();
    assert_eq!(
        errors.to_string(),
        "formData.networkWideConfigurations.vlanId: VLAN ID must be a number; \
         formData.networkWideConfigurations.ipv4.gateway: IP Address is outside of subnet \
         192.168.0.0/24"
    );
}

#[test]
fn valid_fixtures() {
    for name in [
        "form_ipv4_vlan.json",
        "form_dual_stack.json",
        "yaml_values.json",
    ] {
        let values = load_values(name);
        assert!(staticnet::validate(&values, true).is_ok(), "{}", name);
    }
}
