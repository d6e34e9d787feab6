//! The validate module gates submission of the static IP step.
//!
//! Validation never fails fast: every rule runs and each failure is reported as a `FieldError`
//! addressed by the path of the input it belongs to, e.g.
//! `formData.networkWideConfigurations.ipv4.gateway` or `yamlData[1].macInterfaceMap[0].macAddress`,
//! so the caller can attach the message to the originating field.
//!
//! Which rules run depends on the protocol selection (only active families are checked) and on
//! whether host entries are being validated yet; the network-wide part of the form is always
//! checked in full.
use crate::address::{self, AddressData, ProtocolVersion};
use crate::mac_address::MacAddress;
use crate::model::{
    HostConfiguration, HostStaticNetworkConfig, NetworkWideConfiguration, StaticFormData,
    StaticIpValues,
};
use crate::vlan_id;
use serde::Serialize;
use std::collections::HashSet;
use std::fmt::Display;

const REQUIRED_MSG: &str = "A value is required";
const YAML_REQUIRED_MSG: &str = "YAML is a required field";
const MAPPING_REQUIRED_MSG: &str = "At least one MAC address to interface name mapping is required";
const UNIQUE_MAC_MSG: &str = "MAC address has to be unique";
const VLAN_ID_MSG: &str = "VLAN ID must be a number";

const FORM_DATA: &str = "formData";
const YAML_DATA: &str = "yamlData";

/// A single failed rule, attached to the path of the offending field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldError {
    pub path: String,
    pub message: String,
}

impl Display for FieldError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.path, self.message)
    }
}

/// All the rules that failed for one set of values, in the order the fields appear.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct ValidationErrors {
    errors: Vec<FieldError>,
}

impl ValidationErrors {
    fn push<P, M>(&mut self, path: P, message: M)
    where
        P: Into<String>,
        M: Into<String>,
    {
        self.errors.push(FieldError {
            path: path.into(),
            message: message.into(),
        })
    }

    pub fn is_empty(&self) -> bool {
        self.errors.is_empty()
    }

    pub fn len(&self) -> usize {
        self.errors.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = &FieldError> {
        self.errors.iter()
    }

    /// The error reported for `path`, if any.
    pub fn get(&self, path: &str) -> Option<&FieldError> {
        self.errors.iter().find(|e| e.path == path)
    }

    pub fn into_inner(self) -> Vec<FieldError> {
        self.errors
    }
}

impl Display for ValidationErrors {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let messages: Vec<String> = self.errors.iter().map(ToString::to_string).collect();
        write!(f, "{}", messages.join("; "))
    }
}

impl std::error::Error for ValidationErrors {}

/// Validate the active branch of `values`.  Host entries of the form view are only checked when
/// `validate_form_hosts` is set; the YAML view is always checked in full.
pub fn validate(
    values: &StaticIpValues,
    validate_form_hosts: bool,
) -> Result<(), ValidationErrors> {
    let mut errors = ValidationErrors::default();
    match values {
        StaticIpValues::Form { form_data } => {
            validate_form_data(form_data, validate_form_hosts, &mut errors)
        }
        StaticIpValues::Yaml { yaml_data } => validate_yaml_data(yaml_data, &mut errors),
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

fn validate_form_data(
    form_data: &StaticFormData,
    validate_form_hosts: bool,
    errors: &mut ValidationErrors,
) {
    let network_wide = &form_data.network_wide_configurations;
    validate_network_wide(
        network_wide,
        &format!("{}.networkWideConfigurations", FORM_DATA),
        errors,
    );

    if validate_form_hosts {
        validate_form_hosts_data(
            network_wide,
            &form_data.host_configurations,
            &format!("{}.hostConfigurations", FORM_DATA),
            errors,
        );
    }
}

fn validate_network_wide(
    network_wide: &NetworkWideConfiguration,
    path: &str,
    errors: &mut ValidationErrors,
) {
    if network_wide.use_vlan {
        let vlan_path = format!("{}.vlanId", path);
        if network_wide.vlan_id.is_empty() {
            errors.push(vlan_path, REQUIRED_MSG);
        } else if !vlan_id::is_valid_vlan_id(&network_wide.vlan_id) {
            errors.push(vlan_path, VLAN_ID_MSG);
        }
    }

    for version in network_wide.protocol_type.active_families().iter() {
        validate_address_data(
            network_wide.address_data(version),
            version,
            &format!("{}.{}", path, version),
            errors,
        );
    }
}

fn invalid_address_msg(value: &str, version: ProtocolVersion) -> String {
    format!("Value \"{}\" is not a valid {} address", value, version.label())
}

fn invalid_subnet_msg(version: ProtocolVersion) -> String {
    format!(
        "Invalid {} IP address block. Expected value is a network expressed in CIDR notation \
         (IP/netmask). For example: {}",
        version.label(),
        version.example_cidr()
    )
}

/// Check a required address field of the given family; returns the address when it's valid.
fn check_address(
    value: &str,
    version: ProtocolVersion,
    path: String,
    errors: &mut ValidationErrors,
) -> Option<std::net::IpAddr> {
    if value.is_empty() {
        errors.push(path, REQUIRED_MSG);
        return None;
    }
    let addr = address::parse_address(value, version);
    if addr.is_none() {
        errors.push(path, invalid_address_msg(value, version));
    }
    addr
}

fn validate_address_data(
    data: &AddressData,
    version: ProtocolVersion,
    path: &str,
    errors: &mut ValidationErrors,
) {
    let subnet = if data.subnet.is_empty() {
        errors.push(format!("{}.subnet", path), REQUIRED_MSG);
        None
    } else {
        let subnet = address::parse_cidr(&data.subnet, version);
        if subnet.is_none() {
            errors.push(format!("{}.subnet", path), invalid_subnet_msg(version));
        }
        subnet
    };

    // Membership is only checked against a subnet that parsed; a bad subnet is reported once, on
    // the subnet field.
    let gateway = check_address(&data.gateway, version, format!("{}.gateway", path), errors);
    if let (Some(gateway), Some(subnet)) = (gateway, subnet) {
        if !address::is_in_subnet(&gateway, &subnet) {
            errors.push(
                format!("{}.gateway", path),
                format!("IP Address is outside of subnet {}", data.subnet),
            );
        }
    }

    check_address(&data.dns, version, format!("{}.dns", path), errors);
}

/// Check a required MAC address field, returning it for the uniqueness check when it's valid.
fn check_mac(value: &str, path: String, errors: &mut ValidationErrors) -> Option<MacAddress> {
    if value.is_empty() {
        errors.push(path, REQUIRED_MSG);
        return None;
    }
    match MacAddress::try_from(value) {
        Ok(mac) => Some(mac),
        Err(_) => {
            errors.push(path, format!("Value \"{}\" is not valid MAC address", value));
            None
        }
    }
}

/// Tracks MAC addresses seen so far across every host of a view.
#[derive(Default)]
struct SeenMacs(HashSet<MacAddress>);

impl SeenMacs {
    fn check(&mut self, mac: Option<MacAddress>, path: String, errors: &mut ValidationErrors) {
        if let Some(mac) = mac {
            if !self.0.insert(mac) {
                errors.push(path, UNIQUE_MAC_MSG);
            }
        }
    }
}

fn validate_form_hosts_data(
    network_wide: &NetworkWideConfiguration,
    hosts: &[HostConfiguration],
    path: &str,
    errors: &mut ValidationErrors,
) {
    let families = network_wide.protocol_type.active_families();
    let mut seen = SeenMacs::default();

    for (idx, host) in hosts.iter().enumerate() {
        let host_path = format!("{}[{}]", path, idx);

        let mac_path = format!("{}.macAddress", host_path);
        let mac = check_mac(&host.mac_address, mac_path.clone(), errors);
        seen.check(mac, mac_path, errors);

        // Addresses of inactive families may hold anything, including nothing
        for version in families.iter() {
            check_address(
                host.address(version),
                version,
                format!("{}.{}Address", host_path, version),
                errors,
            );
        }
    }
}

fn validate_yaml_data(hosts: &[HostStaticNetworkConfig], errors: &mut ValidationErrors) {
    let mut seen = SeenMacs::default();

    for (idx, host) in hosts.iter().enumerate() {
        let host_path = format!("{}[{}]", YAML_DATA, idx);

        let yaml_path = format!("{}.networkYaml", host_path);
        if host.network_yaml.trim().is_empty() {
            errors.push(yaml_path, YAML_REQUIRED_MSG);
        } else if let Err(e) = serde_yaml::from_str::<serde_yaml::Value>(&host.network_yaml) {
            errors.push(yaml_path, format!("Invalid YAML: {}", e));
        }

        let map_path = format!("{}.macInterfaceMap", host_path);
        if host.mac_interface_map.is_empty() {
            errors.push(map_path.clone(), MAPPING_REQUIRED_MSG);
        }

        for (map_idx, entry) in host.mac_interface_map.iter().enumerate() {
            let entry_path = format!("{}[{}]", map_path, map_idx);

            let mac_path = format!("{}.macAddress", entry_path);
            let mac = check_mac(&entry.mac_address, mac_path.clone(), errors);
            seen.check(mac, mac_path, errors);

            if entry.logical_nic_name.is_empty() {
                errors.push(format!("{}.logicalNicName", entry_path), REQUIRED_MSG);
            }
        }
    }
}
