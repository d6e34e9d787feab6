//! The model module contains the structures exchanged with the wizard UI and with the backend.
//!
//! All of them are plain data that live for one wizard session: built from the backend's stored
//! static network configuration, edited by the user, compiled back and discarded.  They
//! (de)serialize to the camelCase JSON used by both sides.
use crate::address::{AddressData, ProtocolVersion};
use crate::protocol::StaticProtocolType;
use serde::{Deserialize, Serialize};

/// Which representation the user edits the static network configuration in.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StaticIpView {
    #[default]
    Form,
    Yaml,
}

derive_fromstr_from_deserialize!(StaticIpView);
derive_display_from_serialize!(StaticIpView);

/// Configuration shared by every host in the form view.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NetworkWideConfiguration {
    #[serde(default)]
    pub protocol_type: StaticProtocolType,
    #[serde(default)]
    pub use_vlan: bool,
    #[serde(default)]
    pub vlan_id: String,
    #[serde(default)]
    pub ipv4: AddressData,
    #[serde(default)]
    pub ipv6: AddressData,
}

impl NetworkWideConfiguration {
    pub fn address_data(&self, version: ProtocolVersion) -> &AddressData {
        match version {
            ProtocolVersion::Ipv4 => &self.ipv4,
            ProtocolVersion::Ipv6 => &self.ipv6,
        }
    }

    pub fn address_data_mut(&mut self, version: ProtocolVersion) -> &mut AddressData {
        match version {
            ProtocolVersion::Ipv4 => &mut self.ipv4,
            ProtocolVersion::Ipv6 => &mut self.ipv6,
        }
    }
}

/// Per-host data in the form view.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HostConfiguration {
    #[serde(default)]
    pub mac_address: String,
    #[serde(default)]
    pub ipv4_address: String,
    #[serde(default)]
    pub ipv6_address: String,
}

impl HostConfiguration {
    pub fn address(&self, version: ProtocolVersion) -> &str {
        match version {
            ProtocolVersion::Ipv4 => &self.ipv4_address,
            ProtocolVersion::Ipv6 => &self.ipv6_address,
        }
    }

    pub fn address_mut(&mut self, version: ProtocolVersion) -> &mut String {
        match version {
            ProtocolVersion::Ipv4 => &mut self.ipv4_address,
            ProtocolVersion::Ipv6 => &mut self.ipv6_address,
        }
    }
}

/// The form view: network-wide settings plus one entry per host.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StaticFormData {
    // Older UI builds misspelled this key, accept either on the way in
    #[serde(default, alias = "networWideConfigurations")]
    pub network_wide_configurations: NetworkWideConfiguration,
    #[serde(default)]
    pub host_configurations: Vec<HostConfiguration>,
}

/// Pairs a host NIC's hardware address with the interface name used in its YAML document.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MacInterfaceMapEntry {
    #[serde(default)]
    pub mac_address: String,
    #[serde(default)]
    pub logical_nic_name: String,
}

/// One host's entry in the backend's `staticNetworkConfig` list, and the YAML view's per-host
/// data.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HostStaticNetworkConfig {
    #[serde(default)]
    pub network_yaml: String,
    #[serde(default)]
    pub mac_interface_map: Vec<MacInterfaceMapEntry>,
}

/// Everything the static IP step edits.  Only the branch named by `configType` exists; switching
/// views replaces the whole value, so edits made in the other view are dropped.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "configType", rename_all = "lowercase")]
pub enum StaticIpValues {
    Form {
        #[serde(rename = "formData", default)]
        form_data: StaticFormData,
    },
    Yaml {
        #[serde(rename = "yamlData", default)]
        yaml_data: Vec<HostStaticNetworkConfig>,
    },
}

impl StaticIpValues {
    pub fn config_type(&self) -> StaticIpView {
        match self {
            StaticIpValues::Form { .. } => StaticIpView::Form,
            StaticIpValues::Yaml { .. } => StaticIpView::Yaml,
        }
    }

    /// Number of hosts in the active branch.
    pub fn host_count(&self) -> usize {
        match self {
            StaticIpValues::Form { form_data } => form_data.host_configurations.len(),
            StaticIpValues::Yaml { yaml_data } => yaml_data.len(),
        }
    }
}

/// Summary of the stored configuration used to pick the wizard's initial view and step.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StaticIpInfo {
    pub is_data_complete: bool,
    pub view: StaticIpView,
}

/// The infra-env update sent to the backend.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StaticNetworkConfigUpdate {
    pub static_network_config: Vec<HostStaticNetworkConfig>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn values_carry_only_active_branch() {
        let json = r#"{
            "configType": "yaml",
            "yamlData": [{"networkYaml": "interfaces: []", "macInterfaceMap": []}],
            "formData": {"hostConfigurations": [{"macAddress": "ignored"}]}
        }"#;
        let values: StaticIpValues = serde_json::from_str(json).unwrap();
        assert_eq!(values.config_type(), StaticIpView::Yaml);
        assert_eq!(values.host_count(), 1);

        let out = serde_json::to_value(&values).unwrap();
        assert_eq!(out["configType"], "yaml");
        assert!(out.get("formData").is_none());
    }

    #[test]
    fn form_values_accept_legacy_key() {
        let json = r#"{
            "configType": "form",
            "formData": {
                "networWideConfigurations": {"protocolType": "ipv6", "useVlan": true, "vlanId": "7"},
                "hostConfigurations": []
            }
        }"#;
        let values: StaticIpValues = serde_json::from_str(json).unwrap();
        match values {
            StaticIpValues::Form { form_data } => {
                let nwc = form_data.network_wide_configurations;
                assert_eq!(nwc.protocol_type, StaticProtocolType::Ipv6);
                assert!(nwc.use_vlan);
                assert_eq!(nwc.vlan_id, "7");
                assert_eq!(nwc.ipv4, AddressData::default());
            }
            StaticIpValues::Yaml { .. } => panic!("expected form values"),
        }
    }

    #[test]
    fn update_payload_keys() {
        let update = StaticNetworkConfigUpdate {
            static_network_config: vec![HostStaticNetworkConfig {
                network_yaml: "routes: {}".to_string(),
                mac_interface_map: vec![MacInterfaceMapEntry {
                    mac_address: "52:54:00:79:99:c6".to_string(),
                    logical_nic_name: "eth0".to_string(),
                }],
            }],
        };
        let out = serde_json::to_value(&update).unwrap();
        let host = &out["staticNetworkConfig"][0];
        assert_eq!(host["networkYaml"], "routes: {}");
        assert_eq!(host["macInterfaceMap"][0]["logicalNicName"], "eth0");
        assert_eq!(host["macInterfaceMap"][0]["macAddress"], "52:54:00:79:99:c6");
    }
}
