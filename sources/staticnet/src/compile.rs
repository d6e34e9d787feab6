//! The compile module turns the form view's data for one host into the declarative network state
//! document consumed by the installation backend.
//!
//! The document shape and its key names are a compatibility contract with the backend:
//!
//! ```yaml
//! interfaces:
//! - name: eth0
//!   type: ethernet
//!   state: up
//!   ipv4:
//!     address:
//!     - ip: 192.168.0.10
//!       prefix-length: 24
//!     enabled: true
//!     dhcp: false
//! dns-resolver:
//!   config:
//!     server:
//!     - 192.168.0.2
//! routes:
//!   config:
//!   - destination: 0.0.0.0/0
//!     next-hop-address: 192.168.0.1
//!     next-hop-interface: eth0
//!     table-id: 254
//! ```
//!
//! The structures below deserialize strictly (unknown keys are rejected) so that a stored
//! document can be recognized as one this module produced.
use crate::address::ProtocolVersion;
use crate::model::{HostConfiguration, NetworkWideConfiguration};
use crate::vlan_id::VlanId;
use log::{debug, trace};
use serde::{Deserialize, Serialize};
use snafu::{OptionExt, ResultExt};

/// The main routing table; every default route lands here.
pub const MAIN_ROUTE_TABLE_ID: u32 = 254;

/// The interface name used when the caller doesn't configure one.
pub const DEFAULT_NIC_NAME: &str = "eth0";

const DEFAULT_ROUTE_IPV4: &str = "0.0.0.0/0";
const DEFAULT_ROUTE_IPV6: &str = "::/0";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case", deny_unknown_fields)]
pub struct NetworkStateDocument {
    pub interfaces: Vec<Interface>,
    pub dns_resolver: DnsResolver,
    pub routes: Routes,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case", deny_unknown_fields)]
pub struct Interface {
    pub name: String,
    #[serde(rename = "type")]
    pub kind: InterfaceKind,
    pub state: InterfaceState,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ipv4: Option<IpConfig>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ipv6: Option<IpConfig>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub vlan: Option<VlanConfig>,
}

impl Interface {
    pub fn ip_config(&self, version: ProtocolVersion) -> Option<&IpConfig> {
        match version {
            ProtocolVersion::Ipv4 => self.ipv4.as_ref(),
            ProtocolVersion::Ipv6 => self.ipv6.as_ref(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum InterfaceKind {
    Ethernet,
    Vlan,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum InterfaceState {
    Up,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case", deny_unknown_fields)]
pub struct IpConfig {
    pub address: Vec<InterfaceAddress>,
    pub enabled: bool,
    pub dhcp: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case", deny_unknown_fields)]
pub struct InterfaceAddress {
    pub ip: String,
    pub prefix_length: u8,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case", deny_unknown_fields)]
pub struct VlanConfig {
    pub base_iface: String,
    pub id: VlanId,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct DnsResolver {
    pub config: DnsConfig,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct DnsConfig {
    pub server: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Routes {
    pub config: Vec<Route>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case", deny_unknown_fields)]
pub struct Route {
    pub destination: String,
    pub next_hop_address: String,
    pub next_hop_interface: String,
    pub table_id: u32,
}

impl NetworkStateDocument {
    /// Parse a stored YAML document.  Fails for anything that isn't exactly the shape produced by
    /// `compile`.
    pub fn from_yaml(yaml: &str) -> Result<Self> {
        serde_yaml::from_str(yaml).context(error::YamlDeserializeSnafu)
    }

    pub fn to_yaml(&self) -> Result<String> {
        serde_yaml::to_string(self).context(error::YamlSerializeSnafu)
    }
}

/// The destination of the default route for a family.
pub fn default_route_destination(version: ProtocolVersion) -> &'static str {
    match version {
        ProtocolVersion::Ipv4 => DEFAULT_ROUTE_IPV4,
        ProtocolVersion::Ipv6 => DEFAULT_ROUTE_IPV6,
    }
}

/// Read the prefix length from the text after the '/' in a CIDR string.
fn prefix_length(subnet: &str) -> Result<u8> {
    let prefix = subnet
        .split('/')
        .nth(1)
        .context(error::InvalidCidrSnafu { subnet })?;
    prefix
        .trim()
        .parse()
        .context(error::InvalidPrefixLengthSnafu { subnet })
}

fn ethernet_interface(
    nic_name: &str,
    address: &str,
    prefix_length: u8,
    version: ProtocolVersion,
) -> Interface {
    let config = IpConfig {
        address: vec![InterfaceAddress {
            ip: address.to_string(),
            prefix_length,
        }],
        enabled: true,
        dhcp: false,
    };
    let (ipv4, ipv6) = match version {
        ProtocolVersion::Ipv4 => (Some(config), None),
        ProtocolVersion::Ipv6 => (None, Some(config)),
    };

    Interface {
        name: nic_name.to_string(),
        kind: InterfaceKind::Ethernet,
        state: InterfaceState::Up,
        ipv4,
        ipv6,
        vlan: None,
    }
}

/// The VLAN interface is named after the ID as typed, so "0100" gives "eth0.0100".
fn vlan_interface(nic_name: &str, typed_id: &str, vlan_id: VlanId) -> Interface {
    Interface {
        name: format!("{}.{}", nic_name, typed_id),
        kind: InterfaceKind::Vlan,
        state: InterfaceState::Up,
        ipv4: None,
        ipv6: None,
        vlan: Some(VlanConfig {
            base_iface: nic_name.to_string(),
            id: vlan_id,
        }),
    }
}

/// Build the network state document for one host.  The subnet of every active family must carry
/// a prefix length; anything else means validation was skipped, and is returned as an error.
pub fn compile_document(
    network_wide: &NetworkWideConfiguration,
    host: &HostConfiguration,
    nic_name: &str,
) -> Result<NetworkStateDocument> {
    let families = network_wide.protocol_type.active_families();
    debug!(
        "Compiling network state for '{}' with protocol type '{}'",
        nic_name, network_wide.protocol_type
    );

    let mut interfaces = Vec::new();
    for version in families.iter() {
        let prefix_length = prefix_length(&network_wide.address_data(version).subnet)?;
        interfaces.push(ethernet_interface(
            nic_name,
            host.address(version),
            prefix_length,
            version,
        ));
    }

    if network_wide.use_vlan {
        let vlan_id = VlanId::try_from(network_wide.vlan_id.as_str())
            .context(error::InvalidVlanIdSnafu)?;
        interfaces.push(vlan_interface(nic_name, &network_wide.vlan_id, vlan_id));
    }

    let server = families
        .iter()
        .map(|version| network_wide.address_data(version).dns.clone())
        .collect();

    // A single default route, even for dual-stack configurations
    let route_family = network_wide.protocol_type.route_family();
    let route = Route {
        destination: default_route_destination(route_family).to_string(),
        next_hop_address: network_wide.address_data(route_family).gateway.clone(),
        next_hop_interface: nic_name.to_string(),
        table_id: MAIN_ROUTE_TABLE_ID,
    };
    trace!("Default route for '{}': {:?}", nic_name, route);

    Ok(NetworkStateDocument {
        interfaces,
        dns_resolver: DnsResolver {
            config: DnsConfig { server },
        },
        routes: Routes {
            config: vec![route],
        },
    })
}

/// Build the network state document for one host and serialize it to YAML.
pub fn compile(
    network_wide: &NetworkWideConfiguration,
    host: &HostConfiguration,
    nic_name: &str,
) -> Result<String> {
    compile_document(network_wide, host, nic_name)?.to_yaml()
}

mod error {
    use snafu::Snafu;

    #[derive(Debug, Snafu)]
    #[snafu(visibility(pub(crate)))]
    pub enum Error {
        #[snafu(display("'{}' isn't a valid cidr: missing prefix length", subnet))]
        InvalidCidr { subnet: String },

        #[snafu(display("'{}' isn't a valid cidr: {}", subnet, source))]
        InvalidPrefixLength {
            subnet: String,
            source: std::num::ParseIntError,
        },

        #[snafu(display("Unable to create VLAN interface: {}", source))]
        InvalidVlanId { source: crate::vlan_id::Error },

        #[snafu(display("Error serializing network state to YAML: {}", source))]
        YamlSerialize { source: serde_yaml::Error },

        #[snafu(display("Error deserializing network state from YAML: {}", source))]
        YamlDeserialize { source: serde_yaml::Error },
    }
}

pub use error::Error;
type Result<T> = std::result::Result<T, error::Error>;
