//! The reconcile module maps between the backend's stored static network configuration and the two
//! views the user edits it in.
//!
//! The backend only stores a list of per-host YAML documents plus MAC-to-interface mappings.  The
//! form view is recovered from that list when, and only when, every stored document is exactly
//! what compiling a form would have produced; anything else is shown in the YAML view verbatim.
//! Because the documents carry no subnet, each family's subnet is recovered as the network of
//! the first host address with the stored prefix length.  Forms saved before any host address
//! was entered come back with that subnet blank.
use crate::address::{self, AddressData, ProtocolVersion};
use crate::compile::{self, NetworkStateDocument, DEFAULT_NIC_NAME};
use crate::model::{
    HostConfiguration, HostStaticNetworkConfig, MacInterfaceMapEntry, NetworkWideConfiguration,
    StaticFormData, StaticIpInfo, StaticIpValues, StaticIpView, StaticNetworkConfigUpdate,
};
use crate::protocol::StaticProtocolType;
use log::{debug, trace};
use snafu::ResultExt;

/// Converts between the stored configuration and the UI values, compiling every form host onto
/// the same interface name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ViewReconciler {
    nic_name: String,
}

impl Default for ViewReconciler {
    fn default() -> Self {
        Self::new(DEFAULT_NIC_NAME)
    }
}

impl ViewReconciler {
    pub fn new<S>(nic_name: S) -> Self
    where
        S: Into<String>,
    {
        Self {
            nic_name: nic_name.into(),
        }
    }

    pub fn nic_name(&self) -> &str {
        &self.nic_name
    }

    /// Build the UI values for whatever the backend currently stores.  Nothing is invented: an
    /// empty configuration yields the blank form, and documents the form can't represent are
    /// passed through to the YAML view untouched.
    pub fn to_form_values(&self, canonical: &[HostStaticNetworkConfig]) -> StaticIpValues {
        if canonical.is_empty() {
            return empty_values(StaticIpView::Form);
        }

        match self.form_data_from_canonical(canonical) {
            Some(form_data) => StaticIpValues::Form { form_data },
            None => StaticIpValues::Yaml {
                yaml_data: canonical.to_vec(),
            },
        }
    }

    /// Build the backend update for the active view.  Form hosts are compiled one by one; YAML
    /// hosts are sent as typed.  The inactive view has no data to send.
    pub fn to_canonical(&self, values: &StaticIpValues) -> Result<StaticNetworkConfigUpdate> {
        let static_network_config = match values {
            StaticIpValues::Yaml { yaml_data } => yaml_data.clone(),
            StaticIpValues::Form { form_data } => {
                let network_wide = &form_data.network_wide_configurations;
                form_data
                    .host_configurations
                    .iter()
                    .enumerate()
                    .map(|(index, host)| self.compile_host(network_wide, host, index))
                    .collect::<Result<Vec<_>>>()?
            }
        };

        Ok(StaticNetworkConfigUpdate {
            static_network_config,
        })
    }

    /// Summarize the stored configuration: the view it was authored in and whether every
    /// required field is filled in.
    pub fn static_ip_info(&self, canonical: &[HostStaticNetworkConfig]) -> StaticIpInfo {
        let info = match self.to_form_values(canonical) {
            StaticIpValues::Form { form_data } => StaticIpInfo {
                is_data_complete: is_form_data_complete(&form_data),
                view: StaticIpView::Form,
            },
            StaticIpValues::Yaml { yaml_data } => StaticIpInfo {
                is_data_complete: is_yaml_data_complete(&yaml_data),
                view: StaticIpView::Yaml,
            },
        };
        debug!(
            "Static IP data for {} host(s): view '{}', complete: {}",
            canonical.len(),
            info.view,
            info.is_data_complete
        );
        info
    }

    fn compile_host(
        &self,
        network_wide: &NetworkWideConfiguration,
        host: &HostConfiguration,
        index: usize,
    ) -> Result<HostStaticNetworkConfig> {
        let network_yaml = compile::compile(network_wide, host, &self.nic_name)
            .context(error::CompileHostSnafu { index })?;

        Ok(HostStaticNetworkConfig {
            network_yaml,
            mac_interface_map: vec![MacInterfaceMapEntry {
                mac_address: host.mac_address.clone(),
                logical_nic_name: self.nic_name.clone(),
            }],
        })
    }

    fn form_data_from_canonical(
        &self,
        canonical: &[HostStaticNetworkConfig],
    ) -> Option<StaticFormData> {
        let mut parsed = Vec::with_capacity(canonical.len());
        for (index, host) in canonical.iter().enumerate() {
            match self.parse_host(host) {
                Some(p) => parsed.push(p),
                None => {
                    debug!("Host {} was not authored in the form view", index);
                    return None;
                }
            }
        }

        let (_, first_document) = parsed.first()?;
        let (network_wide, compiled_with) = network_wide_from_documents(first_document, &parsed)?;
        let host_configurations: Vec<HostConfiguration> =
            parsed.iter().map(|(host, _)| host.clone()).collect();

        // Only accept the form view if compiling it again reproduces every stored document
        for (index, (host, document)) in parsed.iter().enumerate() {
            let recompiled =
                compile::compile_document(&compiled_with, host, &self.nic_name).ok()?;
            if recompiled != *document {
                debug!("Host {} differs from the form's output", index);
                return None;
            }
        }

        Some(StaticFormData {
            network_wide_configurations: network_wide,
            host_configurations,
        })
    }

    /// Pull the form host out of a stored entry.  The entry must map exactly one MAC to this
    /// reconciler's interface name and hold a document this crate can parse.
    fn parse_host(
        &self,
        host: &HostStaticNetworkConfig,
    ) -> Option<(HostConfiguration, NetworkStateDocument)> {
        let entry = match host.mac_interface_map.as_slice() {
            [entry] if entry.logical_nic_name == self.nic_name => entry,
            _ => return None,
        };
        let document = NetworkStateDocument::from_yaml(&host.network_yaml).ok()?;

        let mut form_host = HostConfiguration {
            mac_address: entry.mac_address.clone(),
            ..Default::default()
        };
        for version in [ProtocolVersion::Ipv4, ProtocolVersion::Ipv6] {
            if let Some(address) = first_address(&document, version) {
                *form_host.address_mut(version) = address.ip.clone();
            }
        }
        trace!("Parsed form host from stored entry: {:?}", form_host);

        Some((form_host, document))
    }
}

fn first_address(
    document: &NetworkStateDocument,
    version: ProtocolVersion,
) -> Option<&compile::InterfaceAddress> {
    document
        .interfaces
        .iter()
        .filter_map(|iface| iface.ip_config(version))
        .flat_map(|config| config.address.iter())
        .next()
}

/// Recover the shared settings from the first document.  Subnets come from the first host whose
/// address for that family parses, and are blank if there is none.
///
/// Also returns the settings the stored documents were compiled with, which only differ in
/// carrying the bare prefix length (e.g. "/24") where the subnet couldn't be recovered.
fn network_wide_from_documents(
    document: &NetworkStateDocument,
    parsed: &[(HostConfiguration, NetworkStateDocument)],
) -> Option<(NetworkWideConfiguration, NetworkWideConfiguration)> {
    let protocol_type = StaticProtocolType::from_families(
        first_address(document, ProtocolVersion::Ipv4).is_some(),
        first_address(document, ProtocolVersion::Ipv6).is_some(),
    )?;

    let mut network_wide = NetworkWideConfiguration {
        protocol_type,
        ..Default::default()
    };

    let vlan_interface = document
        .interfaces
        .iter()
        .find_map(|iface| iface.vlan.as_ref().map(|vlan| (iface, vlan)));
    if let Some((iface, vlan)) = vlan_interface {
        // The interface name keeps the ID as it was typed, leading zeros included
        let base = format!("{}.", vlan.base_iface);
        network_wide.use_vlan = true;
        network_wide.vlan_id = match iface.name.strip_prefix(base.as_str()) {
            Some(typed_id) => typed_id.to_string(),
            None => vlan.id.to_string(),
        };
    }

    let families = protocol_type.active_families();
    let servers = &document.dns_resolver.config.server;
    for (version, dns) in families.iter().zip(servers.iter()) {
        network_wide.address_data_mut(version).dns = dns.clone();
    }

    let route = document.routes.config.first()?;
    network_wide
        .address_data_mut(protocol_type.route_family())
        .gateway = route.next_hop_address.clone();

    let mut compiled_with = network_wide.clone();
    for version in families.iter() {
        let prefix_length = first_address(document, version)?.prefix_length;
        let subnet = parsed
            .iter()
            .filter_map(|(host, _)| address::parse_address(host.address(version), version))
            .find_map(|addr| address::subnet_for_address(addr, prefix_length));
        match subnet {
            Some(subnet) => {
                network_wide.address_data_mut(version).subnet = subnet.to_string();
                compiled_with.address_data_mut(version).subnet = subnet.to_string();
            }
            None => {
                debug!("No {} host address to recover the subnet from", version.label());
                compiled_with.address_data_mut(version).subnet = format!("/{}", prefix_length);
            }
        }
    }

    Some((network_wide, compiled_with))
}

/// Whether every field the backend needs for the form view is filled in.  Under `both` the ipv6
/// gateway is never sent, so it isn't required either.
pub fn is_form_data_complete(form_data: &StaticFormData) -> bool {
    let network_wide = &form_data.network_wide_configurations;
    let protocol_type = network_wide.protocol_type;

    if network_wide.use_vlan && network_wide.vlan_id.is_empty() {
        return false;
    }

    let network_wide_complete = protocol_type.active_families().iter().all(|version| {
        let data = network_wide.address_data(version);
        let gateway_required = version == protocol_type.route_family();
        !data.subnet.is_empty()
            && !data.dns.is_empty()
            && !(gateway_required && data.gateway.is_empty())
    });

    network_wide_complete
        && !form_data.host_configurations.is_empty()
        && form_data.host_configurations.iter().all(|host| {
            !host.mac_address.is_empty()
                && protocol_type
                    .active_families()
                    .iter()
                    .all(|version| !host.address(version).is_empty())
        })
}

/// Whether every YAML host has a document and at least one complete MAC mapping.
pub fn is_yaml_data_complete(yaml_data: &[HostStaticNetworkConfig]) -> bool {
    !yaml_data.is_empty()
        && yaml_data.iter().all(|host| {
            !host.network_yaml.trim().is_empty()
                && !host.mac_interface_map.is_empty()
                && host
                    .mac_interface_map
                    .iter()
                    .all(|e| !e.mac_address.is_empty() && !e.logical_nic_name.is_empty())
        })
}

pub fn empty_address_data() -> AddressData {
    AddressData::default()
}

pub fn empty_network_wide_configuration() -> NetworkWideConfiguration {
    NetworkWideConfiguration {
        protocol_type: StaticProtocolType::Ipv4,
        use_vlan: false,
        vlan_id: String::new(),
        ipv4: empty_address_data(),
        ipv6: empty_address_data(),
    }
}

/// A blank form host.  Both address fields are always present, whatever the protocol selection,
/// so a later protocol change needs no reshaping.
pub fn empty_form_host() -> HostConfiguration {
    HostConfiguration::default()
}

/// A blank YAML host with one empty mapping row.
pub fn empty_yaml_host() -> HostStaticNetworkConfig {
    HostStaticNetworkConfig {
        network_yaml: String::new(),
        mac_interface_map: vec![MacInterfaceMapEntry::default()],
    }
}

pub fn empty_form_data() -> StaticFormData {
    StaticFormData {
        network_wide_configurations: empty_network_wide_configuration(),
        host_configurations: vec![empty_form_host()],
    }
}

pub fn empty_yaml_data() -> Vec<HostStaticNetworkConfig> {
    vec![empty_yaml_host()]
}

/// Fresh values for a view, holding one blank host.
pub fn empty_values(view: StaticIpView) -> StaticIpValues {
    match view {
        StaticIpView::Form => StaticIpValues::Form {
            form_data: empty_form_data(),
        },
        StaticIpView::Yaml => StaticIpValues::Yaml {
            yaml_data: empty_yaml_data(),
        },
    }
}

/// Switch the values to `view`.  Whatever was entered in either view is dropped; the caller is
/// expected to have confirmed this with the user.
pub fn change_view(values: &mut StaticIpValues, view: StaticIpView) {
    debug!(
        "Changing static IP view from '{}' to '{}', discarding {} host(s)",
        values.config_type(),
        view,
        values.host_count()
    );
    *values = empty_values(view);
}

/// Change the protocol selection.  Moving from one family to `both` keeps the data already
/// entered for that family; any other change blanks both address blocks.
pub fn change_protocol_type(
    network_wide: &mut NetworkWideConfiguration,
    protocol_type: StaticProtocolType,
) {
    let current = network_wide.protocol_type;
    if current == protocol_type {
        return;
    }

    match (current, protocol_type) {
        (StaticProtocolType::Ipv4, StaticProtocolType::Both) => {
            network_wide.ipv6 = empty_address_data()
        }
        (StaticProtocolType::Ipv6, StaticProtocolType::Both) => {
            network_wide.ipv4 = empty_address_data()
        }
        _ => {
            network_wide.ipv4 = empty_address_data();
            network_wide.ipv6 = empty_address_data();
        }
    }
    network_wide.protocol_type = protocol_type;
}

/// The form view's new host.  Form hosts are never copied from the one above.
pub fn new_form_host() -> HostConfiguration {
    empty_form_host()
}

/// The YAML view's new host: a copy of the last host if requested and one exists, otherwise a
/// blank host.
pub fn new_yaml_host(
    existing: &[HostStaticNetworkConfig],
    copy_previous: bool,
) -> HostStaticNetworkConfig {
    match existing.last() {
        Some(last) if copy_previous => last.clone(),
        _ => empty_yaml_host(),
    }
}

/// Whether the host at `index` may be removed.  The first host always stays.
pub fn can_remove_host(host_count: usize, index: usize) -> bool {
    index > 0 && index < host_count
}

/// What a collapsed host shows: its (first) MAC address and what that MAC maps to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HostSummary {
    pub mac_address: String,
    pub mapping: String,
    pub interface_count: usize,
}

pub fn host_summary(values: &StaticIpValues, index: usize) -> Option<HostSummary> {
    match values {
        StaticIpValues::Form { form_data } => {
            let host = form_data.host_configurations.get(index)?;
            let mapping = match form_data.network_wide_configurations.protocol_type {
                StaticProtocolType::Ipv4 => host.ipv4_address.clone(),
                StaticProtocolType::Ipv6 => host.ipv6_address.clone(),
                StaticProtocolType::Both => {
                    format!("{}, {}", host.ipv4_address, host.ipv6_address)
                }
            };
            Some(HostSummary {
                mac_address: host.mac_address.clone(),
                mapping,
                interface_count: 1,
            })
        }
        StaticIpValues::Yaml { yaml_data } => {
            let host = yaml_data.get(index)?;
            let (mac_address, mapping) = host
                .mac_interface_map
                .first()
                .map(|e| (e.mac_address.clone(), e.logical_nic_name.clone()))
                .unwrap_or_default();
            Some(HostSummary {
                mac_address,
                mapping,
                interface_count: host.mac_interface_map.len(),
            })
        }
    }
}

/// Placeholder text for a host address input: the part of the address every host in the
/// family's subnet shares.  Empty for inactive families and unparseable subnets.
pub fn address_placeholder(
    network_wide: &NetworkWideConfiguration,
    version: ProtocolVersion,
) -> String {
    if !network_wide.protocol_type.shows(version) {
        return String::new();
    }
    address::address_hint(&network_wide.address_data(version).subnet, version)
}

mod error {
    use snafu::Snafu;

    #[derive(Debug, Snafu)]
    #[snafu(visibility(pub(crate)))]
    pub enum Error {
        #[snafu(display("Unable to compile network configuration for host {}: {}", index, source))]
        CompileHost {
            index: usize,
            source: crate::compile::Error,
        },
    }
}

pub use error::Error;
type Result<T> = std::result::Result<T, error::Error>;
