//! The protocol module decides which address families are active for a protocol selection.
//!
//! Every caller that needs to know whether IPv4 or IPv6 data is shown, validated, compiled or
//! required goes through `StaticProtocolType`, so those decisions cannot drift apart.
use crate::address::ProtocolVersion;
use serde::{Deserialize, Serialize};

/// The user's protocol selection for the whole static network configuration.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StaticProtocolType {
    #[default]
    Ipv4,
    Ipv6,
    Both,
}

derive_fromstr_from_deserialize!(StaticProtocolType);
derive_display_from_serialize!(StaticProtocolType);

/// The set of address families that are active under a protocol selection.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ActiveFamilies {
    pub ipv4: bool,
    pub ipv6: bool,
}

impl ActiveFamilies {
    pub fn contains(&self, version: ProtocolVersion) -> bool {
        match version {
            ProtocolVersion::Ipv4 => self.ipv4,
            ProtocolVersion::Ipv6 => self.ipv6,
        }
    }

    /// Active families in their fixed order, ipv4 before ipv6.
    pub fn iter(&self) -> impl Iterator<Item = ProtocolVersion> + '_ {
        [ProtocolVersion::Ipv4, ProtocolVersion::Ipv6]
            .into_iter()
            .filter(move |v| self.contains(*v))
    }
}

impl StaticProtocolType {
    pub fn show_ipv4(self) -> bool {
        matches!(self, StaticProtocolType::Ipv4 | StaticProtocolType::Both)
    }

    pub fn show_ipv6(self) -> bool {
        matches!(self, StaticProtocolType::Ipv6 | StaticProtocolType::Both)
    }

    pub fn active_families(self) -> ActiveFamilies {
        ActiveFamilies {
            ipv4: self.show_ipv4(),
            ipv6: self.show_ipv6(),
        }
    }

    pub fn shows(self, version: ProtocolVersion) -> bool {
        self.active_families().contains(version)
    }

    /// The family that owns the single default route.  Dual-stack configurations route through
    /// the ipv4 gateway only; the ipv6 gateway is never placed on the wire for `both`.
    pub fn route_family(self) -> ProtocolVersion {
        match self {
            StaticProtocolType::Ipv6 => ProtocolVersion::Ipv6,
            StaticProtocolType::Ipv4 | StaticProtocolType::Both => ProtocolVersion::Ipv4,
        }
    }

    /// Build the protocol selection from the families found in a configuration.  Returns `None`
    /// if neither family is present.
    pub fn from_families(ipv4: bool, ipv6: bool) -> Option<Self> {
        match (ipv4, ipv6) {
            (true, true) => Some(StaticProtocolType::Both),
            (true, false) => Some(StaticProtocolType::Ipv4),
            (false, true) => Some(StaticProtocolType::Ipv6),
            (false, false) => None,
        }
    }
}

pub fn show_ipv4(protocol_type: StaticProtocolType) -> bool {
    protocol_type.show_ipv4()
}

pub fn show_ipv6(protocol_type: StaticProtocolType) -> bool {
    protocol_type.show_ipv6()
}
