//! The address module contains the per-family address data entered by the user and the helpers
//! used to interpret it: address and CIDR parsing for a specific family, subnet membership and
//! the common-prefix computations used to pre-fill new host entries.
use ipnet::IpNet;
use serde::{Deserialize, Serialize};
use std::net::IpAddr;

/// A single IP protocol family.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProtocolVersion {
    Ipv4,
    Ipv6,
}

derive_fromstr_from_deserialize!(ProtocolVersion);
derive_display_from_serialize!(ProtocolVersion);

impl ProtocolVersion {
    /// Human readable family name, as shown next to the input fields.
    pub fn label(self) -> &'static str {
        match self {
            ProtocolVersion::Ipv4 => "IPv4",
            ProtocolVersion::Ipv6 => "IPv6",
        }
    }

    /// An example network for this family, used in validation messages.
    pub fn example_cidr(self) -> &'static str {
        match self {
            ProtocolVersion::Ipv4 => "123.123.123.0/24",
            ProtocolVersion::Ipv6 => "2055:d7a::/116",
        }
    }

    fn separator(self) -> &'static str {
        match self {
            ProtocolVersion::Ipv4 => ".",
            ProtocolVersion::Ipv6 => ":",
        }
    }

    pub(crate) fn matches_addr(self, addr: &IpAddr) -> bool {
        matches!(
            (self, addr),
            (ProtocolVersion::Ipv4, IpAddr::V4(_)) | (ProtocolVersion::Ipv6, IpAddr::V6(_))
        )
    }

    pub(crate) fn matches_net(self, net: &IpNet) -> bool {
        matches!(
            (self, net),
            (ProtocolVersion::Ipv4, IpNet::V4(_)) | (ProtocolVersion::Ipv6, IpNet::V6(_))
        )
    }
}

/// Network-wide address data for one family.  All fields are kept as the raw strings the user
/// typed; they are only interpreted by validation and compilation.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AddressData {
    #[serde(default)]
    pub subnet: String,
    #[serde(default)]
    pub gateway: String,
    #[serde(default)]
    pub dns: String,
}

impl AddressData {
    pub fn is_empty(&self) -> bool {
        self.subnet.is_empty() && self.gateway.is_empty() && self.dns.is_empty()
    }
}

/// Parse `value` as an address of the given family.  Addresses of the other family are rejected.
pub fn parse_address(value: &str, version: ProtocolVersion) -> Option<IpAddr> {
    value
        .parse::<IpAddr>()
        .ok()
        .filter(|addr| version.matches_addr(addr))
}

/// Parse `value` as a network in CIDR notation of the given family.  A bare address without a
/// prefix length is not a network.
pub fn parse_cidr(value: &str, version: ProtocolVersion) -> Option<IpNet> {
    if !value.contains('/') {
        return None;
    }
    value
        .parse::<IpNet>()
        .ok()
        .filter(|net| version.matches_net(net))
}

/// Whether `address` lies within the network range of `subnet`.  Host bits set in the subnet
/// string are ignored.
pub fn is_in_subnet(address: &IpAddr, subnet: &IpNet) -> bool {
    subnet.contains(address)
}

/// The network containing `address` for the given prefix length, with host bits cleared.
pub fn subnet_for_address(address: IpAddr, prefix_len: u8) -> Option<IpNet> {
    IpNet::new(address, prefix_len).ok().map(|net| net.trunc())
}

/// The longest common leading substring of two strings, ignoring surrounding whitespace.
pub fn common_prefix(first: &str, second: &str) -> String {
    first
        .trim()
        .chars()
        .zip(second.trim().chars())
        .take_while(|(a, b)| a == b)
        .map(|(a, _)| a)
        .collect()
}

/// Join address segments with the separator of the family.
pub fn address_to_string<S>(segments: &[S], version: ProtocolVersion) -> String
where
    S: AsRef<str>,
{
    segments
        .iter()
        .map(AsRef::as_ref)
        .collect::<Vec<_>>()
        .join(version.separator())
}

/// The prefix length of the smallest network spanning the range `from..=to`, i.e. the number of
/// leading bits both addresses share.
pub fn prefix_len_for_range(from: &str, to: &str, version: ProtocolVersion) -> Option<u8> {
    let from = parse_address(from, version)?;
    let to = parse_address(to, version)?;
    let differing = match (from, to) {
        (IpAddr::V4(a), IpAddr::V4(b)) => (u32::from(a) ^ u32::from(b)).leading_zeros(),
        (IpAddr::V6(a), IpAddr::V6(b)) => (u128::from(a) ^ u128::from(b)).leading_zeros(),
        _ => return None,
    };
    // leading_zeros() of a zero xor is the full bit width
    Some(differing as u8)
}

/// The fixed leading text shared by every address in `subnet`, e.g. "192.168.0." for
/// "192.168.0.0/24".  Returns an empty string if the subnet doesn't parse.
pub fn address_hint(subnet: &str, version: ProtocolVersion) -> String {
    match parse_cidr(subnet, version) {
        Some(net) => common_prefix(&net.network().to_string(), &net.broadcast().to_string()),
        None => String::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn valid_cidr() {
        let ok = [
            ("192.168.0.0/24", ProtocolVersion::Ipv4),
            ("10.0.0.0/8", ProtocolVersion::Ipv4),
            ("192.168.0.5/24", ProtocolVersion::Ipv4),
            ("0.0.0.0/0", ProtocolVersion::Ipv4),
            ("2055:d7a::/116", ProtocolVersion::Ipv6),
            ("fe80::/64", ProtocolVersion::Ipv6),
        ];
        for (value, version) in ok {
            assert!(parse_cidr(value, version).is_some(), "{}", value)
        }
    }

    #[test]
    fn invalid_cidr() {
        let bad = [
            ("", ProtocolVersion::Ipv4),
            ("192.168.0.0", ProtocolVersion::Ipv4),
            ("192.168.0.0/33", ProtocolVersion::Ipv4),
            ("192.168.0.0/", ProtocolVersion::Ipv4),
            ("192.168.0/24", ProtocolVersion::Ipv4),
            ("2055:d7a::/116", ProtocolVersion::Ipv4),
            ("192.168.0.0/24", ProtocolVersion::Ipv6),
            ("fe80::/129", ProtocolVersion::Ipv6),
            ("fe80::", ProtocolVersion::Ipv6),
        ];
        for (value, version) in bad {
            assert!(parse_cidr(value, version).is_none(), "{}", value)
        }
    }

    #[test]
    fn address_family() {
        assert!(parse_address("10.0.0.1", ProtocolVersion::Ipv4).is_some());
        assert!(parse_address("10.0.0.1", ProtocolVersion::Ipv6).is_none());
        assert!(parse_address("fe80::1", ProtocolVersion::Ipv6).is_some());
        assert!(parse_address("fe80::1", ProtocolVersion::Ipv4).is_none());
        assert!(parse_address("10.0.0.256", ProtocolVersion::Ipv4).is_none());
        assert!(parse_address("", ProtocolVersion::Ipv4).is_none());
    }

    #[test]
    fn subnet_membership() {
        let subnet = parse_cidr("192.168.0.0/24", ProtocolVersion::Ipv4).unwrap();
        let inside: IpAddr = "192.168.0.1".parse().unwrap();
        let outside: IpAddr = "192.168.1.1".parse().unwrap();
        assert!(is_in_subnet(&inside, &subnet));
        assert!(!is_in_subnet(&outside, &subnet));

        let subnet = parse_cidr("2055:d7a::/116", ProtocolVersion::Ipv6).unwrap();
        let inside: IpAddr = "2055:d7a::1".parse().unwrap();
        let outside: IpAddr = "2055:d7b::1".parse().unwrap();
        assert!(is_in_subnet(&inside, &subnet));
        assert!(!is_in_subnet(&outside, &subnet));
    }

    #[test]
    fn subnet_from_host_address() {
        let addr: IpAddr = "192.168.0.10".parse().unwrap();
        assert_eq!(
            subnet_for_address(addr, 24).unwrap().to_string(),
            "192.168.0.0/24"
        );
        assert!(subnet_for_address(addr, 33).is_none());
    }

    #[test]
    fn common_prefix_of_strings() {
        assert_eq!(common_prefix("192.168.0.0", "192.168.0.255"), "192.168.0.");
        assert_eq!(common_prefix("  abc ", "abd"), "ab");
        assert_eq!(common_prefix("abc", ""), "");
    }

    #[test]
    fn join_segments() {
        assert_eq!(
            address_to_string(&["192", "168", "0", "1"], ProtocolVersion::Ipv4),
            "192.168.0.1"
        );
        assert_eq!(
            address_to_string(&["fe80", "", "1"], ProtocolVersion::Ipv6),
            "fe80::1"
        );
    }

    #[test]
    fn range_prefix_len() {
        let cases = [
            ("192.168.0.0", "192.168.0.255", ProtocolVersion::Ipv4, Some(24)),
            ("10.0.0.0", "10.0.0.0", ProtocolVersion::Ipv4, Some(32)),
            ("10.0.0.0", "10.0.1.255", ProtocolVersion::Ipv4, Some(23)),
            ("2055:d7a::", "2055:d7a::fff", ProtocolVersion::Ipv6, Some(116)),
            ("10.0.0.0", "fe80::1", ProtocolVersion::Ipv4, None),
        ];
        for (from, to, version, expected) in cases {
            assert_eq!(prefix_len_for_range(from, to, version), expected, "{}", from);
        }
    }

    #[test]
    fn hints() {
        assert_eq!(
            address_hint("192.168.0.0/24", ProtocolVersion::Ipv4),
            "192.168.0."
        );
        assert_eq!(
            address_hint("2055:d7a::/116", ProtocolVersion::Ipv6),
            "2055:d7a::"
        );
        assert_eq!(address_hint("192.168.0.0", ProtocolVersion::Ipv4), "");
    }
}
