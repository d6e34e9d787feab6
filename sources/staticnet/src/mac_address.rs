//! Hardware addresses as entered for each host, e.g. "52:54:00:79:99:c6".
use snafu::{ensure, OptionExt};
use std::fmt::Display;

/// Six octets; two addresses that differ only in letter case are the same address.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash)]
pub struct MacAddress([u8; 6]);

impl TryFrom<&str> for MacAddress {
    type Error = error::Error;

    fn try_from(input: &str) -> Result<Self> {
        let parts: Vec<&str> = input.split(':').collect();
        ensure!(
            parts.len() == 6,
            error::OctetCountSnafu {
                input,
                count: parts.len()
            }
        );

        let mut octets = [0u8; 6];
        for (octet, part) in octets.iter_mut().zip(parts) {
            *octet = parse_octet(part).context(error::InvalidOctetSnafu { input, octet: part })?;
        }
        Ok(MacAddress(octets))
    }
}

/// Exactly two hex digits.  `from_str_radix` alone would take a leading '+'.
fn parse_octet(part: &str) -> Option<u8> {
    if part.len() != 2 || !part.bytes().all(|b| b.is_ascii_hexdigit()) {
        return None;
    }
    u8::from_str_radix(part, 16).ok()
}

impl Display for MacAddress {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let [a, b, c, d, e, g] = self.0;
        write!(
            f,
            "{:02x}:{:02x}:{:02x}:{:02x}:{:02x}:{:02x}",
            a, b, c, d, e, g
        )
    }
}

mod error {
    use snafu::Snafu;

    #[derive(Debug, Snafu)]
    #[snafu(visibility(pub(crate)))]
    pub enum Error {
        #[snafu(display("MAC address '{}' has {} octets, expected 6", input, count))]
        OctetCount { input: String, count: usize },

        #[snafu(display("MAC address '{}' has invalid octet '{}'", input, octet))]
        InvalidOctet { input: String, octet: String },
    }
}

pub use error::Error;
type Result<T> = std::result::Result<T, error::Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_octets() {
        let mac = MacAddress::try_from("52:54:00:79:99:c6").unwrap();
        assert_eq!(mac.0, [0x52, 0x54, 0x00, 0x79, 0x99, 0xc6]);
        assert!(MacAddress::try_from("00:00:00:00:00:00").is_ok());
    }

    #[test]
    fn rejects_malformed() {
        for bad in ["", ":", "52:", "52:54:00:79:99:c6:c7", "52-54-00-79-99-c6"] {
            assert!(
                matches!(MacAddress::try_from(bad), Err(Error::OctetCount { .. })),
                "{}",
                bad
            );
        }
        for bad in [
            "52:54:00:79:99:c",
            "52:54:00:79:99:z6",
            "52:54:00:79:99:+6",
            " 52:54:00:79:99:c6",
            "52:54:00:79:99:c6 ",
            "52:54:00:79:99:0c6",
        ] {
            assert!(
                matches!(MacAddress::try_from(bad), Err(Error::InvalidOctet { .. })),
                "{}",
                bad
            );
        }
    }

    #[test]
    fn compares_without_case() {
        let upper = MacAddress::try_from("F8:75:A4:D5:32:64").unwrap();
        let lower = MacAddress::try_from("f8:75:a4:d5:32:64").unwrap();
        assert_eq!(upper, lower);
        assert_eq!(upper.to_string(), "f8:75:a4:d5:32:64");
    }
}
