//! The vlan_id module contains the definition of a VLAN ID as typed into the form.  A valid VLAN
//! ID is made of digits only; its numeric value is what the network state document carries.
use lazy_static::lazy_static;
use regex::Regex;
use serde::{Deserialize, Serialize};
use snafu::{ensure, ResultExt};
use std::fmt::Display;
use std::ops::Deref;

lazy_static! {
    static ref VLAN_ID: Regex = Regex::new(r"^\d+$").unwrap();
}

/// Whether `input` is an acceptable VLAN ID.
pub fn is_valid_vlan_id(input: &str) -> bool {
    VLAN_ID.is_match(input)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct VlanId {
    inner: u64,
}

impl TryFrom<&str> for VlanId {
    type Error = error::Error;

    fn try_from(input: &str) -> Result<Self> {
        ensure!(
            is_valid_vlan_id(input),
            error::InvalidVlanIdSnafu {
                input,
                msg: "must contain digits only"
            }
        );

        let id = input.parse().context(error::VlanIdRangeSnafu { input })?;
        Ok(VlanId { inner: id })
    }
}

impl From<u64> for VlanId {
    fn from(id: u64) -> Self {
        VlanId { inner: id }
    }
}

impl Deref for VlanId {
    type Target = u64;
    fn deref(&self) -> &Self::Target {
        &self.inner
    }
}

impl Display for VlanId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.inner)
    }
}

mod error {
    use snafu::Snafu;

    #[derive(Debug, Snafu)]
    #[snafu(visibility(pub(crate)))]
    pub enum Error {
        #[snafu(display("Invalid VLAN ID '{}': {}", input, msg))]
        InvalidVlanId { input: String, msg: String },

        #[snafu(display("VLAN ID '{}' is too large: {}", input, source))]
        VlanIdRange {
            input: String,
            source: std::num::ParseIntError,
        },
    }
}

pub use error::Error;
type Result<T> = std::result::Result<T, error::Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn valid_vlan_id() {
        for ok in ["0", "1", "100", "4094", "4095", "0100", "65536"] {
            assert!(VlanId::try_from(ok).is_ok(), "{}", ok)
        }
        assert_eq!(*VlanId::try_from("0100").unwrap(), 100);
        assert_eq!(*VlanId::try_from("4095").unwrap(), 4095);
    }

    #[test]
    fn invalid_vlan_id() {
        for bad in ["", "-1", "1a", "a1", " 10", "10 ", "1.5", "+5"] {
            assert!(!is_valid_vlan_id(bad), "{}", bad);
            assert!(matches!(
                VlanId::try_from(bad),
                Err(Error::InvalidVlanId { .. })
            ));
        }
    }

    #[test]
    fn oversized_vlan_id() {
        let input = "99999999999999999999999";
        assert!(is_valid_vlan_id(input));
        assert!(matches!(
            VlanId::try_from(input),
            Err(Error::VlanIdRange { .. })
        ));
    }

    #[test]
    fn serializes_as_number() {
        assert_eq!(serde_json::to_string(&VlanId::from(4095)).unwrap(), "4095");
        assert_eq!(
            serde_json::from_str::<VlanId>("100").unwrap(),
            VlanId::from(100)
        );
    }
}
