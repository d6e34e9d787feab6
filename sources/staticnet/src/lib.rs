/*!
# Introduction

staticnet is the static network configuration model behind the cluster installation wizard.  It
takes what the user entered for static IP networking, either as a form (settings shared by every
host plus per-host MAC and IP addresses) or as raw per-host YAML, and:

* validates it field by field, reporting every problem with the path of the offending field
* compiles form data into one declarative network state document per host
* maps the backend's stored per-host documents back onto the view they were authored in

Each host's document looks like this, for IPv4 with a VLAN:

```yaml
interfaces:
- name: eth0
  type: ethernet
  state: up
  ipv4:
    address:
    - ip: 192.168.0.10
      prefix-length: 24
    enabled: true
    dhcp: false
- name: eth0.100
  type: vlan
  state: up
  vlan:
    base-iface: eth0
    id: 100
dns-resolver:
  config:
    server:
    - 192.168.0.2
routes:
  config:
  - destination: 0.0.0.0/0
    next-hop-address: 192.168.0.1
    next-hop-interface: eth0
    table-id: 254
```

Everything here is pure and synchronous; nothing is shared between calls.
*/

#![deny(rust_2018_idioms)]

#[macro_use]
extern crate serde_plain;

pub mod address;
pub mod compile;
pub mod config;
pub mod mac_address;
pub mod model;
pub mod protocol;
pub mod reconcile;
pub mod validate;
pub mod vlan_id;
pub mod wizard;

pub use address::{AddressData, ProtocolVersion};
pub use config::Config;
pub use model::{
    HostConfiguration, HostStaticNetworkConfig, MacInterfaceMapEntry, NetworkWideConfiguration,
    StaticFormData, StaticIpInfo, StaticIpValues, StaticIpView, StaticNetworkConfigUpdate,
};
pub use protocol::StaticProtocolType;
pub use reconcile::ViewReconciler;
pub use validate::{validate, FieldError, ValidationErrors};
