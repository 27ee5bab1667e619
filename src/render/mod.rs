//! Output rendering.
//!
//! Pure functions turning the resolved cluster into the files matchbox and
//! dnsmasq consume:
//!
//! ```text
//! _output/
//! |-- install.json     # OS install profile
//! |-- <node id>.json   # one profile per node, by role
//! \-- dnsmasq.conf     # PXE, DHCP host pinning and DNS records
//! ```

pub mod profiles;
pub mod dnsmasq;

pub use profiles::{install_profile, node_profile};
pub use dnsmasq::dnsmasq_conf;
