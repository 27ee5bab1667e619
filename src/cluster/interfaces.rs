//! Per-node interface resolution.

use super::types::{ClusterError, NodeInterface};
use crate::config::NodeConfig;
use crate::ip::Network;
use crate::utils::ip_utils::parse_ipv4;
use log::{debug, info};
use std::net::Ipv4Addr;

/// Settings shared by every node's interfaces
#[derive(Debug, Clone, Default)]
pub struct InterfacePolicy {
    /// Interface names are `<interface_base><ordinal>`
    pub interface_base: String,
    pub gateway: Option<Ipv4Addr>,
    pub dhcp_enabled: bool,
    /// Preferred DHCP interface name; the first interface when `None`
    pub dhcp_interface: Option<String>,
}

impl InterfacePolicy {
    fn interface_name(&self, ordinal: usize) -> String {
        format!("{}{}", self.interface_base, ordinal)
    }

    fn serves_dhcp(&self, name: &str) -> bool {
        if !self.dhcp_enabled {
            return false;
        }
        match self.dhcp_interface.as_deref() {
            None | Some("") => true,
            Some(preferred) => preferred == name,
        }
    }
}

/// Resolve every interface of a node against the pool of its ordinal.
///
/// A requested address is kept when it lies in the matching pool; otherwise
/// the pool allocates one. Allocation failures abort this node only.
/// Addresses already handed to earlier interfaces stay committed.
pub fn resolve_interfaces(
    node: &NodeConfig,
    network: &mut Network,
    policy: &InterfacePolicy,
) -> Result<Vec<NodeInterface>, ClusterError> {
    let mut nics = Vec::with_capacity(node.mac.len());
    let mut dhcp_chosen = false;

    for (i, mac) in node.mac.iter().enumerate() {
        let requested = node
            .ip
            .get(i)
            .and_then(|ip| parse_ipv4(ip))
            .filter(|ip| network.contains(*ip, i));

        let ip = match requested {
            Some(ip) => {
                debug!("Node '{}' keeps requested {} on interface {}", node.id, ip, i);
                ip
            }
            None => {
                let ip = network
                    .request_ip(mac, i)
                    .map_err(|source| ClusterError::NodeAddress {
                        node: node.id.clone(),
                        ordinal: i,
                        source,
                    })?;
                info!("Assigned {} to node '{}' ({})", ip, node.id, mac);
                ip
            }
        };

        let interface = policy.interface_name(i);
        let gateway = policy.gateway.filter(|gw| network.contains(*gw, i));

        let dhcp = !dhcp_chosen && policy.serves_dhcp(&interface);
        dhcp_chosen |= dhcp;

        nics.push(NodeInterface {
            mac: mac.clone(),
            ip,
            interface,
            dhcp,
            gateway,
        });
    }

    Ok(nics)
}
