//! Cluster topology aggregation.
//!
//! This module turns the configured node list into resolved nodes: every
//! interface gets an address from the pool of its ordinal, the virtual
//! address is bound to the interfaces sharing its pool, and the etcd and API
//! endpoint strings are derived from the controllers.

pub mod types;
pub mod interfaces;
pub mod vip;
pub mod topology;

// Re-export key types and functions for easier access
pub use types::{ClusterError, ClusterInfo, ClusterTopology, Node, NodeInterface, NodeRole, VipBinding};
pub use interfaces::{resolve_interfaces, InterfacePolicy};
pub use vip::place_vip;
pub use topology::{derive_cluster_info, node_domain};

use crate::config::Config;
use crate::ip::Network;
use crate::utils::ip_utils::parse_ipv4;
use log::info;

impl InterfacePolicy {
    /// Interface policy described by a config
    pub fn from_config(config: &Config) -> Self {
        Self {
            interface_base: config.network.interface_base.clone(),
            gateway: config.network.gateway.as_deref().and_then(parse_ipv4),
            dhcp_enabled: config.dhcp.enable,
            dhcp_interface: config.dhcp.interface.clone(),
        }
    }
}

/// Resolve every configured node and derive the cluster values.
///
/// Nodes are processed in config order. The first node that cannot get an
/// address fails the whole run.
pub fn build_cluster(config: &Config, network: &mut Network) -> Result<ClusterTopology, ClusterError> {
    let policy = InterfacePolicy::from_config(config);
    let mut nodes = Vec::with_capacity(config.nodes.len());

    for node_config in &config.nodes {
        let nics = resolve_interfaces(node_config, network, &policy)?;
        let node = Node {
            id: node_config.id.clone(),
            domain: node_domain(&node_config.id, &config.general.domain_base),
            role: NodeRole::from_config(&node_config.role),
            nics,
            vip: None,
        };
        info!("Resolved node '{}' as {} ({})", node.id, node.role, node.domain);
        nodes.push(node);
    }

    let vip_domain = match config.vip() {
        Some((vip, domain)) => {
            let vip = parse_ipv4(vip).ok_or_else(|| ClusterError::InvalidVip(vip.to_string()))?;
            let index = place_vip(vip, network, &mut nodes)?;
            info!("Virtual address {} placed in pool {}", vip, index);
            Some(domain)
        }
        None => None,
    };

    let info = derive_cluster_info(&nodes, vip_domain);
    Ok(ClusterTopology { nodes, info })
}
