//! Virtual address placement.

use super::types::{ClusterError, Node, VipBinding};
use crate::ip::Network;
use log::info;
use std::net::Ipv4Addr;

/// Bind the virtual address to every node interface sharing its pool.
///
/// Only the first pool containing the address is considered, even when a
/// later pool's range overlaps it. Each node gets at most one binding, on its
/// first interface inside that pool. Returns the pool index used.
pub fn place_vip(vip: Ipv4Addr, network: &Network, nodes: &mut [Node]) -> Result<usize, ClusterError> {
    let index = network
        .pool_index_of(vip)
        .ok_or(ClusterError::VipUnplaceable(vip))?;

    for node in nodes.iter_mut() {
        node.vip = node
            .nics
            .iter()
            .find(|nic| network.contains(nic.ip, index))
            .map(|nic| VipBinding {
                ip: vip,
                interface: nic.interface.clone(),
            });

        if let Some(binding) = &node.vip {
            info!("Bound virtual address {} to {} on node '{}'", vip, binding.interface, node.id);
        }
    }

    Ok(index)
}
