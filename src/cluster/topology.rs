//! Cluster-wide string derivation.

use super::types::{ClusterInfo, Node, NodeRole};

/// etcd peer port
pub const ETCD_PEER_PORT: u16 = 2380;
/// etcd client port
pub const ETCD_CLIENT_PORT: u16 = 2379;

/// DNS name of a node: the id, qualified by the domain base when one is set
pub fn node_domain(id: &str, domain_base: &str) -> String {
    let base = domain_base.trim_matches('.');
    if base.is_empty() {
        id.to_string()
    } else {
        format!("{}.{}", id, base)
    }
}

/// Derive etcd membership, client endpoints and the API endpoint.
///
/// Controllers contribute in node order. The API endpoint is the first
/// controller's domain unless a VIP domain is given, which always wins.
pub fn derive_cluster_info(nodes: &[Node], vip_domain: Option<&str>) -> ClusterInfo {
    let mut initial_cluster = Vec::new();
    let mut endpoints = Vec::new();
    let mut controller_endpoint = None;
    let mut info = ClusterInfo::default();

    for node in nodes {
        if node.role == NodeRole::Controller {
            initial_cluster.push(format!("{}=http://{}:{}", node.id, node.domain, ETCD_PEER_PORT));
            endpoints.push(format!("http://{}:{}", node.domain, ETCD_CLIENT_PORT));
            controller_endpoint.get_or_insert_with(|| format!("https://{}", node.domain));
        }
        if let Some(ip) = node.primary_ip() {
            info.hosts.insert(ip, node.domain.clone());
        }
    }

    if let Some(domain) = vip_domain {
        controller_endpoint = Some(format!("https://{}", domain));
    }

    info.initial_cluster = initial_cluster.join(",");
    info.endpoints = endpoints.join(",");
    info.controller_endpoint = controller_endpoint.unwrap_or_default();
    info
}
