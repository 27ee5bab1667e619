//! Node address validation utilities.
//!
//! These checks look at the per-node hardware and requested addresses before
//! any pool allocation happens.

use crate::config::NodeConfig;
use crate::utils::ip_utils::{is_valid_ipv4, is_valid_mac};
use std::collections::HashMap;

/// Validate node hardware and requested addresses
///
/// Checks for:
/// - Duplicate MAC addresses across all nodes
/// - Duplicate requested IP addresses across all nodes
/// - Requested IPs that are neither blank nor a valid IPv4 address
///
/// Malformed MACs and more requested IPs than MACs only produce warnings,
/// since the extra entries are simply never looked at.
///
/// # Arguments
/// * `nodes` - Node configurations in provisioning order
///
/// # Returns
/// * `Ok(())` if validation succeeds
/// * `Err(String)` with an error message if validation fails
///
/// # Examples
/// ```
/// use lazykube::config::NodeConfig;
/// use lazykube::utils::validation::validate_node_addresses;
///
/// let node = NodeConfig {
///     id: "node1".to_string(),
///     role: "master".to_string(),
///     mac: vec!["52:54:00:a1:9c:ae".to_string()],
///     ip: vec!["172.17.0.21".to_string()],
/// };
/// assert!(validate_node_addresses(&[node]).is_ok());
/// ```
pub fn validate_node_addresses(nodes: &[NodeConfig]) -> Result<(), String> {
    let mut macs: HashMap<String, &str> = HashMap::new();
    let mut ips: HashMap<&str, &str> = HashMap::new();

    for node in nodes {
        for mac in &node.mac {
            if !is_valid_mac(mac) {
                log::warn!("Node '{}' has malformed mac '{}'", node.id, mac);
            }
            if let Some(owner) = macs.insert(mac.to_lowercase(), &node.id) {
                return Err(format!(
                    "Duplicate mac '{}' on nodes '{}' and '{}'",
                    mac, owner, node.id
                ));
            }
        }

        for ip in &node.ip {
            let ip = ip.trim();
            if ip.is_empty() {
                continue;
            }
            if !is_valid_ipv4(ip) {
                return Err(format!("Invalid IP address '{}' for node '{}'", ip, node.id));
            }
            if let Some(owner) = ips.insert(ip, &node.id) {
                return Err(format!(
                    "Duplicate IP address '{}' requested by nodes '{}' and '{}'",
                    ip, owner, node.id
                ));
            }
        }

        if node.ip.len() > node.mac.len() {
            log::warn!(
                "Node '{}' requests {} addresses for {} interfaces, extra addresses are ignored",
                node.id,
                node.ip.len(),
                node.mac.len()
            );
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn node(id: &str, macs: &[&str], ips: &[&str]) -> NodeConfig {
        NodeConfig {
            id: id.to_string(),
            role: "worker".to_string(),
            mac: macs.iter().map(|s| s.to_string()).collect(),
            ip: ips.iter().map(|s| s.to_string()).collect(),
        }
    }

    #[test]
    fn test_valid_nodes() {
        let nodes = vec![
            node("a", &["52:54:00:00:00:01"], &["172.17.0.21"]),
            node("b", &["52:54:00:00:00:02", "52:54:00:00:01:02"], &["", "10.0.0.5"]),
        ];
        assert!(validate_node_addresses(&nodes).is_ok());
    }

    #[test]
    fn test_duplicate_mac_ignores_case() {
        let nodes = vec![
            node("a", &["52:54:00:00:00:0a"], &[]),
            node("b", &["52:54:00:00:00:0A"], &[]),
        ];
        let err = validate_node_addresses(&nodes).unwrap_err();
        assert!(err.contains("Duplicate mac"));
    }

    #[test]
    fn test_duplicate_requested_ip() {
        let nodes = vec![
            node("a", &["52:54:00:00:00:01"], &["172.17.0.21"]),
            node("b", &["52:54:00:00:00:02"], &["172.17.0.21"]),
        ];
        assert!(validate_node_addresses(&nodes).is_err());
    }

    #[test]
    fn test_invalid_requested_ip() {
        let nodes = vec![node("a", &["52:54:00:00:00:01"], &["172.17.0"])];
        assert!(validate_node_addresses(&nodes).is_err());
    }
}
