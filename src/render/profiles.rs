//! Matchbox profile documents.

use crate::cluster::{ClusterInfo, Node, NodeRole};
use crate::config::Config;
use serde_json::{json, Value};

const K8S_DNS_SERVICE_IP: &str = "10.3.0.10";
const K8S_POD_NETWORK: &str = "10.2.0.0/16";
const K8S_SERVICE_IP_RANGE: &str = "10.3.0.0/24";

fn to_pretty(value: &Value) -> Result<String, serde_json::Error> {
    let mut out = serde_json::to_string_pretty(value)?;
    out.push('\n');
    Ok(out)
}

/// OS install profile shared by every node
pub fn install_profile(config: &Config) -> Result<String, serde_json::Error> {
    let url = config.matchbox.url.trim_end_matches('/');
    to_pretty(&json!({
        "id": "coreos-install",
        "name": "CoreOS Install",
        "profile": "install-reboot",
        "metadata": {
            "coreos_channel": config.general.channel,
            "coreos_version": config.general.version,
            "ignition_endpoint": format!("{}/ignition", url),
            "baseurl": format!("{}/assets/coreos", url),
        }
    }))
}

/// Profile for one node, shaped by its role
pub fn node_profile(node: &Node, cluster: &ClusterInfo, config: &Config) -> Result<String, serde_json::Error> {
    let url = config.matchbox.url.trim_end_matches('/');
    let mac = node.primary_mac().unwrap_or_default();
    let keys = &config.general.keys;

    let profile = match node.role {
        NodeRole::Controller => json!({
            "id": node.id,
            "name": "k8s controller",
            "profile": "k8s-controller",
            "selector": { "mac": mac, "os": "installed" },
            "metadata": {
                "container_runtime": "docker",
                "domain_name": node.domain,
                "etcd_initial_cluster": cluster.initial_cluster,
                "etcd_name": node.id,
                "k8s_cert_endpoint": format!("{}/assets", url),
                "k8s_dns_service_ip": K8S_DNS_SERVICE_IP,
                "k8s_etcd_endpoints": cluster.endpoints,
                "k8s_pod_network": K8S_POD_NETWORK,
                "k8s_service_ip_range": K8S_SERVICE_IP_RANGE,
                "vip": node.vip,
                "interfaces": node.nics,
                "ssh_authorized_keys": keys,
            }
        }),
        NodeRole::Worker => json!({
            "id": node.id,
            "name": "k8s worker",
            "profile": "k8s-worker",
            "selector": { "mac": mac, "os": "installed" },
            "metadata": {
                "container_runtime": "docker",
                "domain_name": node.domain,
                "etcd_initial_cluster": cluster.initial_cluster,
                "k8s_controller_endpoint": cluster.controller_endpoint,
                "k8s_cert_endpoint": format!("{}/assets", url),
                "k8s_dns_service_ip": K8S_DNS_SERVICE_IP,
                "k8s_etcd_endpoints": cluster.endpoints,
                "interfaces": node.nics,
                "ssh_authorized_keys": keys,
            }
        }),
        NodeRole::Plain => json!({
            "id": node.id,
            "name": format!("Node {}", node.id),
            "profile": "node",
            "selector": { "mac": mac },
            "metadata": {
                "domain_name": node.domain,
                "interfaces": node.nics,
                "ssh_authorized_keys": keys,
            }
        }),
    };

    to_pretty(&profile)
}
