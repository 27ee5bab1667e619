//! Cluster type definitions.
//!
//! Resolved nodes, their interfaces, and the cluster-wide values handed to
//! the renderer.

use crate::ip::NetworkError;
use serde::Serialize;
use std::collections::BTreeMap;
use std::fmt;
use std::net::Ipv4Addr;

/// What a node is provisioned as
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum NodeRole {
    /// Runs etcd and the Kubernetes control plane
    Controller,
    /// Runs kubelet against the controllers
    Worker,
    /// Installed OS only
    Plain,
}

impl NodeRole {
    /// Map a config role string. Unknown roles provision a plain node.
    pub fn from_config(role: &str) -> Self {
        match role.trim().to_ascii_lowercase().as_str() {
            "master" | "controller" => NodeRole::Controller,
            "minion" | "worker" => NodeRole::Worker,
            _ => NodeRole::Plain,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            NodeRole::Controller => "controller",
            NodeRole::Worker => "worker",
            NodeRole::Plain => "plain",
        }
    }
}

impl fmt::Display for NodeRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A node interface with its resolved address
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NodeInterface {
    pub mac: String,
    pub ip: Ipv4Addr,
    pub interface: String,
    pub dhcp: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub gateway: Option<Ipv4Addr>,
}

/// The virtual address bound to one interface of a node
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct VipBinding {
    pub ip: Ipv4Addr,
    pub interface: String,
}

/// A node after address resolution
#[derive(Debug, Clone, Serialize)]
pub struct Node {
    pub id: String,
    pub domain: String,
    pub role: NodeRole,
    pub nics: Vec<NodeInterface>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub vip: Option<VipBinding>,
}

impl Node {
    /// Address of the first interface, used for the node's DNS record
    pub fn primary_ip(&self) -> Option<Ipv4Addr> {
        self.nics.first().map(|nic| nic.ip)
    }

    /// Hardware address used to select the node at boot
    pub fn primary_mac(&self) -> Option<&str> {
        self.nics.first().map(|nic| nic.mac.as_str())
    }
}

/// Cluster-wide strings derived from the resolved nodes
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ClusterInfo {
    /// etcd initial cluster, `id=http://domain:2380` joined by commas
    pub initial_cluster: String,
    /// etcd client endpoints, `http://domain:2379` joined by commas
    pub endpoints: String,
    pub controller_endpoint: String,
    /// First address of each node mapped to its domain
    pub hosts: BTreeMap<Ipv4Addr, String>,
}

/// Resolved nodes plus derived cluster values
#[derive(Debug, Clone, Serialize)]
pub struct ClusterTopology {
    pub nodes: Vec<Node>,
    pub info: ClusterInfo,
}

/// Errors that stop provisioning
#[derive(Debug, thiserror::Error)]
pub enum ClusterError {
    #[error("node '{node}': cannot assign an address to interface {ordinal}: {source}")]
    NodeAddress {
        node: String,
        ordinal: usize,
        #[source]
        source: NetworkError,
    },

    #[error("virtual address {0} is not inside any configured pool")]
    VipUnplaceable(Ipv4Addr),

    #[error("virtual address '{0}' is not a valid IPv4 address")]
    InvalidVip(String),
}
