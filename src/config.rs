use crate::utils::ip_utils::is_valid_ipv4;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

fn default_interface_base() -> String {
    "eth".to_string()
}

/// Top-level provisioning configuration
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Config {
    pub general: GeneralConfig,
    #[serde(default)]
    pub matchbox: MatchboxConfig,
    pub network: NetworkConfig,
    #[serde(default)]
    pub dhcp: DhcpConfig,
    #[serde(default)]
    pub nodes: Vec<NodeConfig>,
}

impl Config {
    /// Validate the configuration
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.general.version.is_empty() {
            return Err(ValidationError::InvalidGeneral(
                "version cannot be empty".to_string(),
            ));
        }
        if self.general.channel.is_empty() {
            return Err(ValidationError::InvalidGeneral(
                "channel cannot be empty".to_string(),
            ));
        }

        self.network.validate()?;

        if !self.matchbox.ip.is_empty() && !is_valid_ipv4(&self.matchbox.ip) {
            return Err(ValidationError::InvalidMatchbox(format!(
                "'{}' is not a valid IPv4 address",
                self.matchbox.ip
            )));
        }

        let mut seen = HashSet::new();
        for node in &self.nodes {
            if node.id.is_empty() {
                return Err(ValidationError::InvalidNode(
                    "node id cannot be empty".to_string(),
                ));
            }
            if !seen.insert(node.id.as_str()) {
                return Err(ValidationError::InvalidNode(format!(
                    "duplicate node id '{}'",
                    node.id
                )));
            }
            if node.mac.is_empty() {
                return Err(ValidationError::InvalidNode(format!(
                    "node '{}' needs at least one mac",
                    node.id
                )));
            }
        }

        Ok(())
    }

    /// The virtual address and its domain, when the VIP is enabled
    pub fn vip(&self) -> Option<(&str, &str)> {
        if !self.network.enable_vip {
            return None;
        }
        match (&self.network.vip, &self.network.vip_domain) {
            (Some(vip), Some(domain)) => Some((vip.as_str(), domain.as_str())),
            _ => None,
        }
    }
}

/// Release and identity settings shared by every node
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct GeneralConfig {
    pub version: String,
    pub channel: String,
    #[serde(default)]
    pub domain_base: String,
    #[serde(default)]
    pub keys: Vec<String>,
}

/// Matchbox boot service location
#[derive(Debug, Serialize, Deserialize, Clone, Default)]
pub struct MatchboxConfig {
    #[serde(default)]
    pub url: String,
    #[serde(default)]
    pub ip: String,
    #[serde(default)]
    pub domain: String,
}

/// Address pools and cluster-wide network settings
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct NetworkConfig {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub gateway: Option<String>,
    /// Pool specs, one per interface ordinal
    pub ips: Vec<String>,
    /// Addresses kept for dynamic leasing, zero or less selects the default
    #[serde(default)]
    pub dhcp_keep: i64,
    #[serde(default = "default_interface_base")]
    pub interface_base: String,
    #[serde(default)]
    pub dns: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub vip: Option<String>,
    #[serde(default)]
    pub enable_vip: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub vip_domain: Option<String>,
}

impl NetworkConfig {
    fn validate(&self) -> Result<(), ValidationError> {
        if self.ips.is_empty() {
            return Err(ValidationError::InvalidNetwork(
                "ips must list at least one pool".to_string(),
            ));
        }

        if let Some(gateway) = &self.gateway {
            if !is_valid_ipv4(gateway) {
                return Err(ValidationError::InvalidNetwork(format!(
                    "gateway '{}' is not a valid IPv4 address",
                    gateway
                )));
            }
        }

        for server in &self.dns {
            if !is_valid_ipv4(server) {
                return Err(ValidationError::InvalidNetwork(format!(
                    "dns server '{}' is not a valid IPv4 address",
                    server
                )));
            }
        }

        if self.enable_vip {
            match &self.vip {
                Some(vip) if is_valid_ipv4(vip) => {}
                Some(vip) => {
                    return Err(ValidationError::InvalidNetwork(format!(
                        "vip '{}' is not a valid IPv4 address",
                        vip
                    )))
                }
                None => {
                    return Err(ValidationError::InvalidNetwork(
                        "vip must be set when enable_vip is true".to_string(),
                    ))
                }
            }
            if self.vip_domain.as_deref().map_or(true, str::is_empty) {
                return Err(ValidationError::InvalidNetwork(
                    "vip_domain must be set when enable_vip is true".to_string(),
                ));
            }
        }

        Ok(())
    }
}

/// Which node interface serves DHCP
#[derive(Debug, Serialize, Deserialize, Clone, Default)]
pub struct DhcpConfig {
    #[serde(default)]
    pub enable: bool,
    /// Preferred interface name, e.g. `eth1`. The first interface is used when unset.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub interface: Option<String>,
}

/// A machine to provision
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct NodeConfig {
    pub id: String,
    #[serde(default)]
    pub role: String,
    /// Hardware addresses in interface ordinal order
    pub mac: Vec<String>,
    /// Requested addresses in interface ordinal order, blank entries are allocated
    #[serde(default)]
    pub ip: Vec<String>,
}

/// Validation error types
#[derive(Debug, thiserror::Error)]
pub enum ValidationError {
    #[error("Invalid general configuration: {0}")]
    InvalidGeneral(String),
    #[error("Invalid network configuration: {0}")]
    InvalidNetwork(String),
    #[error("Invalid matchbox configuration: {0}")]
    InvalidMatchbox(String),
    #[error("Invalid node configuration: {0}")]
    InvalidNode(String),
}
