//! dnsmasq configuration for PXE boot, DHCP host pinning and cluster DNS.

use crate::cluster::Node;
use crate::config::Config;
use crate::ip::Network;
use log::warn;

const LEASE_TIME: &str = "1h";
const TFTP_ROOT: &str = "/var/lib/tftpboot";

/// Render `dnsmasq.conf`.
///
/// Every resolved interface is pinned with a `dhcp-host` line. The dynamic
/// range is the reserved band of the first pool.
pub fn dnsmasq_conf(config: &Config, network: &Network, nodes: &[Node]) -> String {
    let mut conf = String::new();
    conf.push_str("# dnsmasq.conf\n\n");

    conf.push_str("### DHCP CONFIG ###\n");
    if let Some(gateway) = config.network.gateway.as_deref().filter(|gw| !gw.is_empty()) {
        conf.push_str(&format!("dhcp-option=3,{}\n", gateway));
    }
    match network.keep_range() {
        Ok(range) => conf.push_str(&format!("dhcp-range={},{}\n", range.start, range.end)),
        Err(e) => warn!("No dynamic DHCP range: {}", e),
    }
    for node in nodes {
        for nic in &node.nics {
            conf.push_str(&format!("dhcp-host={},{},{}\n", nic.mac, nic.ip, LEASE_TIME));
        }
    }
    conf.push('\n');

    let url = config.matchbox.url.trim_end_matches('/');
    conf.push_str("dhcp-userclass=set:ipxe,iPXE\n");
    conf.push_str("dhcp-boot=tag:#ipxe,undionly.kpxe\n");
    conf.push_str(&format!("dhcp-boot=tag:ipxe,{}/boot.ipxe\n\n", url));

    conf.push_str("### TFTP CONFIG ###\n");
    conf.push_str("enable-tftp\n");
    conf.push_str(&format!("tftp-root={}\n\n", TFTP_ROOT));

    conf.push_str("### DNS CONFIG ###\n\n");
    if !config.matchbox.domain.is_empty() && !config.matchbox.ip.is_empty() {
        conf.push_str(&format!(
            "address=/{}/{}\n",
            config.matchbox.domain, config.matchbox.ip
        ));
    }

    conf.push_str("\n##### vip address #####\n");
    if let Some((vip, domain)) = config.vip() {
        conf.push_str(&format!("address=/{}/{}\n", domain, vip));
    }

    conf.push_str("\n##### node address #####\n");
    for node in nodes {
        if let Some(ip) = node.primary_ip() {
            conf.push_str(&format!("address=/{}/{}\n", node.domain, ip));
        }
    }

    conf.push_str("\n##### dns server #####\n");
    for server in &config.network.dns {
        conf.push_str(&format!("server={}\n", server));
    }

    conf.push_str("\n### OTHER CONFIG ###\n");
    conf.push_str("log-queries\n");
    conf.push_str("log-dhcp\n");
    conf
}
