use regex::Regex;
use std::net::Ipv4Addr;
use std::sync::LazyLock;

/// IP and hardware address helpers for validation

static MAC_PATTERN: LazyLock<Regex> = LazyLock::new(||
    Regex::new(r"^(?:[0-9A-Fa-f]{2}[:-]){5}[0-9A-Fa-f]{2}$").unwrap()
);

/// Check if a string is a valid IPv4 address
pub fn is_valid_ipv4(ip: &str) -> bool {
    ip.parse::<Ipv4Addr>().is_ok()
}

/// Parse an optional address entry. Blank entries and garbage yield `None`.
pub fn parse_ipv4(ip: &str) -> Option<Ipv4Addr> {
    let ip = ip.trim();
    if ip.is_empty() {
        return None;
    }
    ip.parse().ok()
}

/// Check if a string looks like an Ethernet hardware address
pub fn is_valid_mac(mac: &str) -> bool {
    MAC_PATTERN.is_match(mac)
}
