//! Pool specification parsing.
//!
//! A pool spec describes an IPv4 range in the compact form
//! `IP[/prefix][:startIP[-endIP]]`, for example:
//!
//! ```text
//! 192.168.0.5                               -> 192.168.0.0/24, .1 - .255
//! 192.168.0.5/16:192.168.0.87               -> 192.168.0.0/16, 0.87 - 255.255
//! 192.168.0.5/16:192.168.0.87-192.168.5.144 -> 192.168.0.0/16, 0.87 - 5.144
//! ```
//!
//! When the prefix is omitted the classful default of the leading octet is
//! used. A start or end address that does not fit the network is reported as
//! an advisory error, and the parsed range falls back to the network defaults
//! so callers that only log the problem still get a usable range.

use ipnet::Ipv4Net;
use regex::{Match, Regex};
use std::net::Ipv4Addr;
use std::sync::LazyLock;

const BYTE_PATTERN: &str = r"(?:25[0-5]|2[0-4][0-9]|1[0-9]{2}|[1-9]?[0-9])";
const PREFIX_PATTERN: &str = r"(?:3[0-2]|[1-2]?[0-9])";

static POOL_SPEC: LazyLock<Regex> = LazyLock::new(|| {
    let ip = format!(r"(?:{BYTE_PATTERN}\.){{3}}{BYTE_PATTERN}");
    Regex::new(&format!(
        r"^(?P<ip>{ip})(?:/(?P<prefix>{PREFIX_PATTERN}))?(?::(?P<start>{ip})(?:-(?P<end>{ip}))?)?$"
    ))
    .expect("Invalid pool spec regex")
});

/// Errors raised while turning a pool spec into a range.
///
/// `SpecMismatch` and `NoDefaultMask` leave nothing usable behind. Every other
/// kind is advisory: it travels next to a fully usable fallback value.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PoolSpecError {
    #[error("pool spec '{0}' does not match IP[/prefix][:start[-end]]")]
    SpecMismatch(String),

    #[error("no default netmask for {0}, an explicit prefix is required")]
    NoDefaultMask(Ipv4Addr),

    #[error("start IP {start} of pool is not in {network}")]
    StartNotInRange { start: Ipv4Addr, network: Ipv4Net },

    #[error("end IP {end} of pool is not in {network}")]
    EndNotInRange { end: Ipv4Addr, network: Ipv4Net },

    #[error("end IP {end} should not be smaller than start IP {start}")]
    EndBeforeStart { start: Ipv4Addr, end: Ipv4Addr },

    #[error("pool {start}-{end} can not keep {keep} addresses for dynamic leasing")]
    ReservationExceedsCapacity {
        start: Ipv4Addr,
        end: Ipv4Addr,
        keep: u32,
    },
}

/// A value that is usable even though building it may have raised an
/// advisory error.
#[derive(Debug, Clone)]
pub struct Resolved<T> {
    pub value: T,
    pub advisory: Option<PoolSpecError>,
}

impl<T> Resolved<T> {
    /// Split into the value and its advisory error.
    pub fn into_parts(self) -> (T, Option<PoolSpecError>) {
        (self.value, self.advisory)
    }
}

/// Resolved bounds of a pool spec
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PoolRange {
    pub network: Ipv4Net,
    pub start: Ipv4Addr,
    pub end: Ipv4Addr,
}

pub fn ipv4_to_u32(ip: Ipv4Addr) -> u32 {
    u32::from(ip)
}

pub fn u32_to_ipv4(n: u32) -> Ipv4Addr {
    Ipv4Addr::from(n)
}

/// Last address covered by a network, i.e. `base + 2^(32 - prefix) - 1`.
pub fn cidr_last_ip(network: &Ipv4Net) -> Ipv4Addr {
    let base = u64::from(ipv4_to_u32(network.network()));
    let size = 1u64 << (32 - u32::from(network.prefix_len()));
    // base is aligned to size, so the sum never leaves u32
    u32_to_ipv4((base + size - 1) as u32)
}

/// Classful default prefix for an address: A = 8, B = 16, C = 24.
///
/// Class D and E addresses have no default and yield `None`.
pub fn classful_prefix(ip: Ipv4Addr) -> Option<u8> {
    match ip.octets()[0] {
        0..=127 => Some(8),
        128..=191 => Some(16),
        192..=223 => Some(24),
        _ => None,
    }
}

fn parse_literal(spec: &str, m: Match<'_>) -> Result<Ipv4Addr, PoolSpecError> {
    m.as_str()
        .parse()
        .map_err(|_| PoolSpecError::SpecMismatch(spec.to_string()))
}

/// Parse a pool spec into its network and inclusive allocatable bounds.
pub fn parse_pool_spec(spec: &str) -> Result<Resolved<PoolRange>, PoolSpecError> {
    let spec = spec.trim();
    let caps = POOL_SPEC
        .captures(spec)
        .ok_or_else(|| PoolSpecError::SpecMismatch(spec.to_string()))?;

    let ip = match caps.name("ip") {
        Some(m) => parse_literal(spec, m)?,
        None => return Err(PoolSpecError::SpecMismatch(spec.to_string())),
    };

    let prefix = match caps.name("prefix") {
        Some(m) => m
            .as_str()
            .parse::<u8>()
            .map_err(|_| PoolSpecError::SpecMismatch(spec.to_string()))?,
        None => classful_prefix(ip).ok_or(PoolSpecError::NoDefaultMask(ip))?,
    };

    let network = Ipv4Net::new(ip, prefix)
        .map_err(|_| PoolSpecError::SpecMismatch(spec.to_string()))?
        .trunc();

    let mut advisory = None;

    let mut start = None;
    if let Some(m) = caps.name("start") {
        let candidate = parse_literal(spec, m)?;
        if network.contains(&candidate) {
            start = Some(candidate);
        } else {
            advisory = Some(PoolSpecError::StartNotInRange {
                start: candidate,
                network,
            });
        }
    }

    // An end address is only considered on top of a valid start address
    let mut end = None;
    if let (Some(m), Some(start)) = (caps.name("end"), start) {
        let candidate = parse_literal(spec, m)?;
        if !network.contains(&candidate) {
            advisory = Some(PoolSpecError::EndNotInRange {
                end: candidate,
                network,
            });
        } else if candidate < start {
            advisory = Some(PoolSpecError::EndBeforeStart {
                start,
                end: candidate,
            });
        } else {
            end = Some(candidate);
        }
    }

    let range = PoolRange {
        network,
        start: start
            .unwrap_or_else(|| u32_to_ipv4(ipv4_to_u32(network.network()).saturating_add(1))),
        end: end.unwrap_or_else(|| cidr_last_ip(&network)),
    };

    Ok(Resolved { value: range, advisory })
}
