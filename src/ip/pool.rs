//! Sequential address pool.
//!
//! A pool owns one CIDR-bounded range and hands addresses out in ascending
//! order. The top `keep` addresses of the range are withheld from sequential
//! issuance; they form the band a DHCP server leases dynamically.

use super::spec::{parse_pool_spec, ipv4_to_u32, u32_to_ipv4, PoolSpecError, Resolved};
use ipnet::Ipv4Net;
use log::debug;
use serde::Serialize;
use std::collections::BTreeMap;
use std::fmt;
use std::net::Ipv4Addr;

/// State of an issued address slot.
///
/// Sequential allocation only records `Reserved`. No operation moves a slot
/// to `Free` or `Released` yet, so the reuse scan in [`AddressPool::allocate`]
/// never finds anything.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SlotState {
    Free,
    Reserved,
    Released,
}

/// Errors returned by pool allocation
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PoolError {
    #[error("IP pool {network} is exhausted ({keep} addresses kept for dynamic leasing)")]
    Exhausted { network: Ipv4Net, keep: u32 },
}

/// Inclusive address range
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct IpRange {
    pub start: Ipv4Addr,
    pub end: Ipv4Addr,
}

impl fmt::Display for IpRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{}", self.start, self.end)
    }
}

#[derive(Debug, Clone)]
pub struct AddressPool {
    network: Ipv4Net,
    start: u32,
    end: u32,
    // u64 so issuing 255.255.255.255 cannot overflow the cursor
    cursor: u64,
    issued: BTreeMap<u32, SlotState>,
    keep: u32,
}

impl AddressPool {
    /// Build a pool from a spec string, keeping `keep` addresses at the top.
    ///
    /// Advisory errors (bad start/end, a reservation larger than the range)
    /// come back next to a usable pool. `SpecMismatch` and `NoDefaultMask`
    /// are returned as `Err`.
    pub fn from_spec(spec: &str, keep: u32) -> Result<Resolved<Self>, PoolSpecError> {
        let (range, mut advisory) = parse_pool_spec(spec)?.into_parts();

        let pool = Self {
            network: range.network,
            start: ipv4_to_u32(range.start),
            end: ipv4_to_u32(range.end),
            cursor: u64::from(ipv4_to_u32(range.start)),
            issued: BTreeMap::new(),
            keep,
        };

        if advisory.is_none() && u64::from(keep) > pool.capacity() {
            advisory = Some(PoolSpecError::ReservationExceedsCapacity {
                start: range.start,
                end: range.end,
                keep,
            });
        }

        Ok(Resolved { value: pool, advisory })
    }

    pub fn network(&self) -> Ipv4Net {
        self.network
    }

    pub fn start(&self) -> Ipv4Addr {
        u32_to_ipv4(self.start)
    }

    pub fn end(&self) -> Ipv4Addr {
        u32_to_ipv4(self.end)
    }

    pub fn keep(&self) -> u32 {
        self.keep
    }

    /// Number of addresses between start and end, inclusive
    pub fn capacity(&self) -> u64 {
        if self.end < self.start {
            return 0;
        }
        u64::from(self.end - self.start) + 1
    }

    /// Number of addresses handed out so far
    pub fn issued_count(&self) -> usize {
        self.issued.len()
    }

    /// Bound check against the allocatable range (not the backing network).
    pub fn contains(&self, ip: Ipv4Addr) -> bool {
        let n = ipv4_to_u32(ip);
        self.start <= n && n <= self.end
    }

    /// Hand out the next address.
    ///
    /// Addresses are issued in ascending order until the cursor reaches the
    /// reserved band. After that only slots marked [`SlotState::Free`] can be
    /// reused. The identity is recorded in the debug log and does not affect
    /// which address is returned.
    pub fn allocate(&mut self, identity: &str) -> Result<Ipv4Addr, PoolError> {
        if let Some(limit) = self.end.checked_sub(self.keep) {
            if self.cursor <= u64::from(limit) {
                let n = self.cursor as u32;
                self.issued.insert(n, SlotState::Reserved);
                self.cursor += 1;
                let ip = u32_to_ipv4(n);
                debug!("Issued {} from pool {} to '{}'", ip, self.network, identity);
                return Ok(ip);
            }
        }

        let reusable = self
            .issued
            .iter()
            .find(|(_, state)| **state == SlotState::Free)
            .map(|(n, _)| *n);
        if let Some(n) = reusable {
            self.issued.insert(n, SlotState::Reserved);
            let ip = u32_to_ipv4(n);
            debug!("Reissued free {} from pool {} to '{}'", ip, self.network, identity);
            return Ok(ip);
        }

        Err(PoolError::Exhausted {
            network: self.network,
            keep: self.keep,
        })
    }

    /// Band withheld from sequential issuance: `(end - keep, end)`.
    pub fn reserved_range(&self) -> IpRange {
        IpRange {
            start: u32_to_ipv4(self.end.saturating_sub(self.keep)),
            end: u32_to_ipv4(self.end),
        }
    }
}

impl fmt::Display for AddressPool {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} [{}-{}] keep {}",
            self.network,
            self.start(),
            self.end(),
            self.keep
        )
    }
}
