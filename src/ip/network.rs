//! Ordered set of address pools.
//!
//! Pool `i` serves interface ordinal `i` of every node.

use super::pool::{AddressPool, IpRange, PoolError};
use log::{info, warn};
use std::net::Ipv4Addr;

/// Addresses kept for dynamic leasing when the config does not say otherwise
pub const DEFAULT_KEEP: u32 = 20;

#[derive(Debug, thiserror::Error)]
pub enum NetworkError {
    #[error("pool index {index} out of range, only {pools} pools are configured")]
    PoolIndexOutOfRange { index: usize, pools: usize },

    #[error("no IP pools are configured")]
    NoPools,

    #[error(transparent)]
    Pool(#[from] PoolError),
}

/// Map a configured reservation count onto the one pools use.
///
/// Zero and negative values select [`DEFAULT_KEEP`].
pub fn resolve_keep(keep: i64) -> u32 {
    if keep <= 0 {
        DEFAULT_KEEP
    } else {
        u32::try_from(keep).unwrap_or(u32::MAX)
    }
}

#[derive(Debug, Default)]
pub struct Network {
    pools: Vec<AddressPool>,
}

impl Network {
    /// Parse every pool spec in order.
    ///
    /// Specs that cannot be parsed at all are skipped. Specs with advisory
    /// errors are kept in their degraded form. Both cases are logged.
    pub fn new<S: AsRef<str>>(specs: &[S], keep: i64) -> Self {
        let keep = resolve_keep(keep);
        let mut pools = Vec::with_capacity(specs.len());

        for spec in specs {
            let spec = spec.as_ref();
            match AddressPool::from_spec(spec, keep) {
                Ok(resolved) => {
                    let (pool, advisory) = resolved.into_parts();
                    if let Some(err) = advisory {
                        warn!("Parse pool '{}' failed with: {}", spec, err);
                    }
                    info!("Pool {}: {}", pools.len(), pool);
                    pools.push(pool);
                }
                Err(err) => {
                    warn!("Skipping pool '{}': {}", spec, err);
                }
            }
        }

        Self { pools }
    }

    pub fn pools(&self) -> &[AddressPool] {
        &self.pools
    }

    pub fn len(&self) -> usize {
        self.pools.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pools.is_empty()
    }

    /// Allocate an address for `identity` from the pool at `index`.
    pub fn request_ip(&mut self, identity: &str, index: usize) -> Result<Ipv4Addr, NetworkError> {
        let pools = self.pools.len();
        let pool = self
            .pools
            .get_mut(index)
            .ok_or(NetworkError::PoolIndexOutOfRange { index, pools })?;
        Ok(pool.allocate(identity)?)
    }

    /// Whether the pool at `index` contains `ip`. Unknown indexes yield false.
    pub fn contains(&self, ip: Ipv4Addr, index: usize) -> bool {
        self.pools
            .get(index)
            .map_or(false, |pool| pool.contains(ip))
    }

    /// Index of the first pool containing `ip`
    pub fn pool_index_of(&self, ip: Ipv4Addr) -> Option<usize> {
        self.pools.iter().position(|pool| pool.contains(ip))
    }

    /// Reserved range of the first pool.
    ///
    /// Only one dynamic leasing band is published even with several pools.
    pub fn keep_range(&self) -> Result<IpRange, NetworkError> {
        self.pools
            .first()
            .map(AddressPool::reserved_range)
            .ok_or(NetworkError::NoPools)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ip(s: &str) -> Ipv4Addr {
        s.parse().unwrap()
    }

    #[test]
    fn test_resolve_keep() {
        assert_eq!(resolve_keep(0), DEFAULT_KEEP);
        assert_eq!(resolve_keep(-3), DEFAULT_KEEP);
        assert_eq!(resolve_keep(5), 5);
        assert_eq!(resolve_keep(i64::MAX), u32::MAX);
    }

    #[test]
    fn test_mismatched_specs_are_dropped() {
        let network = Network::new(
            &["not-a-pool", "172.17.0.0/24", "224.0.0.1", "10.0.0.0/24"],
            0,
        );
        assert_eq!(network.len(), 2);
        assert_eq!(network.pools()[0].network().to_string(), "172.17.0.0/24");
        assert_eq!(network.pools()[1].network().to_string(), "10.0.0.0/24");
    }

    #[test]
    fn test_degraded_specs_are_kept() {
        let network = Network::new(&["192.168.56.5:172.0.0.5", "1.2.3.5/24:1.2.3.240"], 0);
        assert_eq!(network.len(), 2);
        assert_eq!(network.pools()[0].start(), ip("192.168.56.1"));
        assert_eq!(network.pools()[1].keep(), DEFAULT_KEEP);
    }

    #[test]
    fn test_request_ip_routes_by_index() {
        let mut network = Network::new(&["172.17.0.0/24:172.17.0.10", "10.0.0.0/24:10.0.0.50"], 0);
        assert_eq!(network.request_ip("a", 1).unwrap(), ip("10.0.0.50"));
        assert_eq!(network.request_ip("a", 0).unwrap(), ip("172.17.0.10"));
        assert_eq!(network.request_ip("b", 0).unwrap(), ip("172.17.0.11"));

        assert!(matches!(
            network.request_ip("a", 2),
            Err(NetworkError::PoolIndexOutOfRange { index: 2, pools: 2 })
        ));
    }

    #[test]
    fn test_request_ip_propagates_exhaustion() {
        let mut network = Network::new(&["1.2.3.5/16:1.2.3.200-1.2.3.202"], 2);
        assert!(network.request_ip("a", 0).is_ok());
        assert!(matches!(
            network.request_ip("b", 0),
            Err(NetworkError::Pool(PoolError::Exhausted { .. }))
        ));
    }

    #[test]
    fn test_contains_out_of_range_is_false() {
        let network = Network::new(&["172.17.0.0/24"], 0);
        assert!(network.contains(ip("172.17.0.20"), 0));
        assert!(!network.contains(ip("172.17.0.20"), 1));
        assert!(!network.contains(ip("172.17.0.20"), usize::MAX));
    }

    #[test]
    fn test_keep_range_uses_first_pool() {
        let network = Network::new(&["172.17.0.0/24", "10.0.0.0/24"], 10);
        let range = network.keep_range().unwrap();
        assert_eq!(range.start, ip("172.17.0.245"));
        assert_eq!(range.end, ip("172.17.0.255"));

        let empty = Network::new::<&str>(&[], 10);
        assert!(matches!(empty.keep_range(), Err(NetworkError::NoPools)));
    }

    #[test]
    fn test_pool_index_of() {
        let network = Network::new(&["172.17.0.0/24", "10.0.0.0/24"], 0);
        assert_eq!(network.pool_index_of(ip("10.0.0.3")), Some(1));
        assert_eq!(network.pool_index_of(ip("172.17.0.3")), Some(0));
        assert_eq!(network.pool_index_of(ip("8.8.8.8")), None);
    }
}
