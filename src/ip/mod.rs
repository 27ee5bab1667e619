//! IP address pool management.
//!
//! This module parses pool specs, hands out addresses sequentially from each
//! pool, and exposes the band of every pool that is kept for dynamic DHCP
//! leasing. Pools are ordered: interface ordinal `i` of a node draws from
//! pool `i`.

pub mod spec;
pub mod pool;
pub mod network;

// Re-export commonly used types
pub use spec::{parse_pool_spec, PoolRange, PoolSpecError, Resolved};
pub use pool::{AddressPool, IpRange, PoolError, SlotState};
pub use network::{resolve_keep, Network, NetworkError, DEFAULT_KEEP};
