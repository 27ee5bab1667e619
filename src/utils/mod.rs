//! Shared utilities: address helpers and node validation.

pub mod ip_utils;
pub mod validation;

pub use ip_utils::{is_valid_ipv4, is_valid_mac, parse_ipv4};
pub use validation::validate_node_addresses;
