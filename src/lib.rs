//! # LazyKube - Lazy provisioning configs for bare-metal Kubernetes
//!
//! This library generates the files needed to PXE boot and provision a
//! Kubernetes cluster through matchbox and dnsmasq from one small YAML file.
//!
//! ## Overview
//!
//! Every node lists its hardware addresses in interface order. Interface `i`
//! of every node draws its address from IP pool `i`. Pools are described by
//! compact specs such as `172.17.0.0/24:172.17.0.10`, hand out addresses in
//! ascending order, and keep the top of their range free for dynamic DHCP
//! leases.
//!
//! ## Architecture
//!
//! - `ip`: pool spec parsing, sequential address pools, the ordered pool set
//! - `cluster`: node interface resolution, VIP placement, etcd/API endpoints
//! - `config`: typed YAML configuration and validation
//! - `config_loader`: configuration file loading and CLI overrides
//! - `render`: matchbox profile JSON and `dnsmasq.conf` rendering
//! - `orchestrator`: the provisioning pass writing all files
//! - `utils`: address helpers and node validation
//!
//! ## Example Usage
//!
//! ```rust,no_run
//! use lazykube::{config_loader, orchestrator};
//! use std::path::Path;
//!
//! let config = config_loader::load_config(Path::new("etc/lazykube.yaml"))?;
//! let report = orchestrator::generate(&config, Path::new("_output"))?;
//! assert!(report.is_success());
//! # Ok::<(), color_eyre::eyre::Error>(())
//! ```
//!
//! ## Configuration Format
//!
//! ```yaml
//! general:
//!   version: "1632.3.0"
//!   channel: stable
//!   domain_base: k8s.local
//! matchbox:
//!   url: http://matchbox.k8s.local:8080
//!   ip: 172.17.0.2
//!   domain: matchbox.k8s.local
//! network:
//!   gateway: 172.17.0.1
//!   ips: ["172.17.0.0/24:172.17.0.10"]
//!   vip: 172.17.0.100
//!   enable_vip: true
//!   vip_domain: api.k8s.local
//! dhcp:
//!   enable: true
//! nodes:
//!   - id: node1
//!     role: master
//!     mac: ["52:54:00:a1:9c:ae"]
//! ```
//!
//! ## Error Handling
//!
//! Core modules return typed errors. Loading and generation return
//! `color_eyre::Result` with context attached.

pub mod config;
pub mod config_loader;
pub mod ip;
pub mod cluster;
pub mod render;
pub mod utils;
pub mod orchestrator;
