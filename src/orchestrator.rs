//! Provisioning orchestrator.
//!
//! This module runs the single linear provisioning pass: pools are built from
//! the config, nodes are resolved against them, and the rendered profiles and
//! dnsmasq config are written to the output directory.

use crate::cluster::{build_cluster, ClusterTopology};
use crate::config::Config;
use crate::ip::Network;
use crate::render::{dnsmasq_conf, install_profile, node_profile};
use color_eyre::eyre::WrapErr;
use color_eyre::Result;
use log::{error, info};
use std::fs;
use std::path::{Path, PathBuf};

/// Outcome of a provisioning run
#[derive(Debug)]
pub struct GenerationReport {
    pub cluster: ClusterTopology,
    /// Files written successfully
    pub written: Vec<PathBuf>,
    /// Files that could not be rendered or written, with the reason
    pub failed: Vec<(PathBuf, String)>,
}

impl GenerationReport {
    /// Returns true if every file was written
    pub fn is_success(&self) -> bool {
        self.failed.is_empty()
    }
}

/// Build the pools described by a config
pub fn build_network(config: &Config) -> Network {
    Network::new(&config.network.ips, config.network.dhcp_keep)
}

/// One line per parsed pool, for inspection
pub fn describe_pools(network: &Network) -> Vec<String> {
    network
        .pools()
        .iter()
        .enumerate()
        .map(|(i, pool)| {
            format!(
                "pool {}: network {} range {}-{} dynamic {}",
                i,
                pool.network(),
                pool.start(),
                pool.end(),
                pool.reserved_range()
            )
        })
        .collect()
}

fn write_output<E: std::fmt::Display>(
    path: PathBuf,
    rendered: std::result::Result<String, E>,
    written: &mut Vec<PathBuf>,
    failed: &mut Vec<(PathBuf, String)>,
) {
    let outcome = rendered
        .map_err(|e| e.to_string())
        .and_then(|content| fs::write(&path, content).map_err(|e| e.to_string()));

    match outcome {
        Ok(()) => {
            info!("Wrote {:?}", path);
            written.push(path);
        }
        Err(e) => {
            error!("Write {:?} failed: {}", path, e);
            failed.push((path, e));
        }
    }
}

/// Resolve the cluster and write every output file.
///
/// Address failures abort the run before anything is written. A file that
/// fails to render or write is logged and recorded, and the remaining files
/// are still produced.
pub fn generate(config: &Config, output_dir: &Path) -> Result<GenerationReport> {
    let mut network = build_network(config);
    let cluster = build_cluster(config, &mut network).wrap_err("Analyze cluster failed")?;

    fs::create_dir_all(output_dir)
        .wrap_err_with(|| format!("Failed to create output directory '{}'", output_dir.display()))?;

    let mut written = Vec::new();
    let mut failed = Vec::new();

    write_output(
        output_dir.join("install.json"),
        install_profile(config),
        &mut written,
        &mut failed,
    );

    for node in &cluster.nodes {
        write_output(
            output_dir.join(format!("{}.json", node.id)),
            node_profile(node, &cluster.info, config),
            &mut written,
            &mut failed,
        );
    }

    write_output(
        output_dir.join("dnsmasq.conf"),
        Ok::<_, String>(dnsmasq_conf(config, &network, &cluster.nodes)),
        &mut written,
        &mut failed,
    );

    Ok(GenerationReport {
        cluster,
        written,
        failed,
    })
}
