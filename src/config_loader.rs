use crate::config::Config;
use crate::utils::validation::validate_node_addresses;
use color_eyre::eyre::{eyre, WrapErr};
use color_eyre::Result;
use log::{info, warn};
use std::fs::File;
use std::path::Path;

/// Load and parse configuration from a YAML file
pub fn load_config(config_path: &Path) -> Result<Config> {
    info!("Loading configuration from: {:?}", config_path);

    let file = File::open(config_path)
        .wrap_err_with(|| format!("Failed to open config file '{}'", config_path.display()))?;

    let config: Config = serde_yaml::from_reader(file)
        .wrap_err_with(|| format!("Failed to parse config file '{}'", config_path.display()))?;

    config.validate()?;
    validate_node_addresses(&config.nodes).map_err(|e| eyre!("Node validation failed: {}", e))?;

    if config.nodes.is_empty() {
        warn!("Configuration defines no nodes, only shared files will be generated");
    }
    info!(
        "Loaded {} nodes and {} IP pools",
        config.nodes.len(),
        config.network.ips.len()
    );

    Ok(config)
}

/// CLI arguments that can override YAML settings
#[derive(Debug, Clone, Default)]
pub struct CliOverrides {
    pub dhcp_keep: Option<i64>,
    pub domain_base: Option<String>,
}

/// Apply CLI overrides to a loaded configuration
pub fn apply_overrides(config: &mut Config, overrides: &CliOverrides) -> Result<()> {
    if let Some(keep) = overrides.dhcp_keep {
        info!("Overriding dhcp_keep with {}", keep);
        config.network.dhcp_keep = keep;
    }

    if let Some(domain_base) = &overrides.domain_base {
        info!("Overriding domain_base with '{}'", domain_base);
        config.general.domain_base = domain_base.clone();
    }

    // Re-validate after applying overrides
    config.validate()?;

    Ok(())
}
