use clap::{Parser, Subcommand};
use color_eyre::eyre::eyre;
use color_eyre::Result;
use env_logger::Env;
use lazykube::config_loader::{self, CliOverrides};
use lazykube::orchestrator;
use log::{info, warn};
use std::path::PathBuf;

/// The lazy deploy tool for Kubernetes clusters
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Generate deploy config
    Config {
        /// Path to the LazyKube YAML config file
        #[arg(long, default_value = "etc/lazykube.yaml")]
        config_file: PathBuf,

        /// Deploy config output path
        #[arg(short, long, default_value = "_output")]
        output: PathBuf,

        /// Override the number of addresses kept for dynamic DHCP leasing
        #[arg(long)]
        dhcp_keep: Option<i64>,

        /// Override the domain base appended to node ids
        #[arg(long)]
        domain_base: Option<String>,
    },

    /// Show how the configured IP pools are parsed
    Pools {
        /// Path to the LazyKube YAML config file
        #[arg(long, default_value = "etc/lazykube.yaml")]
        config_file: PathBuf,
    },
}

fn main() -> Result<()> {
    // Initialize error handling
    color_eyre::install()?;

    let args = Args::parse();

    // Initialize logging with default filter level of "info"
    env_logger::Builder::from_env(Env::default().default_filter_or("info")).init();

    match args.command {
        Command::Config {
            config_file,
            output,
            dhcp_keep,
            domain_base,
        } => {
            info!("Configuration file: {:?}", config_file);
            info!("Output directory: {:?}", output);

            let mut config = config_loader::load_config(&config_file)?;
            config_loader::apply_overrides(
                &mut config,
                &CliOverrides {
                    dhcp_keep,
                    domain_base,
                },
            )?;

            let report = orchestrator::generate(&config, &output)?;
            for (path, reason) in &report.failed {
                warn!("Skipped {:?}: {}", path, reason);
            }
            if !report.is_success() {
                return Err(eyre!("{} output files could not be written", report.failed.len()));
            }
            info!("Generated {} files in {:?}", report.written.len(), output);
        }
        Command::Pools { config_file } => {
            let config = config_loader::load_config(&config_file)?;
            let network = orchestrator::build_network(&config);
            for line in orchestrator::describe_pools(&network) {
                println!("{}", line);
            }
        }
    }

    Ok(())
}
