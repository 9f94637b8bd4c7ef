//! Bastion CLI
//!
//! Thin glue around the staking protocol crate: argument parsing,
//! environment loading, interactive confirmation, and result printing.
//! All staking semantics live in `staking`.

mod commands;

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use bastion_core::{AppConfig, Network, RpcConfig};

#[derive(Parser)]
#[command(name = "bastion", version, about = "Proxy staking operations on subtensor networks")]
struct Cli {
    /// Named network (selects the default RPC endpoint)
    #[arg(long, env = "NETWORK", default_value = "finney", global = true)]
    network: String,

    /// RPC endpoint override
    #[arg(long, env = "RPC_URL", global = true)]
    rpc_url: Option<String>,

    /// Path to a TOML config file
    #[arg(long, global = true)]
    config: Option<std::path::PathBuf>,

    /// Principal (delegator) address the proxy acts for
    #[arg(long, env = "DELEGATOR", global = true)]
    delegator: Option<String>,

    /// Skip interactive confirmation prompts
    #[arg(long, short = 'y', global = true)]
    yes: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Stake base currency into a subnet
    AddStake(commands::stake::AddStakeArgs),
    /// Unstake a subnet position back to base currency
    RemoveStake(commands::stake::RemoveStakeArgs),
    /// Move a position between subnets
    SwapStake(commands::stake::SwapStakeArgs),
    /// Grant an account proxy authority (signed by the granting wallet)
    AddProxy(commands::proxy::AddProxyArgs),
    /// Revoke an account's proxy authority
    RemoveProxy(commands::proxy::RemoveProxyArgs),
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let cli = Cli::parse();
    let config = load_config(&cli)?;

    tracing::info!(network = %config.network, url = %config.rpc.url, "connecting");

    match cli.command {
        Command::AddStake(args) => commands::stake::add_stake(&config, &cli.delegator, cli.yes, args).await,
        Command::RemoveStake(args) => {
            commands::stake::remove_stake(&config, &cli.delegator, cli.yes, args).await
        }
        Command::SwapStake(args) => {
            commands::stake::swap_stake(&config, &cli.delegator, cli.yes, args).await
        }
        Command::AddProxy(args) => commands::proxy::add_proxy(&config, cli.yes, args).await,
        Command::RemoveProxy(args) => commands::proxy::remove_proxy(&config, cli.yes, args).await,
    }
}

/// Resolve configuration: file if given, network defaults otherwise, CLI
/// overrides on top.
fn load_config(cli: &Cli) -> Result<AppConfig> {
    let mut config = match &cli.config {
        Some(path) => {
            let raw = std::fs::read_to_string(path)
                .with_context(|| format!("failed to read config file {}", path.display()))?;
            toml::from_str(&raw).context("invalid config file")?
        }
        None => {
            let Some(network) = Network::parse(&cli.network) else {
                bail!("invalid network '{}', expected test or finney", cli.network);
            };
            AppConfig {
                network,
                rpc: RpcConfig::for_network(network),
                ..AppConfig::default()
            }
        }
    };

    if let Some(url) = &cli.rpc_url {
        config.rpc.url = url.clone();
    }

    Ok(config)
}
