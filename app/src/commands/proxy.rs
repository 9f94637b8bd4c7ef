//! Proxy authority commands: add-proxy, remove-proxy
//!
//! These are signed by the granting wallet itself (GRANTER_SEED /
//! GRANTER_ADDRESS), not by the staking proxy.

use std::time::Duration;

use anyhow::{bail, Context, Result};
use clap::Args;

use bastion_core::AppConfig;
use staking::{build_add_proxy, build_remove_proxy, submit_authority_change, ProxyType};
use subtensor_client::ExtrinsicSigner;

use super::{confirm_from_terminal, connect, parse_address};

#[derive(Args)]
pub struct AddProxyArgs {
    /// Account to grant proxy authority to
    #[arg(long)]
    pub delegate: String,

    /// Authority class: staking or registration
    #[arg(long, default_value = "staking")]
    pub proxy_type: String,
}

#[derive(Args)]
pub struct RemoveProxyArgs {
    /// Account to revoke proxy authority from
    #[arg(long)]
    pub delegate: String,

    /// Authority class: staking or registration
    #[arg(long, default_value = "staking")]
    pub proxy_type: String,
}

fn load_granting_signer() -> Result<ExtrinsicSigner> {
    let seed = std::env::var("GRANTER_SEED").context("GRANTER_SEED is not set")?;
    let address = std::env::var("GRANTER_ADDRESS").context("GRANTER_ADDRESS is not set")?;
    ExtrinsicSigner::from_seed_hex(&seed, parse_address(&address)?)
        .context("invalid GRANTER_SEED")
}

fn parse_proxy_type(raw: &str) -> Result<ProxyType> {
    ProxyType::parse(raw)
        .with_context(|| format!("invalid proxy type '{}', expected staking or registration", raw))
}

pub async fn add_proxy(config: &AppConfig, assume_yes: bool, args: AddProxyArgs) -> Result<()> {
    let client = connect(config)?;
    let signer = load_granting_signer()?;
    let delegate = parse_address(&args.delegate)?;
    let proxy_type = parse_proxy_type(&args.proxy_type)?;

    let confirm = confirm_from_terminal(assume_yes);
    if !confirm(&format!(
        "Grant {} proxy authority to {}?",
        proxy_type.as_str(),
        delegate
    )) {
        bail!("cancelled");
    }

    let call = build_add_proxy(&delegate, proxy_type);
    let receipt = submit_authority_change(
        &client,
        &signer,
        &call,
        Duration::from_secs(config.submission.timeout_secs),
    )
    .await?;

    println!("Proxy added: {}", receipt.extrinsic_hash);
    Ok(())
}

pub async fn remove_proxy(
    config: &AppConfig,
    assume_yes: bool,
    args: RemoveProxyArgs,
) -> Result<()> {
    let client = connect(config)?;
    let signer = load_granting_signer()?;
    let delegate = parse_address(&args.delegate)?;
    let proxy_type = parse_proxy_type(&args.proxy_type)?;

    let confirm = confirm_from_terminal(assume_yes);
    if !confirm(&format!(
        "Revoke {} proxy authority from {}?",
        proxy_type.as_str(),
        delegate
    )) {
        bail!("cancelled");
    }

    let call = build_remove_proxy(&delegate, proxy_type);
    let receipt = submit_authority_change(
        &client,
        &signer,
        &call,
        Duration::from_secs(config.submission.timeout_secs),
    )
    .await?;

    println!("Proxy removed: {}", receipt.extrinsic_hash);
    Ok(())
}
