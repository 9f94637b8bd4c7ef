//! CLI command implementations

pub mod proxy;
pub mod stake;

use std::io::{self, Write};

use anyhow::{bail, Context, Result};

use bastion_core::{Address, AppConfig};
use staking::StakeOutcome;
use subtensor_client::{ExtrinsicSigner, SubtensorClient};

/// Build the signer from `PROXY_SEED` / `PROXY_ADDRESS`.
///
/// The seed never travels through argv; environment only.
pub fn load_signer() -> Result<ExtrinsicSigner> {
    let seed = std::env::var("PROXY_SEED").context("PROXY_SEED is not set")?;
    let address = std::env::var("PROXY_ADDRESS").context("PROXY_ADDRESS is not set")?;
    let address = parse_address(&address)?;
    ExtrinsicSigner::from_seed_hex(&seed, address).context("invalid PROXY_SEED")
}

pub fn connect(config: &AppConfig) -> Result<SubtensorClient> {
    SubtensorClient::new(&config.rpc).context("failed to create RPC client")
}

/// The principal address staking operations act for.
pub fn resolve_delegator(config: &AppConfig, cli_delegator: &Option<String>) -> Result<Address> {
    let raw = cli_delegator
        .clone()
        .or_else(|| config.delegator.clone())
        .context("no delegator configured (pass --delegator or set DELEGATOR)")?;
    parse_address(&raw)
}

pub fn parse_address(raw: &str) -> Result<Address> {
    let address = Address::new(raw);
    if !address.is_wellformed() {
        bail!("'{}' is not a well-formed SS58 address", raw);
    }
    Ok(address)
}

/// Terminal confirmation prompt. With `--yes` every prompt auto-approves.
pub fn confirm_from_terminal(assume_yes: bool) -> impl Fn(&str) -> bool {
    move |message: &str| {
        if assume_yes {
            return true;
        }
        print!("{} (y/n) ", message);
        let _ = io::stdout().flush();
        let mut line = String::new();
        if io::stdin().read_line(&mut line).is_err() {
            return false;
        }
        line.trim().eq_ignore_ascii_case("y")
    }
}

/// Print the structured outcome of a staking operation.
pub fn report_outcome(outcome: &StakeOutcome) -> Result<()> {
    println!(
        "{}",
        serde_json::to_string_pretty(outcome).context("failed to render outcome")?
    );
    if !outcome.success {
        bail!(
            "operation did not complete: {}",
            outcome.error.as_deref().unwrap_or("see verification status")
        );
    }
    Ok(())
}
