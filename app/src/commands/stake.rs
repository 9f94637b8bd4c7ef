//! Staking commands: add-stake, remove-stake, swap-stake

use anyhow::Result;
use clap::Args;

use bastion_core::{AppConfig, Balance, Netuid};
use staking::StakingOps;

use super::{confirm_from_terminal, connect, load_signer, parse_address, report_outcome, resolve_delegator};

#[derive(Args)]
pub struct AddStakeArgs {
    /// Subnet to stake into
    #[arg(long)]
    pub netuid: Netuid,

    /// Validator hotkey to delegate to
    #[arg(long, env = "VALIDATOR_HOTKEY")]
    pub hotkey: String,

    /// Amount to stake, in tao
    #[arg(long)]
    pub amount: f64,

    /// Slippage tolerance fraction
    #[arg(long = "tol", default_value_t = 0.005)]
    pub tolerance: f64,
}

#[derive(Args)]
pub struct RemoveStakeArgs {
    /// Subnet to unstake from
    #[arg(long)]
    pub netuid: Netuid,

    /// Validator hotkey the position is delegated to
    #[arg(long, env = "VALIDATOR_HOTKEY")]
    pub hotkey: String,

    /// Amount to unstake, in tao-denominated alpha
    #[arg(long, conflicts_with = "all")]
    pub amount: Option<f64>,

    /// Unstake the entire position
    #[arg(long)]
    pub all: bool,

    /// Slippage tolerance fraction
    #[arg(long = "tol", default_value_t = 0.005)]
    pub tolerance: f64,
}

#[derive(Args)]
pub struct SwapStakeArgs {
    /// Validator hotkey the position is delegated to
    #[arg(long, env = "VALIDATOR_HOTKEY")]
    pub hotkey: String,

    /// Source subnet
    #[arg(long)]
    pub origin_netuid: Netuid,

    /// Destination subnet
    #[arg(long)]
    pub dest_netuid: Netuid,

    /// Amount to move, in alpha
    #[arg(long, conflicts_with = "all")]
    pub amount: Option<f64>,

    /// Move the entire position
    #[arg(long)]
    pub all: bool,
}

pub async fn add_stake(
    config: &AppConfig,
    delegator: &Option<String>,
    assume_yes: bool,
    args: AddStakeArgs,
) -> Result<()> {
    let client = connect(config)?;
    let signer = load_signer()?;
    let principal = resolve_delegator(config, delegator)?;
    let hotkey = parse_address(&args.hotkey)?;

    let ops = StakingOps::new(&client, &signer, principal, config.submission.clone());
    let confirm = confirm_from_terminal(assume_yes);
    let outcome = ops
        .add_stake(
            &hotkey,
            args.netuid,
            Balance::from_tao(args.amount),
            args.tolerance,
            &confirm,
        )
        .await?;

    report_outcome(&outcome)
}

pub async fn remove_stake(
    config: &AppConfig,
    delegator: &Option<String>,
    assume_yes: bool,
    args: RemoveStakeArgs,
) -> Result<()> {
    let client = connect(config)?;
    let signer = load_signer()?;
    let principal = resolve_delegator(config, delegator)?;
    let hotkey = parse_address(&args.hotkey)?;

    let ops = StakingOps::new(&client, &signer, principal, config.submission.clone());
    let confirm = confirm_from_terminal(assume_yes);
    let outcome = ops
        .remove_stake(
            &hotkey,
            args.netuid,
            args.amount.map(Balance::from_tao),
            args.tolerance,
            args.all,
            &confirm,
        )
        .await?;

    report_outcome(&outcome)
}

pub async fn swap_stake(
    config: &AppConfig,
    delegator: &Option<String>,
    assume_yes: bool,
    args: SwapStakeArgs,
) -> Result<()> {
    let client = connect(config)?;
    let signer = load_signer()?;
    let principal = resolve_delegator(config, delegator)?;
    let hotkey = parse_address(&args.hotkey)?;

    let ops = StakingOps::new(&client, &signer, principal, config.submission.clone());
    let confirm = confirm_from_terminal(assume_yes);
    let outcome = ops
        .swap_stake(
            &hotkey,
            args.origin_netuid,
            args.dest_netuid,
            args.amount.map(Balance::from_tao),
            args.all,
            &confirm,
        )
        .await?;

    report_outcome(&outcome)
}
