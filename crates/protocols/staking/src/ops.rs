//! Staking Operations
//!
//! The public operation API: add_stake, remove_stake, swap_stake. Each
//! operation is one linear pass over fresh snapshots:
//! quote -> tolerance reconciliation -> call build -> confirmation ->
//! proxy submission -> balance verification. Nothing is retried; a new
//! attempt is a new operation with new snapshots.

use std::time::Duration;

use bastion_core::{Address, Balance, Netuid, SubmissionConfig};
use subtensor_client::{ExtrinsicSigner, SubmissionReceipt};

use crate::calculator::compute_slippage;
use crate::chain::StakingChain;
use crate::fetch::fetch_pool;
use crate::state::{
    SlippageQuote, StakeDirection, StakeError, StakeOutcome, ToleranceDecision,
    VerificationStatus,
};
use crate::submit::submit_as_proxy;
use crate::tolerance::reconcile;
use crate::tx_builder::{build_limit_call, build_swap_stake};
use crate::verify::verify_balance_change;

/// Caller-supplied confirmation capability. The core never reads the
/// terminal; the glue layer decides how to ask.
pub type Confirm<'a> = &'a dyn Fn(&str) -> bool;

/// Staking operations executed by a proxy signer on behalf of a principal
pub struct StakingOps<'a, C: StakingChain> {
    chain: &'a C,
    signer: &'a ExtrinsicSigner,
    principal: Address,
    submission: SubmissionConfig,
}

impl<'a, C: StakingChain> StakingOps<'a, C> {
    pub fn new(
        chain: &'a C,
        signer: &'a ExtrinsicSigner,
        principal: Address,
        submission: SubmissionConfig,
    ) -> Self {
        Self {
            chain,
            signer,
            principal,
            submission,
        }
    }

    /// Stake `amount` of base currency into `netuid` under `hotkey`.
    pub async fn add_stake(
        &self,
        hotkey: &Address,
        netuid: Netuid,
        amount: Balance,
        tolerance: f64,
        confirm: Confirm<'_>,
    ) -> Result<StakeOutcome, StakeError> {
        validate_amount(amount)?;
        validate_tolerance(tolerance)?;

        let free = self.chain.get_balance(&self.principal).await?;
        if free < amount {
            return Err(StakeError::InsufficientFunds {
                required: amount,
                available: free,
            });
        }

        let fee = self
            .chain
            .get_stake_fee(amount, netuid, &self.principal, hotkey)
            .await?;
        let pool = fetch_pool(self.chain, netuid).await?;

        let quote = compute_slippage(&pool, amount, fee, StakeDirection::Stake)?;
        let decision = reconcile(tolerance, quote.slippage_ratio, StakeDirection::Stake);

        tracing::info!(
            netuid,
            amount = %amount,
            free_balance = %free,
            fee = %fee,
            slippage = quote.slippage_ratio,
            effective_tolerance = decision.effective,
            overridden = decision.was_overridden,
            "stake quote"
        );

        let call = build_limit_call(
            StakeDirection::Stake,
            netuid,
            hotkey,
            amount,
            decision.effective,
            pool.price_rao(),
        )?;

        if !confirm(&format!(
            "Stake {} to {} on subnet {} (expected {} alpha, slippage {:.4}%, tolerance {:.4}{})?",
            amount,
            hotkey,
            netuid,
            quote.received,
            quote.slippage_ratio * 100.0,
            decision.effective,
            if decision.was_overridden {
                format!(", widened from {:.4}", decision.requested)
            } else {
                String::new()
            }
        )) {
            return Err(StakeError::Cancelled);
        }

        pool.ensure_fresh(self.max_quote_age())?;

        let before = self
            .chain
            .get_stake(&self.principal, hotkey, netuid)
            .await?;
        let receipt = submit_as_proxy(
            self.chain,
            self.signer,
            &call,
            &self.principal,
            self.submission_timeout(),
        )
        .await?;

        self.conclude(receipt, &decision, &quote, hotkey, netuid, before)
            .await
    }

    /// Unstake `amount` (or the whole position with `all`) from `netuid`.
    pub async fn remove_stake(
        &self,
        hotkey: &Address,
        netuid: Netuid,
        amount: Option<Balance>,
        tolerance: f64,
        all: bool,
        confirm: Confirm<'_>,
    ) -> Result<StakeOutcome, StakeError> {
        validate_tolerance(tolerance)?;
        if !all {
            validate_amount(amount.ok_or_else(|| {
                StakeError::InvalidInput("amount is required unless unstaking all".to_string())
            })?)?;
        }

        let position = self
            .chain
            .get_stake(&self.principal, hotkey, netuid)
            .await?;
        let amount = if all {
            position
        } else {
            amount.expect("validated above")
        };
        validate_amount(amount)?;
        if amount > position {
            return Err(StakeError::InsufficientFunds {
                required: amount,
                available: position,
            });
        }

        let fee = self
            .chain
            .get_unstake_fee(amount, netuid, &self.principal, hotkey)
            .await?;
        let pool = fetch_pool(self.chain, netuid).await?;

        let quote = compute_slippage(&pool, amount, fee, StakeDirection::Unstake)?;
        let decision = reconcile(tolerance, quote.slippage_ratio, StakeDirection::Unstake);

        tracing::info!(
            netuid,
            amount = %amount,
            position = %position,
            fee = %fee,
            slippage = quote.slippage_ratio,
            effective_tolerance = decision.effective,
            overridden = decision.was_overridden,
            "unstake quote"
        );

        let call = build_limit_call(
            StakeDirection::Unstake,
            netuid,
            hotkey,
            amount,
            decision.effective,
            pool.price_rao(),
        )?;

        if !confirm(&format!(
            "Unstake {} alpha from {} on subnet {} (expected {}, slippage {:.4}%, tolerance {:.4}{})?",
            amount.rao(),
            hotkey,
            netuid,
            quote.received,
            quote.slippage_ratio * 100.0,
            decision.effective,
            if decision.was_overridden {
                format!(", widened from {:.4}", decision.requested)
            } else {
                String::new()
            }
        )) {
            return Err(StakeError::Cancelled);
        }

        pool.ensure_fresh(self.max_quote_age())?;

        let receipt = submit_as_proxy(
            self.chain,
            self.signer,
            &call,
            &self.principal,
            self.submission_timeout(),
        )
        .await?;

        self.conclude(receipt, &decision, &quote, hotkey, netuid, position)
            .await
    }

    /// Move an alpha position from one subnet to another. No limit price
    /// applies; only balance sufficiency is checked.
    pub async fn swap_stake(
        &self,
        hotkey: &Address,
        origin_netuid: Netuid,
        dest_netuid: Netuid,
        amount: Option<Balance>,
        all: bool,
        confirm: Confirm<'_>,
    ) -> Result<StakeOutcome, StakeError> {
        if origin_netuid == dest_netuid {
            return Err(StakeError::InvalidInput(
                "origin and destination subnets must differ".to_string(),
            ));
        }
        if !all {
            validate_amount(amount.ok_or_else(|| {
                StakeError::InvalidInput("amount is required unless swapping all".to_string())
            })?)?;
        }

        let position = self
            .chain
            .get_stake(&self.principal, hotkey, origin_netuid)
            .await?;
        let amount = if all {
            position
        } else {
            amount.expect("validated above")
        };
        validate_amount(amount)?;
        if amount > position {
            return Err(StakeError::InsufficientFunds {
                required: amount,
                available: position,
            });
        }

        let call = build_swap_stake(hotkey, origin_netuid, dest_netuid, amount);

        if !confirm(&format!(
            "Swap {} alpha from subnet {} to subnet {}?",
            amount.rao(),
            origin_netuid,
            dest_netuid
        )) {
            return Err(StakeError::Cancelled);
        }

        let receipt = submit_as_proxy(
            self.chain,
            self.signer,
            &call,
            &self.principal,
            self.submission_timeout(),
        )
        .await?;

        if !receipt.is_success {
            return Ok(rejected_outcome(None, Some(amount), receipt));
        }

        let after = self
            .chain
            .get_stake(&self.principal, hotkey, origin_netuid)
            .await?;
        let verification = verify_balance_change(position, after);

        Ok(included_outcome(None, Some(amount), verification, receipt))
    }

    /// Shared post-submission path for the limit operations.
    async fn conclude(
        &self,
        receipt: SubmissionReceipt,
        decision: &ToleranceDecision,
        quote: &SlippageQuote,
        hotkey: &Address,
        netuid: Netuid,
        before: Balance,
    ) -> Result<StakeOutcome, StakeError> {
        if !receipt.is_success {
            return Ok(rejected_outcome(
                Some(decision),
                Some(quote.received),
                receipt,
            ));
        }

        let after = self
            .chain
            .get_stake(&self.principal, hotkey, netuid)
            .await?;
        let verification = verify_balance_change(before, after);

        Ok(included_outcome(
            Some(decision),
            Some(quote.received),
            verification,
            receipt,
        ))
    }

    fn submission_timeout(&self) -> Duration {
        Duration::from_secs(self.submission.timeout_secs)
    }

    fn max_quote_age(&self) -> Duration {
        Duration::from_secs(self.submission.max_quote_age_secs)
    }
}

fn validate_amount(amount: Balance) -> Result<(), StakeError> {
    if amount.is_zero() {
        return Err(StakeError::InvalidInput(
            "amount must be positive".to_string(),
        ));
    }
    Ok(())
}

fn validate_tolerance(tolerance: f64) -> Result<(), StakeError> {
    if !tolerance.is_finite() || tolerance <= 0.0 || tolerance >= 1.0 {
        return Err(StakeError::InvalidInput(format!(
            "tolerance must be within (0, 1), got {}",
            tolerance
        )));
    }
    Ok(())
}

fn rejected_outcome(
    decision: Option<&ToleranceDecision>,
    expected: Option<Balance>,
    receipt: SubmissionReceipt,
) -> StakeOutcome {
    StakeOutcome {
        success: false,
        requested_tolerance: decision.map(|d| d.requested),
        effective_tolerance: decision.map(|d| d.effective),
        tolerance_overridden: decision.map(|d| d.was_overridden).unwrap_or(false),
        expected_amount: expected,
        verification: None,
        extrinsic_hash: Some(receipt.extrinsic_hash),
        error: Some(
            receipt
                .error_message
                .unwrap_or_else(|| "node reported failure without message".to_string()),
        ),
    }
}

fn included_outcome(
    decision: Option<&ToleranceDecision>,
    expected: Option<Balance>,
    verification: VerificationStatus,
    receipt: SubmissionReceipt,
) -> StakeOutcome {
    let mismatch = verification == VerificationStatus::Unchanged;
    StakeOutcome {
        success: !mismatch,
        requested_tolerance: decision.map(|d| d.requested),
        effective_tolerance: decision.map(|d| d.effective),
        tolerance_overridden: decision.map(|d| d.was_overridden).unwrap_or(false),
        expected_amount: expected,
        verification: Some(verification),
        extrinsic_hash: Some(receipt.extrinsic_hash),
        error: mismatch.then(|| StakeError::VerificationMismatch.to_string()),
    }
}
