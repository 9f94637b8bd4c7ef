//! Staking State Types
//!
//! Data structures for subnet pools, quotes, tolerance decisions, and
//! operation outcomes.

use std::time::{Duration, Instant};

use serde::Serialize;
use thiserror::Error;

use bastion_core::{Balance, Netuid, RpcError, TxHash};
use bastion_core::constants::PPB;
use num_bigint::BigInt;

/// Direction of a staking operation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StakeDirection {
    /// Base currency into a subnet position
    Stake,
    /// Subnet position back into base currency
    Unstake,
}

/// Snapshot of a subnet's pool state.
///
/// Fetched fresh for every operation; `fetched_at` bounds how long the
/// snapshot may be trusted before submission.
#[derive(Debug, Clone)]
pub struct SubnetPool {
    pub netuid: Netuid,
    /// Base-currency reserve (rao)
    pub tao_in: Balance,
    /// Subnet-currency reserve (alpha base units)
    pub alpha_in: Balance,
    /// Dynamic pools price via the AMM curve; static pools peg 1:1
    pub is_dynamic: bool,
    pub fetched_at: Instant,
}

impl SubnetPool {
    pub fn new(netuid: Netuid, tao_in: Balance, alpha_in: Balance, is_dynamic: bool) -> Self {
        Self {
            netuid,
            tao_in,
            alpha_in,
            is_dynamic,
            fetched_at: Instant::now(),
        }
    }

    /// Spot price in rao fixed point (1.0 = 1e9).
    ///
    /// Static pools price at exactly 1:1. Dynamic pools evaluate the
    /// tao_in / alpha_in rational in big-integer arithmetic.
    pub fn price_rao(&self) -> u64 {
        if !self.is_dynamic {
            return PPB;
        }
        if self.alpha_in.is_zero() {
            return 0;
        }
        let price = BigInt::from(self.tao_in.rao()) * BigInt::from(PPB)
            / BigInt::from(self.alpha_in.rao());
        price.try_into().unwrap_or(u64::MAX)
    }

    pub fn age(&self) -> Duration {
        self.fetched_at.elapsed()
    }

    /// Reject the snapshot if it is older than `max_age`.
    pub fn ensure_fresh(&self, max_age: Duration) -> Result<(), StakeError> {
        let age = self.age();
        if age > max_age {
            return Err(StakeError::QuoteStale {
                age_secs: age.as_secs(),
                max_secs: max_age.as_secs(),
            });
        }
        Ok(())
    }
}

/// Result of a slippage computation
#[derive(Debug, Clone, Serialize)]
pub struct SlippageQuote {
    /// Amount actually received after curve effects and fees
    pub received: Balance,
    /// Amount a spot-price conversion of the full input would yield
    pub ideal: Balance,
    /// (ideal - received) / ideal; fee / amount on static pools
    pub slippage_ratio: f64,
    /// Spot exchange rate in the operation's direction (1.0 on static pools)
    pub rate: f64,
}

/// Outcome of reconciling a requested tolerance against measured slippage
#[derive(Debug, Clone, Copy, Serialize)]
pub struct ToleranceDecision {
    pub effective: f64,
    pub requested: f64,
    /// True when the requested tolerance would have guaranteed rejection
    pub was_overridden: bool,
    /// True when the requested tolerance is unusually loose (advisory only)
    pub unusually_loose: bool,
}

/// Post-submission balance check result
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum VerificationStatus {
    /// Balance moved after a success receipt
    Verified,
    /// Success receipt but no observable balance change
    Unchanged,
}

/// Structured result of one staking operation
#[derive(Debug, Clone, Serialize)]
pub struct StakeOutcome {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub requested_tolerance: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub effective_tolerance: Option<f64>,
    pub tolerance_overridden: bool,
    /// Expected received (stake) or unstaked (unstake) amount from the quote
    #[serde(skip_serializing_if = "Option::is_none")]
    pub expected_amount: Option<Balance>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub verification: Option<VerificationStatus>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub extrinsic_hash: Option<TxHash>,
    /// Node-reported rejection or verification warning, verbatim
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// Staking protocol errors
#[derive(Debug, Error)]
pub enum StakeError {
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Invalid tolerance {0}: unstake limit price would be negative")]
    InvalidTolerance(f64),

    #[error("Insufficient funds: need {required}, have {available}")]
    InsufficientFunds {
        required: Balance,
        available: Balance,
    },

    #[error("Quote is stale: snapshot is {age_secs}s old, max {max_secs}s")]
    QuoteStale { age_secs: u64, max_secs: u64 },

    #[error("Submission rejected: {message}")]
    SubmissionRejected { message: String },

    #[error("Inclusion reported but balance unchanged")]
    VerificationMismatch,

    #[error("No inclusion confirmation within {secs}s")]
    Timeout { secs: u64 },

    #[error("Operation cancelled")]
    Cancelled,

    #[error("Chain error: {0}")]
    Chain(#[from] RpcError),
}
