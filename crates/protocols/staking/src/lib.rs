//! Proxy Staking Protocol Implementation
//!
//! Slippage-bounded stake, unstake, and swap operations executed through a
//! proxy-authorization envelope on behalf of a principal account. Quotes
//! are computed from fresh pool snapshots, caller tolerances are reconciled
//! against measured slippage, and every submission is followed by a balance
//! verification pass.

pub mod calculator;
pub mod chain;
pub mod fetch;
pub mod ops;
pub mod proxy;
pub mod state;
pub mod submit;
pub mod tolerance;
pub mod tx_builder;
pub mod verify;

// Re-exports
pub use calculator::{compute_slippage, convert_at_spot, convert_with_slippage};
pub use chain::StakingChain;
pub use fetch::{fetch_pool, pool_from_info};
pub use ops::{Confirm, StakingOps};
pub use proxy::{build_add_proxy, build_remove_proxy, submit_authority_change, ProxyType};
pub use state::{
    SlippageQuote, StakeDirection, StakeError, StakeOutcome, SubnetPool, ToleranceDecision,
    VerificationStatus,
};
pub use submit::{submit_as_proxy, wrap_as_proxy};
pub use tolerance::{
    reconcile, LOOSE_TOLERANCE_FACTOR, STAKE_OVERRIDE_FACTOR, UNSTAKE_OVERRIDE_FACTOR,
};
pub use tx_builder::{
    build_add_stake_limit, build_limit_call, build_remove_stake_limit, build_swap_stake,
    limit_price,
};
pub use verify::verify_balance_change;
