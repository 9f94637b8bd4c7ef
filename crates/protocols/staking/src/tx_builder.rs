//! Limit Call Builder
//!
//! Derives the protective limit price from a base price and an effective
//! tolerance, and produces the matching protocol call. All calls are built
//! with `allow_partial = false`: execution is all-or-nothing.

use num_bigint::BigInt;

use bastion_core::constants::PPB;
use bastion_core::{Address, Balance, Netuid};
use subtensor_client::Call;

use crate::state::{StakeDirection, StakeError};

/// Pallet carrying the staking calls
pub const STAKING_MODULE: &str = "SubtensorModule";

/// Partial fills are never accepted
const ALLOW_PARTIAL: bool = false;

/// Compute the limit price in rao fixed point.
///
/// Stake pays more when the price rises, so the limit sits above the base
/// price: `base * (1 + tolerance)`. Unstake receives less when the price
/// falls, so the limit sits below: `base * (1 - tolerance)`. The tolerance
/// is applied in parts-per-billion with round-half-up division. An unstake
/// tolerance at or above 1 would drive the factor negative and is an error.
pub fn limit_price(
    base_price: u64,
    tolerance: f64,
    direction: StakeDirection,
) -> Result<u64, StakeError> {
    if !tolerance.is_finite() || tolerance < 0.0 {
        return Err(StakeError::InvalidInput(format!(
            "tolerance must be a non-negative number, got {}",
            tolerance
        )));
    }

    let tolerance_ppb = (tolerance * PPB as f64).round() as u128;

    let factor_ppb = match direction {
        StakeDirection::Stake => PPB as u128 + tolerance_ppb,
        StakeDirection::Unstake => (PPB as u128)
            .checked_sub(tolerance_ppb)
            .ok_or(StakeError::InvalidTolerance(tolerance))?,
    };

    let scaled = BigInt::from(base_price) * BigInt::from(factor_ppb) + BigInt::from(PPB / 2);
    let price = scaled / BigInt::from(PPB);
    Ok(price.try_into().unwrap_or(u64::MAX))
}

/// Build the stake-side limit call
pub fn build_add_stake_limit(
    netuid: Netuid,
    hotkey: &Address,
    amount: Balance,
    limit_price: u64,
) -> Call {
    Call::new(STAKING_MODULE, "add_stake_limit")
        .param("hotkey", hotkey.as_str())
        .param("netuid", netuid)
        .param("amount_staked", amount.rao())
        .param("limit_price", limit_price)
        .param("allow_partial", ALLOW_PARTIAL)
}

/// Build the unstake-side limit call
pub fn build_remove_stake_limit(
    netuid: Netuid,
    hotkey: &Address,
    amount: Balance,
    limit_price: u64,
) -> Call {
    Call::new(STAKING_MODULE, "remove_stake_limit")
        .param("hotkey", hotkey.as_str())
        .param("netuid", netuid)
        .param("amount_unstaked", amount.rao())
        .param("limit_price", limit_price)
        .param("allow_partial", ALLOW_PARTIAL)
}

/// Build a pool-to-pool swap call. No limit price applies; the operation
/// layer checks balance sufficiency before building.
pub fn build_swap_stake(
    hotkey: &Address,
    origin_netuid: Netuid,
    dest_netuid: Netuid,
    amount: Balance,
) -> Call {
    Call::new(STAKING_MODULE, "swap_stake")
        .param("hotkey", hotkey.as_str())
        .param("origin_netuid", origin_netuid)
        .param("destination_netuid", dest_netuid)
        .param("alpha_amount", amount.rao())
}

/// Derive the limit price and build the directionally appropriate call.
pub fn build_limit_call(
    direction: StakeDirection,
    netuid: Netuid,
    hotkey: &Address,
    amount: Balance,
    effective_tolerance: f64,
    base_price: u64,
) -> Result<Call, StakeError> {
    let price = limit_price(base_price, effective_tolerance, direction)?;
    let call = match direction {
        StakeDirection::Stake => build_add_stake_limit(netuid, hotkey, amount, price),
        StakeDirection::Unstake => build_remove_stake_limit(netuid, hotkey, amount, price),
    };
    Ok(call)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn hotkey() -> Address {
        Address::new("5CsvRJXuR955WojnGMdok1hbhffZyB4N5ocrv82f3p5A2zVp")
    }

    #[test]
    fn test_limit_price_stake_rounds_exactly() {
        // base 1000, tolerance 0.005 -> 1005 with no float drift
        assert_eq!(
            limit_price(1000, 0.005, StakeDirection::Stake).unwrap(),
            1005
        );
    }

    #[test]
    fn test_limit_price_unstake_subtracts() {
        assert_eq!(
            limit_price(1_000_000_000, 0.01, StakeDirection::Unstake).unwrap(),
            990_000_000
        );
    }

    #[test]
    fn test_limit_price_zero_tolerance_is_identity() {
        assert_eq!(
            limit_price(123_456_789, 0.0, StakeDirection::Stake).unwrap(),
            123_456_789
        );
        assert_eq!(
            limit_price(123_456_789, 0.0, StakeDirection::Unstake).unwrap(),
            123_456_789
        );
    }

    #[test]
    fn test_limit_price_monotonicity() {
        let base = 1_000_000_000;
        let mut last_stake = 0u64;
        let mut last_unstake = u64::MAX;
        for step in 1..=20 {
            let tol = step as f64 * 0.001;
            let stake = limit_price(base, tol, StakeDirection::Stake).unwrap();
            let unstake = limit_price(base, tol, StakeDirection::Unstake).unwrap();
            assert!(stake > last_stake, "stake limit must rise with tolerance");
            assert!(
                unstake < last_unstake,
                "unstake limit must fall with tolerance"
            );
            last_stake = stake;
            last_unstake = unstake;
        }
    }

    #[test]
    fn test_unstake_tolerance_at_or_above_one_is_invalid() {
        assert!(matches!(
            limit_price(1000, 1.0, StakeDirection::Unstake),
            Err(StakeError::InvalidTolerance(_))
        ));
        assert!(matches!(
            limit_price(1000, 1.5, StakeDirection::Unstake),
            Err(StakeError::InvalidTolerance(_))
        ));
        // Stake side has no upper bound
        assert!(limit_price(1000, 1.5, StakeDirection::Stake).is_ok());
    }

    #[test]
    fn test_negative_tolerance_rejected() {
        assert!(matches!(
            limit_price(1000, -0.1, StakeDirection::Stake),
            Err(StakeError::InvalidInput(_))
        ));
    }

    #[test]
    fn test_add_stake_limit_call_shape() {
        let call = build_add_stake_limit(19, &hotkey(), Balance::from_rao(100_000_000_000), 1005);
        assert_eq!(call.module, STAKING_MODULE);
        assert_eq!(call.function, "add_stake_limit");
        assert_eq!(call.params["netuid"], json!(19));
        assert_eq!(call.params["amount_staked"], json!(100_000_000_000u64));
        assert_eq!(call.params["limit_price"], json!(1005));
        assert_eq!(call.params["allow_partial"], json!(false));
    }

    #[test]
    fn test_remove_stake_limit_call_shape() {
        let call =
            build_remove_stake_limit(4, &hotkey(), Balance::from_rao(5_000_000_000), 990_000_000);
        assert_eq!(call.function, "remove_stake_limit");
        assert_eq!(call.params["amount_unstaked"], json!(5_000_000_000u64));
        assert_eq!(call.params["allow_partial"], json!(false));
    }

    #[test]
    fn test_swap_stake_call_has_no_limit_price() {
        let call = build_swap_stake(&hotkey(), 4, 19, Balance::from_rao(1_000_000));
        assert_eq!(call.function, "swap_stake");
        assert_eq!(call.params["origin_netuid"], json!(4));
        assert_eq!(call.params["destination_netuid"], json!(19));
        assert_eq!(call.params["alpha_amount"], json!(1_000_000u64));
        assert!(!call.params.contains_key("limit_price"));
    }

    #[test]
    fn test_build_limit_call_scenario_a() {
        // Static pool scenario: base 1000, tolerance 0.005 reconciled
        // unchanged, limit 1005 on the stake call.
        let call = build_limit_call(
            StakeDirection::Stake,
            1,
            &hotkey(),
            Balance::from_rao(100_000_000_000),
            0.005,
            1000,
        )
        .unwrap();
        assert_eq!(call.params["limit_price"], json!(1005));
    }
}
