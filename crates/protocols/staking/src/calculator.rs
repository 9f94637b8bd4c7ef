//! Slippage Calculator
//!
//! Conversion math between base currency (tao) and subnet currency (alpha)
//! using the constant product curve, and the slippage quote derived from it.
//! Pure functions over a pool snapshot; nothing here touches the network.

use num_bigint::BigInt;
use num_traits::ToPrimitive;

use bastion_core::Balance;

use crate::state::{SlippageQuote, StakeDirection, StakeError, SubnetPool};

/// Convert at the spot price, ignoring curve movement
///
/// Formula: output = input * reserves_out / reserves_in
pub fn convert_at_spot(reserves_in: u64, reserves_out: u64, input_amount: u64) -> u64 {
    if reserves_in == 0 || input_amount == 0 {
        return 0;
    }
    let result = BigInt::from(input_amount) * BigInt::from(reserves_out) / BigInt::from(reserves_in);
    result.to_u64().unwrap_or(u64::MAX)
}

/// Convert along the constant product curve (x * y = k)
///
/// Formula: output = reserves_out * input / (reserves_in + input)
pub fn convert_with_slippage(reserves_in: u64, reserves_out: u64, input_amount: u64) -> u64 {
    if reserves_in == 0 || reserves_out == 0 || input_amount == 0 {
        return 0;
    }
    let numerator = BigInt::from(reserves_out) * BigInt::from(input_amount);
    let denominator = BigInt::from(reserves_in) + BigInt::from(input_amount);
    let result = numerator / denominator;
    result.to_u64().unwrap_or(u64::MAX)
}

/// Compute the expected execution outcome for a stake or unstake.
///
/// Stake: the fee comes off the input before it enters the pool, so the
/// received amount is `curve(amount - fee)` while the ideal is
/// `spot(amount)`. Unstake: the curve pays out first and the fee comes off
/// the proceeds, so received is `curve(amount) - fee` against
/// `spot(amount)`. Static pools convert 1:1 and their slippage is exactly
/// `fee / amount`.
///
/// Fails with `InsufficientFunds` before any call is built when the fee
/// exceeds what the operation can pay it from.
pub fn compute_slippage(
    pool: &SubnetPool,
    amount: Balance,
    fee: Balance,
    direction: StakeDirection,
) -> Result<SlippageQuote, StakeError> {
    if amount.is_zero() {
        return Err(StakeError::InvalidInput(
            "amount must be positive".to_string(),
        ));
    }

    let (tao_in, alpha_in) = (pool.tao_in.rao(), pool.alpha_in.rao());

    match direction {
        StakeDirection::Stake => {
            let after_fee = amount
                .checked_sub(fee)
                .ok_or(StakeError::InsufficientFunds {
                    required: fee,
                    available: amount,
                })?;

            if pool.is_dynamic {
                let received =
                    Balance::from_rao(convert_with_slippage(tao_in, alpha_in, after_fee.rao()));
                let ideal = Balance::from_rao(convert_at_spot(tao_in, alpha_in, amount.rao()));
                Ok(SlippageQuote {
                    received,
                    ideal,
                    slippage_ratio: shortfall_ratio(ideal, received),
                    rate: spot_rate(tao_in, alpha_in),
                })
            } else {
                Ok(SlippageQuote {
                    received: after_fee,
                    ideal: amount,
                    slippage_ratio: fee_ratio(fee, amount),
                    rate: 1.0,
                })
            }
        }
        StakeDirection::Unstake => {
            let gross = if pool.is_dynamic {
                Balance::from_rao(convert_with_slippage(alpha_in, tao_in, amount.rao()))
            } else {
                amount
            };
            let received = gross.checked_sub(fee).ok_or(StakeError::InsufficientFunds {
                required: fee,
                available: gross,
            })?;

            if pool.is_dynamic {
                let ideal = Balance::from_rao(convert_at_spot(alpha_in, tao_in, amount.rao()));
                Ok(SlippageQuote {
                    received,
                    ideal,
                    slippage_ratio: shortfall_ratio(ideal, received),
                    rate: spot_rate(alpha_in, tao_in),
                })
            } else {
                Ok(SlippageQuote {
                    received,
                    ideal: amount,
                    slippage_ratio: fee_ratio(fee, amount),
                    rate: 1.0,
                })
            }
        }
    }
}

/// (ideal - received) / ideal, zero when ideal is zero
fn shortfall_ratio(ideal: Balance, received: Balance) -> f64 {
    if ideal.is_zero() {
        return 0.0;
    }
    let shortfall = ideal.saturating_sub(received);
    shortfall.rao() as f64 / ideal.rao() as f64
}

/// fee / amount, zero when amount is zero
fn fee_ratio(fee: Balance, amount: Balance) -> f64 {
    if amount.is_zero() {
        return 0.0;
    }
    fee.rao() as f64 / amount.rao() as f64
}

fn spot_rate(reserves_in: u64, reserves_out: u64) -> f64 {
    if reserves_in == 0 {
        return 0.0;
    }
    reserves_out as f64 / reserves_in as f64
}

#[cfg(test)]
mod tests {
    use super::*;

    fn dynamic_pool() -> SubnetPool {
        // 100 tao : 200 alpha, spot price 0.5 tao per alpha
        SubnetPool::new(
            19,
            Balance::from_rao(100_000_000_000),
            Balance::from_rao(200_000_000_000),
            true,
        )
    }

    fn static_pool() -> SubnetPool {
        SubnetPool::new(0, Balance::ZERO, Balance::ZERO, false)
    }

    #[test]
    fn test_convert_at_spot() {
        assert_eq!(convert_at_spot(100, 200, 10), 20);
        assert_eq!(convert_at_spot(0, 200, 10), 0);
        assert_eq!(convert_at_spot(100, 200, 0), 0);
    }

    #[test]
    fn test_convert_with_slippage_below_spot() {
        // Curve output must be strictly below spot for any nonzero input
        let spot = convert_at_spot(100_000, 200_000, 10_000);
        let curved = convert_with_slippage(100_000, 200_000, 10_000);
        assert!(curved < spot);
        // 200_000 * 10_000 / 110_000 = 18_181
        assert_eq!(curved, 18_181);
    }

    #[test]
    fn test_convert_with_slippage_large_values_no_overflow() {
        let out = convert_with_slippage(u64::MAX / 2, u64::MAX / 2, u64::MAX / 4);
        assert!(out > 0);
    }

    #[test]
    fn test_static_stake_slippage_is_fee_ratio() {
        // amount 100 tao, fee 0.5 tao -> ratio exactly 0.005
        let quote = compute_slippage(
            &static_pool(),
            Balance::from_rao(100_000_000_000),
            Balance::from_rao(500_000_000),
            StakeDirection::Stake,
        )
        .unwrap();
        assert_eq!(quote.slippage_ratio, 0.005);
        assert_eq!(quote.received, Balance::from_rao(99_500_000_000));
        assert_eq!(quote.ideal, Balance::from_rao(100_000_000_000));
        assert_eq!(quote.rate, 1.0);
    }

    #[test]
    fn test_static_unstake_slippage_is_fee_ratio() {
        let quote = compute_slippage(
            &static_pool(),
            Balance::from_rao(10_000_000_000),
            Balance::from_rao(100_000_000),
            StakeDirection::Unstake,
        )
        .unwrap();
        assert_eq!(quote.slippage_ratio, 0.01);
        assert_eq!(quote.received, Balance::from_rao(9_900_000_000));
    }

    #[test]
    fn test_dynamic_stake_quote_bounds() {
        let quote = compute_slippage(
            &dynamic_pool(),
            Balance::from_rao(10_000_000_000),
            Balance::from_rao(50_000_000),
            StakeDirection::Stake,
        )
        .unwrap();
        assert!(quote.received <= quote.ideal);
        assert!(quote.slippage_ratio >= 0.0);
        assert!(quote.slippage_ratio <= 1.0);
        // 2 alpha per tao at spot
        assert_eq!(quote.rate, 2.0);
    }

    #[test]
    fn test_dynamic_unstake_quote_bounds() {
        let quote = compute_slippage(
            &dynamic_pool(),
            Balance::from_rao(10_000_000_000),
            Balance::from_rao(50_000_000),
            StakeDirection::Unstake,
        )
        .unwrap();
        assert!(quote.received <= quote.ideal);
        assert!(quote.slippage_ratio >= 0.0 && quote.slippage_ratio <= 1.0);
        assert_eq!(quote.rate, 0.5);
    }

    #[test]
    fn test_dynamic_stake_received_matches_curve() {
        let pool = dynamic_pool();
        let amount = Balance::from_rao(10_000_000_000);
        let quote =
            compute_slippage(&pool, amount, Balance::ZERO, StakeDirection::Stake).unwrap();
        // 200e9 * 10e9 / (100e9 + 10e9)
        assert_eq!(quote.received.rao(), 18_181_818_181);
        assert_eq!(quote.ideal.rao(), 20_000_000_000);
        let expected = (20_000_000_000u64 - 18_181_818_181) as f64 / 20_000_000_000u64 as f64;
        assert!((quote.slippage_ratio - expected).abs() < 1e-15);
    }

    #[test]
    fn test_zero_amount_is_invalid_input() {
        let err = compute_slippage(
            &dynamic_pool(),
            Balance::ZERO,
            Balance::ZERO,
            StakeDirection::Stake,
        )
        .unwrap_err();
        assert!(matches!(err, StakeError::InvalidInput(_)));
    }

    #[test]
    fn test_stake_fee_exceeding_amount_is_insufficient_funds() {
        let err = compute_slippage(
            &static_pool(),
            Balance::from_rao(100),
            Balance::from_rao(200),
            StakeDirection::Stake,
        )
        .unwrap_err();
        assert!(matches!(err, StakeError::InsufficientFunds { .. }));
    }

    #[test]
    fn test_unstake_fee_exceeding_proceeds_is_insufficient_funds() {
        // Tiny unstake whose curve proceeds cannot cover the fee
        let err = compute_slippage(
            &dynamic_pool(),
            Balance::from_rao(100),
            Balance::from_rao(1_000_000_000),
            StakeDirection::Unstake,
        )
        .unwrap_err();
        assert!(matches!(err, StakeError::InsufficientFunds { .. }));
    }

    #[test]
    fn test_deterministic_for_same_snapshot() {
        let pool = dynamic_pool();
        let amount = Balance::from_rao(3_333_333_333);
        let fee = Balance::from_rao(1_234_567);
        let a = compute_slippage(&pool, amount, fee, StakeDirection::Stake).unwrap();
        let b = compute_slippage(&pool, amount, fee, StakeDirection::Stake).unwrap();
        assert_eq!(a.received, b.received);
        assert_eq!(a.slippage_ratio, b.slippage_ratio);
    }
}
