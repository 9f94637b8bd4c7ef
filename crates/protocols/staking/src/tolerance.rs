//! Tolerance Reconciliation
//!
//! A requested tolerance tighter than the slippage the trade will actually
//! incur guarantees on-chain rejection: the limit price can never be
//! reached. One wildly looser than measured slippage leaves the principal
//! exposed if the market moves further before inclusion. Reconciliation
//! keeps the limit price both protective and achievable.

use crate::state::{StakeDirection, ToleranceDecision};

/// Inflation factor applied when a stake tolerance is overridden
pub const STAKE_OVERRIDE_FACTOR: f64 = 1.5;

/// Inflation factor applied when an unstake tolerance is overridden
pub const UNSTAKE_OVERRIDE_FACTOR: f64 = 3.0;

/// Requested tolerance above `measured * LOOSE_TOLERANCE_FACTOR` draws an advisory
pub const LOOSE_TOLERANCE_FACTOR: f64 = 5.0;

/// Reconcile a caller-supplied tolerance against measured slippage.
///
/// If the request is below measured slippage the trade would be rejected,
/// so the effective tolerance becomes `measured * K` (K depends on
/// direction) and the override is flagged. Otherwise the request passes
/// through unchanged. A request more than five times the measured slippage
/// is flagged as unusually loose; that is an advisory, never an error.
pub fn reconcile(
    requested: f64,
    measured_slippage: f64,
    direction: StakeDirection,
) -> ToleranceDecision {
    let factor = match direction {
        StakeDirection::Stake => STAKE_OVERRIDE_FACTOR,
        StakeDirection::Unstake => UNSTAKE_OVERRIDE_FACTOR,
    };

    let mut decision = ToleranceDecision {
        effective: requested,
        requested,
        was_overridden: false,
        unusually_loose: false,
    };

    if requested < measured_slippage {
        decision.effective = measured_slippage * factor;
        decision.was_overridden = true;
        tracing::warn!(
            requested,
            measured_slippage,
            effective = decision.effective,
            "requested tolerance below measured slippage, widening"
        );
    } else if measured_slippage > 0.0 && requested > measured_slippage * LOOSE_TOLERANCE_FACTOR {
        decision.unusually_loose = true;
        tracing::warn!(
            requested,
            measured_slippage,
            "requested tolerance is unusually loose relative to measured slippage"
        );
    }

    decision
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sufficient_tolerance_passes_through() {
        let d = reconcile(0.005, 0.005, StakeDirection::Stake);
        assert_eq!(d.effective, 0.005);
        assert!(!d.was_overridden);
        assert!(!d.unusually_loose);
    }

    #[test]
    fn test_tight_stake_tolerance_widened_by_1_5x() {
        let d = reconcile(0.001, 0.01, StakeDirection::Stake);
        assert!((d.effective - 0.015).abs() < 1e-12);
        assert!(d.was_overridden);
        assert_eq!(d.requested, 0.001);
    }

    #[test]
    fn test_tight_unstake_tolerance_widened_by_3x() {
        let d = reconcile(0.001, 0.01, StakeDirection::Unstake);
        assert!((d.effective - 0.03).abs() < 1e-12);
        assert!(d.was_overridden);
    }

    #[test]
    fn test_effective_never_below_measured() {
        for &(req, meas) in &[(0.0001, 0.02), (0.005, 0.0051), (0.0, 0.5)] {
            for dir in [StakeDirection::Stake, StakeDirection::Unstake] {
                let d = reconcile(req, meas, dir);
                assert!(d.effective >= meas, "req={} meas={}", req, meas);
            }
        }
    }

    #[test]
    fn test_loose_tolerance_flags_advisory() {
        let d = reconcile(0.2, 0.01, StakeDirection::Stake);
        assert_eq!(d.effective, 0.2);
        assert!(!d.was_overridden);
        assert!(d.unusually_loose);
    }

    #[test]
    fn test_loose_advisory_needs_positive_measured_slippage() {
        // Zero measured slippage must not trip the loose advisory
        let d = reconcile(0.5, 0.0, StakeDirection::Unstake);
        assert!(!d.unusually_loose);
        assert!(!d.was_overridden);
    }

    #[test]
    fn test_exact_boundary_is_not_overridden() {
        let d = reconcile(0.01, 0.01, StakeDirection::Unstake);
        assert_eq!(d.effective, 0.01);
        assert!(!d.was_overridden);
    }
}
