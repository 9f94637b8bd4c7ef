//! Balance Verification
//!
//! After the node reports inclusion, the relevant position is re-read and
//! compared to the pre-operation snapshot. A success receipt with no
//! observable change is a discrepancy the caller must see; it is not an
//! outright failure and is never swallowed.

use bastion_core::Balance;

use crate::state::VerificationStatus;

/// Compare pre/post balances. `Verified` requires strict inequality.
pub fn verify_balance_change(before: Balance, after: Balance) -> VerificationStatus {
    if after != before {
        VerificationStatus::Verified
    } else {
        tracing::warn!(
            balance = %before,
            "inclusion reported but balance unchanged"
        );
        VerificationStatus::Unchanged
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_increase_is_verified() {
        let status = verify_balance_change(Balance::from_rao(100), Balance::from_rao(150));
        assert_eq!(status, VerificationStatus::Verified);
    }

    #[test]
    fn test_decrease_is_verified() {
        let status = verify_balance_change(Balance::from_rao(100), Balance::from_rao(40));
        assert_eq!(status, VerificationStatus::Verified);
    }

    #[test]
    fn test_equal_balances_are_unchanged() {
        let status = verify_balance_change(Balance::from_rao(100), Balance::from_rao(100));
        assert_eq!(status, VerificationStatus::Unchanged);
    }
}
