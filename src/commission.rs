//! Platform commission arithmetic.
//!
//! Every commission in the system goes through these helpers; the rate is
//! expressed in basis points so integer money amounts stay exact.

/// Flat platform fee: 10%.
pub const PLATFORM_RATE_BPS: i32 = 1000;

/// Commission on a gross amount at the given rate, truncated toward zero.
pub fn commission_for(gross: i64, rate_bps: i32) -> i64 {
    gross.saturating_mul(rate_bps as i64) / 10_000
}

pub fn platform_commission(gross: i64) -> i64 {
    commission_for(gross, PLATFORM_RATE_BPS)
}

/// (commission, net) split of a gross amount at the platform rate.
pub fn split(gross: i64) -> (i64, i64) {
    let commission = platform_commission(gross);
    (commission, gross - commission)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn platform_rate_is_ten_percent() {
        assert_eq!(platform_commission(250), 25);
        assert_eq!(platform_commission(0), 0);
        assert_eq!(platform_commission(1_000_000), 100_000);
    }

    #[test]
    fn split_sums_back_to_gross() {
        for gross in [0, 1, 99, 250, 12_345, 1_000_000] {
            let (commission, net) = split(gross);
            assert_eq!(commission + net, gross);
            assert_eq!(commission, gross / 10);
        }
    }

    #[test]
    fn custom_rates_use_basis_points() {
        assert_eq!(commission_for(10_000, 250), 250); // 2.5%
        assert_eq!(commission_for(10_000, 0), 0);
        assert_eq!(commission_for(999, 1000), 99); // truncation, not rounding
    }
}
