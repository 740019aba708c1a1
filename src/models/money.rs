//! Rounding helpers shared by every money computation.

use rust_decimal::{Decimal, RoundingStrategy};

/// Rounds to two decimal places, halves away from zero.
///
/// # Examples
///
/// ```
/// use center_payroll::models::round2;
/// use rust_decimal::Decimal;
///
/// assert_eq!(round2(Decimal::new(10005, 3)), Decimal::new(1001, 2)); // 10.005 -> 10.01
/// ```
pub fn round2(value: Decimal) -> Decimal {
    value.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero)
}

/// Rounds to a whole amount, halves away from zero.
pub fn round_whole(value: Decimal) -> Decimal {
    value.round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero)
}

/// Clamps a displayed balance at zero.
pub fn non_negative(value: Decimal) -> Decimal {
    value.max(Decimal::ZERO)
}
