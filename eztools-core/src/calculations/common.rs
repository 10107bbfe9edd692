//! Common utility functions for tax calculations.

use rust_decimal::{Decimal, RoundingStrategy};

/// Rounds a decimal amount to a whole đồng using half-up rounding.
///
/// Amounts are only rounded for display; the worksheet itself keeps
/// unrounded values.
///
/// # Examples
///
/// ```
/// use rust_decimal_macros::dec;
/// use eztools_core::calculations::common::round_to_dong;
///
/// assert_eq!(round_to_dong(dec!(123.49)), dec!(123));
/// assert_eq!(round_to_dong(dec!(123.5)), dec!(124));
/// assert_eq!(round_to_dong(dec!(-123.5)), dec!(-124)); // Away from zero
/// ```
pub fn round_to_dong(value: Decimal) -> Decimal {
    value.round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero)
}

/// Returns the maximum of two decimal values.
///
/// # Examples
///
/// ```
/// use rust_decimal_macros::dec;
/// use eztools_core::calculations::common::max;
///
/// assert_eq!(max(dec!(100), dec!(200)), dec!(200));
/// assert_eq!(max(dec!(-100), dec!(0)), dec!(0));
/// ```
pub fn max(
    a: Decimal,
    b: Decimal,
) -> Decimal {
    if a > b { a } else { b }
}
