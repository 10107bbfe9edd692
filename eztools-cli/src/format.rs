//! Display formatting for VND amounts and rates.

use std::sync::OnceLock;

use eztools_core::calculations::common::round_to_dong;
use regex::Regex;
use rust_decimal::{Decimal, RoundingStrategy};

static NON_DIGITS: OnceLock<Regex> = OnceLock::new();

fn non_digits() -> &'static Regex {
    NON_DIGITS.get_or_init(|| Regex::new(r"[^\d]").expect("non-digit regex"))
}

/// Parses a user-entered money amount such as `"40.000.000"` or
/// `"40,000,000 VNĐ"`.
///
/// Every non-digit character is ignored, so separators, currency suffixes
/// and signs all disappear. Input without digits is 0.
pub fn parse_currency(s: &str) -> Decimal {
    let digits = non_digits().replace_all(s, "");
    if digits.is_empty() {
        return Decimal::ZERO;
    }
    digits.parse().unwrap_or_else(|e| {
        tracing::warn!(input = %s, "amount out of range, using 0: {}", e);
        Decimal::ZERO
    })
}

/// Groups the integer digits of `value` in threes with `.`.
fn group_thousands(value: Decimal) -> String {
    let digits = value.abs().trunc().to_string();
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3 + 1);
    if value.is_sign_negative() && !value.is_zero() {
        grouped.push('-');
    }
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push('.');
        }
        grouped.push(ch);
    }
    grouped
}

/// Formats an amount in đồng, e.g. `40.000.000 VNĐ`.
///
/// The amount is rounded to a whole đồng first.
pub fn format_vnd(amount: Decimal) -> String {
    format!("{} VNĐ", group_thousands(round_to_dong(amount)))
}

/// Formats a percentage value with two decimals, e.g. `2.28%`.
pub fn format_percent(percent: Decimal) -> String {
    let rounded = percent.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero);
    format!("{:.2}%", rounded)
}

/// Formats a fractional rate as a whole percentage, e.g. `0.05` as `5%`.
pub fn format_rate(rate: Decimal) -> String {
    let percent = (rate * Decimal::ONE_HUNDRED)
        .round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero)
        .normalize();
    format!("{}%", percent)
}

/// Formats an amount in millions with one decimal, e.g. `910000` as `0.9M`.
pub fn format_millions(amount: Decimal) -> String {
    let millions =
        (amount / Decimal::from(1_000_000)).round_dp_with_strategy(1, RoundingStrategy::MidpointAwayFromZero);
    format!("{:.1}M", millions)
}
