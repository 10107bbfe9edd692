use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::TaxBracket;

/// Errors reported by [`TaxConfig::validate`].
#[derive(Debug, Error, PartialEq, Eq)]
pub enum TaxConfigError {
    #[error("tax schedule has no brackets")]
    NoBrackets,

    #[error("last bracket must be unbounded")]
    MissingUnboundedBracket,

    #[error("bracket {0} is unbounded but is not the last bracket")]
    UnboundedBracketNotLast(usize),

    #[error("bracket {index} upper bound {bound} does not exceed the previous bound")]
    NonIncreasingBound { index: usize, bound: Decimal },

    #[error("bracket {index} rate {rate} must be between 0 and 1")]
    InvalidBracketRate { index: usize, rate: Decimal },

    #[error("bracket {index} rate {rate} is lower than the bracket below it")]
    DecreasingRate { index: usize, rate: Decimal },

    #[error("{name} insurance rate must be between 0 and 1, got {rate}")]
    InvalidInsuranceRate { name: &'static str, rate: Decimal },

    #[error("combined insurance rate {declared} does not equal the sum of sub-rates {sum}")]
    InsuranceRateMismatch { declared: Decimal, sum: Decimal },

    #[error("union fee rate must be between 0 and 1, got {0}")]
    InvalidUnionRate(Decimal),

    #[error("{field} must be non-negative, got {value}")]
    NegativeAmount { field: &'static str, value: Decimal },
}

/// Employee insurance contribution rates, applied to the insurance base.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InsuranceRates {
    /// Social insurance (BHXH), 8%.
    pub social: Decimal,
    /// Health insurance (BHYT), 1.5%.
    pub health: Decimal,
    /// Unemployment insurance (BHTN), 1%.
    pub unemployment: Decimal,
    /// Published combined rate (10.5%). When present it must match the sum of
    /// the three sub-rates.
    #[serde(default)]
    pub combined: Option<Decimal>,
}

impl InsuranceRates {
    pub fn sum(&self) -> Decimal {
        self.social + self.health + self.unemployment
    }
}

/// Static rate and bracket table for the monthly PIT calculation.
///
/// Loaded once and passed by reference into every calculation.
///
/// # Example
///
/// ```
/// use rust_decimal_macros::dec;
/// use eztools_core::TaxConfig;
///
/// let config = TaxConfig::default();
///
/// assert_eq!(config.self_deduction, dec!(15500000));
/// assert_eq!(config.brackets.len(), 5);
/// assert_eq!(config.validate(), Ok(()));
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaxConfig {
    /// Personal allowance for the taxpayer.
    pub self_deduction: Decimal,
    /// Allowance per registered dependent.
    pub dependent_deduction: Decimal,
    pub insurance: InsuranceRates,
    /// Union fee as a fraction of the insurance base.
    pub union_rate: Decimal,
    /// Monthly ceiling on the union fee.
    pub union_fee_cap: Decimal,
    /// Ascending schedule; the last bracket is unbounded.
    pub brackets: Vec<TaxBracket>,
}

impl Default for TaxConfig {
    fn default() -> Self {
        Self {
            self_deduction: Decimal::new(15_500_000, 0),
            dependent_deduction: Decimal::new(6_200_000, 0),
            insurance: InsuranceRates {
                social: Decimal::new(8, 2),
                health: Decimal::new(15, 3),
                unemployment: Decimal::new(1, 2),
                combined: Some(Decimal::new(105, 3)),
            },
            union_rate: Decimal::new(5, 3),
            union_fee_cap: Decimal::new(234_000, 0),
            brackets: vec![
                TaxBracket::new(Some(Decimal::new(10_000_000, 0)), Decimal::new(5, 2), "≤ 10 triệu"),
                TaxBracket::new(Some(Decimal::new(30_000_000, 0)), Decimal::new(10, 2), "10 - 30 triệu"),
                TaxBracket::new(Some(Decimal::new(60_000_000, 0)), Decimal::new(20, 2), "30 - 60 triệu"),
                TaxBracket::new(Some(Decimal::new(100_000_000, 0)), Decimal::new(30, 2), "60 - 100 triệu"),
                TaxBracket::new(None, Decimal::new(35, 2), "> 100 triệu"),
            ],
        }
    }
}

impl TaxConfig {
    pub const STORE_KEY: &'static str = "taxConfig";

    /// Checks the schedule and rate invariants.
    ///
    /// # Errors
    ///
    /// Returns [`TaxConfigError`] if:
    /// - the schedule is empty, or its unbounded bracket is missing or not last
    /// - upper bounds are not strictly increasing (starting above zero)
    /// - a bracket rate is outside [0, 1] or lower than the one below it
    /// - an insurance or union rate is outside [0, 1]
    /// - a declared combined insurance rate differs from the sum of sub-rates
    /// - a deduction or the union cap is negative
    pub fn validate(&self) -> Result<(), TaxConfigError> {
        self.validate_amounts()?;
        self.validate_rates()?;
        self.validate_brackets()
    }

    fn validate_amounts(&self) -> Result<(), TaxConfigError> {
        for (field, value) in [
            ("self deduction", self.self_deduction),
            ("dependent deduction", self.dependent_deduction),
            ("union fee cap", self.union_fee_cap),
        ] {
            if value < Decimal::ZERO {
                return Err(TaxConfigError::NegativeAmount { field, value });
            }
        }
        Ok(())
    }

    fn validate_rates(&self) -> Result<(), TaxConfigError> {
        for (name, rate) in [
            ("social", self.insurance.social),
            ("health", self.insurance.health),
            ("unemployment", self.insurance.unemployment),
        ] {
            if !is_fraction(rate) {
                return Err(TaxConfigError::InvalidInsuranceRate { name, rate });
            }
        }
        if let Some(declared) = self.insurance.combined {
            let sum = self.insurance.sum();
            if declared != sum {
                return Err(TaxConfigError::InsuranceRateMismatch { declared, sum });
            }
        }
        if !is_fraction(self.union_rate) {
            return Err(TaxConfigError::InvalidUnionRate(self.union_rate));
        }
        Ok(())
    }

    fn validate_brackets(&self) -> Result<(), TaxConfigError> {
        let last = self.brackets.len().checked_sub(1).ok_or(TaxConfigError::NoBrackets)?;

        let mut previous_upper = Decimal::ZERO;
        let mut previous_rate = Decimal::ZERO;
        for (index, bracket) in self.brackets.iter().enumerate() {
            if !is_fraction(bracket.rate) {
                return Err(TaxConfigError::InvalidBracketRate {
                    index,
                    rate: bracket.rate,
                });
            }
            if bracket.rate < previous_rate {
                return Err(TaxConfigError::DecreasingRate {
                    index,
                    rate: bracket.rate,
                });
            }
            match bracket.upper_bound {
                Some(bound) if bound <= previous_upper => {
                    return Err(TaxConfigError::NonIncreasingBound { index, bound });
                }
                Some(_) if index == last => return Err(TaxConfigError::MissingUnboundedBracket),
                Some(bound) => previous_upper = bound,
                None if index != last => {
                    return Err(TaxConfigError::UnboundedBracketNotLast(index));
                }
                None => {}
            }
            previous_rate = bracket.rate;
        }
        Ok(())
    }
}

fn is_fraction(rate: Decimal) -> bool {
    rate >= Decimal::ZERO && rate <= Decimal::ONE
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use rust_decimal_macros::dec;

    use super::*;

    #[test]
    fn default_config_is_valid() {
        assert_eq!(TaxConfig::default().validate(), Ok(()));
    }

    #[test]
    fn default_combined_rate_matches_sub_rates() {
        let config = TaxConfig::default();

        assert_eq!(config.insurance.sum(), dec!(0.105));
        assert_eq!(config.insurance.combined, Some(dec!(0.105)));
    }

    #[test]
    fn validate_rejects_empty_schedule() {
        let config = TaxConfig {
            brackets: Vec::new(),
            ..TaxConfig::default()
        };

        assert_eq!(config.validate(), Err(TaxConfigError::NoBrackets));
    }

    #[test]
    fn validate_rejects_bounded_last_bracket() {
        let mut config = TaxConfig::default();
        config.brackets[4].upper_bound = Some(dec!(200000000));

        assert_eq!(config.validate(), Err(TaxConfigError::MissingUnboundedBracket));
    }

    #[test]
    fn validate_rejects_unbounded_bracket_in_the_middle() {
        let mut config = TaxConfig::default();
        config.brackets[2].upper_bound = None;

        assert_eq!(
            config.validate(),
            Err(TaxConfigError::UnboundedBracketNotLast(2))
        );
    }

    #[test]
    fn validate_rejects_non_increasing_bounds() {
        let mut config = TaxConfig::default();
        config.brackets[1].upper_bound = Some(dec!(10000000));

        assert_eq!(
            config.validate(),
            Err(TaxConfigError::NonIncreasingBound {
                index: 1,
                bound: dec!(10000000),
            })
        );
    }

    #[test]
    fn validate_rejects_decreasing_rates() {
        let mut config = TaxConfig::default();
        config.brackets[3].rate = dec!(0.15);

        assert_eq!(
            config.validate(),
            Err(TaxConfigError::DecreasingRate {
                index: 3,
                rate: dec!(0.15),
            })
        );
    }

    #[test]
    fn validate_rejects_rate_above_one() {
        let mut config = TaxConfig::default();
        config.brackets[4].rate = dec!(1.5);

        assert_eq!(
            config.validate(),
            Err(TaxConfigError::InvalidBracketRate {
                index: 4,
                rate: dec!(1.5),
            })
        );
    }

    #[test]
    fn validate_rejects_combined_rate_mismatch() {
        let mut config = TaxConfig::default();
        config.insurance.combined = Some(dec!(0.11));

        assert_eq!(
            config.validate(),
            Err(TaxConfigError::InsuranceRateMismatch {
                declared: dec!(0.11),
                sum: dec!(0.105),
            })
        );
    }

    #[test]
    fn validate_accepts_missing_combined_rate() {
        let mut config = TaxConfig::default();
        config.insurance.combined = None;

        assert_eq!(config.validate(), Ok(()));
    }

    #[test]
    fn validate_rejects_negative_insurance_rate() {
        let mut config = TaxConfig::default();
        config.insurance.health = dec!(-0.015);
        config.insurance.combined = None;

        assert_eq!(
            config.validate(),
            Err(TaxConfigError::InvalidInsuranceRate {
                name: "health",
                rate: dec!(-0.015),
            })
        );
    }

    #[test]
    fn validate_rejects_negative_union_cap() {
        let config = TaxConfig {
            union_fee_cap: dec!(-1),
            ..TaxConfig::default()
        };

        assert_eq!(
            config.validate(),
            Err(TaxConfigError::NegativeAmount {
                field: "union fee cap",
                value: dec!(-1),
            })
        );
    }

    #[test]
    fn validate_rejects_union_rate_above_one() {
        let config = TaxConfig {
            union_rate: dec!(2),
            ..TaxConfig::default()
        };

        assert_eq!(config.validate(), Err(TaxConfigError::InvalidUnionRate(dec!(2))));
    }
}
