//! Monthly personal income tax (PIT) worksheet for salaried employees.
//!
//! # Worksheet Structure
//!
//! | Step | Description |
//! |------|-------------|
//! | 1    | Effective insurance base: smaller of the declared base or gross income |
//! | 2    | Social (8%), health (1.5%) and unemployment (1%) contributions |
//! | 3    | Union fee: base × 0.5%, capped (only when the employee is a member) |
//! | 4    | Income after contributions: gross − insurance − union fee |
//! | 5    | Family deduction: self allowance + dependents × dependent allowance |
//! | 6    | Taxable income: Step 4 − Step 5, minimum 0 |
//! | 7    | Progressive allocation of Step 6 across the bracket schedule |
//! | 8    | Total tax and effective rate against gross income |
//!
//! # Example
//!
//! ```
//! use rust_decimal_macros::dec;
//! use eztools_core::{TaxConfig, TaxInput, compute_tax};
//!
//! let config = TaxConfig::default();
//! let input = TaxInput::from_gross(dec!(40000000), 1);
//!
//! let result = compute_tax(&input, &config);
//!
//! assert_eq!(result.insurance.total, dec!(4200000));
//! assert_eq!(result.taxable_income, dec!(14100000));
//! assert_eq!(result.total_tax, dec!(910000));
//! assert_eq!(result.effective_rate_percent, dec!(2.275));
//! ```

use rust_decimal::Decimal;
use tracing::{debug, warn};

use crate::calculations::common::max;
use crate::{BracketTax, InsuranceContributions, TaxConfig, TaxInput, TaxResult};

/// Runs the PIT worksheet against `config`.
///
/// Pure and deterministic: identical inputs always produce identical results.
/// The config is assumed to have passed [`TaxConfig::validate`].
pub fn compute_tax(
    input: &TaxInput,
    config: &TaxConfig,
) -> TaxResult {
    PitWorksheet::new(config).calculate(input)
}

/// Calculator for the monthly PIT worksheet.
///
/// Borrows the static rate table; holds no other state.
#[derive(Debug, Clone, Copy)]
pub struct PitWorksheet<'a> {
    config: &'a TaxConfig,
}

impl<'a> PitWorksheet<'a> {
    pub fn new(config: &'a TaxConfig) -> Self {
        Self { config }
    }

    /// Calculates every step of the worksheet.
    ///
    /// Input amounts must be non-negative. An insurance base above gross
    /// income is clamped to gross income.
    pub fn calculate(
        &self,
        input: &TaxInput,
    ) -> TaxResult {
        // Step 1
        let insurance_base = self.effective_insurance_base(input);

        // Step 2
        let insurance = self.insurance_contributions(insurance_base);

        // Step 3
        let union_fee = self.union_fee(insurance_base, input.has_union_fee);

        // Step 4
        let income_after_contributions =
            self.income_after_contributions(input.gross_income, &insurance, union_fee);

        // Step 5
        let family_deduction = self.family_deduction(input.dependent_count);

        // Step 6
        let taxable_income = self.taxable_income(income_after_contributions, family_deduction);

        // Step 7
        let brackets = self.allocate_brackets(taxable_income);

        // Step 8
        let total_tax: Decimal = brackets.iter().map(|b| b.tax).sum();
        let effective_rate_percent = self.effective_rate_percent(total_tax, input.gross_income);

        debug!(
            gross_income = %input.gross_income,
            dependents = input.dependent_count,
            taxable_income = %taxable_income,
            total_tax = %total_tax,
            "PIT worksheet calculated"
        );

        TaxResult {
            gross_income: input.gross_income,
            insurance,
            union_fee,
            income_after_contributions,
            family_deduction,
            taxable_income,
            brackets,
            total_tax,
            effective_rate_percent,
        }
    }

    fn effective_insurance_base(
        &self,
        input: &TaxInput,
    ) -> Decimal {
        if input.insurance_base > input.gross_income {
            warn!(
                insurance_base = %input.insurance_base,
                gross_income = %input.gross_income,
                "Insurance base exceeds gross income; clamping to gross income"
            );
            return input.gross_income;
        }
        input.insurance_base
    }

    /// The total is the sum of the three components, so the breakdown always
    /// adds up to the reported total.
    fn insurance_contributions(
        &self,
        insurance_base: Decimal,
    ) -> InsuranceContributions {
        let rates = &self.config.insurance;
        InsuranceContributions::new(
            insurance_base * rates.social,
            insurance_base * rates.health,
            insurance_base * rates.unemployment,
        )
    }

    fn union_fee(
        &self,
        insurance_base: Decimal,
        has_union_fee: bool,
    ) -> Decimal {
        if !has_union_fee {
            return Decimal::ZERO;
        }
        (insurance_base * self.config.union_rate).min(self.config.union_fee_cap)
    }

    fn income_after_contributions(
        &self,
        gross_income: Decimal,
        insurance: &InsuranceContributions,
        union_fee: Decimal,
    ) -> Decimal {
        let income = gross_income - insurance.total - union_fee;
        if income < Decimal::ZERO {
            warn!(
                gross_income = %gross_income,
                insurance = %insurance.total,
                union_fee = %union_fee,
                "Contributions exceed gross income"
            );
        }
        income
    }

    fn family_deduction(
        &self,
        dependent_count: u32,
    ) -> Decimal {
        self.config.self_deduction + Decimal::from(dependent_count) * self.config.dependent_deduction
    }

    fn taxable_income(
        &self,
        income_after_contributions: Decimal,
        family_deduction: Decimal,
    ) -> Decimal {
        max(income_after_contributions - family_deduction, Decimal::ZERO)
    }

    /// Splits taxable income across the schedule from the lowest bracket up.
    ///
    /// Always yields one entry per configured bracket; brackets above the
    /// point where income runs out are reported with zero amounts.
    fn allocate_brackets(
        &self,
        taxable_income: Decimal,
    ) -> Vec<BracketTax> {
        let mut remaining = taxable_income;
        let mut previous_upper = Decimal::ZERO;
        let mut results = Vec::with_capacity(self.config.brackets.len());

        for (index, bracket) in self.config.brackets.iter().enumerate() {
            let taxable_amount = if remaining > Decimal::ZERO {
                match bracket.width(previous_upper) {
                    Some(width) => remaining.min(width),
                    None => remaining,
                }
            } else {
                Decimal::ZERO
            };

            results.push(BracketTax {
                index,
                label: bracket.label.clone(),
                rate: bracket.rate,
                taxable_amount,
                tax: taxable_amount * bracket.rate,
            });

            remaining -= taxable_amount;
            if let Some(upper) = bracket.upper_bound {
                previous_upper = upper;
            }
        }

        results
    }

    fn effective_rate_percent(
        &self,
        total_tax: Decimal,
        gross_income: Decimal,
    ) -> Decimal {
        if gross_income <= Decimal::ZERO {
            return Decimal::ZERO;
        }
        total_tax / gross_income * Decimal::ONE_HUNDRED
    }
}
