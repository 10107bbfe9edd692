use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Mandatory employee contributions computed on the effective insurance base.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InsuranceContributions {
    /// Social insurance (BHXH).
    pub social: Decimal,
    /// Health insurance (BHYT).
    pub health: Decimal,
    /// Unemployment insurance (BHTN).
    pub unemployment: Decimal,
    /// Always `social + health + unemployment`.
    pub total: Decimal,
}

impl InsuranceContributions {
    pub fn new(
        social: Decimal,
        health: Decimal,
        unemployment: Decimal,
    ) -> Self {
        Self {
            social,
            health,
            unemployment,
            total: social + health + unemployment,
        }
    }
}

/// Taxable amount and tax allocated to one bracket.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BracketTax {
    /// Zero-based position in the configured schedule.
    pub index: usize,
    pub label: String,
    pub rate: Decimal,
    pub taxable_amount: Decimal,
    pub tax: Decimal,
}

impl BracketTax {
    /// One-based bracket number as printed on the breakdown table ("Bậc 1").
    pub fn number(&self) -> usize {
        self.index + 1
    }

    pub fn is_active(&self) -> bool {
        self.tax > Decimal::ZERO
    }
}

/// Full breakdown of a PIT calculation.
///
/// Values are unrounded; rounding to whole đồng happens at display time.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaxResult {
    pub gross_income: Decimal,
    pub insurance: InsuranceContributions,
    pub union_fee: Decimal,
    /// Gross income minus insurance and union fee. Negative when contributions
    /// exceed income.
    pub income_after_contributions: Decimal,
    pub family_deduction: Decimal,
    pub taxable_income: Decimal,
    /// One entry per configured bracket, in schedule order.
    pub brackets: Vec<BracketTax>,
    pub total_tax: Decimal,
    pub effective_rate_percent: Decimal,
}

impl TaxResult {
    /// Brackets that carry a non-zero tax amount, in schedule order.
    pub fn active_brackets(&self) -> impl Iterator<Item = &BracketTax> {
        self.brackets.iter().filter(|b| b.is_active())
    }
}
