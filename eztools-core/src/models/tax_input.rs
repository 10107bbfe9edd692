use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Inputs for a single monthly PIT calculation.
///
/// All amounts are expected to be non-negative; parsing and rejecting bad
/// values is the caller's job. `insurance_base` above `gross_income` is
/// clamped by the worksheet rather than rejected.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaxInput {
    pub gross_income: Decimal,
    pub dependent_count: u32,
    pub insurance_base: Decimal,
    pub has_union_fee: bool,
}

impl TaxInput {
    /// Input whose insurance base equals the gross income, which is what the
    /// calculator assumes unless a custom base is supplied.
    pub fn from_gross(
        gross_income: Decimal,
        dependent_count: u32,
    ) -> Self {
        Self {
            gross_income,
            dependent_count,
            insurance_base: gross_income,
            has_union_fee: false,
        }
    }

    pub fn with_insurance_base(
        mut self,
        insurance_base: Decimal,
    ) -> Self {
        self.insurance_base = insurance_base;
        self
    }

    pub fn with_union_fee(
        mut self,
        has_union_fee: bool,
    ) -> Self {
        self.has_union_fee = has_union_fee;
        self
    }
}
