use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// One marginal-rate band of the progressive schedule.
///
/// `upper_bound` is `None` for the final, unbounded bracket.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaxBracket {
    pub upper_bound: Option<Decimal>,
    pub rate: Decimal,
    pub label: String,
}

impl TaxBracket {
    pub fn new(
        upper_bound: Option<Decimal>,
        rate: Decimal,
        label: impl Into<String>,
    ) -> Self {
        Self {
            upper_bound,
            rate,
            label: label.into(),
        }
    }

    /// Width of this bracket given the upper bound of the one below it.
    /// Returns `None` for the unbounded bracket.
    pub fn width(
        &self,
        previous_upper: Decimal,
    ) -> Option<Decimal> {
        self.upper_bound.map(|upper| upper - previous_upper)
    }
}
