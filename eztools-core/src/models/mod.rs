mod tax_bracket;
mod tax_config;
mod tax_input;
mod tax_result;

pub use tax_bracket::TaxBracket;
pub use tax_config::{InsuranceRates, TaxConfig, TaxConfigError};
pub use tax_input::TaxInput;
pub use tax_result::{BracketTax, InsuranceContributions, TaxResult};
