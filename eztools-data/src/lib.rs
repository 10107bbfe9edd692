mod loader;

pub use loader::{BracketRecord, TaxConfigLoader, TaxConfigLoaderError};
