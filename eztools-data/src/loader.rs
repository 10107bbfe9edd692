use std::io::Read;

use eztools_core::db::{load_json, save_json};
use eztools_core::{KeyValueStore, StoreError, TaxBracket, TaxConfig, TaxConfigError};
use rust_decimal::Decimal;
use serde::Deserialize;
use thiserror::Error;

/// Errors that can occur when loading a tax table.
#[derive(Debug, Error)]
pub enum TaxConfigLoaderError {
    #[error("CSV parse error: {0}")]
    CsvParse(String),

    #[error("TOML parse error: {0}")]
    TomlParse(String),

    #[error("Invalid tax table: {0}")]
    Invalid(#[from] TaxConfigError),

    #[error("Store error: {0}")]
    Store(#[from] StoreError),
}

impl From<csv::Error> for TaxConfigLoaderError {
    fn from(err: csv::Error) -> Self {
        TaxConfigLoaderError::CsvParse(err.to_string())
    }
}

impl From<toml::de::Error> for TaxConfigLoaderError {
    fn from(err: toml::de::Error) -> Self {
        TaxConfigLoaderError::TomlParse(err.to_string())
    }
}

/// A single row from the bracket CSV file.
///
/// - `upper_bound`: inclusive top of the bracket in VND (empty for the last,
///   unbounded bracket)
/// - `rate`: the marginal rate as a decimal (e.g., 0.05 for 5%)
/// - `label`: display label, e.g. `≤ 10 triệu`
#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct BracketRecord {
    #[serde(deserialize_with = "deserialize_optional_decimal")]
    pub upper_bound: Option<Decimal>,
    pub rate: Decimal,
    pub label: String,
}

impl From<BracketRecord> for TaxBracket {
    fn from(record: BracketRecord) -> Self {
        TaxBracket::new(record.upper_bound, record.rate, record.label)
    }
}

fn deserialize_optional_decimal<'de, D>(deserializer: D) -> Result<Option<Decimal>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let s: Option<String> = Option::deserialize(deserializer)?;
    match s {
        Some(s) if s.trim().is_empty() => Ok(None),
        Some(s) => s
            .trim()
            .parse::<Decimal>()
            .map(Some)
            .map_err(serde::de::Error::custom),
        None => Ok(None),
    }
}

/// Loader for the PIT rate table.
///
/// Tables come either as a bracket CSV layered over an existing config, or
/// as a complete TOML document. Every table is validated before it is
/// returned or stored, so whatever lands under [`TaxConfig::STORE_KEY`] is
/// safe to hand to the calculator.
pub struct TaxConfigLoader;

impl TaxConfigLoader {
    /// Parse bracket rows from a CSV reader, in file order.
    pub fn parse_brackets<R: Read>(reader: R) -> Result<Vec<BracketRecord>, TaxConfigLoaderError> {
        let mut csv_reader = csv::Reader::from_reader(reader);
        let mut records = Vec::new();

        for result in csv_reader.deserialize() {
            let record: BracketRecord = result?;
            records.push(record);
        }

        Ok(records)
    }

    /// Replace the bracket schedule of `base` with `records` and validate
    /// the result.
    pub fn with_brackets(
        base: TaxConfig,
        records: Vec<BracketRecord>,
    ) -> Result<TaxConfig, TaxConfigLoaderError> {
        let config = TaxConfig {
            brackets: records.into_iter().map(TaxBracket::from).collect(),
            ..base
        };
        config.validate()?;
        Ok(config)
    }

    /// Parse and validate a complete table from TOML.
    pub fn parse_toml(text: &str) -> Result<TaxConfig, TaxConfigLoaderError> {
        let config: TaxConfig = toml::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    /// Validate `config` and write it to `store`, replacing any stored table.
    ///
    /// Loading is idempotent: storing the same table twice leaves one copy.
    pub async fn load(
        store: &dyn KeyValueStore,
        config: &TaxConfig,
    ) -> Result<(), TaxConfigLoaderError> {
        config.validate()?;
        save_json(store, TaxConfig::STORE_KEY, config).await?;
        Ok(())
    }

    /// Read the stored table, if one has been loaded.
    ///
    /// A stored table that no longer validates is reported as an error
    /// rather than silently replaced.
    pub async fn stored(store: &dyn KeyValueStore) -> Result<Option<TaxConfig>, TaxConfigLoaderError> {
        let Some(config) = load_json::<TaxConfig>(store, TaxConfig::STORE_KEY).await? else {
            return Ok(None);
        };
        config.validate()?;
        Ok(Some(config))
    }
}

#[cfg(test)]
mod tests {
    use eztools_core::db::MemoryStore;
    use pretty_assertions::assert_eq;
    use rust_decimal_macros::dec;

    use super::*;

    const HEADER: &str = "upper_bound,rate,label\n";

    #[test]
    fn test_parse_csv_single_bracket() {
        let csv = format!("{HEADER}10000000,0.05,≤ 10 triệu");

        let records = TaxConfigLoader::parse_brackets(csv.as_bytes()).expect("Failed to parse CSV");

        assert_eq!(
            records,
            vec![BracketRecord {
                upper_bound: Some(dec!(10000000)),
                rate: dec!(0.05),
                label: "≤ 10 triệu".to_string(),
            }]
        );
    }

    #[test]
    fn test_parse_csv_empty_upper_bound_is_unbounded() {
        let csv = format!("{HEADER},0.35,> 100 triệu");

        let records = TaxConfigLoader::parse_brackets(csv.as_bytes()).expect("Failed to parse CSV");

        assert_eq!(records[0].upper_bound, None);
        assert_eq!(records[0].rate, dec!(0.35));
    }

    #[test]
    fn test_parse_invalid_csv_missing_column() {
        let csv = "upper_bound,rate\n10000000,0.05";

        let err = TaxConfigLoader::parse_brackets(csv.as_bytes())
            .expect_err("Should fail for missing column");

        let TaxConfigLoaderError::CsvParse(msg) = err else {
            panic!("Expected CsvParse error, got: {:?}", err);
        };
        assert!(msg.contains("missing field"), "got: {}", msg);
    }

    #[test]
    fn test_parse_invalid_csv_bad_bound() {
        let csv = format!("{HEADER}ten million,0.05,x");

        let err = TaxConfigLoader::parse_brackets(csv.as_bytes())
            .expect_err("Should fail for invalid decimal");

        assert!(matches!(err, TaxConfigLoaderError::CsvParse(_)));
    }

    #[test]
    fn test_parse_empty_csv() {
        let records = TaxConfigLoader::parse_brackets(HEADER.as_bytes()).expect("Failed to parse CSV");

        assert!(records.is_empty());
    }

    // =========================================================================
    // with_brackets
    // =========================================================================

    #[test]
    fn test_with_brackets_keeps_base_rates() {
        let csv = format!("{HEADER}20000000,0.1,low\n,0.2,high");
        let records = TaxConfigLoader::parse_brackets(csv.as_bytes()).unwrap();

        let config = TaxConfigLoader::with_brackets(TaxConfig::default(), records).unwrap();

        assert_eq!(config.self_deduction, dec!(15500000));
        assert_eq!(config.brackets.len(), 2);
        assert_eq!(config.brackets[1].label, "high");
    }

    #[test]
    fn test_with_brackets_rejects_bounded_last_row() {
        let csv = format!("{HEADER}20000000,0.1,low");
        let records = TaxConfigLoader::parse_brackets(csv.as_bytes()).unwrap();

        let err = TaxConfigLoader::with_brackets(TaxConfig::default(), records).unwrap_err();

        assert!(matches!(
            err,
            TaxConfigLoaderError::Invalid(TaxConfigError::MissingUnboundedBracket)
        ));
    }

    #[test]
    fn test_with_no_rows_is_rejected() {
        let err = TaxConfigLoader::with_brackets(TaxConfig::default(), Vec::new()).unwrap_err();

        assert!(matches!(err, TaxConfigLoaderError::Invalid(TaxConfigError::NoBrackets)));
    }

    // =========================================================================
    // TOML
    // =========================================================================

    const SMALL_TOML: &str = r#"
self_deduction = 15500000
dependent_deduction = 6200000
union_rate = "0.005"
union_fee_cap = 234000

[insurance]
social = "0.08"
health = "0.015"
unemployment = "0.01"

[[brackets]]
upper_bound = 10000000
rate = "0.05"
label = "first"

[[brackets]]
rate = "0.1"
label = "rest"
"#;

    #[test]
    fn test_parse_toml_table() {
        let config = TaxConfigLoader::parse_toml(SMALL_TOML).expect("Failed to parse TOML");

        assert_eq!(config.insurance.combined, None);
        assert_eq!(config.insurance.sum(), dec!(0.105));
        assert_eq!(config.brackets[0].upper_bound, Some(dec!(10000000)));
        assert_eq!(config.brackets[1].upper_bound, None);
    }

    #[test]
    fn test_parse_toml_syntax_error() {
        let err = TaxConfigLoader::parse_toml("self_deduction = ").unwrap_err();

        assert!(matches!(err, TaxConfigLoaderError::TomlParse(_)));
    }

    #[test]
    fn test_parse_toml_rejects_invalid_table() {
        let text = SMALL_TOML.replace("rate = \"0.1\"", "rate = \"0.01\"");

        let err = TaxConfigLoader::parse_toml(&text).unwrap_err();

        assert!(matches!(
            err,
            TaxConfigLoaderError::Invalid(TaxConfigError::DecreasingRate { index: 1, .. })
        ));
    }

    // =========================================================================
    // Store
    // =========================================================================

    #[tokio::test]
    async fn test_stored_is_none_before_load() {
        let store = MemoryStore::new();

        assert_eq!(TaxConfigLoader::stored(&store).await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_load_then_stored_round_trip() {
        let store = MemoryStore::new();
        let config = TaxConfigLoader::parse_toml(SMALL_TOML).unwrap();

        TaxConfigLoader::load(&store, &config).await.unwrap();
        TaxConfigLoader::load(&store, &config).await.unwrap();

        assert_eq!(TaxConfigLoader::stored(&store).await.unwrap(), Some(config));
    }

    #[tokio::test]
    async fn test_load_refuses_invalid_table() {
        let store = MemoryStore::new();
        let config = TaxConfig {
            brackets: Vec::new(),
            ..TaxConfig::default()
        };

        let err = TaxConfigLoader::load(&store, &config).await.unwrap_err();

        assert!(matches!(err, TaxConfigLoaderError::Invalid(TaxConfigError::NoBrackets)));
        assert_eq!(store.get(TaxConfig::STORE_KEY).await.unwrap(), None);
    }
}
