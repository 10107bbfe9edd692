//! Integration tests for tax table loading against the SQLite store.

use eztools_core::db::{DbConfig, StoreRegistry};
use eztools_core::{KeyValueStore, TaxConfig, TaxInput, compute_tax};
use eztools_data::{TaxConfigLoader, TaxConfigLoaderError};
use eztools_db_sqlite::SqliteStoreFactory;
use pretty_assertions::assert_eq;
use rust_decimal_macros::dec;

const BRACKETS_CSV: &str = include_str!("../test-data/tax_brackets.csv");
const CONFIG_TOML: &str = include_str!("../test-data/tax_config.toml");

async fn setup_store() -> Box<dyn KeyValueStore> {
    let mut registry = StoreRegistry::new();
    registry.register(Box::new(SqliteStoreFactory));
    registry
        .create(&DbConfig {
            backend: "sqlite".to_string(),
            connection_string: ":memory:".to_string(),
        })
        .await
        .expect("Failed to open in-memory store")
}

#[test]
fn test_bracket_csv_reproduces_default_schedule() {
    let records = TaxConfigLoader::parse_brackets(BRACKETS_CSV.as_bytes()).expect("Failed to parse CSV");

    let config = TaxConfigLoader::with_brackets(TaxConfig::default(), records)
        .expect("Bracket CSV should validate");

    assert_eq!(config, TaxConfig::default());
}

#[test]
fn test_seven_bracket_table_from_toml() {
    let config = TaxConfigLoader::parse_toml(CONFIG_TOML).expect("Failed to parse TOML");

    assert_eq!(config.brackets.len(), 7);
    assert_eq!(config.self_deduction, dec!(11000000));
    assert_eq!(config.insurance.combined, Some(dec!(0.105)));
}

#[test]
fn test_toml_table_drives_calculation() {
    let config = TaxConfigLoader::parse_toml(CONFIG_TOML).unwrap();

    // 20,000,000 gross, no dependents: 2,100,000 insurance, union fee capped at
    // 180,000, 11,000,000 allowance, 6,720,000 taxable across the first two brackets.
    let input = TaxInput::from_gross(dec!(20000000), 0).with_union_fee(true);
    let result = compute_tax(&input, &config);

    assert_eq!(result.union_fee, dec!(180000));
    assert_eq!(result.taxable_income, dec!(6720000));
    assert_eq!(result.total_tax, dec!(422000));
}

#[tokio::test]
async fn test_load_into_sqlite_and_read_back() {
    let store = setup_store().await;
    let config = TaxConfigLoader::parse_toml(CONFIG_TOML).unwrap();

    TaxConfigLoader::load(store.as_ref(), &config)
        .await
        .expect("Failed to store table");

    let stored = TaxConfigLoader::stored(store.as_ref())
        .await
        .expect("Failed to read table");
    assert_eq!(stored, Some(config));
}

#[tokio::test]
async fn test_reloading_replaces_previous_table() {
    let store = setup_store().await;
    let seven = TaxConfigLoader::parse_toml(CONFIG_TOML).unwrap();

    TaxConfigLoader::load(store.as_ref(), &seven).await.unwrap();
    TaxConfigLoader::load(store.as_ref(), &TaxConfig::default())
        .await
        .unwrap();

    let stored = TaxConfigLoader::stored(store.as_ref()).await.unwrap();
    assert_eq!(stored, Some(TaxConfig::default()));
}

#[tokio::test]
async fn test_corrupt_stored_table_is_reported() {
    let store = setup_store().await;
    store.set(TaxConfig::STORE_KEY, "{not json").await.unwrap();

    let err = TaxConfigLoader::stored(store.as_ref()).await.unwrap_err();

    assert!(matches!(err, TaxConfigLoaderError::Store(_)));
}
