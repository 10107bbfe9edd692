use std::fs::{self, File};
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use eztools_core::TaxConfig;
use eztools_core::db::{DbConfig, MemoryStoreFactory, StoreRegistry};
use eztools_data::TaxConfigLoader;
use eztools_db_sqlite::SqliteStoreFactory;

/// Load a PIT rate table into the eztools store.
///
/// The table starts from `--config` (a complete TOML table) or the built-in
/// defaults. `--brackets` then replaces the bracket schedule with rows from a
/// CSV file with the following columns:
/// - upper_bound: The inclusive top of the bracket in VND (empty for the last bracket)
/// - rate: The marginal rate as a decimal (e.g., 0.05)
/// - label: The display label
#[derive(Parser, Debug)]
#[command(name = "tax-config-loader")]
#[command(version, about, long_about = None)]
struct Args {
    /// Path to a TOML file containing a complete tax table
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Path to a CSV file containing the bracket schedule
    #[arg(short, long)]
    brackets: Option<PathBuf>,

    /// Store backend (sqlite or memory)
    #[arg(long, default_value = "sqlite")]
    backend: String,

    /// Store location, e.g. a SQLite file path
    #[arg(short, long, default_value = "eztools.db")]
    database: String,

    /// Validate and print the table without storing it
    #[arg(long, default_value_t = false)]
    dry_run: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    let mut config = match &args.config {
        Some(path) => {
            println!("Reading tax table from: {}", path.display());
            let text = fs::read_to_string(path)
                .with_context(|| format!("Failed to open: {}", path.display()))?;
            TaxConfigLoader::parse_toml(&text)
                .with_context(|| format!("Failed to parse TOML: {}", path.display()))?
        }
        None => TaxConfig::default(),
    };

    if let Some(path) = &args.brackets {
        println!("Loading brackets from: {}", path.display());
        let file =
            File::open(path).with_context(|| format!("Failed to open: {}", path.display()))?;
        let records = TaxConfigLoader::parse_brackets(file)
            .with_context(|| format!("Failed to parse CSV: {}", path.display()))?;
        println!("Parsed {} brackets from CSV", records.len());
        config = TaxConfigLoader::with_brackets(config, records)
            .with_context(|| format!("Invalid bracket schedule: {}", path.display()))?;
    }

    for (index, bracket) in config.brackets.iter().enumerate() {
        println!("  Bậc {}: {} @ {}", index + 1, bracket.label, bracket.rate);
    }

    if args.dry_run {
        println!("Dry run: table is valid, nothing stored.");
        return Ok(());
    }

    let mut registry = StoreRegistry::new();
    registry.register(Box::new(MemoryStoreFactory));
    registry.register(Box::new(SqliteStoreFactory));

    let db_config = DbConfig {
        backend: args.backend.clone(),
        connection_string: args.database.clone(),
    };
    let store = registry
        .create(&db_config)
        .await
        .with_context(|| format!("Failed to open {} store: {}", args.backend, args.database))?;

    TaxConfigLoader::load(store.as_ref(), &config)
        .await
        .context("Failed to store tax table")?;

    println!(
        "Successfully stored a {}-bracket tax table in {}.",
        config.brackets.len(),
        args.database
    );

    Ok(())
}
