//! Command handlers shared by the `eztools` binary and its tests.
//!
//! Every random tool records its outcome in the persisted [`History`].

use std::path::Path;
use std::time::Duration;

use anyhow::{Context, Result};
use eztools_core::db::{DbConfig, MemoryStoreFactory, StoreRegistry};
use eztools_core::random::wheel::{SPIN_DURATION, segment_label};
use eztools_core::random::{
    Decision, NumberRequest, RandomProvider, Spin, Wheel, decide, generate_numbers, shuffle_lines,
};
use eztools_core::{FoodList, History, KeyValueStore, TaxConfig, TaxInput, ToolKind};
use eztools_data::TaxConfigLoader;
use eztools_db_sqlite::SqliteStoreFactory;
use rand::rngs::OsRng;
use rand::{Rng, RngCore};
use tracing::{debug, info};

use crate::format::parse_currency;

/// Registry with every backend this binary ships.
pub fn build_registry() -> StoreRegistry {
    let mut registry = StoreRegistry::new();
    registry.register(Box::new(MemoryStoreFactory));
    registry.register(Box::new(SqliteStoreFactory));
    registry
}

pub async fn open_store(config: &DbConfig) -> Result<Box<dyn KeyValueStore>> {
    debug!(backend = %config.backend, "opening store");
    build_registry()
        .create(config)
        .await
        .with_context(|| {
            format!(
                "Failed to open {} store: {}",
                config.backend, config.connection_string
            )
        })
}

/// Picks the rate table: an explicit TOML file first, then a table stored
/// by `tax-config-loader`, then the built-in defaults.
pub async fn resolve_tax_config(
    store: &dyn KeyValueStore,
    file: Option<&Path>,
) -> Result<TaxConfig> {
    if let Some(path) = file {
        info!(path = %path.display(), "using tax table file");
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to open: {}", path.display()))?;
        return TaxConfigLoader::parse_toml(&text)
            .with_context(|| format!("Failed to parse tax table: {}", path.display()));
    }
    if let Some(config) = TaxConfigLoader::stored(store)
        .await
        .context("Stored tax table is unusable")?
    {
        info!("using stored tax table");
        return Ok(config);
    }
    Ok(TaxConfig::default())
}

/// Builds calculator input from the raw text a user typed.
///
/// Without `insurance_base` the insurance base is the gross income.
pub fn tax_input(
    income: &str,
    dependents: u32,
    insurance_base: Option<&str>,
    union_member: bool,
) -> TaxInput {
    let gross = parse_currency(income);
    let mut input = TaxInput::from_gross(gross, dependents).with_union_fee(union_member);
    if let Some(base) = insurance_base {
        input = input.with_insurance_base(parse_currency(base));
    }
    input
}

/// Which segment sits under the pointer at evenly spaced points of the spin
/// animation. The last frame is the winner.
pub fn spin_frames(
    wheel: &Wheel,
    spin: &Spin,
    frames: usize,
) -> Vec<(Duration, String)> {
    let frames = frames.max(1);
    (1..=frames)
        .filter_map(|k| {
            let elapsed = SPIN_DURATION.mul_f64(k as f64 / frames as f64);
            let rotation = spin.rotation_at(Spin::progress(elapsed));
            wheel
                .winner(rotation)
                .map(|item| (elapsed, segment_label(item)))
        })
        .collect()
}

pub struct App<R = OsRng> {
    store: Box<dyn KeyValueStore>,
    provider: RandomProvider<R>,
}

impl App<OsRng> {
    pub fn new(store: Box<dyn KeyValueStore>) -> Self {
        Self::with_provider(store, RandomProvider::new())
    }
}

impl<R: RngCore> App<R> {
    pub fn with_provider(
        store: Box<dyn KeyValueStore>,
        provider: RandomProvider<R>,
    ) -> Self {
        Self { store, provider }
    }

    pub fn store(&self) -> &dyn KeyValueStore {
        self.store.as_ref()
    }

    async fn record(
        &self,
        tool: ToolKind,
        result: impl Into<String>,
    ) -> Result<()> {
        History::append(self.store(), tool, result)
            .await
            .context("Failed to save history")?;
        Ok(())
    }

    /// Draws numbers for `request`. Nothing is recorded for an empty draw.
    pub async fn numbers(
        &mut self,
        request: &NumberRequest,
    ) -> Result<Vec<i64>> {
        let numbers = generate_numbers(&mut self.provider, request)?;
        if numbers.is_empty() {
            return Ok(numbers);
        }
        let joined = numbers
            .iter()
            .map(i64::to_string)
            .collect::<Vec<_>>()
            .join(", ");
        self.record(ToolKind::RandomNumber, joined).await?;
        Ok(numbers)
    }

    /// Shuffles the non-blank lines of `text`. Nothing is recorded when
    /// there is nothing to shuffle.
    pub async fn shuffle(
        &mut self,
        text: &str,
    ) -> Result<Option<Vec<String>>> {
        let Some(items) = shuffle_lines(&mut self.provider, text) else {
            return Ok(None);
        };
        self.record(ToolKind::ShuffleList, format!("Shuffled {} items", items.len()))
            .await?;
        Ok(Some(items))
    }

    pub async fn decide(&mut self) -> Result<Decision> {
        let decision = decide(&mut self.provider);
        self.record(ToolKind::YesNo, decision.as_str()).await?;
        Ok(decision)
    }

    /// Spins `wheel` and records the winner. The spin itself is cosmetic and
    /// uses `rng` rather than the cryptographic provider.
    pub async fn spin<G: Rng + ?Sized>(
        &mut self,
        wheel: &Wheel,
        rng: &mut G,
    ) -> Result<Option<(Spin, String)>> {
        let Some(spin) = wheel.spin(rng) else {
            return Ok(None);
        };
        let Some(winner) = wheel.winner(spin.total_rotation).map(str::to_string) else {
            return Ok(None);
        };
        self.record(ToolKind::SpinWheel, winner.clone()).await?;
        Ok(Some((spin, winner)))
    }

    pub async fn foods(&self) -> Result<FoodList> {
        Ok(FoodList::load(self.store()).await?)
    }

    /// Adds a dish. Returns `false` for a blank name.
    pub async fn add_food(
        &self,
        name: &str,
    ) -> Result<bool> {
        let mut foods = self.foods().await?;
        if !foods.add(name) {
            return Ok(false);
        }
        foods.save(self.store()).await?;
        Ok(true)
    }

    /// Removes the dish shown as `number` (1-based) in the list.
    pub async fn remove_food(
        &self,
        number: usize,
    ) -> Result<Option<String>> {
        let mut foods = self.foods().await?;
        let Some(removed) = number.checked_sub(1).and_then(|index| foods.remove(index)) else {
            return Ok(None);
        };
        foods.save(self.store()).await?;
        Ok(Some(removed))
    }

    pub async fn pick_food(&mut self) -> Result<Option<String>> {
        let foods = self.foods().await?;
        let Some(dish) = foods.pick(&mut self.provider).map(str::to_string) else {
            return Ok(None);
        };
        self.record(ToolKind::FoodPicker, dish.clone()).await?;
        Ok(Some(dish))
    }

    pub async fn history(&self) -> Result<History> {
        Ok(History::load(self.store()).await?)
    }

    pub async fn clear_history(&self) -> Result<()> {
        History::new().save(self.store()).await?;
        Ok(())
    }
}
