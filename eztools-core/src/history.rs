//! Shared result history for the random tools.
//!
//! Newest entries come first and the list never grows past
//! [`History::CAPACITY`]; the oldest entry is dropped on overflow.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::db::{KeyValueStore, StoreError, load_json, save_json};

/// Which tool produced a history entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToolKind {
    RandomNumber,
    ShuffleList,
    YesNo,
    SpinWheel,
    FoodPicker,
}

impl ToolKind {
    pub fn label(&self) -> &'static str {
        match self {
            Self::RandomNumber => "Random Number",
            Self::ShuffleList => "Shuffle List",
            Self::YesNo => "Yes/No",
            Self::SpinWheel => "Spin Wheel",
            Self::FoodPicker => "Hôm nay ăn gì?",
        }
    }
}

impl fmt::Display for ToolKind {
    fn fmt(
        &self,
        f: &mut fmt::Formatter<'_>,
    ) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HistoryEntry {
    pub tool: String,
    pub result: String,
    pub timestamp: DateTime<Utc>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct History {
    entries: Vec<HistoryEntry>,
}

impl History {
    pub const CAPACITY: usize = 50;
    pub const STORE_KEY: &'static str = "randomToolHistory";

    pub fn new() -> Self {
        Self::default()
    }

    /// Newest first.
    pub fn entries(&self) -> &[HistoryEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Records a result stamped with the current time.
    pub fn record(
        &mut self,
        tool: ToolKind,
        result: impl Into<String>,
    ) {
        self.push(HistoryEntry {
            tool: tool.label().to_string(),
            result: result.into(),
            timestamp: Utc::now(),
        });
    }

    /// Inserts `entry` at the front, evicting the oldest beyond capacity.
    pub fn push(
        &mut self,
        entry: HistoryEntry,
    ) {
        self.entries.insert(0, entry);
        self.entries.truncate(Self::CAPACITY);
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }

    /// Loads the persisted history; a missing key yields an empty history.
    pub async fn load(store: &dyn KeyValueStore) -> Result<Self, StoreError> {
        let mut history: Self = load_json(store, Self::STORE_KEY).await?.unwrap_or_default();
        history.entries.truncate(Self::CAPACITY);
        Ok(history)
    }

    pub async fn save(
        &self,
        store: &dyn KeyValueStore,
    ) -> Result<(), StoreError> {
        debug!(entries = self.entries.len(), "saving tool history");
        save_json(store, Self::STORE_KEY, self).await
    }

    /// Loads, records one entry, and saves in a single step.
    pub async fn append(
        store: &dyn KeyValueStore,
        tool: ToolKind,
        result: impl Into<String>,
    ) -> Result<Self, StoreError> {
        let mut history = Self::load(store).await?;
        history.record(tool, result);
        history.save(store).await?;
        Ok(history)
    }
}
