pub mod calculations;
pub mod db;
pub mod food;
pub mod history;
pub mod models;
pub mod random;

pub use calculations::{PitWorksheet, compute_tax};
pub use db::{KeyValueStore, StoreError};
pub use food::FoodList;
pub use history::{History, HistoryEntry, ToolKind};
pub use models::*;
