pub mod factory;
pub mod memory;
pub mod store;

pub use factory::{DbConfig, MemoryStoreFactory, StoreFactory, StoreRegistry};
pub use memory::MemoryStore;
pub use store::{KeyValueStore, StoreError, load_json, save_json};
