//! Infrastructure layer: table storage, configuration, and the engine that
//! ties domain decisions to persistence.

pub mod config;
pub mod engine;
pub mod store;


pub use config::StoreConfig;
pub use engine::{EngineError, InventoryEngine};
