//! Inventory update domain module.
//!
//! This crate contains the business rules for stock adjustments and sale
//! registration, implemented purely as deterministic domain logic (no IO, no
//! storage). Persisting the outcome is done by `stockbook-infra`.

pub mod stockroom;

pub use stockroom::{
    AdjustStock, Direction, InventoryCommand, InventoryEvent, RecordSale, SaleRecorded,
    StockAdjusted, Stockroom,
};
