//! Table storage boundary.
//!
//! The catalog and the sales ledger are each persisted as one whole table:
//! `load()` returns the full snapshot, `save()` overwrites it. There is no
//! locking; the last writer wins.

pub mod csv_catalog;
pub mod csv_ledger;
mod file;
pub mod in_memory;
pub mod r#trait;
mod table;

pub use csv_catalog::CsvCatalogStore;
pub use csv_ledger::CsvLedgerStore;
pub use in_memory::{InMemoryCatalogStore, InMemoryLedgerStore};
pub use r#trait::{CatalogStore, LedgerStore, StoreError};
