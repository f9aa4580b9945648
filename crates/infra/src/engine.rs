//! Inventory update engine (application-level orchestration).
//!
//! Ties the pure `Stockroom` aggregate to the two table stores:
//!
//! ```text
//! Command
//!   ↓
//! 1. Decide events against the current state (pure, no mutation)
//!   ↓
//! 2. Apply them to a staged copy of catalog + ledger
//!   ↓
//! 3. Save the staged catalog; if the ledger changed, save it too
//!    (on ledger failure the previous catalog is written back)
//!   ↓
//! 4. Swap the staged copy in as the current state
//! ```
//!
//! The in-memory state only changes once every affected table has been
//! written, so a failed operation leaves memory and disk as they were.

use chrono::NaiveDateTime;
use thiserror::Error;

use stockbook_catalog::{Catalog, Product};
use stockbook_core::{Aggregate, DomainError, ProductCode};
use stockbook_inventory::{
    AdjustStock, Direction, InventoryCommand, InventoryEvent, RecordSale, Stockroom,
};
use stockbook_sales::{Ledger, SaleEvent};
use stockbook_stats::Statistics;

use crate::config::StoreConfig;
use crate::store::{CatalogStore, CsvCatalogStore, CsvLedgerStore, LedgerStore, StoreError};

#[derive(Debug, Error)]
pub enum EngineError {
    /// The operation was refused by the domain rules; nothing changed.
    #[error(transparent)]
    Domain(#[from] DomainError),

    /// Writing a table failed; nothing changed in memory.
    ///
    /// `rolled_back` is false only when a two-table write failed half way and
    /// restoring the first table failed as well, leaving the files out of step.
    /// Reload before retrying.
    #[error("changes were not saved: {source}")]
    Persistence {
        #[source]
        source: StoreError,
        rolled_back: bool,
    },

    /// A table exists but could not be read.
    #[error("failed to load tables: {0}")]
    Load(#[source] StoreError),
}

impl EngineError {
    pub fn is_persistence_failure(&self) -> bool {
        matches!(self, EngineError::Persistence { .. })
    }

    pub fn domain(&self) -> Option<&DomainError> {
        match self {
            EngineError::Domain(e) => Some(e),
            _ => None,
        }
    }
}

/// Single-operator engine over a catalog store and a ledger store.
#[derive(Debug)]
pub struct InventoryEngine<C, L> {
    catalog_store: C,
    ledger_store: L,
    state: Stockroom,
}

impl InventoryEngine<CsvCatalogStore, CsvLedgerStore> {
    /// Open the CSV tables named by `config`.
    pub fn open_csv(config: &StoreConfig) -> Result<Self, EngineError> {
        Self::open(
            CsvCatalogStore::new(&config.catalog_path),
            CsvLedgerStore::new(&config.ledger_path),
        )
    }
}

impl<C, L> InventoryEngine<C, L>
where
    C: CatalogStore,
    L: LedgerStore,
{
    /// Load both tables.
    ///
    /// A missing table is not an error: it starts out empty and a warning is
    /// logged. A missing ledger is also initialized on disk (header only).
    pub fn open(catalog_store: C, ledger_store: L) -> Result<Self, EngineError> {
        let state = load_state(&catalog_store, &ledger_store)?;
        Ok(Self {
            catalog_store,
            ledger_store,
            state,
        })
    }

    /// Discard in-memory state and read both tables again.
    pub fn reload(&mut self) -> Result<(), EngineError> {
        self.state = load_state(&self.catalog_store, &self.ledger_store)?;
        Ok(())
    }

    pub fn catalog(&self) -> &Catalog {
        self.state.catalog()
    }

    pub fn ledger(&self) -> &Ledger {
        self.state.ledger()
    }

    pub fn statistics(&self) -> Statistics<'_> {
        Statistics::new(self.state.catalog(), self.state.ledger())
    }

    /// Add or remove stock for one product and persist the catalog.
    pub fn adjust_stock(
        &mut self,
        product_code: &str,
        quantity: u64,
        direction: Direction,
    ) -> Result<&Product, EngineError> {
        let product_code = ProductCode::new(product_code)?;
        self.dispatch(InventoryCommand::AdjustStock(AdjustStock {
            product_code: product_code.clone(),
            quantity,
            direction,
        }))?;

        self.state
            .catalog()
            .get(product_code.as_str())
            .ok_or_else(|| DomainError::product_not_found(&product_code).into())
    }

    /// Register a sale: stock down, running total up, ledger row appended.
    /// Both tables are persisted, or neither is.
    pub fn record_sale(
        &mut self,
        product_code: &str,
        quantity: u64,
        channel: &str,
        timestamp: NaiveDateTime,
    ) -> Result<&SaleEvent, EngineError> {
        let product_code = ProductCode::new(product_code)?;
        self.dispatch(InventoryCommand::RecordSale(RecordSale {
            product_code,
            quantity,
            channel: channel.to_string(),
            timestamp,
        }))?;

        self.state
            .ledger()
            .events()
            .last()
            .ok_or_else(|| EngineError::Domain(DomainError::validation("sale was not recorded")))
    }

    /// Run a command through decide → stage → persist → swap.
    pub fn dispatch(
        &mut self,
        command: InventoryCommand,
    ) -> Result<Vec<InventoryEvent>, EngineError> {
        // 1) Decide (no mutation)
        let events = self.state.handle(&command).inspect_err(|e| {
            tracing::info!(error = %e, ?command, "inventory command rejected");
        })?;
        if events.is_empty() {
            return Ok(events);
        }

        // 2) Stage
        let mut staged = self.state.clone();
        for event in &events {
            staged.apply(event);
        }

        // 3) Persist
        let ledger_changed = events.iter().any(InventoryEvent::touches_ledger);
        self.persist(&staged, ledger_changed)?;

        // 4) Swap
        self.state = staged;
        for event in &events {
            log_applied(event, &self.state);
        }
        Ok(events)
    }

    fn persist(&self, staged: &Stockroom, ledger_changed: bool) -> Result<(), EngineError> {
        if let Err(source) = self.catalog_store.save(staged.catalog()) {
            tracing::warn!(error = %source, "catalog save failed; change discarded");
            return Err(EngineError::Persistence {
                source,
                rolled_back: true,
            });
        }

        if !ledger_changed {
            return Ok(());
        }

        if let Err(source) = self.ledger_store.save(staged.ledger()) {
            let rolled_back = match self.catalog_store.save(self.state.catalog()) {
                Ok(()) => {
                    tracing::warn!(error = %source, "ledger save failed; catalog restored");
                    true
                }
                Err(restore) => {
                    tracing::error!(
                        error = %source,
                        restore_error = %restore,
                        "ledger save failed and catalog restore failed; tables are out of step"
                    );
                    false
                }
            };
            return Err(EngineError::Persistence {
                source,
                rolled_back,
            });
        }

        Ok(())
    }
}

fn load_state<C, L>(catalog_store: &C, ledger_store: &L) -> Result<Stockroom, EngineError>
where
    C: CatalogStore,
    L: LedgerStore,
{
    let catalog = match catalog_store.load() {
        Ok(catalog) => catalog,
        Err(StoreError::Missing(what)) => {
            tracing::warn!(store = %what, "product table not found; starting with an empty catalog");
            Catalog::new()
        }
        Err(e) => return Err(EngineError::Load(e)),
    };

    let ledger = match ledger_store.load() {
        Ok(ledger) => ledger,
        Err(StoreError::Missing(what)) => {
            tracing::warn!(store = %what, "sales ledger not found; starting with an empty ledger");
            let ledger = Ledger::new();
            if let Err(e) = ledger_store.save(&ledger) {
                tracing::warn!(error = %e, "could not initialize sales ledger");
            }
            ledger
        }
        Err(e) => return Err(EngineError::Load(e)),
    };

    tracing::info!(
        products = catalog.len(),
        sales = ledger.len(),
        "tables loaded"
    );
    Ok(Stockroom::new(catalog, ledger))
}

fn log_applied(event: &InventoryEvent, state: &Stockroom) {
    match event {
        InventoryEvent::StockAdjusted(e) => {
            let inventory = state
                .catalog()
                .get(e.product_code.as_str())
                .map(Product::inventory);
            tracing::info!(
                event_type = event.event_type(),
                code = %e.product_code,
                direction = %e.direction,
                quantity = e.quantity,
                inventory,
                "stock adjusted"
            );
        }
        InventoryEvent::SaleRecorded(e) => {
            tracing::info!(
                event_type = event.event_type(),
                code = %e.sale.product_code,
                quantity = e.sale.quantity,
                channel = %e.sale.channel,
                "sale recorded"
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::{InMemoryCatalogStore, InMemoryLedgerStore};
    use chrono::NaiveDate;
    use rust_decimal::Decimal;
    use std::sync::Arc;

    fn code(s: &str) -> ProductCode {
        ProductCode::new(s).unwrap()
    }

    fn t1() -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2024, 11, 20)
            .unwrap()
            .and_hms_opt(15, 30, 0)
            .unwrap()
    }

    fn a1_catalog(inventory: u64) -> Catalog {
        Catalog::from_products(vec![
            Product::new(
                code("A1"),
                "Blusa",
                "Negro",
                "M",
                inventory,
                Decimal::from(100),
                Decimal::from(60),
            )
            .unwrap(),
        ])
        .unwrap()
    }

    type Engine = InventoryEngine<Arc<InMemoryCatalogStore>, Arc<InMemoryLedgerStore>>;

    fn setup(inventory: u64) -> (Engine, Arc<InMemoryCatalogStore>, Arc<InMemoryLedgerStore>) {
        let catalog_store = Arc::new(InMemoryCatalogStore::with_catalog(a1_catalog(inventory)));
        let ledger_store = Arc::new(InMemoryLedgerStore::with_ledger(Ledger::new()));
        let engine = InventoryEngine::open(catalog_store.clone(), ledger_store.clone()).unwrap();
        (engine, catalog_store, ledger_store)
    }

    #[test]
    fn adjust_stock_persists_catalog_only() {
        let (mut engine, catalog_store, ledger_store) = setup(10);

        let product = engine.adjust_stock("A1", 5, Direction::Increase).unwrap();
        assert_eq!(product.inventory(), 15);

        let stored = catalog_store.snapshot().unwrap();
        assert_eq!(stored.get("A1").unwrap().inventory(), 15);
        assert_eq!(catalog_store.save_count(), 1);
        assert_eq!(ledger_store.save_count(), 0);
    }

    #[test]
    fn decrease_beyond_stock_is_rejected_without_saving() {
        let (mut engine, catalog_store, _) = setup(2);

        let err = engine.adjust_stock("A1", 3, Direction::Decrease).unwrap_err();
        assert!(matches!(
            err.domain(),
            Some(DomainError::InsufficientInventory { available: 2, requested: 3, .. })
        ));
        assert_eq!(engine.catalog().get("A1").unwrap().inventory(), 2);
        assert_eq!(catalog_store.save_count(), 0);
    }

    #[test]
    fn unknown_code_is_product_not_found() {
        let (mut engine, _, _) = setup(2);
        let err = engine.adjust_stock("ZZ", 1, Direction::Increase).unwrap_err();
        assert_eq!(err.domain(), Some(&DomainError::ProductNotFound(code("ZZ"))));
    }

    #[test]
    fn failed_catalog_save_keeps_memory_unchanged() {
        let (mut engine, catalog_store, _) = setup(10);
        catalog_store.fail_next_saves(1);

        let err = engine.adjust_stock("A1", 4, Direction::Decrease).unwrap_err();
        assert!(err.is_persistence_failure());
        assert_eq!(engine.catalog().get("A1").unwrap().inventory(), 10);

        // The engine stays usable.
        engine.adjust_stock("A1", 4, Direction::Decrease).unwrap();
        assert_eq!(engine.catalog().get("A1").unwrap().inventory(), 6);
    }

    #[test]
    fn missing_tables_start_empty_and_ledger_is_initialized() {
        let catalog_store = Arc::new(InMemoryCatalogStore::new());
        let ledger_store = Arc::new(InMemoryLedgerStore::new());
        let engine = InventoryEngine::open(catalog_store.clone(), ledger_store.clone()).unwrap();

        assert!(engine.catalog().is_empty());
        assert!(engine.ledger().is_empty());
        assert!(catalog_store.snapshot().is_none());
        assert_eq!(ledger_store.snapshot(), Some(Ledger::new()));
        assert_eq!(engine.statistics().total_units_sold(), 0);
    }

    #[test]
    fn record_sale_returns_the_appended_event() {
        let (mut engine, _, _) = setup(10);
        let sale = engine.record_sale("A1", 3, "Shopify", t1()).unwrap().clone();
        assert_eq!(sale.product_code, code("A1"));
        assert_eq!(sale.quantity, 3);
        assert_eq!(sale.timestamp, t1());
    }

    #[test]
    fn reload_picks_up_external_changes() {
        let (mut engine, catalog_store, _) = setup(10);
        catalog_store.save(&a1_catalog(99)).unwrap();

        assert_eq!(engine.catalog().get("A1").unwrap().inventory(), 10);
        engine.reload().unwrap();
        assert_eq!(engine.catalog().get("A1").unwrap().inventory(), 99);
    }
}
