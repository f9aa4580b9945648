use std::sync::RwLock;

use stockbook_catalog::Catalog;
use stockbook_sales::Ledger;

use super::r#trait::{CatalogStore, LedgerStore, StoreError};

/// In-memory snapshot slot shared by both store flavours.
///
/// Intended for tests/dev. `fail_next_saves(n)` makes the next `n` saves fail
/// with [`StoreError::Unavailable`] without touching the stored snapshot, which
/// lets callers exercise their rollback paths.
#[derive(Debug)]
struct Slot<T> {
    name: &'static str,
    value: RwLock<Option<T>>,
    failing_saves: RwLock<usize>,
    saves: RwLock<usize>,
}

impl<T: Clone> Slot<T> {
    fn new(name: &'static str, value: Option<T>) -> Self {
        Self {
            name,
            value: RwLock::new(value),
            failing_saves: RwLock::new(0),
            saves: RwLock::new(0),
        }
    }

    fn poisoned(&self) -> StoreError {
        StoreError::Unavailable(format!("{} store lock poisoned", self.name))
    }

    fn load(&self) -> Result<T, StoreError> {
        let guard = self.value.read().map_err(|_| self.poisoned())?;
        guard
            .clone()
            .ok_or_else(|| StoreError::Missing(format!("in-memory {} store", self.name)))
    }

    fn save(&self, value: &T) -> Result<(), StoreError> {
        {
            let mut failing = self.failing_saves.write().map_err(|_| self.poisoned())?;
            if *failing > 0 {
                *failing -= 1;
                return Err(StoreError::Unavailable(format!(
                    "{} store rejected the write",
                    self.name
                )));
            }
        }

        let mut guard = self.value.write().map_err(|_| self.poisoned())?;
        *guard = Some(value.clone());
        if let Ok(mut saves) = self.saves.write() {
            *saves += 1;
        }
        Ok(())
    }

    fn fail_next_saves(&self, count: usize) {
        if let Ok(mut failing) = self.failing_saves.write() {
            *failing = count;
        }
    }

    fn snapshot(&self) -> Option<T> {
        self.value.read().ok().and_then(|v| v.clone())
    }

    fn save_count(&self) -> usize {
        self.saves.read().map(|s| *s).unwrap_or(0)
    }
}

/// In-memory product table.
#[derive(Debug)]
pub struct InMemoryCatalogStore {
    slot: Slot<Catalog>,
}

impl InMemoryCatalogStore {
    /// A store with no table yet (`load` reports it missing).
    pub fn new() -> Self {
        Self {
            slot: Slot::new("catalog", None),
        }
    }

    pub fn with_catalog(catalog: Catalog) -> Self {
        Self {
            slot: Slot::new("catalog", Some(catalog)),
        }
    }

    pub fn fail_next_saves(&self, count: usize) {
        self.slot.fail_next_saves(count)
    }

    /// What a fresh `load` would return right now.
    pub fn snapshot(&self) -> Option<Catalog> {
        self.slot.snapshot()
    }

    /// Number of successful saves.
    pub fn save_count(&self) -> usize {
        self.slot.save_count()
    }
}

impl Default for InMemoryCatalogStore {
    fn default() -> Self {
        Self::new()
    }
}

impl CatalogStore for InMemoryCatalogStore {
    fn load(&self) -> Result<Catalog, StoreError> {
        self.slot.load()
    }

    fn save(&self, catalog: &Catalog) -> Result<(), StoreError> {
        self.slot.save(catalog)
    }
}

/// In-memory sales ledger.
#[derive(Debug)]
pub struct InMemoryLedgerStore {
    slot: Slot<Ledger>,
}

impl InMemoryLedgerStore {
    /// A store with no ledger yet (`load` reports it missing).
    pub fn new() -> Self {
        Self {
            slot: Slot::new("ledger", None),
        }
    }

    pub fn with_ledger(ledger: Ledger) -> Self {
        Self {
            slot: Slot::new("ledger", Some(ledger)),
        }
    }

    pub fn fail_next_saves(&self, count: usize) {
        self.slot.fail_next_saves(count)
    }

    pub fn snapshot(&self) -> Option<Ledger> {
        self.slot.snapshot()
    }

    pub fn save_count(&self) -> usize {
        self.slot.save_count()
    }
}

impl Default for InMemoryLedgerStore {
    fn default() -> Self {
        Self::new()
    }
}

impl LedgerStore for InMemoryLedgerStore {
    fn load(&self) -> Result<Ledger, StoreError> {
        self.slot.load()
    }

    fn save(&self, ledger: &Ledger) -> Result<(), StoreError> {
        self.slot.save(ledger)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_store_reports_missing() {
        assert!(InMemoryCatalogStore::new().load().unwrap_err().is_missing());
        assert!(InMemoryLedgerStore::new().load().unwrap_err().is_missing());
    }

    #[test]
    fn injected_failures_leave_snapshot_untouched() {
        let store = InMemoryLedgerStore::with_ledger(Ledger::new());
        store.fail_next_saves(1);

        assert!(matches!(
            store.save(&Ledger::new()),
            Err(StoreError::Unavailable(_))
        ));
        assert_eq!(store.save_count(), 0);

        store.save(&Ledger::new()).unwrap();
        assert_eq!(store.save_count(), 1);
        assert_eq!(store.snapshot(), Some(Ledger::new()));
    }
}
