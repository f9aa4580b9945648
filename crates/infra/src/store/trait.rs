use std::path::PathBuf;
use std::sync::Arc;

use thiserror::Error;

use stockbook_catalog::Catalog;
use stockbook_sales::Ledger;

/// Storage operation error.
///
/// These are **infrastructure errors** (files, formats) as opposed to domain
/// errors (validation, stock rules).
#[derive(Debug, Error)]
pub enum StoreError {
    /// The backing table does not exist yet.
    #[error("storage missing: {0}")]
    Missing(String),

    #[error("i/o error on {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// A row (or the header) could not be understood.
    #[error("malformed {table} table at line {line}: {reason}")]
    Malformed {
        table: &'static str,
        line: u64,
        reason: String,
    },

    /// The backend refused the operation (locked, read-only, injected failure).
    #[error("storage unavailable: {0}")]
    Unavailable(String),
}

impl StoreError {
    pub fn is_missing(&self) -> bool {
        matches!(self, StoreError::Missing(_))
    }

    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        StoreError::Io {
            path: path.into(),
            source,
        }
    }
}

/// Whole-snapshot persistence for the product table.
pub trait CatalogStore: Send + Sync {
    /// Load the full table. `Err(StoreError::Missing)` when it does not exist.
    fn load(&self) -> Result<Catalog, StoreError>;

    /// Replace the stored table with `catalog`. Either the whole table is
    /// written or the previous one is left in place.
    fn save(&self, catalog: &Catalog) -> Result<(), StoreError>;
}

/// Whole-snapshot persistence for the sales ledger.
pub trait LedgerStore: Send + Sync {
    /// Load the full ledger. `Err(StoreError::Missing)` when it does not exist.
    fn load(&self) -> Result<Ledger, StoreError>;

    /// Replace the stored ledger with `ledger` (all or nothing).
    fn save(&self, ledger: &Ledger) -> Result<(), StoreError>;
}

impl<S> CatalogStore for Arc<S>
where
    S: CatalogStore + ?Sized,
{
    fn load(&self) -> Result<Catalog, StoreError> {
        (**self).load()
    }

    fn save(&self, catalog: &Catalog) -> Result<(), StoreError> {
        (**self).save(catalog)
    }
}

impl<S> LedgerStore for Arc<S>
where
    S: LedgerStore + ?Sized,
{
    fn load(&self) -> Result<Ledger, StoreError> {
        (**self).load()
    }

    fn save(&self, ledger: &Ledger) -> Result<(), StoreError> {
        (**self).save(ledger)
    }
}
