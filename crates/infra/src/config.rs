//! Configuration loading and representation.

use std::path::PathBuf;

/// Environment variable overriding the product table location.
pub const CATALOG_PATH_ENV: &str = "STOCKBOOK_CATALOG_PATH";
/// Environment variable overriding the sales ledger location.
pub const LEDGER_PATH_ENV: &str = "STOCKBOOK_LEDGER_PATH";

pub const DEFAULT_CATALOG_PATH: &str = "base_datos_productos.csv";
pub const DEFAULT_LEDGER_PATH: &str = "ventas.csv";

/// Where the two tables live.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoreConfig {
    pub catalog_path: PathBuf,
    pub ledger_path: PathBuf,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            catalog_path: PathBuf::from(DEFAULT_CATALOG_PATH),
            ledger_path: PathBuf::from(DEFAULT_LEDGER_PATH),
        }
    }
}

impl StoreConfig {
    pub fn new(catalog_path: impl Into<PathBuf>, ledger_path: impl Into<PathBuf>) -> Self {
        Self {
            catalog_path: catalog_path.into(),
            ledger_path: ledger_path.into(),
        }
    }

    /// Defaults, overridden by `STOCKBOOK_CATALOG_PATH` / `STOCKBOOK_LEDGER_PATH`
    /// when set to a non-empty value.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let defaults = Self::default();
        let path = |key: &str, fallback: PathBuf| {
            lookup(key)
                .filter(|v| !v.trim().is_empty())
                .map(PathBuf::from)
                .unwrap_or(fallback)
        };

        Self {
            catalog_path: path(CATALOG_PATH_ENV, defaults.catalog_path),
            ledger_path: path(LEDGER_PATH_ENV, defaults.ledger_path),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unset_variables_fall_back_to_defaults() {
        let config = StoreConfig::from_lookup(|_| None);
        assert_eq!(config, StoreConfig::default());
    }

    #[test]
    fn variables_override_paths() {
        let config = StoreConfig::from_lookup(|key| match key {
            CATALOG_PATH_ENV => Some("/data/productos.csv".to_string()),
            LEDGER_PATH_ENV => Some("  ".to_string()),
            _ => None,
        });
        assert_eq!(config.catalog_path, PathBuf::from("/data/productos.csv"));
        assert_eq!(config.ledger_path, PathBuf::from(DEFAULT_LEDGER_PATH));
    }
}
