//! Domain error model.

use thiserror::Error;

use crate::id::ProductCode;

/// Result type used across the domain layer.
pub type DomainResult<T> = Result<T, DomainError>;

/// Domain-level error.
///
/// Keep this focused on deterministic, business/domain failures (validation,
/// invariants, unknown references). Storage failures belong to the infra layer.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DomainError {
    /// A value failed validation (e.g. zero quantity).
    #[error("validation failed: {0}")]
    Validation(String),

    /// An identifier was invalid (e.g. empty product code).
    #[error("invalid identifier: {0}")]
    InvalidId(String),

    /// The referenced product code is not in the catalog.
    #[error("product not found: {0}")]
    ProductNotFound(ProductCode),

    /// A decrease would drive inventory below zero.
    #[error("insufficient inventory for {code}: {available} available, {requested} requested")]
    InsufficientInventory {
        code: ProductCode,
        available: u64,
        requested: u64,
    },

    /// The sales channel is not one of the recognized routes.
    #[error("invalid sales channel: {0:?}")]
    InvalidChannel(String),
}

impl DomainError {
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    pub fn invalid_id(msg: impl Into<String>) -> Self {
        Self::InvalidId(msg.into())
    }

    pub fn product_not_found(code: &ProductCode) -> Self {
        Self::ProductNotFound(code.clone())
    }

    pub fn invalid_channel(value: impl Into<String>) -> Self {
        Self::InvalidChannel(value.into())
    }
}
