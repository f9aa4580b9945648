use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use stockbook_core::{DomainError, DomainResult, ProductCode};

use crate::channel::Channel;

/// Fact: `quantity` units of `product_code` were sold through `channel`.
///
/// The product code is not checked against the catalog; a ledger may refer to
/// products that no longer exist.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SaleEvent {
    pub timestamp: NaiveDateTime,
    pub product_code: ProductCode,
    pub quantity: u64,
    pub channel: Channel,
}

impl SaleEvent {
    pub fn new(
        timestamp: NaiveDateTime,
        product_code: ProductCode,
        quantity: u64,
        channel: Channel,
    ) -> DomainResult<Self> {
        if quantity == 0 {
            return Err(DomainError::validation("sale quantity must be positive"));
        }
        Ok(Self {
            timestamp,
            product_code,
            quantity,
            channel,
        })
    }
}

/// Append-only log of sale events, in recording order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Ledger {
    events: Vec<SaleEvent>,
}

impl Ledger {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_events(events: impl IntoIterator<Item = SaleEvent>) -> DomainResult<Self> {
        let mut ledger = Self::new();
        for event in events {
            ledger.append(event)?;
        }
        Ok(ledger)
    }

    pub fn append(&mut self, event: SaleEvent) -> DomainResult<()> {
        if event.quantity == 0 {
            return Err(DomainError::validation(format!(
                "sale of {} has zero quantity",
                event.product_code
            )));
        }
        self.events.push(event);
        Ok(())
    }

    pub fn events(&self) -> &[SaleEvent] {
        &self.events
    }

    pub fn iter(&self) -> impl Iterator<Item = &SaleEvent> {
        self.events.iter()
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }
}
