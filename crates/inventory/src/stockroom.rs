use core::str::FromStr;

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use stockbook_catalog::Catalog;
use stockbook_core::{Aggregate, DomainError, ProductCode};
use stockbook_sales::{Channel, Ledger, SaleEvent};

/// Direction of a manual stock adjustment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    Increase,
    Decrease,
}

impl Direction {
    pub fn as_str(&self) -> &'static str {
        match self {
            Direction::Increase => "increase",
            Direction::Decrease => "decrease",
        }
    }
}

impl core::fmt::Display for Direction {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Direction {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "increase" | "add" | "+" => Ok(Direction::Increase),
            "decrease" | "remove" | "-" => Ok(Direction::Decrease),
            other => Err(DomainError::validation(format!(
                "unknown adjustment direction {other:?}"
            ))),
        }
    }
}

/// Command: AdjustStock.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AdjustStock {
    pub product_code: ProductCode,
    pub quantity: u64,
    pub direction: Direction,
}

/// Command: RecordSale.
///
/// `channel` is the raw value supplied by the operator; it is validated when
/// the command is handled.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecordSale {
    pub product_code: ProductCode,
    pub quantity: u64,
    pub channel: String,
    pub timestamp: NaiveDateTime,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum InventoryCommand {
    AdjustStock(AdjustStock),
    RecordSale(RecordSale),
}

/// Event: StockAdjusted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StockAdjusted {
    pub product_code: ProductCode,
    pub quantity: u64,
    pub direction: Direction,
}

/// Event: SaleRecorded.
///
/// One event carries all three effects of a sale (stock down, running total
/// up, ledger row appended) so they are applied as a unit.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SaleRecorded {
    pub sale: SaleEvent,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum InventoryEvent {
    StockAdjusted(StockAdjusted),
    SaleRecorded(SaleRecorded),
}

impl InventoryEvent {
    /// Stable event name, used in log fields.
    pub fn event_type(&self) -> &'static str {
        match self {
            InventoryEvent::StockAdjusted(_) => "inventory.stock_adjusted",
            InventoryEvent::SaleRecorded(_) => "inventory.sale_recorded",
        }
    }

    /// Whether applying this event changes the sales ledger.
    pub fn touches_ledger(&self) -> bool {
        matches!(self, InventoryEvent::SaleRecorded(_))
    }
}

/// Aggregate root: the catalog and the sales ledger, updated together.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Stockroom {
    catalog: Catalog,
    ledger: Ledger,
    version: u64,
}

impl Stockroom {
    pub fn new(catalog: Catalog, ledger: Ledger) -> Self {
        Self {
            catalog,
            ledger,
            version: 0,
        }
    }

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    pub fn ledger(&self) -> &Ledger {
        &self.ledger
    }

    pub fn into_parts(self) -> (Catalog, Ledger) {
        (self.catalog, self.ledger)
    }
}

impl Aggregate for Stockroom {
    type Command = InventoryCommand;
    type Event = InventoryEvent;
    type Error = DomainError;

    fn version(&self) -> u64 {
        self.version
    }

    fn apply(&mut self, event: &Self::Event) {
        match event {
            InventoryEvent::StockAdjusted(e) => {
                if let Some(product) = self.catalog.get_mut(e.product_code.as_str()) {
                    let applied = match e.direction {
                        Direction::Increase => product.increase_inventory(e.quantity),
                        Direction::Decrease => product.decrease_inventory(e.quantity),
                    };
                    debug_assert!(applied.is_ok(), "event was not decided against this state");
                }
            }
            InventoryEvent::SaleRecorded(e) => {
                if let Some(product) = self.catalog.get_mut(e.sale.product_code.as_str()) {
                    let applied = product.decrease_inventory(e.sale.quantity);
                    debug_assert!(applied.is_ok(), "event was not decided against this state");
                    product.add_units_sold(e.sale.quantity);
                }
                let appended = self.ledger.append(e.sale.clone());
                debug_assert!(appended.is_ok(), "sale events carry a positive quantity");
            }
        }

        // Deterministic version tracking: +1 per applied event.
        self.version += 1;
    }

    fn handle(&self, command: &Self::Command) -> Result<Vec<Self::Event>, Self::Error> {
        match command {
            InventoryCommand::AdjustStock(cmd) => self.handle_adjust(cmd),
            InventoryCommand::RecordSale(cmd) => self.handle_record_sale(cmd),
        }
    }
}

impl Stockroom {
    fn ensure_positive(quantity: u64) -> Result<(), DomainError> {
        if quantity == 0 {
            return Err(DomainError::validation("quantity must be positive"));
        }
        Ok(())
    }

    fn ensure_stock(&self, code: &ProductCode, requested: u64) -> Result<(), DomainError> {
        let product = self
            .catalog
            .get(code.as_str())
            .ok_or_else(|| DomainError::product_not_found(code))?;

        if product.inventory() < requested {
            return Err(DomainError::InsufficientInventory {
                code: code.clone(),
                available: product.inventory(),
                requested,
            });
        }
        Ok(())
    }

    fn handle_adjust(&self, cmd: &AdjustStock) -> Result<Vec<InventoryEvent>, DomainError> {
        Self::ensure_positive(cmd.quantity)?;

        match cmd.direction {
            Direction::Increase => {
                let product = self
                    .catalog
                    .get(cmd.product_code.as_str())
                    .ok_or_else(|| DomainError::product_not_found(&cmd.product_code))?;
                if product.inventory().checked_add(cmd.quantity).is_none() {
                    return Err(DomainError::validation("inventory would overflow"));
                }
            }
            Direction::Decrease => self.ensure_stock(&cmd.product_code, cmd.quantity)?,
        }

        Ok(vec![InventoryEvent::StockAdjusted(StockAdjusted {
            product_code: cmd.product_code.clone(),
            quantity: cmd.quantity,
            direction: cmd.direction,
        })])
    }

    fn handle_record_sale(&self, cmd: &RecordSale) -> Result<Vec<InventoryEvent>, DomainError> {
        Self::ensure_positive(cmd.quantity)?;
        let channel: Channel = cmd.channel.parse()?;
        self.ensure_stock(&cmd.product_code, cmd.quantity)?;

        let sale = SaleEvent::new(
            cmd.timestamp,
            cmd.product_code.clone(),
            cmd.quantity,
            channel,
        )?;

        Ok(vec![InventoryEvent::SaleRecorded(SaleRecorded { sale })])
    }
}
