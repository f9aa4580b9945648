//! `stockbook adjust` / `stockbook sell`.

use std::io::Write;

use anyhow::Result;
use chrono::NaiveDateTime;

use stockbook_infra::InventoryEngine;
use stockbook_infra::store::{CatalogStore, LedgerStore};
use stockbook_inventory::Direction;

pub fn adjust<C, L>(
    out: &mut impl Write,
    engine: &mut InventoryEngine<C, L>,
    code: &str,
    quantity: u64,
    direction: Direction,
) -> Result<()>
where
    C: CatalogStore,
    L: LedgerStore,
{
    let product = engine.adjust_stock(code, quantity, direction)?;
    writeln!(
        out,
        "{} {}: {} by {}, stock now {}.",
        product.code(),
        product.family(),
        direction,
        quantity,
        product.inventory()
    )?;
    Ok(())
}

pub fn sell<C, L>(
    out: &mut impl Write,
    engine: &mut InventoryEngine<C, L>,
    code: &str,
    quantity: u64,
    channel: &str,
    at: NaiveDateTime,
) -> Result<()>
where
    C: CatalogStore,
    L: LedgerStore,
{
    let sale = engine.record_sale(code, quantity, channel, at)?.clone();
    let remaining = engine
        .catalog()
        .get(sale.product_code.as_str())
        .map(|p| p.inventory())
        .unwrap_or_default();
    writeln!(
        out,
        "Sold {} x {} via {}. Stock left: {}.",
        sale.quantity, sale.product_code, sale.channel, remaining
    )?;
    Ok(())
}
