//! `stockbook sales`: ledger table view.

use std::io::Write;

use anyhow::Result;

use stockbook_infra::store::csv_ledger::TIMESTAMP_FORMAT;
use stockbook_sales::Ledger;

pub fn list(out: &mut impl Write, ledger: &Ledger) -> Result<()> {
    if ledger.is_empty() {
        writeln!(out, "No sales recorded.")?;
        return Ok(());
    }

    writeln!(out, "{:26} {:12} {:>8} {:12}", "DATE", "CODE", "QTY", "CHANNEL")?;
    for sale in ledger.iter() {
        writeln!(
            out,
            "{:26} {:12} {:>8} {:12}",
            sale.timestamp.format(TIMESTAMP_FORMAT).to_string(),
            sale.product_code.as_str(),
            sale.quantity,
            sale.channel.as_str()
        )?;
    }
    writeln!(out, "{} sales", ledger.len())?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::fixtures::{at, engine, output};

    #[test]
    fn lists_sales_in_recording_order() {
        let mut engine = engine();
        engine.record_sale("B1", 1, "instagram", at(20, 9)).unwrap();
        engine.record_sale("A1", 2, "Shopify", at(20, 11)).unwrap();

        let mut buf = Vec::new();
        list(&mut buf, engine.ledger()).unwrap();
        let text = output(buf);
        let lines: Vec<&str> = text.lines().collect();

        assert_eq!(lines.len(), 4);
        assert!(lines[1].starts_with("2024-11-20 09:00:00"));
        assert!(lines[1].contains("Instagram"));
        assert!(lines[2].contains("A1"));
        assert_eq!(lines[3], "2 sales");
    }

    #[test]
    fn empty_ledger_says_so() {
        let mut buf = Vec::new();
        list(&mut buf, &Ledger::new()).unwrap();
        assert_eq!(output(buf), "No sales recorded.\n");
    }
}
