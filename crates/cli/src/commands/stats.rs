//! `stockbook stats`: sales summary.

use std::io::Write;

use anyhow::Result;

use stockbook_stats::{Dimension, GroupTotal, SeriesShape, Statistics, StatisticsReport};

pub fn print_json(out: &mut impl Write, report: &StatisticsReport) -> Result<()> {
    writeln!(out, "{}", serde_json::to_string_pretty(report)?)?;
    Ok(())
}

pub fn print_summary(out: &mut impl Write, stats: &Statistics<'_>) -> Result<()> {
    let unmatched = stats.unmatched_sales();
    if !unmatched.is_empty() {
        let units = unmatched.iter().map(|s| s.quantity).fold(0, u64::saturating_add);
        tracing::warn!(
            rows = unmatched.len(),
            units,
            "sales reference products missing from the catalog"
        );
        writeln!(
            out,
            "Warning: {} sale(s) ({} units) reference unknown products; excluded from profit and top groups.",
            unmatched.len(),
            units
        )?;
    }

    let total = stats.total_units_sold();
    if total == 0 {
        writeln!(out, "No sales recorded yet.")?;
        return Ok(());
    }

    writeln!(out, "Units sold:    {total}")?;
    match stats.total_profit() {
        Some(profit) => writeln!(out, "Total profit:  {}", profit.round_dp(2))?,
        None => writeln!(out, "Total profit:  -")?,
    }
    match stats.margin_percent() {
        Some(margin) => writeln!(out, "Margin:        {}%", margin.round_dp(1))?,
        None => writeln!(out, "Margin:        -")?,
    }

    writeln!(out)?;
    for (label, dimension) in [
        ("Top family:", Dimension::Family),
        ("Top size:", Dimension::Size),
        ("Top color:", Dimension::Color),
    ] {
        writeln!(out, "{label:14} {}", describe(stats.top_by_dimension(dimension)))?;
    }

    let daily = stats.daily_series();
    writeln!(out)?;
    writeln!(out, "Sales by day:")?;
    if daily.shape() != SeriesShape::Trend {
        writeln!(out, "  (fewer than two days of sales; no trend to show)")?;
    }
    for point in daily.points() {
        writeln!(out, "  {}  {:>6}", point.key, point.quantity)?;
    }

    writeln!(out)?;
    writeln!(out, "Sales by hour:")?;
    for point in stats.hourly_series().points() {
        writeln!(out, "  {:02}:00  {:>6}", point.key, point.quantity)?;
    }

    writeln!(out)?;
    writeln!(out, "Sales by channel:")?;
    for share in stats.channel_distribution() {
        writeln!(
            out,
            "  {:12} {:>6}  {:>5}%",
            share.channel.as_str(),
            share.quantity,
            share.percent.round_dp(1)
        )?;
    }

    Ok(())
}

fn describe(top: Option<GroupTotal>) -> String {
    match top {
        Some(g) => format!("{} ({} units)", g.group, g.quantity),
        None => "-".to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::fixtures::{at, engine, output};
    use stockbook_catalog::Catalog;
    use stockbook_core::ProductCode;
    use stockbook_sales::{Channel, Ledger, SaleEvent};

    #[test]
    fn summary_with_one_day_notes_missing_trend() {
        let mut engine = engine();
        engine.record_sale("A1", 3, "Shopify", at(20, 15)).unwrap();

        let mut buf = Vec::new();
        print_summary(&mut buf, &engine.statistics()).unwrap();
        let text = output(buf);

        assert!(text.contains("Units sold:    3"));
        assert!(text.contains("Total profit:  120"));
        assert!(text.contains("Margin:        40"));
        assert!(text.contains("Top family:    Blusa (3 units)"));
        assert!(text.contains("no trend to show"));
        assert!(text.contains("  2024-11-20       3"));
        assert!(text.contains("  15:00       3"));
        assert!(text.contains("Shopify"));
        assert!(!text.contains("Warning"));
    }

    #[test]
    fn summary_over_two_days_has_no_fallback_note() {
        let mut engine = engine();
        engine.record_sale("A1", 5, "Shopify", at(20, 10)).unwrap();
        engine.record_sale("B1", 4, "Instagram", at(21, 11)).unwrap();

        let mut buf = Vec::new();
        print_summary(&mut buf, &engine.statistics()).unwrap();
        let text = output(buf);
        assert!(!text.contains("no trend to show"));
        assert!(text.contains("Units sold:    9"));
    }

    #[test]
    fn empty_ledger_reports_no_data() {
        let engine = engine();
        let mut buf = Vec::new();
        print_summary(&mut buf, &engine.statistics()).unwrap();
        assert_eq!(output(buf), "No sales recorded yet.\n");
    }

    #[test]
    fn unmatched_sales_produce_a_warning() {
        let catalog = Catalog::new();
        let ledger = Ledger::from_events(vec![
            SaleEvent::new(at(20, 9), ProductCode::new("GONE").unwrap(), 2, Channel::Showroom)
                .unwrap(),
        ])
        .unwrap();

        let mut buf = Vec::new();
        print_summary(&mut buf, &Statistics::new(&catalog, &ledger)).unwrap();
        let text = output(buf);
        assert!(text.starts_with("Warning: 1 sale(s) (2 units)"));
        assert!(text.contains("Total profit:  -"));
        assert!(text.contains("Top family:    -"));
    }

    #[test]
    fn json_report_is_parseable() {
        let mut engine = engine();
        engine.record_sale("A1", 3, "Shopify", at(20, 15)).unwrap();

        let mut buf = Vec::new();
        print_json(&mut buf, &engine.statistics().report()).unwrap();
        let value: serde_json::Value = serde_json::from_slice(&buf).unwrap();
        assert_eq!(value["total_units_sold"], 3);
        assert_eq!(value["top_family"]["group"], "Blusa");
    }
}
