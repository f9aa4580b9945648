//! Helpers shared by the CSV table codecs.

use core::str::FromStr;

use csv::StringRecord;
use rust_decimal::Decimal;
use rust_decimal::prelude::ToPrimitive;

use super::r#trait::StoreError;

/// Positions of named columns in a header row.
///
/// Matching is case-insensitive and ignores surrounding whitespace and a
/// UTF-8 BOM, so tables exported by spreadsheet tools load unchanged.
pub(crate) struct HeaderIndex {
    table: &'static str,
    names: Vec<String>,
}

impl HeaderIndex {
    pub(crate) fn new(table: &'static str, headers: &StringRecord) -> Self {
        let names = headers
            .iter()
            .map(|h| h.trim_start_matches('\u{FEFF}').trim().to_lowercase())
            .collect();
        Self { table, names }
    }

    pub(crate) fn optional(&self, name: &str) -> Option<usize> {
        let wanted = name.to_lowercase();
        self.names.iter().position(|n| *n == wanted)
    }

    pub(crate) fn required(&self, name: &str) -> Result<usize, StoreError> {
        self.optional(name).ok_or_else(|| StoreError::Malformed {
            table: self.table,
            line: 1,
            reason: format!("missing column {name}"),
        })
    }
}

/// Trimmed cell at `idx`; empty string when the row is short.
pub(crate) fn cell(record: &StringRecord, idx: usize) -> &str {
    record.get(idx).map(str::trim).unwrap_or("")
}

/// Parse a non-negative whole number. Spreadsheet exports often write counts
/// as `7.0`, so a decimal with no fractional part is accepted too.
pub(crate) fn parse_count(raw: &str) -> Result<u64, String> {
    if let Ok(n) = raw.parse::<u64>() {
        return Ok(n);
    }
    let d = Decimal::from_str(raw).map_err(|_| format!("{raw:?} is not a number"))?;
    if !d.fract().is_zero() {
        return Err(format!("{raw:?} is not a whole number"));
    }
    d.to_u64()
        .ok_or_else(|| format!("{raw:?} is not a non-negative count"))
}

pub(crate) fn parse_decimal(raw: &str) -> Result<Decimal, String> {
    Decimal::from_str(raw)
        .or_else(|_| Decimal::from_scientific(raw))
        .map_err(|_| format!("{raw:?} is not a decimal number"))
}

pub(crate) fn csv_error(table: &'static str, err: csv::Error) -> StoreError {
    let line = err.position().map(|p| p.line()).unwrap_or(0);
    StoreError::Malformed {
        table,
        line,
        reason: err.to_string(),
    }
}

pub(crate) fn encode_error(table: &'static str, err: impl core::fmt::Display) -> StoreError {
    StoreError::Unavailable(format!("could not encode {table} table: {err}"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn counts_accept_spreadsheet_floats() {
        assert_eq!(parse_count("7"), Ok(7));
        assert_eq!(parse_count("7.0"), Ok(7));
        assert!(parse_count("7.5").is_err());
        assert!(parse_count("-1").is_err());
        assert!(parse_count("siete").is_err());
    }

    #[test]
    fn headers_match_case_insensitively_and_skip_bom() {
        let headers = StringRecord::from(vec!["\u{FEFF}codigo", " Familia ", "COSTO"]);
        let index = HeaderIndex::new("products", &headers);
        assert_eq!(index.required("CODIGO").unwrap(), 0);
        assert_eq!(index.required("Familia").unwrap(), 1);
        assert_eq!(index.optional("costo"), Some(2));
        assert!(index.optional("Ventas").is_none());
        assert!(matches!(
            index.required("Talla"),
            Err(StoreError::Malformed { line: 1, .. })
        ));
    }
}
