use std::io::{BufReader, Read, Write};
use std::path::{Path, PathBuf};

use chrono::{NaiveDate, NaiveDateTime};

use stockbook_core::ProductCode;
use stockbook_sales::{Channel, Ledger, SaleEvent};

use super::file::{open_existing, replace_atomically};
use super::r#trait::{LedgerStore, StoreError};
use super::table::{HeaderIndex, cell, csv_error, encode_error, parse_count};

const TABLE: &str = "sales";

pub const LEDGER_COLUMNS: [&str; 4] = ["Fecha", "CODIGO", "Cantidad", "Canal"];

/// Timestamp format written to the `Fecha` column.
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S%.f";

const ACCEPTED_TIMESTAMP_FORMATS: [&str; 4] = [
    TIMESTAMP_FORMAT,
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M",
    "%d/%m/%Y %H:%M:%S",
];

/// Parse a `Fecha` cell. A bare date is read as midnight.
pub fn parse_timestamp(raw: &str) -> Option<NaiveDateTime> {
    ACCEPTED_TIMESTAMP_FORMATS
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(raw, fmt).ok())
        .or_else(|| {
            NaiveDate::parse_from_str(raw, "%Y-%m-%d")
                .ok()
                .and_then(|d| d.and_hms_opt(0, 0, 0))
        })
}

/// Decode a sales ledger. A file with no header at all is an empty ledger.
pub fn read_ledger<R: Read>(reader: R) -> Result<Ledger, StoreError> {
    let mut rdr = csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .from_reader(reader);

    let headers = rdr.headers().map_err(|e| csv_error(TABLE, e))?.clone();
    if headers.is_empty() {
        return Ok(Ledger::new());
    }
    let index = HeaderIndex::new(TABLE, &headers);
    let (ts_col, code_col, qty_col, channel_col) = (
        index.required("Fecha")?,
        index.required("CODIGO")?,
        index.required("Cantidad")?,
        index.required("Canal")?,
    );

    let mut ledger = Ledger::new();
    for result in rdr.records() {
        let record = result.map_err(|e| csv_error(TABLE, e))?;
        let line = record.position().map(|p| p.line()).unwrap_or(0);
        if record.iter().all(|f| f.trim().is_empty()) {
            continue;
        }

        let malformed = |reason: String| StoreError::Malformed {
            table: TABLE,
            line,
            reason,
        };

        let raw_ts = cell(&record, ts_col);
        let timestamp = parse_timestamp(raw_ts)
            .ok_or_else(|| malformed(format!("Fecha: {raw_ts:?} is not a date-time")))?;
        let code =
            ProductCode::new(cell(&record, code_col)).map_err(|e| malformed(e.to_string()))?;
        let quantity = parse_count(cell(&record, qty_col))
            .map_err(|r| malformed(format!("Cantidad: {r}")))?;
        let channel: Channel = cell(&record, channel_col)
            .parse()
            .map_err(|e: stockbook_core::DomainError| malformed(e.to_string()))?;

        let event = SaleEvent::new(timestamp, code, quantity, channel)
            .map_err(|e| malformed(e.to_string()))?;
        ledger.append(event).map_err(|e| malformed(e.to_string()))?;
    }

    Ok(ledger)
}

/// Encode a sales ledger in recording order.
pub fn write_ledger<W: Write>(writer: W, ledger: &Ledger) -> Result<(), StoreError> {
    let mut wtr = csv::Writer::from_writer(writer);
    wtr.write_record(LEDGER_COLUMNS)
        .map_err(|e| encode_error(TABLE, e))?;

    for sale in ledger.iter() {
        let timestamp = sale.timestamp.format(TIMESTAMP_FORMAT).to_string();
        let quantity = sale.quantity.to_string();
        wtr.write_record([
            timestamp.as_str(),
            sale.product_code.as_str(),
            quantity.as_str(),
            sale.channel.as_str(),
        ])
        .map_err(|e| encode_error(TABLE, e))?;
    }

    wtr.flush().map_err(|e| encode_error(TABLE, e))
}

/// Sales ledger persisted as a CSV file.
#[derive(Debug, Clone)]
pub struct CsvLedgerStore {
    path: PathBuf,
}

impl CsvLedgerStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl LedgerStore for CsvLedgerStore {
    fn load(&self) -> Result<Ledger, StoreError> {
        let file = open_existing(&self.path)?;
        let ledger = read_ledger(BufReader::new(file))?;
        tracing::debug!(path = %self.path.display(), sales = ledger.len(), "ledger loaded");
        Ok(ledger)
    }

    fn save(&self, ledger: &Ledger) -> Result<(), StoreError> {
        let mut buf = Vec::new();
        write_ledger(&mut buf, ledger)?;
        replace_atomically(&self.path, &buf)?;
        tracing::debug!(path = %self.path.display(), sales = ledger.len(), "ledger saved");
        Ok(())
    }
}
