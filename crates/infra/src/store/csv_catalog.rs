use std::io::{BufReader, Read, Write};
use std::path::{Path, PathBuf};

use stockbook_catalog::{Catalog, Product};
use stockbook_core::ProductCode;

use super::file::{open_existing, replace_atomically};
use super::r#trait::{CatalogStore, StoreError};
use super::table::{HeaderIndex, cell, csv_error, encode_error, parse_count, parse_decimal};

const TABLE: &str = "products";

/// Column order written by [`write_catalog`]. `Ventas` is optional on read.
pub const CATALOG_COLUMNS: [&str; 8] = [
    "CODIGO",
    "Familia",
    "Color",
    "Talla",
    "Inventario",
    "Precio",
    "costo",
    "Ventas",
];

struct Columns {
    code: usize,
    family: usize,
    color: usize,
    size: usize,
    inventory: usize,
    price: usize,
    cost: usize,
    sales: Option<usize>,
}

impl Columns {
    fn resolve(index: &HeaderIndex) -> Result<Self, StoreError> {
        Ok(Self {
            code: index.required("CODIGO")?,
            family: index.required("Familia")?,
            color: index.required("Color")?,
            size: index.required("Talla")?,
            inventory: index.required("Inventario")?,
            price: index.required("Precio")?,
            cost: index.required("costo")?,
            sales: index.optional("Ventas"),
        })
    }
}

/// Decode a product table. A file with no header at all is an empty catalog.
pub fn read_catalog<R: Read>(reader: R) -> Result<Catalog, StoreError> {
    let mut rdr = csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .from_reader(reader);

    let headers = rdr.headers().map_err(|e| csv_error(TABLE, e))?.clone();
    if headers.is_empty() {
        return Ok(Catalog::new());
    }
    let cols = Columns::resolve(&HeaderIndex::new(TABLE, &headers))?;

    let mut catalog = Catalog::new();
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

        let code =
            ProductCode::new(cell(&record, cols.code)).map_err(|e| malformed(e.to_string()))?;
        let inventory = parse_count(cell(&record, cols.inventory))
            .map_err(|r| malformed(format!("Inventario: {r}")))?;
        let price = parse_decimal(cell(&record, cols.price))
            .map_err(|r| malformed(format!("Precio: {r}")))?;
        let cost = parse_decimal(cell(&record, cols.cost))
            .map_err(|r| malformed(format!("costo: {r}")))?;
        let sales = match cols.sales.map(|i| cell(&record, i)) {
            None | Some("") => 0,
            Some(raw) => parse_count(raw).map_err(|r| malformed(format!("Ventas: {r}")))?,
        };

        let product = Product::new(
            code,
            cell(&record, cols.family),
            cell(&record, cols.color),
            cell(&record, cols.size),
            inventory,
            price,
            cost,
        )
        .map_err(|e| malformed(e.to_string()))?
        .with_cumulative_sales(sales);

        catalog
            .insert(product)
            .map_err(|e| malformed(e.to_string()))?;
    }

    Ok(catalog)
}

/// Encode a product table, always including the `Ventas` column.
pub fn write_catalog<W: Write>(writer: W, catalog: &Catalog) -> Result<(), StoreError> {
    let mut wtr = csv::Writer::from_writer(writer);
    wtr.write_record(CATALOG_COLUMNS)
        .map_err(|e| encode_error(TABLE, e))?;

    for p in catalog.iter() {
        let inventory = p.inventory().to_string();
        let price = p.price().to_string();
        let cost = p.cost().to_string();
        let sales = p.cumulative_sales().to_string();
        wtr.write_record([
            p.code().as_str(),
            p.family(),
            p.color(),
            p.size(),
            inventory.as_str(),
            price.as_str(),
            cost.as_str(),
            sales.as_str(),
        ])
        .map_err(|e| encode_error(TABLE, e))?;
    }

    wtr.flush().map_err(|e| encode_error(TABLE, e))
}

/// Product table persisted as a CSV file.
#[derive(Debug, Clone)]
pub struct CsvCatalogStore {
    path: PathBuf,
}

impl CsvCatalogStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl CatalogStore for CsvCatalogStore {
    fn load(&self) -> Result<Catalog, StoreError> {
        let file = open_existing(&self.path)?;
        let catalog = read_catalog(BufReader::new(file))?;
        tracing::debug!(path = %self.path.display(), products = catalog.len(), "catalog loaded");
        Ok(catalog)
    }

    fn save(&self, catalog: &Catalog) -> Result<(), StoreError> {
        let mut buf = Vec::new();
        write_catalog(&mut buf, catalog)?;
        replace_atomically(&self.path, &buf)?;
        tracing::debug!(path = %self.path.display(), products = catalog.len(), "catalog saved");
        Ok(())
    }
}
