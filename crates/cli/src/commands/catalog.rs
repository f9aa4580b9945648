//! `stockbook catalog`: product table view.

use std::io::Write;

use anyhow::Result;

use stockbook_catalog::{Catalog, Product, ProductFilter};

/// Attribute filters plus free-text search, all optional.
#[derive(Debug, Clone, Default)]
pub struct CatalogQuery {
    pub family: Option<String>,
    pub color: Option<String>,
    pub size: Option<String>,
    pub search: Option<String>,
}

impl CatalogQuery {
    fn filter(&self) -> ProductFilter {
        ProductFilter {
            family: self.family.clone(),
            color: self.color.clone(),
            size: self.size.clone(),
        }
    }

    /// Products matching the search text (if any) and every set attribute.
    pub fn select<'a>(&self, catalog: &'a Catalog) -> Vec<&'a Product> {
        let filter = self.filter();
        let candidates = match self.search.as_deref() {
            Some(q) => catalog.search(q),
            None => catalog.iter().collect(),
        };
        candidates.into_iter().filter(|p| filter.matches(p)).collect()
    }
}

pub fn list(out: &mut impl Write, catalog: &Catalog, query: &CatalogQuery) -> Result<()> {
    if catalog.is_empty() {
        writeln!(out, "No products loaded.")?;
        return Ok(());
    }

    let products = query.select(catalog);
    if products.is_empty() {
        writeln!(out, "No products match.")?;
        return Ok(());
    }

    writeln!(
        out,
        "{:12} {:14} {:10} {:6} {:>6} {:>10} {:>10} {:>6}",
        "CODE", "FAMILY", "COLOR", "SIZE", "STOCK", "PRICE", "COST", "SOLD"
    )?;
    for p in &products {
        writeln!(
            out,
            "{:12} {:14} {:10} {:6} {:>6} {:>10} {:>10} {:>6}",
            p.code().as_str(),
            p.family(),
            p.color(),
            p.size(),
            p.inventory(),
            p.price(),
            p.cost(),
            p.cumulative_sales()
        )?;
    }
    writeln!(out, "{} of {} products", products.len(), catalog.len())?;
    Ok(())
}
