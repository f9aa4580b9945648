use std::collections::HashMap;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use stockbook_core::{DomainError, DomainResult, ProductCode};

use crate::filter::ProductFilter;

/// One row of the product table.
///
/// `inventory` and `cumulative_sales` are unsigned, so the non-negative
/// invariants hold by construction; the mutators below keep them that way
/// without wrapping.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Product {
    code: ProductCode,
    family: String,
    color: String,
    size: String,
    inventory: u64,
    price: Decimal,
    cost: Decimal,
    cumulative_sales: u64,
}

impl Product {
    /// Build a product with no recorded sales.
    ///
    /// Price and cost must be non-negative.
    pub fn new(
        code: ProductCode,
        family: impl Into<String>,
        color: impl Into<String>,
        size: impl Into<String>,
        inventory: u64,
        price: Decimal,
        cost: Decimal,
    ) -> DomainResult<Self> {
        if price.is_sign_negative() && !price.is_zero() {
            return Err(DomainError::validation(format!(
                "price of {code} cannot be negative"
            )));
        }
        if cost.is_sign_negative() && !cost.is_zero() {
            return Err(DomainError::validation(format!(
                "cost of {code} cannot be negative"
            )));
        }

        Ok(Self {
            code,
            family: family.into(),
            color: color.into(),
            size: size.into(),
            inventory,
            price,
            cost,
            cumulative_sales: 0,
        })
    }

    /// Set the running sales total (used when loading a persisted table).
    pub fn with_cumulative_sales(mut self, cumulative_sales: u64) -> Self {
        self.cumulative_sales = cumulative_sales;
        self
    }

    pub fn code(&self) -> &ProductCode {
        &self.code
    }

    pub fn family(&self) -> &str {
        &self.family
    }

    pub fn color(&self) -> &str {
        &self.color
    }

    pub fn size(&self) -> &str {
        &self.size
    }

    pub fn inventory(&self) -> u64 {
        self.inventory
    }

    pub fn price(&self) -> Decimal {
        self.price
    }

    pub fn cost(&self) -> Decimal {
        self.cost
    }

    pub fn cumulative_sales(&self) -> u64 {
        self.cumulative_sales
    }

    /// Profit earned on a single unit.
    pub fn unit_profit(&self) -> Decimal {
        self.price - self.cost
    }

    /// Add units to stock.
    pub fn increase_inventory(&mut self, quantity: u64) -> DomainResult<()> {
        self.inventory = self
            .inventory
            .checked_add(quantity)
            .ok_or_else(|| DomainError::validation(format!("inventory of {} overflows", self.code)))?;
        Ok(())
    }

    /// Remove units from stock. Fails without touching state when stock is short.
    pub fn decrease_inventory(&mut self, quantity: u64) -> DomainResult<()> {
        if self.inventory < quantity {
            return Err(DomainError::InsufficientInventory {
                code: self.code.clone(),
                available: self.inventory,
                requested: quantity,
            });
        }
        self.inventory -= quantity;
        Ok(())
    }

    /// Bump the running sales total.
    pub fn add_units_sold(&mut self, quantity: u64) {
        self.cumulative_sales = self.cumulative_sales.saturating_add(quantity);
    }
}

/// In-memory product table.
///
/// Keeps rows in load order (so a save writes them back the way they came)
/// plus an index by code. Codes are unique.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Catalog {
    products: Vec<Product>,
    index: HashMap<ProductCode, usize>,
}

impl Catalog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a catalog from rows, rejecting duplicate codes.
    pub fn from_products(products: impl IntoIterator<Item = Product>) -> DomainResult<Self> {
        let mut catalog = Self::new();
        for product in products {
            catalog.insert(product)?;
        }
        Ok(catalog)
    }

    /// Append a product. Fails if its code is already present.
    pub fn insert(&mut self, product: Product) -> DomainResult<()> {
        if self.index.contains_key(product.code()) {
            return Err(DomainError::validation(format!(
                "duplicate product code {}",
                product.code()
            )));
        }
        self.index.insert(product.code().clone(), self.products.len());
        self.products.push(product);
        Ok(())
    }

    pub fn get(&self, code: &str) -> Option<&Product> {
        self.index.get(code).map(|&i| &self.products[i])
    }

    pub fn get_mut(&mut self, code: &str) -> Option<&mut Product> {
        self.index.get(code).map(|&i| &mut self.products[i])
    }

    pub fn contains(&self, code: &str) -> bool {
        self.index.contains_key(code)
    }

    pub fn products(&self) -> &[Product] {
        &self.products
    }

    pub fn iter(&self) -> impl Iterator<Item = &Product> {
        self.products.iter()
    }

    pub fn len(&self) -> usize {
        self.products.len()
    }

    pub fn is_empty(&self) -> bool {
        self.products.is_empty()
    }

    /// Case-insensitive substring search over code and family.
    ///
    /// A blank query matches everything.
    pub fn search(&self, query: &str) -> Vec<&Product> {
        let needle = query.trim().to_lowercase();
        if needle.is_empty() {
            return self.products.iter().collect();
        }
        self.products
            .iter()
            .filter(|p| {
                p.code().as_str().to_lowercase().contains(&needle)
                    || p.family().to_lowercase().contains(&needle)
            })
            .collect()
    }

    /// Products matching every set attribute of `filter`.
    pub fn filter(&self, filter: &ProductFilter) -> Vec<&Product> {
        self.products.iter().filter(|p| filter.matches(p)).collect()
    }

    /// Distinct families in first-seen order.
    pub fn families(&self) -> Vec<&str> {
        distinct(self.products.iter().map(Product::family))
    }

    /// Distinct colors in first-seen order.
    pub fn colors(&self) -> Vec<&str> {
        distinct(self.products.iter().map(Product::color))
    }

    /// Distinct sizes in first-seen order.
    pub fn sizes(&self) -> Vec<&str> {
        distinct(self.products.iter().map(Product::size))
    }
}

fn distinct<'a>(values: impl Iterator<Item = &'a str>) -> Vec<&'a str> {
    let mut out: Vec<&str> = Vec::new();
    for v in values {
        if !out.contains(&v) {
            out.push(v);
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn code(s: &str) -> ProductCode {
        ProductCode::new(s).unwrap()
    }

    fn product(c: &str, family: &str, color: &str, size: &str, inventory: u64) -> Product {
        Product::new(
            code(c),
            family,
            color,
            size,
            inventory,
            Decimal::from(100),
            Decimal::from(60),
        )
        .unwrap()
    }

    fn sample() -> Catalog {
        Catalog::from_products(vec![
            product("BLU-01", "Blusa", "Negro", "S", 4),
            product("BLU-02", "Blusa", "Blanco", "M", 0),
            product("PAN-01", "Pantalon", "Negro", "M", 9),
            product("VES-01", "Vestido", "Rojo", "L", 2),
        ])
        .unwrap()
    }

    #[test]
    fn negative_price_is_rejected() {
        let err = Product::new(
            code("X"),
            "F",
            "C",
            "S",
            1,
            Decimal::from(-1),
            Decimal::ZERO,
        )
        .unwrap_err();
        assert!(matches!(err, DomainError::Validation(_)));
    }

    #[test]
    fn duplicate_codes_are_rejected() {
        let err = Catalog::from_products(vec![
            product("A1", "F", "C", "S", 1),
            product("A1", "G", "D", "M", 2),
        ])
        .unwrap_err();
        match err {
            DomainError::Validation(msg) if msg.contains("duplicate product code A1") => {}
            other => panic!("Expected duplicate-code validation error, got {other:?}"),
        }
    }

    #[test]
    fn decrease_fails_without_mutation_when_short() {
        let mut p = product("A1", "F", "C", "S", 3);
        let err = p.decrease_inventory(4).unwrap_err();
        assert_eq!(
            err,
            DomainError::InsufficientInventory {
                code: code("A1"),
                available: 3,
                requested: 4,
            }
        );
        assert_eq!(p.inventory(), 3);

        p.decrease_inventory(3).unwrap();
        assert_eq!(p.inventory(), 0);
    }

    #[test]
    fn lookup_preserves_load_order() {
        let catalog = sample();
        let codes: Vec<&str> = catalog.iter().map(|p| p.code().as_str()).collect();
        assert_eq!(codes, vec!["BLU-01", "BLU-02", "PAN-01", "VES-01"]);
        assert_eq!(catalog.get("PAN-01").unwrap().inventory(), 9);
        assert!(catalog.get("nope").is_none());
    }

    #[test]
    fn search_matches_code_or_family_case_insensitively() {
        let catalog = sample();
        let hits: Vec<&str> = catalog
            .search("blu")
            .iter()
            .map(|p| p.code().as_str())
            .collect();
        assert_eq!(hits, vec!["BLU-01", "BLU-02"]);

        let hits: Vec<&str> = catalog
            .search("VESTIDO")
            .iter()
            .map(|p| p.code().as_str())
            .collect();
        assert_eq!(hits, vec!["VES-01"]);

        assert_eq!(catalog.search("  ").len(), 4);
    }

    #[test]
    fn filter_combines_attributes() {
        let catalog = sample();
        let filter = ProductFilter::default().color("Negro").size("M");
        let hits: Vec<&str> = catalog
            .filter(&filter)
            .iter()
            .map(|p| p.code().as_str())
            .collect();
        assert_eq!(hits, vec!["PAN-01"]);

        assert_eq!(catalog.filter(&ProductFilter::default()).len(), 4);
    }

    #[test]
    fn distinct_values_keep_first_seen_order() {
        let catalog = sample();
        assert_eq!(catalog.families(), vec!["Blusa", "Pantalon", "Vestido"]);
        assert_eq!(catalog.colors(), vec!["Negro", "Blanco", "Rojo"]);
        assert_eq!(catalog.sizes(), vec!["S", "M", "L"]);
    }

    mod proptest_tests {
        use super::*;
        use proptest::prelude::*;

        proptest! {
            /// Property: inventory never goes negative, whatever sequence of
            /// increases and decreases is attempted.
            #[test]
            fn inventory_never_negative(
                start in 0u64..100,
                ops in proptest::collection::vec((any::<bool>(), 1u64..50), 0..40)
            ) {
                let mut p = product("A1", "F", "C", "S", start);
                let mut expected = start;
                for (increase, q) in ops {
                    if increase {
                        p.increase_inventory(q).unwrap();
                        expected += q;
                    } else if p.decrease_inventory(q).is_ok() {
                        expected -= q;
                    }
                    prop_assert_eq!(p.inventory(), expected);
                }
            }

            /// Property: every filtered product matches the filter.
            #[test]
            fn filter_results_all_match(
                family in proptest::option::of("Blusa|Pantalon|Vestido"),
                color in proptest::option::of("Negro|Blanco|Rojo"),
            ) {
                let catalog = sample();
                let filter = ProductFilter { family, color, size: None };
                for p in catalog.filter(&filter) {
                    prop_assert!(filter.matches(p));
                }
            }
        }
    }
}
