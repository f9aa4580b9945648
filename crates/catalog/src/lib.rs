//! Product catalog domain module.
//!
//! Holds the product table in memory and answers the browsing queries the
//! front end needs (lookup, search, attribute filters). No IO here; loading
//! and saving belong to `stockbook-infra`.

pub mod filter;
pub mod product;

pub use filter::ProductFilter;
pub use product::{Catalog, Product};
