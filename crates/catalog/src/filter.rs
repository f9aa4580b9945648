use serde::{Deserialize, Serialize};

use crate::product::Product;

/// Attribute filter over the catalog. `None` means "any value".
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProductFilter {
    pub family: Option<String>,
    pub color: Option<String>,
    pub size: Option<String>,
}

impl ProductFilter {
    pub fn family(mut self, family: impl Into<String>) -> Self {
        self.family = Some(family.into());
        self
    }

    pub fn color(mut self, color: impl Into<String>) -> Self {
        self.color = Some(color.into());
        self
    }

    pub fn size(mut self, size: impl Into<String>) -> Self {
        self.size = Some(size.into());
        self
    }

    pub fn is_empty(&self) -> bool {
        self.family.is_none() && self.color.is_none() && self.size.is_none()
    }

    pub fn matches(&self, product: &Product) -> bool {
        fn accepts(wanted: &Option<String>, actual: &str) -> bool {
            wanted.as_deref().is_none_or(|w| w == actual)
        }

        accepts(&self.family, product.family())
            && accepts(&self.color, product.color())
            && accepts(&self.size, product.size())
    }
}
