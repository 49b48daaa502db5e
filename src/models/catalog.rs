use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use super::Product;
use crate::error::PricingError;

/// A complete product catalog, as exported from the back office.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Catalog {
    /// Name or identifier for this catalog
    #[serde(default)]
    pub name: String,
    /// All products in the catalog
    #[serde(default)]
    pub products: Vec<Product>,
}

impl Catalog {
    /// Create a new empty catalog.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            products: Vec::new(),
        }
    }

    /// Look up a product by id.
    pub fn find(&self, id: &str) -> Option<&Product> {
        self.products.iter().find(|p| p.id == id)
    }

    /// Like [`Catalog::find`], but a missing product is a `PricingError::NotFound`.
    pub fn get(&self, id: &str) -> Result<&Product, PricingError> {
        self.find(id)
            .ok_or_else(|| PricingError::NotFound(format!("product '{id}'")))
    }

    /// All distinct categories, sorted.
    pub fn categories(&self) -> Vec<String> {
        let mut categories: Vec<String> =
            self.products.iter().map(|p| p.category.clone()).collect();
        categories.sort();
        categories.dedup();
        categories
    }

    /// Products of one category, in catalog order.
    pub fn in_category<'a>(&'a self, category: &'a str) -> impl Iterator<Item = &'a Product> + 'a {
        self.products.iter().filter(move |p| p.category == category)
    }

    /// Total number of products.
    pub fn num_products(&self) -> usize {
        self.products.len()
    }

    /// Validate every product and reject duplicate ids.
    pub fn validate(&self) -> Result<(), PricingError> {
        let mut seen = HashSet::new();
        for product in &self.products {
            product.validate()?;
            if !seen.insert(product.id.as_str()) {
                return Err(PricingError::ValidationError(format!(
                    "Duplicate product id '{}'",
                    product.id
                )));
            }
        }
        Ok(())
    }
}
