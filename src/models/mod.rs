mod config;
mod product;
mod catalog;

pub use config::{CalculationMethod, PricingConfig};
pub use product::{PriceMode, Product};
pub use catalog::Catalog;
