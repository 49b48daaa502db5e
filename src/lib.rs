pub mod error;
pub mod io;
pub mod models;
pub mod pricing;
pub mod settings;
pub mod visualization;

pub use error::PricingError;
pub use io::{CatalogReader, CatalogWriter};
pub use models::{Catalog, CalculationMethod, PriceMode, PricingConfig, Product};
pub use pricing::{calculate_price, Calculator, PriceEngine, PriceOutcome, PriceResult, Quote};
pub use settings::Settings;
