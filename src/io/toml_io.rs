use std::path::Path;

use crate::error::PricingError;
use crate::models::Catalog;

use super::csv_io::name_from_path;

/// Read a product catalog from a TOML file of `[[products]]` tables.
pub fn read_toml(path: impl AsRef<Path>) -> Result<Catalog, PricingError> {
    let path = path.as_ref();
    let content = std::fs::read_to_string(path)?;
    let mut catalog: Catalog = toml::from_str(&content)?;
    if catalog.name.is_empty() {
        catalog.name = name_from_path(path);
    }
    catalog.validate()?;
    Ok(catalog)
}

/// Write a product catalog as TOML.
pub fn write_toml(catalog: &Catalog, path: impl AsRef<Path>) -> Result<(), PricingError> {
    let content = toml::to_string_pretty(catalog)?;
    std::fs::write(path.as_ref(), content)?;
    Ok(())
}
