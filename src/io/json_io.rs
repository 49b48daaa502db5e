use std::path::Path;

use crate::error::PricingError;
use crate::models::Catalog;

use super::csv_io::name_from_path;

fn finish(mut catalog: Catalog, fallback_name: &str) -> Result<Catalog, PricingError> {
    if catalog.name.is_empty() {
        catalog.name = fallback_name.to_string();
    }
    catalog.validate()?;
    Ok(catalog)
}

/// Read a product catalog from a JSON file.
///
/// An unnamed catalog takes the file stem as its name.
pub fn read_json(path: impl AsRef<Path>) -> Result<Catalog, PricingError> {
    let path = path.as_ref();
    let content = std::fs::read_to_string(path)?;
    let catalog: Catalog = serde_json::from_str(&content)?;
    finish(catalog, &name_from_path(path))
}

/// Read a product catalog from JSON bytes.
pub fn read_json_from_bytes(data: &[u8], name: &str) -> Result<Catalog, PricingError> {
    let content = std::str::from_utf8(data)
        .map_err(|e| PricingError::ParseError(format!("Invalid UTF-8: {e}")))?;
    let mut catalog: Catalog = serde_json::from_str(content)?;
    catalog.name = name.to_string();
    finish(catalog, name)
}

/// Write a product catalog to a JSON file.
pub fn write_json(
    catalog: &Catalog,
    path: impl AsRef<Path>,
    pretty: bool,
) -> Result<(), PricingError> {
    let content = if pretty {
        serde_json::to_string_pretty(catalog)?
    } else {
        serde_json::to_string(catalog)?
    };
    std::fs::write(path.as_ref(), content)?;
    Ok(())
}
