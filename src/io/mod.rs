mod csv_io;
mod json_io;
mod toml_io;
mod excel_io;

use std::path::Path;

use crate::error::PricingError;
use crate::models::Catalog;

pub use csv_io::{read_cart_csv, read_csv, read_csv_from_bytes, write_csv};
pub use json_io::{read_json, read_json_from_bytes, write_json};
pub use toml_io::{read_toml, write_toml};
pub use excel_io::{read_excel, read_excel_from_bytes, write_excel};

/// Trait for reading a product catalog from a file.
pub trait CatalogReader {
    fn read(&self, path: &Path) -> Result<Catalog, PricingError>;
}

/// Trait for writing a product catalog to a file.
pub trait CatalogWriter {
    fn write(&self, catalog: &Catalog, path: &Path) -> Result<(), PricingError>;
}

/// CSV format reader/writer.
pub struct CsvFormat;

impl CatalogReader for CsvFormat {
    fn read(&self, path: &Path) -> Result<Catalog, PricingError> {
        read_csv(path)
    }
}

impl CatalogWriter for CsvFormat {
    fn write(&self, catalog: &Catalog, path: &Path) -> Result<(), PricingError> {
        write_csv(catalog, path)
    }
}

/// JSON format reader/writer.
#[derive(Default)]
pub struct JsonFormat {
    pub pretty: bool,
}

impl CatalogReader for JsonFormat {
    fn read(&self, path: &Path) -> Result<Catalog, PricingError> {
        read_json(path)
    }
}

impl CatalogWriter for JsonFormat {
    fn write(&self, catalog: &Catalog, path: &Path) -> Result<(), PricingError> {
        write_json(catalog, path, self.pretty)
    }
}

/// TOML format reader/writer.
pub struct TomlFormat;

impl CatalogReader for TomlFormat {
    fn read(&self, path: &Path) -> Result<Catalog, PricingError> {
        read_toml(path)
    }
}

impl CatalogWriter for TomlFormat {
    fn write(&self, catalog: &Catalog, path: &Path) -> Result<(), PricingError> {
        write_toml(catalog, path)
    }
}

/// Excel (.xlsx) format reader/writer.
pub struct ExcelFormat;

impl CatalogReader for ExcelFormat {
    fn read(&self, path: &Path) -> Result<Catalog, PricingError> {
        read_excel(path)
    }
}

impl CatalogWriter for ExcelFormat {
    fn write(&self, catalog: &Catalog, path: &Path) -> Result<(), PricingError> {
        write_excel(catalog, path)
    }
}

fn extension(path: &Path) -> String {
    path.extension()
        .and_then(|e| e.to_str())
        .unwrap_or("")
        .to_lowercase()
}

/// Pick the reader for a file by its extension (csv, json, toml, xlsx/xls).
pub fn reader_for(path: &Path) -> Result<Box<dyn CatalogReader>, PricingError> {
    match extension(path).as_str() {
        "csv" => Ok(Box::new(CsvFormat)),
        "json" => Ok(Box::new(JsonFormat::default())),
        "toml" => Ok(Box::new(TomlFormat)),
        "xlsx" | "xls" => Ok(Box::new(ExcelFormat)),
        ext => Err(PricingError::ParseError(format!(
            "Unsupported file format: .{ext}. Use .csv, .json, .toml, or .xlsx"
        ))),
    }
}

/// Pick the writer for a file by its extension (csv, json, toml, xlsx).
pub fn writer_for(path: &Path, pretty: bool) -> Result<Box<dyn CatalogWriter>, PricingError> {
    match extension(path).as_str() {
        "csv" => Ok(Box::new(CsvFormat)),
        "json" => Ok(Box::new(JsonFormat { pretty })),
        "toml" => Ok(Box::new(TomlFormat)),
        "xlsx" => Ok(Box::new(ExcelFormat)),
        ext => Err(PricingError::ParseError(format!(
            "Unsupported output format: .{ext}"
        ))),
    }
}

/// Load a catalog, choosing the format from the file extension.
pub fn read_catalog(path: impl AsRef<Path>) -> Result<Catalog, PricingError> {
    let path = path.as_ref();
    let catalog = reader_for(path)?.read(path)?;
    tracing::info!(
        path = %path.display(),
        products = catalog.num_products(),
        "loaded catalog"
    );
    Ok(catalog)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{CalculationMethod, PricingConfig, Product};

    fn sample_catalog() -> Catalog {
        let mut cat = Catalog::new("IO Trait Test");
        cat.products.push(Product::new(
            "CUR-01",
            "Blackout curtain",
            "curtain",
            PricingConfig {
                height_step: Some(0.2),
                ..PricingConfig::new(CalculationMethod::Area, 500.0)
            },
        ));
        cat.products.push(Product::new(
            "RAIL-01",
            "Aluminium rail",
            "rail",
            PricingConfig {
                width_step: Some(0.1),
                ..PricingConfig::new(CalculationMethod::RailWidth, 600.0)
            },
        ));
        cat
    }

    #[test]
    fn test_every_format_roundtrips_through_traits() {
        let cat = sample_catalog();
        let dir = tempfile::tempdir().unwrap();

        for file in ["c.csv", "c.json", "c.toml", "c.xlsx"] {
            let path = dir.path().join(file);
            writer_for(&path, true).unwrap().write(&cat, &path).unwrap();
            let loaded = reader_for(&path).unwrap().read(&path).unwrap();
            assert_eq!(loaded.products, cat.products, "format {file}");
        }
    }

    #[test]
    fn test_read_catalog_dispatches_on_extension() {
        let cat = sample_catalog();
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("Showroom.JSON");
        write_json(&cat, &path, false).unwrap();
        let loaded = read_catalog(&path).unwrap();
        assert_eq!(loaded.num_products(), 2);
    }

    #[test]
    fn test_unsupported_extension() {
        let err = read_catalog("catalog.txt").unwrap_err();
        assert!(err.to_string().contains("Unsupported file format: .txt"));
        assert!(writer_for(Path::new("out.xls"), false).is_err());
    }

    #[test]
    fn test_json_format_default() {
        let fmt = JsonFormat::default();
        assert!(!fmt.pretty);
    }
}
