use std::io::Read;
use std::path::Path;

use crate::error::PricingError;
use crate::models::{Catalog, CalculationMethod, PricingConfig, Product};
use crate::pricing::CartLine;

/// Column order shared by the CSV and Excel catalog layouts.
pub(crate) const CATALOG_COLUMNS: [&str; 16] = [
    "product_id",
    "name",
    "category",
    "calculation_method",
    "price_per_unit",
    "platform_price",
    "unit",
    "max_width",
    "max_height",
    "min_billable_width",
    "min_billable_height",
    "width_step",
    "height_step",
    "area_factor",
    "min_area",
    "area_rounding",
];

/// Flat catalog row: one product per line.
#[derive(Debug, Clone, Default, serde::Deserialize, serde::Serialize)]
pub(crate) struct ProductRow {
    pub product_id: String,
    pub name: String,
    pub category: String,
    pub calculation_method: Option<String>,
    pub price_per_unit: Option<f64>,
    pub platform_price: Option<f64>,
    pub unit: Option<String>,
    pub max_width: Option<f64>,
    pub max_height: Option<f64>,
    pub min_billable_width: Option<f64>,
    pub min_billable_height: Option<f64>,
    pub width_step: Option<f64>,
    pub height_step: Option<f64>,
    pub area_factor: Option<f64>,
    pub min_area: Option<f64>,
    pub area_rounding: Option<f64>,
}

impl From<ProductRow> for Product {
    fn from(row: ProductRow) -> Self {
        Product {
            id: row.product_id,
            name: row.name,
            category: row.category,
            pricing: PricingConfig {
                calculation_method: row.calculation_method.map(CalculationMethod::from),
                price_per_unit: row.price_per_unit,
                unit: row.unit,
                max_width: row.max_width,
                max_height: row.max_height,
                min_billable_width: row.min_billable_width,
                min_billable_height: row.min_billable_height,
                width_step: row.width_step,
                height_step: row.height_step,
                area_factor: row.area_factor,
                min_area: row.min_area,
                area_rounding: row.area_rounding,
            },
            platform_price: row.platform_price,
        }
    }
}

impl From<&Product> for ProductRow {
    fn from(p: &Product) -> Self {
        let c = &p.pricing;
        ProductRow {
            product_id: p.id.clone(),
            name: p.name.clone(),
            category: p.category.clone(),
            calculation_method: c.calculation_method.as_ref().map(|m| m.to_string()),
            price_per_unit: c.price_per_unit,
            platform_price: p.platform_price,
            unit: c.unit.clone(),
            max_width: c.max_width,
            max_height: c.max_height,
            min_billable_width: c.min_billable_width,
            min_billable_height: c.min_billable_height,
            width_step: c.width_step,
            height_step: c.height_step,
            area_factor: c.area_factor,
            min_area: c.min_area,
            area_rounding: c.area_rounding,
        }
    }
}

fn csv_reader<R: Read>(rdr: R) -> csv::Reader<R> {
    csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(rdr)
}

fn parse_catalog_records<R: Read>(
    rdr: &mut csv::Reader<R>,
    name: &str,
) -> Result<Catalog, PricingError> {
    let mut catalog = Catalog::new(name);
    for result in rdr.deserialize() {
        let row: ProductRow = result?;
        catalog.products.push(Product::from(row));
    }
    catalog.validate()?;
    Ok(catalog)
}

pub(crate) fn name_from_path(path: &Path) -> String {
    path.file_stem()
        .map(|s| s.to_string_lossy().to_string())
        .unwrap_or_else(|| "Unknown".to_string())
}

/// Read a product catalog from a CSV file.
pub fn read_csv(path: impl AsRef<Path>) -> Result<Catalog, PricingError> {
    let path = path.as_ref();
    let file = std::fs::File::open(path)?;
    let mut rdr = csv_reader(file);
    parse_catalog_records(&mut rdr, &name_from_path(path))
}

/// Read a product catalog from CSV bytes.
pub fn read_csv_from_bytes(data: &[u8], name: &str) -> Result<Catalog, PricingError> {
    let mut rdr = csv_reader(data);
    parse_catalog_records(&mut rdr, name)
}

/// Write a product catalog to a CSV file.
pub fn write_csv(catalog: &Catalog, path: impl AsRef<Path>) -> Result<(), PricingError> {
    let mut wtr = csv::Writer::from_path(path.as_ref())?;
    if catalog.products.is_empty() {
        wtr.write_record(CATALOG_COLUMNS)?;
    }
    for product in &catalog.products {
        wtr.serialize(ProductRow::from(product))?;
    }
    wtr.flush()?;
    Ok(())
}

/// Read cart lines (`product_id,width_cm,height_cm,quantity`) from a CSV file.
///
/// `quantity` may be omitted and defaults to 1.
pub fn read_cart_csv(path: impl AsRef<Path>) -> Result<Vec<CartLine>, PricingError> {
    let file = std::fs::File::open(path.as_ref())?;
    let mut rdr = csv_reader(file);
    let mut lines = Vec::new();
    for result in rdr.deserialize() {
        let line: CartLine = result?;
        if line.quantity == 0 {
            return Err(PricingError::ValidationError(format!(
                "Cart line for {}: quantity must be at least 1",
                line.product_id
            )));
        }
        lines.push(line);
    }
    Ok(lines)
}
