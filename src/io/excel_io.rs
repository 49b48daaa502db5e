use std::path::Path;

use calamine::{open_workbook, Data, DataType, Reader, Xlsx};
use rust_xlsxwriter::{Workbook, Worksheet};

use crate::error::PricingError;
use crate::models::{Catalog, Product};

use super::csv_io::{name_from_path, ProductRow, CATALOG_COLUMNS};

/// A numeric rule cell. Blank is `None`; text that is not a number is an error.
fn cell_f64(row: &[Data], idx: usize, row_num: usize) -> Result<Option<f64>, PricingError> {
    let Some(cell) = row.get(idx) else {
        return Ok(None);
    };
    if cell.is_empty() || cell.to_string().trim().is_empty() {
        return Ok(None);
    }
    cell.as_f64().map(Some).ok_or_else(|| {
        PricingError::ParseError(format!(
            "row {row_num}: column {}: '{cell}' is not a number",
            CATALOG_COLUMNS.get(idx).copied().unwrap_or("?")
        ))
    })
}

fn cell_string(row: &[Data], idx: usize) -> Option<String> {
    row.get(idx)
        .filter(|c| !c.is_empty())
        .map(|c| c.to_string().trim().to_string())
        .filter(|s| !s.is_empty())
}

/// Read a product catalog from an Excel (.xlsx) file.
///
/// Uses the first sheet; the header row is skipped and columns follow the
/// CSV layout: product_id, name, category, calculation_method,
/// price_per_unit, platform_price, unit, max_width, max_height,
/// min_billable_width, min_billable_height, width_step, height_step,
/// area_factor, min_area, area_rounding
pub fn read_excel(path: impl AsRef<Path>) -> Result<Catalog, PricingError> {
    let path = path.as_ref();
    let mut workbook: Xlsx<_> = open_workbook(path)?;

    let sheet_name = workbook
        .sheet_names()
        .first()
        .cloned()
        .ok_or_else(|| PricingError::Excel("No sheets found in workbook".to_string()))?;

    let range = workbook
        .worksheet_range(&sheet_name)
        .map_err(|e| PricingError::Excel(e.to_string()))?;

    let mut catalog = Catalog::new(name_from_path(path));
    let mut rows = range.rows();

    // Skip header row
    rows.next();

    for (offset, row) in rows.enumerate() {
        let row_num = offset + 2;
        let Some(product_id) = cell_string(row, 0) else {
            tracing::warn!(row = row_num, "skipping spreadsheet row without product_id");
            continue;
        };

        let product_row = ProductRow {
            product_id,
            name: cell_string(row, 1).unwrap_or_default(),
            category: cell_string(row, 2).unwrap_or_default(),
            calculation_method: cell_string(row, 3),
            price_per_unit: cell_f64(row, 4, row_num)?,
            platform_price: cell_f64(row, 5, row_num)?,
            unit: cell_string(row, 6),
            max_width: cell_f64(row, 7, row_num)?,
            max_height: cell_f64(row, 8, row_num)?,
            min_billable_width: cell_f64(row, 9, row_num)?,
            min_billable_height: cell_f64(row, 10, row_num)?,
            width_step: cell_f64(row, 11, row_num)?,
            height_step: cell_f64(row, 12, row_num)?,
            area_factor: cell_f64(row, 13, row_num)?,
            min_area: cell_f64(row, 14, row_num)?,
            area_rounding: cell_f64(row, 15, row_num)?,
        };
        catalog.products.push(Product::from(product_row));
    }

    catalog.validate()?;
    Ok(catalog)
}

/// Read a product catalog from Excel bytes.
pub fn read_excel_from_bytes(data: &[u8], name: &str) -> Result<Catalog, PricingError> {
    use std::io::Write;
    let mut tmp = tempfile::NamedTempFile::new()?;
    tmp.write_all(data)?;
    tmp.flush()?;
    let mut catalog = read_excel(tmp.path())?;
    catalog.name = name.to_string();
    Ok(catalog)
}

fn write_opt_number(
    worksheet: &mut Worksheet,
    row: u32,
    col: u16,
    value: Option<f64>,
) -> Result<(), PricingError> {
    if let Some(v) = value {
        worksheet.write_number(row, col, v)?;
    }
    Ok(())
}

fn write_opt_string(
    worksheet: &mut Worksheet,
    row: u32,
    col: u16,
    value: Option<&str>,
) -> Result<(), PricingError> {
    if let Some(v) = value {
        worksheet.write_string(row, col, v)?;
    }
    Ok(())
}

/// Write a product catalog to an Excel (.xlsx) file.
pub fn write_excel(catalog: &Catalog, path: impl AsRef<Path>) -> Result<(), PricingError> {
    let mut workbook = Workbook::new();
    let worksheet = workbook.add_worksheet();

    for (col, header) in CATALOG_COLUMNS.iter().enumerate() {
        worksheet.write_string(0, col as u16, *header)?;
    }

    for (idx, product) in catalog.products.iter().enumerate() {
        let row = idx as u32 + 1;
        let r = ProductRow::from(product);

        worksheet.write_string(row, 0, &r.product_id)?;
        worksheet.write_string(row, 1, &r.name)?;
        worksheet.write_string(row, 2, &r.category)?;
        write_opt_string(worksheet, row, 3, r.calculation_method.as_deref())?;
        write_opt_number(worksheet, row, 4, r.price_per_unit)?;
        write_opt_number(worksheet, row, 5, r.platform_price)?;
        write_opt_string(worksheet, row, 6, r.unit.as_deref())?;
        write_opt_number(worksheet, row, 7, r.max_width)?;
        write_opt_number(worksheet, row, 8, r.max_height)?;
        write_opt_number(worksheet, row, 9, r.min_billable_width)?;
        write_opt_number(worksheet, row, 10, r.min_billable_height)?;
        write_opt_number(worksheet, row, 11, r.width_step)?;
        write_opt_number(worksheet, row, 12, r.height_step)?;
        write_opt_number(worksheet, row, 13, r.area_factor)?;
        write_opt_number(worksheet, row, 14, r.min_area)?;
        write_opt_number(worksheet, row, 15, r.area_rounding)?;
    }

    workbook.save(path.as_ref())?;
    Ok(())
}
