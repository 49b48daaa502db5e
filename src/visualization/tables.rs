use colored::Colorize;
use comfy_table::{
    modifiers::UTF8_ROUND_CORNERS, presets::UTF8_FULL, Cell, ContentArrangement, Table,
};

use crate::models::{Catalog, Product};
use crate::pricing::rounding::js_number;
use crate::pricing::{PriceOutcome, Quote, RankedPrice};

fn new_table() -> Table {
    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .apply_modifier(UTF8_ROUND_CORNERS)
        .set_content_arrangement(ContentArrangement::Dynamic);
    table
}

fn baht(amount: f64) -> String {
    format!("฿{}", js_number(amount))
}

fn status_cell(outcome: &PriceOutcome) -> Cell {
    if outcome.is_priced() {
        Cell::new("OK")
    } else {
        Cell::new("REJECTED")
    }
}

/// Format a single product price as a string.
pub fn format_price(
    product: &Product,
    width_cm: f64,
    height_cm: f64,
    outcome: &PriceOutcome,
) -> String {
    let mut output = String::new();
    output.push_str(&format!(
        "\n{}\n",
        format!("{} ({})", product.name, product.id).bold().green()
    ));
    output.push_str(&format!("{}\n", "=".repeat(50)));

    let mut table = new_table();
    table.set_header(vec!["Field", "Value"]);
    table.add_row(vec![
        Cell::new("Size"),
        Cell::new(format!("{} x {} cm", js_number(width_cm), js_number(height_cm))),
    ]);
    table.add_row(vec![
        Cell::new("Method"),
        Cell::new(product.pricing.method().to_string()),
    ]);
    table.add_row(vec![Cell::new("Status"), status_cell(outcome)]);
    table.add_row(vec![Cell::new("Total"), Cell::new(baht(outcome.total()))]);
    table.add_row(vec![Cell::new("Breakdown"), Cell::new(outcome.describe())]);

    output.push_str(&format!("{table}"));
    output
}

/// Print a single product price.
pub fn print_price(product: &Product, width_cm: f64, height_cm: f64, outcome: &PriceOutcome) {
    print!("{}", format_price(product, width_cm, height_cm, outcome));
}

/// Format a category comparison as a string.
pub fn format_comparison_table(
    category: &str,
    width_cm: f64,
    height_cm: f64,
    ranked: &[RankedPrice],
) -> String {
    let mut output = String::new();
    output.push_str(&format!(
        "\n{}\n",
        format!(
            "Category '{category}' at {} x {} cm",
            js_number(width_cm),
            js_number(height_cm)
        )
        .bold()
        .green()
    ));
    output.push_str(&format!("{}\n", "=".repeat(60)));

    if ranked.is_empty() {
        output.push_str("  No products in this category.\n");
        return output;
    }

    let mut table = new_table();
    table.set_header(vec!["#", "Product", "Name", "Total", "Breakdown"]);

    for (idx, r) in ranked.iter().enumerate() {
        let rank = if r.outcome.is_priced() {
            format!("{}", idx + 1)
        } else {
            "-".to_string()
        };
        table.add_row(vec![
            Cell::new(rank),
            Cell::new(&r.product_id),
            Cell::new(&r.product_name),
            Cell::new(baht(r.outcome.total())),
            Cell::new(r.outcome.describe()),
        ]);
    }

    output.push_str(&format!("{table}"));
    output
}

/// Print a category comparison.
pub fn print_comparison_table(
    category: &str,
    width_cm: f64,
    height_cm: f64,
    ranked: &[RankedPrice],
) {
    print!("{}", format_comparison_table(category, width_cm, height_cm, ranked));
}

/// Format a quotation as a string.
pub fn format_quote_table(quote: &Quote) -> String {
    let mut output = String::new();
    output.push_str(&format!("\n{}\n", "Quotation".bold().green()));
    output.push_str(&format!(
        "{}\n",
        format!("Price list: {} | Lines: {}", quote.mode, quote.num_lines()).dimmed()
    ));
    output.push_str(&format!("{}\n", "=".repeat(70)));

    let mut table = new_table();
    table.set_header(vec![
        "Product", "Name", "Size (cm)", "Qty", "Unit", "Line Total", "Breakdown",
    ]);

    for line in &quote.lines {
        table.add_row(vec![
            Cell::new(&line.product_id),
            Cell::new(&line.product_name),
            Cell::new(format!(
                "{} x {}",
                js_number(line.width_cm),
                js_number(line.height_cm)
            )),
            Cell::new(line.quantity),
            Cell::new(baht(line.unit_total())),
            Cell::new(baht(line.line_total())),
            Cell::new(line.outcome.describe()),
        ]);
    }
    table.add_row(vec![
        Cell::new("Grand Total"),
        Cell::new(""),
        Cell::new(""),
        Cell::new(""),
        Cell::new(""),
        Cell::new(baht(quote.grand_total())),
        Cell::new(""),
    ]);

    output.push_str(&format!("{table}"));

    let rejected = quote.rejected_lines().count();
    if rejected > 0 {
        output.push_str(&format!(
            "\n{}\n",
            format!("{rejected} line(s) could not be priced").yellow()
        ));
    }
    output
}

/// Print a quotation.
pub fn print_quote_table(quote: &Quote) {
    print!("{}", format_quote_table(quote));
}

/// Format a catalog listing as a string.
pub fn format_catalog_table(catalog: &Catalog) -> String {
    let mut output = String::new();
    output.push_str(&format!(
        "\n{}\n",
        format!("Catalog: {}", catalog.name).bold().green()
    ));
    output.push_str(&format!(
        "{}\n",
        format!(
            "Products: {} | Categories: {}",
            catalog.num_products(),
            catalog.categories().join(", ")
        )
        .dimmed()
    ));
    output.push_str(&format!("{}\n", "=".repeat(60)));

    let mut table = new_table();
    table.set_header(vec!["Product", "Name", "Category", "Method", "Price", "Platform"]);

    for p in &catalog.products {
        table.add_row(vec![
            Cell::new(&p.id),
            Cell::new(&p.name),
            Cell::new(&p.category),
            Cell::new(p.pricing.method().to_string()),
            Cell::new(
                p.pricing
                    .price_per_unit
                    .map(baht)
                    .unwrap_or_else(|| "-".to_string()),
            ),
            Cell::new(p.platform_price.map(baht).unwrap_or_else(|| "-".to_string())),
        ]);
    }

    output.push_str(&format!("{table}"));
    output
}

/// Print a catalog listing.
pub fn print_catalog_table(catalog: &Catalog) {
    print!("{}", format_catalog_table(catalog));
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{CalculationMethod, PriceMode, PricingConfig};
    use crate::pricing::{CartLine, Calculator, PriceEngine};

    fn sample_catalog() -> Catalog {
        let mut cat = Catalog::new("Viz Test");
        let mut curtain = Product::new(
            "CUR-01",
            "Blackout curtain",
            "curtain",
            PricingConfig {
                max_width: Some(3.0),
                ..PricingConfig::new(CalculationMethod::Area, 500.0)
            },
        );
        curtain.platform_price = Some(550.0);
        cat.products.push(curtain);
        cat.products.push(Product::new(
            "SET-01",
            "Ready-made set",
            "curtain",
            PricingConfig::new(CalculationMethod::Fixed, 15000.0),
        ));
        cat
    }

    #[test]
    fn test_format_price_contains_breakdown() {
        let cat = sample_catalog();
        let product = cat.find("SET-01").unwrap();
        let outcome = product.price(100.0, 100.0, PriceMode::Standard, &PriceEngine::default());
        let output = format_price(product, 100.0, 100.0, &outcome);
        assert!(output.contains("Ready-made set"));
        assert!(output.contains("฿15000"));
        assert!(output.contains("ราคาเหมา"));
        assert!(output.contains("fixed"));
    }

    #[test]
    fn test_format_comparison_marks_rejected() {
        let cat = sample_catalog();
        let calc = Calculator::new(&cat, PriceEngine::default());
        let ranked = calc.compare("curtain", 400.0, 200.0, PriceMode::Standard);
        let output = format_comparison_table("curtain", 400.0, 200.0, &ranked);
        assert!(output.contains("Category 'curtain' at 400 x 200 cm"));
        assert!(output.contains("ความกว้างเกินกำหนด (3 ม.)"));
        assert!(output.contains("SET-01"));
    }

    #[test]
    fn test_format_comparison_empty() {
        let output = format_comparison_table("blind", 100.0, 100.0, &[]);
        assert!(output.contains("No products in this category."));
    }

    #[test]
    fn test_format_quote_table_totals() {
        let cat = sample_catalog();
        let cart = vec![
            CartLine::new("CUR-01", 200.0, 200.0, 2),
            CartLine::new("CUR-01", 350.0, 200.0, 1),
        ];
        let quote = Quote::build(&cat, &cart, PriceMode::Platform, PriceEngine::default()).unwrap();
        let output = format_quote_table(&quote);
        assert!(output.contains("Price list: platform"));
        assert!(output.contains("Grand Total"));
        assert!(output.contains("฿4400"));
        assert!(output.contains("1 line(s) could not be priced"));
    }

    #[test]
    fn test_format_catalog_table() {
        let output = format_catalog_table(&sample_catalog());
        assert!(output.contains("Catalog: Viz Test"));
        assert!(output.contains("Categories: curtain"));
        assert!(output.contains("฿550"));
        assert!(output.contains("area"));
    }
}
