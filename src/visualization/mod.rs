mod tables;

pub use tables::{
    format_catalog_table, print_catalog_table,
    format_comparison_table, print_comparison_table,
    format_price, print_price,
    format_quote_table, print_quote_table,
};
