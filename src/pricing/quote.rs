use serde::{Deserialize, Serialize};

use super::{PriceEngine, PriceOutcome};
use crate::error::PricingError;
use crate::models::{Catalog, PriceMode};

fn default_quantity() -> u32 {
    1
}

/// One cart entry as entered by the customer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CartLine {
    pub product_id: String,
    pub width_cm: f64,
    pub height_cm: f64,
    #[serde(default = "default_quantity")]
    pub quantity: u32,
}

impl CartLine {
    pub fn new(
        product_id: impl Into<String>,
        width_cm: f64,
        height_cm: f64,
        quantity: u32,
    ) -> Self {
        Self {
            product_id: product_id.into(),
            width_cm,
            height_cm,
            quantity,
        }
    }
}

/// A priced cart entry.
#[derive(Debug, Clone, Serialize)]
pub struct QuoteLine {
    pub product_id: String,
    pub product_name: String,
    pub width_cm: f64,
    pub height_cm: f64,
    pub quantity: u32,
    pub outcome: PriceOutcome,
}

impl QuoteLine {
    /// Price of a single piece; zero when rejected.
    pub fn unit_total(&self) -> f64 {
        self.outcome.total()
    }

    pub fn line_total(&self) -> f64 {
        self.unit_total() * self.quantity as f64
    }
}

/// A quotation: every cart line priced under one price mode.
#[derive(Debug, Clone, Serialize)]
pub struct Quote {
    pub mode: PriceMode,
    pub lines: Vec<QuoteLine>,
    #[serde(skip)]
    engine: PriceEngine,
}

impl Quote {
    /// Price a cart against a catalog.
    ///
    /// An unknown product id fails the whole quote with `PricingError::NotFound`;
    /// sizes the product cannot be made in are kept as rejected lines.
    pub fn build(
        catalog: &Catalog,
        cart: &[CartLine],
        mode: PriceMode,
        engine: PriceEngine,
    ) -> Result<Self, PricingError> {
        let lines = cart
            .iter()
            .map(|line| {
                let product = catalog.get(&line.product_id)?;
                Ok(QuoteLine {
                    product_id: product.id.clone(),
                    product_name: product.name.clone(),
                    width_cm: line.width_cm,
                    height_cm: line.height_cm,
                    quantity: line.quantity,
                    outcome: product.price(line.width_cm, line.height_cm, mode, &engine),
                })
            })
            .collect::<Result<Vec<_>, PricingError>>()?;

        Ok(Self {
            mode,
            lines,
            engine,
        })
    }

    /// Re-price every line under another price mode.
    pub fn reprice(&mut self, catalog: &Catalog, mode: PriceMode) -> Result<(), PricingError> {
        for line in &mut self.lines {
            let product = catalog.get(&line.product_id)?;
            line.outcome = product.price(line.width_cm, line.height_cm, mode, &self.engine);
        }
        self.mode = mode;
        Ok(())
    }

    /// Sum of all priced line totals.
    pub fn grand_total(&self) -> f64 {
        self.lines.iter().map(|l| l.line_total()).sum()
    }

    /// Lines that could not be priced.
    pub fn rejected_lines(&self) -> impl Iterator<Item = &QuoteLine> {
        self.lines.iter().filter(|l| !l.outcome.is_priced())
    }

    pub fn num_lines(&self) -> usize {
        self.lines.len()
    }
}
