use serde::Serialize;

use super::{PriceEngine, PriceOutcome};
use crate::error::PricingError;
use crate::models::{Catalog, PriceMode, Product};

/// One product priced at the size being compared.
#[derive(Debug, Clone, Serialize)]
pub struct RankedPrice {
    pub product_id: String,
    pub product_name: String,
    pub outcome: PriceOutcome,
}

impl RankedPrice {
    fn new(product: &Product, outcome: PriceOutcome) -> Self {
        Self {
            product_id: product.id.clone(),
            product_name: product.name.clone(),
            outcome,
        }
    }
}

/// Catalog-wide pricing API used by the storefront calculator.
pub struct Calculator<'a> {
    catalog: &'a Catalog,
    engine: PriceEngine,
}

impl<'a> Calculator<'a> {
    /// Create a new Calculator over the given catalog.
    pub fn new(catalog: &'a Catalog, engine: PriceEngine) -> Self {
        Self { catalog, engine }
    }

    /// Price one product by id.
    pub fn price(
        &self,
        product_id: &str,
        width_cm: f64,
        height_cm: f64,
        mode: PriceMode,
    ) -> Result<PriceOutcome, PricingError> {
        let product = self.catalog.get(product_id)?;
        Ok(product.price(width_cm, height_cm, mode, &self.engine))
    }

    /// Price every product of a category at one size, cheapest first.
    ///
    /// Priced products are sorted by ascending total (ties keep catalog
    /// order); rejected products follow in catalog order.
    pub fn compare(
        &self,
        category: &str,
        width_cm: f64,
        height_cm: f64,
        mode: PriceMode,
    ) -> Vec<RankedPrice> {
        let (mut priced, rejected): (Vec<RankedPrice>, Vec<RankedPrice>) = self
            .catalog
            .in_category(category)
            .map(|p| RankedPrice::new(p, p.price(width_cm, height_cm, mode, &self.engine)))
            .partition(|r| r.outcome.is_priced());

        priced.sort_by(|a, b| a.outcome.total().total_cmp(&b.outcome.total()));
        tracing::debug!(
            category,
            priced = priced.len(),
            rejected = rejected.len(),
            "compared category"
        );

        priced.extend(rejected);
        priced
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{CalculationMethod, PricingConfig};
    use crate::pricing::RoundingPolicy;

    fn sample_catalog() -> Catalog {
        let mut cat = Catalog::new("Calculator Test");
        cat.products.push(Product::new(
            "CUR-LINEN",
            "Linen curtain",
            "curtain",
            PricingConfig::new(CalculationMethod::Area, 650.0),
        ));
        cat.products.push(Product::new(
            "CUR-NARROW",
            "Narrow-loom curtain",
            "curtain",
            PricingConfig {
                max_width: Some(1.5),
                ..PricingConfig::new(CalculationMethod::Area, 100.0)
            },
        ));
        cat.products.push(Product::new(
            "CUR-SHEER",
            "Sheer curtain",
            "curtain",
            PricingConfig::new(CalculationMethod::Area, 300.0),
        ));
        cat.products.push(Product::new(
            "CUR-SET",
            "Ready-made set",
            "curtain",
            PricingConfig::new(CalculationMethod::Fixed, 1000.0),
        ));
        let mut rail = Product::new(
            "RAIL-01",
            "Rail",
            "rail",
            PricingConfig {
                width_step: Some(0.1),
                ..PricingConfig::new(CalculationMethod::RailWidth, 600.0)
            },
        );
        rail.platform_price = Some(800.0);
        cat.products.push(rail);
        cat
    }

    #[test]
    fn test_compare_sorted_ascending_rejected_last() {
        let cat = sample_catalog();
        let calc = Calculator::new(&cat, PriceEngine::default());
        let ranked = calc.compare("curtain", 200.0, 200.0, PriceMode::Standard);
        let ids: Vec<&str> = ranked.iter().map(|r| r.product_id.as_str()).collect();
        // 4 m2: sheer 1200, set 1000, linen 2600; narrow rejected
        assert_eq!(ids, vec!["CUR-SET", "CUR-SHEER", "CUR-LINEN", "CUR-NARROW"]);
        assert!(!ranked[3].outcome.is_priced());
    }

    #[test]
    fn test_compare_unknown_category_is_empty() {
        let cat = sample_catalog();
        let calc = Calculator::new(&cat, PriceEngine::default());
        assert!(calc.compare("blind", 100.0, 100.0, PriceMode::Standard).is_empty());
    }

    #[test]
    fn test_price_by_id() {
        let cat = sample_catalog();
        let calc = Calculator::new(&cat, PriceEngine::default());
        let outcome = calc
            .price("RAIL-01", 120.0, 0.0, PriceMode::Standard)
            .unwrap();
        assert_eq!(outcome.total(), 721.0);
    }

    #[test]
    fn test_price_platform_mode() {
        let cat = sample_catalog();
        let calc = Calculator::new(&cat, PriceEngine::default());
        let outcome = calc
            .price("RAIL-01", 120.0, 0.0, PriceMode::Platform)
            .unwrap();
        assert_eq!(outcome.total(), 961.0);
    }

    #[test]
    fn test_price_uses_engine_policy() {
        let cat = sample_catalog();
        let calc = Calculator::new(&cat, PriceEngine::new(RoundingPolicy::Uniform));
        let outcome = calc
            .price("RAIL-01", 120.0, 0.0, PriceMode::Standard)
            .unwrap();
        assert_eq!(outcome.total(), 720.0);
    }

    #[test]
    fn test_price_unknown_product() {
        let cat = sample_catalog();
        let calc = Calculator::new(&cat, PriceEngine::default());
        let err = calc
            .price("NOPE", 100.0, 100.0, PriceMode::Standard)
            .unwrap_err();
        assert!(matches!(err, PricingError::NotFound(_)));
    }
}
