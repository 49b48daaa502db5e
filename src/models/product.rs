use serde::{Deserialize, Serialize};

use super::config::PricingConfig;
use crate::error::PricingError;
use crate::pricing::{PriceEngine, PriceOutcome};

/// Which price list a quotation is computed under.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PriceMode {
    /// The storefront's own price list.
    #[default]
    Standard,
    /// The marketplace/platform price list.
    Platform,
}

impl std::fmt::Display for PriceMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PriceMode::Standard => write!(f, "standard"),
            PriceMode::Platform => write!(f, "platform"),
        }
    }
}

impl std::str::FromStr for PriceMode {
    type Err = PricingError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "standard" | "std" => Ok(PriceMode::Standard),
            "platform" | "marketplace" => Ok(PriceMode::Platform),
            _ => Err(PricingError::ParseError(format!("Unknown price mode: '{s}'"))),
        }
    }
}

/// A sellable product collection.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Product {
    /// Unique product identifier
    pub id: String,
    /// Display name
    pub name: String,
    /// Category the storefront groups products under (e.g. "curtain", "blind")
    pub category: String,
    /// Billing rules
    #[serde(flatten)]
    pub pricing: PricingConfig,
    /// Unit price under the platform price list, if one is set
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub platform_price: Option<f64>,
}

impl Product {
    pub fn new(
        id: impl Into<String>,
        name: impl Into<String>,
        category: impl Into<String>,
        pricing: PricingConfig,
    ) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            category: category.into(),
            pricing,
            platform_price: None,
        }
    }

    /// The unit-price override for a price mode.
    ///
    /// Products without a platform price keep their standard price in platform mode.
    pub fn price_override(&self, mode: PriceMode) -> Option<f64> {
        match mode {
            PriceMode::Standard => None,
            PriceMode::Platform => self.platform_price,
        }
    }

    /// Price this product at a requested size (centimetres).
    pub fn price(
        &self,
        width_cm: f64,
        height_cm: f64,
        mode: PriceMode,
        engine: &PriceEngine,
    ) -> PriceOutcome {
        engine.evaluate(&self.pricing, width_cm, height_cm, self.price_override(mode))
    }

    /// Validate the record. Returns `PricingError::ValidationError` on failure.
    pub fn validate(&self) -> Result<(), PricingError> {
        if self.id.trim().is_empty() {
            return Err(PricingError::ValidationError(format!(
                "Product '{}': id must not be empty",
                self.name
            )));
        }
        self.pricing.validate().map_err(|e| match e {
            PricingError::ValidationError(msg) => {
                PricingError::ValidationError(format!("Product {}: {msg}", self.id))
            }
            other => other,
        })?;
        if let Some(p) = self.platform_price {
            if !p.is_finite() || p < 0.0 {
                return Err(PricingError::ValidationError(format!(
                    "Product {}: platform_price must be a non-negative number, got {p}",
                    self.id
                )));
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::CalculationMethod;

    fn rail_product() -> Product {
        let mut p = Product::new(
            "RAIL-01",
            "Aluminium rail",
            "rail",
            PricingConfig {
                width_step: Some(0.1),
                ..PricingConfig::new(CalculationMethod::RailWidth, 600.0)
            },
        );
        p.platform_price = Some(650.0);
        p
    }

    #[test]
    fn test_price_mode_parse() {
        assert_eq!("standard".parse::<PriceMode>().unwrap(), PriceMode::Standard);
        assert_eq!("Platform".parse::<PriceMode>().unwrap(), PriceMode::Platform);
        assert_eq!(
            "marketplace".parse::<PriceMode>().unwrap(),
            PriceMode::Platform
        );
        assert!("wholesale".parse::<PriceMode>().is_err());
    }

    #[test]
    fn test_price_mode_display() {
        assert_eq!(PriceMode::Standard.to_string(), "standard");
        assert_eq!(PriceMode::Platform.to_string(), "platform");
    }

    #[test]
    fn test_price_override_by_mode() {
        let mut p = rail_product();
        assert_eq!(p.price_override(PriceMode::Standard), None);
        assert_eq!(p.price_override(PriceMode::Platform), Some(650.0));
        p.platform_price = None;
        assert_eq!(p.price_override(PriceMode::Platform), None);
    }

    #[test]
    fn test_price_uses_platform_list() {
        let p = rail_product();
        let engine = PriceEngine::default();
        let standard = p.price(100.0, 250.0, PriceMode::Standard, &engine);
        let platform = p.price(100.0, 250.0, PriceMode::Platform, &engine);
        assert_eq!(standard.total(), 600.0);
        assert_eq!(platform.total(), 650.0);
    }

    #[test]
    fn test_price_does_not_mutate_config() {
        let p = rail_product();
        let before = p.pricing.clone();
        let _ = p.price(120.0, 200.0, PriceMode::Platform, &PriceEngine::default());
        assert_eq!(p.pricing, before);
    }

    #[test]
    fn test_validate_empty_id() {
        let mut p = rail_product();
        p.id = "  ".to_string();
        let err = p.validate().unwrap_err();
        assert!(err.to_string().contains("id must not be empty"));
    }

    #[test]
    fn test_validate_prefixes_product_id() {
        let mut p = rail_product();
        p.pricing.width_step = Some(-0.1);
        let err = p.validate().unwrap_err();
        assert!(err.to_string().contains("Product RAIL-01: width_step"));
    }

    #[test]
    fn test_validate_negative_platform_price() {
        let mut p = rail_product();
        p.platform_price = Some(-5.0);
        let err = p.validate().unwrap_err();
        assert!(err.to_string().contains("platform_price"));
    }

    #[test]
    fn test_product_json_is_flat() {
        let p = rail_product();
        let value: serde_json::Value = serde_json::to_value(&p).unwrap();
        assert_eq!(value["calculation_method"], "rail_width");
        assert_eq!(value["width_step"], 0.1);
        let back: Product = serde_json::from_value(value).unwrap();
        assert_eq!(back, p);
    }
}
