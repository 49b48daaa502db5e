use serde::{Deserialize, Serialize};

use crate::error::PricingError;

/// Billing policy of a product collection.
///
/// Stored as a plain string in catalog records. Strings outside the known set
/// are kept verbatim in [`CalculationMethod::Unrecognized`] so the engine can
/// reject them at price time instead of the loader refusing the record.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum CalculationMethod {
    /// Priced per square metre.
    Area,
    /// Priced per square yard.
    AreaSqYard,
    /// Priced per metre of rail or track; height is ignored.
    RailWidth,
    /// Placeholder policy with no pricing rule yet.
    Box,
    /// Flat price regardless of size.
    Fixed,
    Unrecognized(String),
}

impl CalculationMethod {
    pub fn as_str(&self) -> &str {
        match self {
            CalculationMethod::Area => "area",
            CalculationMethod::AreaSqYard => "area_sq_yard",
            CalculationMethod::RailWidth => "rail_width",
            CalculationMethod::Box => "box",
            CalculationMethod::Fixed => "fixed",
            CalculationMethod::Unrecognized(s) => s,
        }
    }
}

impl From<&str> for CalculationMethod {
    fn from(s: &str) -> Self {
        match s {
            "area" => CalculationMethod::Area,
            "area_sq_yard" => CalculationMethod::AreaSqYard,
            "rail_width" => CalculationMethod::RailWidth,
            "box" => CalculationMethod::Box,
            "fixed" => CalculationMethod::Fixed,
            other => CalculationMethod::Unrecognized(other.to_string()),
        }
    }
}

impl From<String> for CalculationMethod {
    fn from(s: String) -> Self {
        match CalculationMethod::from(s.as_str()) {
            CalculationMethod::Unrecognized(_) => CalculationMethod::Unrecognized(s),
            known => known,
        }
    }
}

impl From<CalculationMethod> for String {
    fn from(m: CalculationMethod) -> Self {
        match m {
            CalculationMethod::Unrecognized(s) => s,
            known => known.as_str().to_string(),
        }
    }
}

impl std::fmt::Display for CalculationMethod {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

static DEFAULT_METHOD: CalculationMethod = CalculationMethod::Area;

/// Billing rules of one sellable product collection, as maintained in the
/// back office.
///
/// Every field is optional; an absent field means the rule is not active.
/// Lengths are in metres.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PricingConfig {
    /// Pricing policy; `area` when absent
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub calculation_method: Option<CalculationMethod>,
    /// Price per billing unit (m², sq yard, metre of rail) or flat price
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub price_per_unit: Option<f64>,
    /// `sq_yard` or `yard` switches the area label to square yards
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub unit: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_width: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_height: Option<f64>,
    /// Width billed at least this much
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min_billable_width: Option<f64>,
    /// Height billed at least this much
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min_billable_height: Option<f64>,
    /// Rail width is rounded up to a multiple of this step
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub width_step: Option<f64>,
    /// Area height is rounded up to a multiple of this step
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub height_step: Option<f64>,
    /// Fullness or unit-conversion multiplier on the raw area
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub area_factor: Option<f64>,
    /// Factored area billed at least this much
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min_area: Option<f64>,
    /// Area is rounded up to a multiple of this step
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub area_rounding: Option<f64>,
}

/// Keep a rule value only when it is strictly positive.
fn positive(value: Option<f64>) -> Option<f64> {
    value.filter(|v| *v > 0.0)
}

impl PricingConfig {
    /// Create a configuration with just a method and a unit price.
    pub fn new(method: CalculationMethod, price_per_unit: f64) -> Self {
        Self {
            calculation_method: Some(method),
            price_per_unit: Some(price_per_unit),
            ..Self::default()
        }
    }

    /// The effective pricing method.
    pub fn method(&self) -> &CalculationMethod {
        self.calculation_method.as_ref().unwrap_or(&DEFAULT_METHOD)
    }

    /// The unit price actually used: the override, else the configured price, else zero.
    pub fn resolve_price(&self, price_override: Option<f64>) -> f64 {
        price_override.or(self.price_per_unit).unwrap_or(0.0)
    }

    /// Square-yard billing is signalled by the method name first, then by `unit`.
    pub fn bills_in_square_yards(&self) -> bool {
        if *self.method() == CalculationMethod::AreaSqYard {
            return true;
        }
        matches!(self.unit.as_deref(), Some("sq_yard") | Some("yard"))
    }

    pub fn active_max_width(&self) -> Option<f64> {
        positive(self.max_width)
    }

    pub fn active_max_height(&self) -> Option<f64> {
        positive(self.max_height)
    }

    pub fn active_width_step(&self) -> Option<f64> {
        positive(self.width_step)
    }

    pub fn active_height_step(&self) -> Option<f64> {
        positive(self.height_step)
    }

    pub fn active_area_factor(&self) -> Option<f64> {
        positive(self.area_factor)
    }

    pub fn active_min_area(&self) -> Option<f64> {
        positive(self.min_area)
    }

    pub fn active_area_rounding(&self) -> Option<f64> {
        positive(self.area_rounding)
    }

    /// Validate the numeric rule values. Returns `PricingError::ValidationError` on failure.
    ///
    /// The engine never calls this; it is for records entering a catalog.
    pub fn validate(&self) -> Result<(), PricingError> {
        let fields = [
            ("price_per_unit", self.price_per_unit),
            ("max_width", self.max_width),
            ("max_height", self.max_height),
            ("min_billable_width", self.min_billable_width),
            ("min_billable_height", self.min_billable_height),
            ("width_step", self.width_step),
            ("height_step", self.height_step),
            ("area_factor", self.area_factor),
            ("min_area", self.min_area),
            ("area_rounding", self.area_rounding),
        ];
        for (name, value) in fields {
            if let Some(v) = value {
                if !v.is_finite() || v < 0.0 {
                    return Err(PricingError::ValidationError(format!(
                        "{name} must be a non-negative number, got {v}"
                    )));
                }
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_method_parse_known_names() {
        assert_eq!(CalculationMethod::from("area"), CalculationMethod::Area);
        assert_eq!(
            CalculationMethod::from("area_sq_yard"),
            CalculationMethod::AreaSqYard
        );
        assert_eq!(
            CalculationMethod::from("rail_width"),
            CalculationMethod::RailWidth
        );
        assert_eq!(CalculationMethod::from("box"), CalculationMethod::Box);
        assert_eq!(CalculationMethod::from("fixed"), CalculationMethod::Fixed);
    }

    #[test]
    fn test_method_parse_is_case_sensitive() {
        assert_eq!(
            CalculationMethod::from("Area"),
            CalculationMethod::Unrecognized("Area".to_string())
        );
    }

    #[test]
    fn test_method_display_roundtrips_unrecognized() {
        let m = CalculationMethod::from("per_panel".to_string());
        assert_eq!(m.to_string(), "per_panel");
        assert_eq!(String::from(m), "per_panel");
    }

    #[test]
    fn test_method_json_roundtrip() {
        for m in [
            CalculationMethod::Area,
            CalculationMethod::AreaSqYard,
            CalculationMethod::RailWidth,
            CalculationMethod::Box,
            CalculationMethod::Fixed,
            CalculationMethod::Unrecognized("roll".to_string()),
        ] {
            let json = serde_json::to_string(&m).unwrap();
            let back: CalculationMethod = serde_json::from_str(&json).unwrap();
            assert_eq!(back, m);
        }
        assert_eq!(
            serde_json::to_string(&CalculationMethod::RailWidth).unwrap(),
            "\"rail_width\""
        );
    }

    #[test]
    fn test_default_method_is_area() {
        let config = PricingConfig::default();
        assert_eq!(*config.method(), CalculationMethod::Area);
    }

    #[test]
    fn test_resolve_price_precedence() {
        let mut config = PricingConfig::new(CalculationMethod::Area, 500.0);
        assert_eq!(config.resolve_price(None), 500.0);
        assert_eq!(config.resolve_price(Some(450.0)), 450.0);
        config.price_per_unit = None;
        assert_eq!(config.resolve_price(None), 0.0);
    }

    #[test]
    fn test_square_yard_signals() {
        let mut config = PricingConfig::new(CalculationMethod::AreaSqYard, 100.0);
        assert!(config.bills_in_square_yards());

        config.calculation_method = Some(CalculationMethod::Area);
        assert!(!config.bills_in_square_yards());

        config.unit = Some("sq_yard".to_string());
        assert!(config.bills_in_square_yards());

        config.unit = Some("yard".to_string());
        assert!(config.bills_in_square_yards());

        config.unit = Some("sqm".to_string());
        assert!(!config.bills_in_square_yards());
    }

    #[test]
    fn test_zero_rule_values_are_inactive() {
        let config = PricingConfig {
            max_width: Some(0.0),
            width_step: Some(0.0),
            area_factor: Some(0.0),
            min_area: Some(0.0),
            ..PricingConfig::default()
        };
        assert!(config.active_max_width().is_none());
        assert!(config.active_width_step().is_none());
        assert!(config.active_area_factor().is_none());
        assert!(config.active_min_area().is_none());
    }

    #[test]
    fn test_validate_accepts_defaults() {
        assert!(PricingConfig::default().validate().is_ok());
        assert!(PricingConfig::new(CalculationMethod::Fixed, 15000.0)
            .validate()
            .is_ok());
    }

    #[test]
    fn test_validate_rejects_negative_price() {
        let config = PricingConfig::new(CalculationMethod::Area, -1.0);
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("price_per_unit must be a non-negative number"));
    }

    #[test]
    fn test_validate_rejects_non_finite_step() {
        let config = PricingConfig {
            height_step: Some(f64::NAN),
            ..PricingConfig::default()
        };
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("height_step"));
    }

    #[test]
    fn test_config_json_omits_absent_rules() {
        let config = PricingConfig::new(CalculationMethod::RailWidth, 600.0);
        let json = serde_json::to_string(&config).unwrap();
        assert_eq!(
            json,
            r#"{"calculation_method":"rail_width","price_per_unit":600.0}"#
        );
    }
}
