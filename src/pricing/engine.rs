use serde::{Deserialize, Serialize};

use super::rounding::{ceil_to_step, js_number, round_half_up, to_fixed};
use crate::error::PricingError;
use crate::models::{CalculationMethod, PricingConfig};

/// How the rail policy rounds its monetary total.
///
/// The area policy always rounds the raw product to cents before taking the
/// ceiling. Historically the rail policy skipped the cents step, so a width
/// such as 1.2 m on a 0.1 m step bills 721 instead of 720 at 600/m.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RoundingPolicy {
    /// Bill exactly as the storefront always has: raw ceiling on rail totals.
    #[default]
    Compatible,
    /// Round every monetary product to cents before the ceiling.
    Uniform,
}

impl std::fmt::Display for RoundingPolicy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RoundingPolicy::Compatible => write!(f, "compatible"),
            RoundingPolicy::Uniform => write!(f, "uniform"),
        }
    }
}

impl std::str::FromStr for RoundingPolicy {
    type Err = PricingError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "compatible" | "legacy" => Ok(RoundingPolicy::Compatible),
            "uniform" => Ok(RoundingPolicy::Uniform),
            _ => Err(PricingError::ParseError(format!(
                "Unknown rounding policy: '{s}'"
            ))),
        }
    }
}

/// Unit the area policy reports its billed area in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum AreaUnit {
    SquareMetre,
    SquareYard,
}

impl AreaUnit {
    pub fn label(&self) -> &'static str {
        match self {
            AreaUnit::SquareMetre => "ตร.ม.",
            AreaUnit::SquareYard => "ตร.หลา",
        }
    }
}

/// How a priced total was reached.
///
/// `Display` renders the customer-facing Thai breakdown line.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Breakdown {
    Rail {
        billable_width: f64,
        price: f64,
    },
    Area {
        billable_width: f64,
        billable_height: f64,
        /// The configured factor as displayed; 1 when unset or zero
        factor: f64,
        area: f64,
        unit: AreaUnit,
        price: f64,
    },
    Fixed {
        price: f64,
    },
}

impl std::fmt::Display for Breakdown {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Breakdown::Rail {
                billable_width,
                price,
            } => write!(
                f,
                "ราง: {} ม. x ฿{}",
                to_fixed(*billable_width, 2),
                js_number(*price)
            ),
            Breakdown::Area {
                billable_width,
                billable_height,
                factor,
                area,
                unit,
                price,
            } => write!(
                f,
                "{}m x {}m x {} = {} {} (@฿{})",
                to_fixed(*billable_width, 2),
                to_fixed(*billable_height, 2),
                js_number(*factor),
                to_fixed(*area, 2),
                unit.label(),
                js_number(*price)
            ),
            Breakdown::Fixed { price } => write!(f, "ราคาเหมา: ฿{}", js_number(*price)),
        }
    }
}

/// Why a size could not be priced.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Rejection {
    /// Requested width (m) is above `max_width`.
    WidthExceeded { max: f64 },
    /// Requested height (m) is above `max_height`.
    HeightExceeded { max: f64 },
    /// The `box` policy has no pricing rule yet.
    BoxNotImplemented,
    /// The configured method is not one of the known policies.
    InvalidMethod { method: String },
}

impl std::fmt::Display for Rejection {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Rejection::WidthExceeded { max } => {
                write!(f, "ความกว้างเกินกำหนด ({} ม.)", js_number(*max))
            }
            Rejection::HeightExceeded { max } => {
                write!(f, "ความสูงเกินกำหนด ({} ม.)", js_number(*max))
            }
            Rejection::BoxNotImplemented => write!(f, "Box calculation not fully implemented"),
            Rejection::InvalidMethod { .. } => write!(f, "รูปแบบการคำนวณไม่ถูกต้อง"),
        }
    }
}

/// Result of pricing one size, keeping rejection distinct from a zero price.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum PriceOutcome {
    Priced { total: f64, breakdown: Breakdown },
    Rejected { reason: Rejection },
}

impl PriceOutcome {
    /// Billable total; zero for a rejection.
    pub fn total(&self) -> f64 {
        match self {
            PriceOutcome::Priced { total, .. } => *total,
            PriceOutcome::Rejected { .. } => 0.0,
        }
    }

    pub fn is_priced(&self) -> bool {
        matches!(self, PriceOutcome::Priced { .. })
    }

    pub fn rejection(&self) -> Option<&Rejection> {
        match self {
            PriceOutcome::Priced { .. } => None,
            PriceOutcome::Rejected { reason } => Some(reason),
        }
    }

    /// The breakdown line, or the rejection message.
    pub fn describe(&self) -> String {
        match self {
            PriceOutcome::Priced { breakdown, .. } => breakdown.to_string(),
            PriceOutcome::Rejected { reason } => reason.to_string(),
        }
    }
}

impl From<Rejection> for PriceOutcome {
    fn from(reason: Rejection) -> Self {
        PriceOutcome::Rejected { reason }
    }
}

/// Backward-compatible result: a total (0 when rejected) and a breakdown line.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PriceResult {
    pub total: f64,
    pub breakdown: String,
}

impl From<PriceOutcome> for PriceResult {
    fn from(outcome: PriceOutcome) -> Self {
        PriceResult {
            total: outcome.total(),
            breakdown: outcome.describe(),
        }
    }
}

/// The price calculation engine.
///
/// Stateless apart from its rounding policy; share it freely across threads.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PriceEngine {
    pub rounding: RoundingPolicy,
}

impl PriceEngine {
    pub fn new(rounding: RoundingPolicy) -> Self {
        Self { rounding }
    }

    /// Price a requested size (centimetres) under a product's billing rules.
    ///
    /// `price_override` replaces `price_per_unit` in every policy, which is how
    /// an alternate price list is applied without touching the configuration.
    /// Dimensions are not validated; non-finite or negative input gives
    /// meaningless totals.
    ///
    /// # Examples
    ///
    /// ```
    /// use curtain_pricing::models::{CalculationMethod, PricingConfig};
    /// use curtain_pricing::pricing::PriceEngine;
    ///
    /// let config = PricingConfig {
    ///     height_step: Some(0.2),
    ///     area_factor: Some(1.0),
    ///     ..PricingConfig::new(CalculationMethod::Area, 500.0)
    /// };
    /// let outcome = PriceEngine::default().evaluate(&config, 200.0, 210.0, None);
    /// assert_eq!(outcome.total(), 2200.0);
    /// assert_eq!(outcome.describe(), "2.00m x 2.20m x 1 = 4.40 ตร.ม. (@฿500)");
    /// ```
    pub fn evaluate(
        &self,
        config: &PricingConfig,
        width_cm: f64,
        height_cm: f64,
        price_override: Option<f64>,
    ) -> PriceOutcome {
        let width_m = width_cm / 100.0;
        let height_m = height_cm / 100.0;
        let method = config.method();
        let price = config.resolve_price(price_override);

        // Width is checked first, so it wins when both bounds are exceeded.
        if let Some(max) = config.active_max_width() {
            if width_m > max {
                tracing::debug!(width_m, max, "width exceeds maximum");
                return Rejection::WidthExceeded { max }.into();
            }
        }
        if let Some(max) = config.active_max_height() {
            if height_m > max {
                tracing::debug!(height_m, max, "height exceeds maximum");
                return Rejection::HeightExceeded { max }.into();
            }
        }

        match method {
            CalculationMethod::RailWidth => self.rail(config, width_m, price),
            CalculationMethod::Area | CalculationMethod::AreaSqYard => {
                self.area(config, width_m, height_m, price)
            }
            CalculationMethod::Box => Rejection::BoxNotImplemented.into(),
            CalculationMethod::Fixed => PriceOutcome::Priced {
                total: price,
                breakdown: Breakdown::Fixed { price },
            },
            CalculationMethod::Unrecognized(name) => {
                tracing::debug!(method = %name, "unrecognized calculation method");
                Rejection::InvalidMethod {
                    method: name.clone(),
                }
                .into()
            }
        }
    }

    fn rail(&self, config: &PricingConfig, width_m: f64, price: f64) -> PriceOutcome {
        let mut billable_width = width_m.max(config.min_billable_width.unwrap_or(0.0));
        if let Some(step) = config.active_width_step() {
            billable_width = ceil_to_step(billable_width, step);
        }

        let raw = billable_width * price;
        let total = match self.rounding {
            RoundingPolicy::Compatible => raw.ceil(),
            RoundingPolicy::Uniform => round_half_up(raw, 2).ceil(),
        };

        PriceOutcome::Priced {
            total,
            breakdown: Breakdown::Rail {
                billable_width,
                price,
            },
        }
    }

    fn area(
        &self,
        config: &PricingConfig,
        width_m: f64,
        height_m: f64,
        price: f64,
    ) -> PriceOutcome {
        let unit = if config.bills_in_square_yards() {
            AreaUnit::SquareYard
        } else {
            AreaUnit::SquareMetre
        };

        let billable_width = width_m.max(config.min_billable_width.unwrap_or(0.0));
        let mut billable_height = height_m.max(config.min_billable_height.unwrap_or(0.0));
        if let Some(step) = config.active_height_step() {
            billable_height = ceil_to_step(billable_height, step);
        }

        let mut area = billable_width * billable_height;
        if let Some(factor) = config.active_area_factor() {
            area *= factor;
        }
        // The floor replaces the factored area.
        if let Some(min_area) = config.active_min_area() {
            if area < min_area {
                area = min_area;
            }
        }
        if let Some(step) = config.active_area_rounding() {
            area = ceil_to_step(area, step);
        }
        area = round_half_up(area, 4);

        let total = round_half_up(area * price, 2).ceil();

        let factor = config
            .area_factor
            .filter(|f| *f != 0.0 && !f.is_nan())
            .unwrap_or(1.0);

        PriceOutcome::Priced {
            total,
            breakdown: Breakdown::Area {
                billable_width,
                billable_height,
                factor,
                area,
                unit,
                price,
            },
        }
    }
}

/// Price a requested size with the default engine, returning the
/// backward-compatible `{ total, breakdown }` shape.
///
/// A total of zero means rejected or not computable; inspect the breakdown
/// (or use [`PriceEngine::evaluate`]) to tell a rejection from a free item.
pub fn calculate_price(
    config: &PricingConfig,
    width_cm: f64,
    height_cm: f64,
    price_override: Option<f64>,
) -> PriceResult {
    PriceEngine::default()
        .evaluate(config, width_cm, height_cm, price_override)
        .into()
}
