mod engine;
mod calculator;
mod quote;
pub mod rounding;

pub use engine::{
    calculate_price, AreaUnit, Breakdown, PriceEngine, PriceOutcome, PriceResult, Rejection,
    RoundingPolicy,
};
pub use calculator::{Calculator, RankedPrice};
pub use quote::{CartLine, Quote, QuoteLine};
