use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::PricingError;
use crate::models::PriceMode;
use crate::pricing::{PriceEngine, RoundingPolicy};

/// Defaults for the command-line tool, read from a TOML file.
///
/// ```toml
/// catalog = "data/catalog.csv"
/// price_mode = "platform"
/// rounding = "uniform"
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Settings {
    /// Catalog used when no `--catalog` is given
    pub catalog: Option<PathBuf>,
    /// Price list used when no `--mode` is given
    pub price_mode: PriceMode,
    /// Rail rounding policy
    pub rounding: RoundingPolicy,
}

impl Settings {
    /// Load settings from a TOML file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, PricingError> {
        let content = std::fs::read_to_string(path.as_ref())?;
        Self::from_toml_str(&content)
    }

    pub fn from_toml_str(content: &str) -> Result<Self, PricingError> {
        Ok(toml::from_str(content)?)
    }

    /// Engine configured with these settings.
    pub fn engine(&self) -> PriceEngine {
        PriceEngine::new(self.rounding)
    }
}
