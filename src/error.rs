use thiserror::Error;

/// Errors raised around the pricing engine: catalog I/O, settings and lookups.
///
/// The engine itself never fails; rejections are values (see
/// [`crate::pricing::PriceOutcome`]).
#[derive(Error, Debug)]
pub enum PricingError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("TOML error: {0}")]
    Toml(String),

    #[error("Excel error: {0}")]
    Excel(String),

    #[error("Parse error: {0}")]
    ParseError(String),

    #[error("Validation error: {0}")]
    ValidationError(String),

    #[error("Not found: {0}")]
    NotFound(String),
}

impl From<toml::de::Error> for PricingError {
    fn from(e: toml::de::Error) -> Self {
        PricingError::Toml(e.to_string())
    }
}

impl From<toml::ser::Error> for PricingError {
    fn from(e: toml::ser::Error) -> Self {
        PricingError::Toml(e.to_string())
    }
}

impl From<calamine::Error> for PricingError {
    fn from(e: calamine::Error) -> Self {
        PricingError::Excel(e.to_string())
    }
}

impl From<calamine::XlsxError> for PricingError {
    fn from(e: calamine::XlsxError) -> Self {
        PricingError::Excel(e.to_string())
    }
}

impl From<rust_xlsxwriter::XlsxError> for PricingError {
    fn from(e: rust_xlsxwriter::XlsxError) -> Self {
        PricingError::Excel(e.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_io_error_display() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "file not found");
        let err = PricingError::from(io_err);
        let msg = err.to_string();
        assert!(msg.contains("IO error"));
        assert!(msg.contains("file not found"));
    }

    #[test]
    fn test_excel_error_display() {
        let err = PricingError::Excel("bad sheet".to_string());
        assert_eq!(err.to_string(), "Excel error: bad sheet");
    }

    #[test]
    fn test_validation_error_display() {
        let err = PricingError::ValidationError("price_per_unit must be non-negative".to_string());
        assert_eq!(
            err.to_string(),
            "Validation error: price_per_unit must be non-negative"
        );
    }

    #[test]
    fn test_not_found_display() {
        let err = PricingError::NotFound("product 'VEL-01'".to_string());
        assert_eq!(err.to_string(), "Not found: product 'VEL-01'");
    }

    #[test]
    fn test_json_error_from_conversion() {
        let result: Result<serde_json::Value, _> = serde_json::from_str("not valid json{{{");
        let json_err = result.unwrap_err();
        let err: PricingError = json_err.into();
        assert!(matches!(err, PricingError::Json(_)));
        assert!(err.to_string().contains("JSON error"));
    }

    #[test]
    fn test_toml_error_from_conversion() {
        let result: Result<toml::Table, _> = toml::from_str("key = = 1");
        let err: PricingError = result.unwrap_err().into();
        assert!(matches!(err, PricingError::Toml(_)));
        assert!(err.to_string().starts_with("TOML error"));
    }
}
