//! Validation utilities

use crate::types::*;

/// Validate that a currency code is three ASCII uppercase letters
pub fn validate_currency_code(code: &str) -> ConfigResult<()> {
    if code.len() != 3 || !code.chars().all(|c| c.is_ascii_uppercase()) {
        return Err(ConfigError::Validation(format!(
            "Currency code must be three uppercase letters, got '{}'",
            code
        )));
    }

    Ok(())
}

/// Validate that the header marker can identify a header row
pub fn validate_header_marker(marker: &str) -> ConfigResult<()> {
    if marker.trim().is_empty() {
        return Err(ConfigError::Validation(
            "Header marker cannot be empty".to_string(),
        ));
    }

    // A marker spanning columns could never match a single split field set
    if marker.contains('\t') {
        return Err(ConfigError::Validation(
            "Header marker cannot contain a tab".to_string(),
        ));
    }

    Ok(())
}

/// Validate the number of decimal places kept after arithmetic
pub fn validate_amount_scale(scale: i64) -> ConfigResult<()> {
    if !(0..=28).contains(&scale) {
        return Err(ConfigError::Validation(format!(
            "Amount scale must be between 0 and 28, got {}",
            scale
        )));
    }

    Ok(())
}
