//! Loader configuration

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

use crate::types::*;
use crate::utils::validation::*;

/// Settings that shape a load: which currencies are converted, into what,
/// and how the dataset's header is recognised.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoaderConfig {
    /// Currency every converted amount ends up in
    pub reference_currency: String,
    /// Currency all registered rates are quoted against
    pub pivot_currency: String,
    /// Text that identifies the header row
    pub header_marker: String,
    /// Currencies whose amounts are converted; anything else passes through
    pub conversion_currencies: BTreeSet<String>,
    /// Decimal places kept after conversion and averaging
    pub amount_scale: i64,
}

impl Default for LoaderConfig {
    fn default() -> Self {
        Self {
            reference_currency: "EUR".to_string(),
            pivot_currency: "USD".to_string(),
            header_marker: "Company Code".to_string(),
            conversion_currencies: ["CHF", "GBP"].iter().map(|c| c.to_string()).collect(),
            amount_scale: 10,
        }
    }
}

impl LoaderConfig {
    /// Parse and validate a configuration from JSON
    pub fn from_json(json: &str) -> ConfigResult<Self> {
        let config: Self =
            serde_json::from_str(json).map_err(|e| ConfigError::Parse(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Add a currency to the conversion set
    pub fn with_conversion_currency(mut self, code: impl Into<String>) -> Self {
        self.conversion_currencies.insert(code.into());
        self
    }

    /// Set the reference currency
    pub fn with_reference_currency(mut self, code: impl Into<String>) -> Self {
        self.reference_currency = code.into();
        self
    }

    /// Whether amounts in `currency` need converting
    pub fn requires_conversion(&self, currency: &str) -> bool {
        self.conversion_currencies.contains(currency)
    }

    /// Pair identifier for `currency` against the pivot, e.g. `CHF/USD`
    pub fn pivot_pair(&self, currency: &str) -> String {
        format!("{}/{}", currency, self.pivot_currency)
    }

    /// Validate the configuration
    pub fn validate(&self) -> ConfigResult<()> {
        validate_currency_code(&self.reference_currency)?;
        validate_currency_code(&self.pivot_currency)?;
        validate_header_marker(&self.header_marker)?;
        validate_amount_scale(self.amount_scale)?;

        for code in &self.conversion_currencies {
            validate_currency_code(code)?;
        }

        if self.requires_conversion(&self.reference_currency) {
            return Err(ConfigError::Validation(format!(
                "Reference currency {} cannot also require conversion",
                self.reference_currency
            )));
        }

        Ok(())
    }
}
