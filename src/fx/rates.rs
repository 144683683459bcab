//! Exchange-rate table and USD-pivot cross-rate resolution

use bigdecimal::BigDecimal;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use crate::traits::RateResolver;
use crate::types::*;

/// A single registered rate, e.g. `CHF/USD = 0.9`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExchangeRate {
    /// Pair identifier as registered (`"CHF/USD"`)
    pub pair: String,
    /// Units of the quote currency per unit of the base currency
    pub rate: BigDecimal,
}

impl ExchangeRate {
    /// Create a new exchange rate
    pub fn new(pair: String, rate: BigDecimal) -> Self {
        Self { pair, rate }
    }

    /// Build the pair identifier for `base/quote`
    pub fn pair_id(base: &str, quote: &str) -> String {
        format!("{}/{}", base, quote)
    }

    /// Check that the rate can take part in a division
    pub fn validate(&self) -> RateResult<()> {
        if self.rate <= BigDecimal::from(0) {
            return Err(ExchangeRateError::NonPositive {
                pair: self.pair.clone(),
                rate: self.rate.clone(),
            });
        }
        Ok(())
    }
}

/// Rates keyed by pair identifier.
///
/// Registration never validates the identifier; bad or missing entries show
/// up as resolution failures.
#[derive(Debug, Clone, Default)]
pub struct RateTable {
    rates: HashMap<String, ExchangeRate>,
}

impl RateTable {
    /// Create an empty rate table
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or overwrite the rate for `pair`
    pub fn register(&mut self, pair: impl Into<String>, rate: BigDecimal) {
        let pair = pair.into();
        self.rates.insert(pair.clone(), ExchangeRate::new(pair, rate));
    }

    /// Look up a rate by pair identifier
    pub fn get(&self, pair: &str) -> Option<&ExchangeRate> {
        self.rates.get(pair)
    }

    /// Number of registered pairs
    pub fn len(&self) -> usize {
        self.rates.len()
    }

    /// Whether no rate has been registered
    pub fn is_empty(&self) -> bool {
        self.rates.is_empty()
    }
}

impl FromIterator<(String, BigDecimal)> for RateTable {
    fn from_iter<I: IntoIterator<Item = (String, BigDecimal)>>(iter: I) -> Self {
        let mut table = Self::new();
        for (pair, rate) in iter {
            table.register(pair, rate);
        }
        table
    }
}

/// Resolves cross rates through a shared pivot currency
#[derive(Debug, Clone, Copy, Default)]
pub struct UsdPivotResolver;

impl RateResolver for UsdPivotResolver {
    fn cross_rate(
        &self,
        rates: &RateTable,
        source_pair: &str,
        reference_pair: &str,
    ) -> RateResult<BigDecimal> {
        let source = rates
            .get(source_pair)
            .ok_or_else(|| ExchangeRateError::Missing(source_pair.to_string()))?;
        let reference = rates
            .get(reference_pair)
            .ok_or_else(|| ExchangeRateError::Missing(reference_pair.to_string()))?;
        source.validate()?;
        reference.validate()?;

        Ok(&source.rate / &reference.rate)
    }
}
