//! Aggregating loader: filter, parse, normalize and merge raw lines

use bigdecimal::{BigDecimal, RoundingMode};
use std::collections::hash_map::Entry;
use tracing::{debug, warn};

use crate::fx::{RateTable, UsdPivotResolver};
use crate::loader::parser;
use crate::loader::LoaderConfig;
use crate::traits::*;
use crate::types::*;

/// Loads tab-delimited transaction lines into a [`RecordMap`].
///
/// The loader owns its rate table; rates are registered before a load and
/// only read while lines are processed. Diagnostics describe the most recent
/// load: each call to [`Loader::load`] starts from an empty buffer.
pub struct DataLoader<R: RateResolver = UsdPivotResolver> {
    config: LoaderConfig,
    rates: RateTable,
    resolver: R,
    diagnostics: Vec<Diagnostic>,
}

impl DataLoader<UsdPivotResolver> {
    /// Create a loader resolving rates through the configured pivot currency
    pub fn new(config: LoaderConfig, rates: RateTable) -> ConfigResult<Self> {
        Self::with_resolver(config, rates, UsdPivotResolver)
    }
}

impl Default for DataLoader<UsdPivotResolver> {
    fn default() -> Self {
        Self {
            config: LoaderConfig::default(),
            rates: RateTable::new(),
            resolver: UsdPivotResolver,
            diagnostics: Vec::new(),
        }
    }
}

impl<R: RateResolver> DataLoader<R> {
    /// Create a loader with a custom rate resolver
    pub fn with_resolver(
        config: LoaderConfig,
        rates: RateTable,
        resolver: R,
    ) -> ConfigResult<Self> {
        config.validate()?;
        Ok(Self {
            config,
            rates,
            resolver,
            diagnostics: Vec::new(),
        })
    }

    /// Configuration this loader was built with
    pub fn config(&self) -> &LoaderConfig {
        &self.config
    }

    /// Registered exchange rates
    pub fn rates(&self) -> &RateTable {
        &self.rates
    }

    /// Insert or overwrite a rate. The identifier is not checked here.
    pub fn register_exchange_rate(&mut self, pair: impl Into<String>, rate: BigDecimal) {
        self.rates.register(pair, rate);
    }

    /// Diagnostics recorded by the last load, plus any direct conversions since
    pub fn diagnostics(&self) -> &[Diagnostic] {
        &self.diagnostics
    }

    /// Drain the recorded diagnostics
    pub fn take_diagnostics(&mut self) -> Vec<Diagnostic> {
        std::mem::take(&mut self.diagnostics)
    }

    /// Convert `amount` from `currency` into the reference currency.
    ///
    /// When either pivot rate is missing or unusable the amount comes back
    /// unchanged and a [`Diagnostic::ConversionSkipped`] is recorded.
    pub fn convert_to_reference(&mut self, amount: &BigDecimal, currency: &str) -> BigDecimal {
        let source_pair = self.config.pivot_pair(currency);
        let reference_pair = self.config.pivot_pair(&self.config.reference_currency);

        match self
            .resolver
            .cross_rate(&self.rates, &source_pair, &reference_pair)
        {
            Ok(rate) => {
                (amount * rate).with_scale_round(self.config.amount_scale, RoundingMode::HalfEven)
            }
            Err(e) => {
                warn!(currency, error = %e, "Amount is unchanged after failed conversion");
                self.diagnostics.push(Diagnostic::ConversionSkipped {
                    currency: currency.to_string(),
                    error: e.to_string(),
                });
                amount.clone()
            }
        }
    }

    /// Normalize a freshly parsed record into the reference currency
    fn normalize(&mut self, record: &mut TransactionRecord) {
        if self.config.requires_conversion(&record.currency) {
            let converted = self.convert_to_reference(record.amount(), &record.currency);
            record.set_amount(converted);
        }
    }

    fn merge_lines<S: AsRef<str>>(&mut self, mut map: RecordMap, lines: &[S]) -> RecordMap {
        let filtered: Vec<&str> = lines
            .iter()
            .map(|line| line.as_ref())
            .filter(|line| parser::is_structurally_valid(line))
            .collect();

        let marker = self.config.header_marker.clone();
        match filtered.first() {
            Some(first) if first.contains(marker.as_str()) => {}
            first => {
                let reason = match first {
                    Some(_) => format!("first record line does not contain '{}'", marker),
                    None => "no line has the expected field count".to_string(),
                };
                warn!("Rejecting input: {}", reason);
                self.diagnostics.push(Diagnostic::StructuralRejection { reason });
                return RecordMap::new();
            }
        }

        let mut parsed = 0usize;
        let mut merged = 0usize;
        let mut skipped = 0usize;

        for line in filtered {
            if line.contains(marker.as_str()) {
                continue;
            }

            let mut record = match parser::parse_line(line) {
                Ok(record) => record,
                Err(e) => {
                    warn!("Skipping line: {}", e);
                    self.diagnostics.push(Diagnostic::SkippedLine {
                        line: line.to_string(),
                        error: e.to_string(),
                    });
                    skipped += 1;
                    continue;
                }
            };
            parsed += 1;

            self.normalize(&mut record);

            match map.entry(record.business_key()) {
                Entry::Occupied(mut existing) => {
                    existing.get_mut().merge(&record, self.config.amount_scale);
                    merged += 1;
                }
                Entry::Vacant(slot) => {
                    slot.insert(record);
                }
            }
        }

        debug!(
            parsed,
            merged,
            skipped,
            records = map.len(),
            "Finished loading transaction lines"
        );
        map
    }
}

impl<R: RateResolver> Loader for DataLoader<R> {
    fn load<S: AsRef<str>>(&mut self, map: RecordMap, lines: Option<&[S]>) -> Option<RecordMap> {
        self.diagnostics.clear();
        let lines = lines?;
        Some(self.merge_lines(map, lines))
    }
}
