//! Core types and data structures for the transaction loader

use bigdecimal::{BigDecimal, RoundingMode};
use serde::{Deserialize, Serialize};

/// Number of tab-separated fields in a well-formed line
pub const FIELD_COUNT: usize = 7;

/// Number of descriptive fields between the company code and the currency
pub const DESCRIPTOR_COUNT: usize = 4;

/// Separator used when joining key fields into a business key
pub const KEY_SEPARATOR: &str = "/";

/// A single transaction line after parsing and normalization
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TransactionRecord {
    /// Company code (first column)
    pub company_code: String,
    /// Descriptive columns, in file order
    pub descriptors: [String; DESCRIPTOR_COUNT],
    /// Currency code as it appeared in the line
    pub currency: String,
    /// Current amount; the running mean once duplicates have been merged
    amount: BigDecimal,
    /// Sum of every amount folded into this record
    sum: BigDecimal,
    /// Number of lines folded into this record
    count: u32,
}

impl TransactionRecord {
    /// Create a new record holding a single observed amount
    pub fn new(
        company_code: String,
        descriptors: [String; DESCRIPTOR_COUNT],
        currency: String,
        amount: BigDecimal,
    ) -> Self {
        Self {
            company_code,
            descriptors,
            currency,
            sum: amount.clone(),
            amount,
            count: 1,
        }
    }

    /// Deterministic key identifying "the same transaction" across lines.
    ///
    /// Built from the company code and the descriptive fields; the amount and
    /// currency never take part.
    pub fn business_key(&self) -> String {
        std::iter::once(self.company_code.as_str())
            .chain(self.descriptors.iter().map(String::as_str))
            .collect::<Vec<_>>()
            .join(KEY_SEPARATOR)
    }

    /// Current amount, in the reference currency once normalized
    pub fn amount(&self) -> &BigDecimal {
        &self.amount
    }

    /// Replace the amount, treating every observation as having had it.
    ///
    /// This is the only way to change the amount; the accumulator is kept in
    /// step so later merges see the new value.
    pub fn set_amount(&mut self, amount: BigDecimal) {
        self.sum = &amount * BigDecimal::from(self.count);
        self.amount = amount;
    }

    /// Fold another record's amount into this one and recompute the mean.
    ///
    /// `other` may itself be the result of earlier merges; its whole
    /// accumulator is carried over. A mean that terminates is stored exactly;
    /// only a non-terminating one is rounded half-even to `scale`.
    pub fn merge(&mut self, other: &TransactionRecord, scale: i64) {
        self.sum += &other.sum;
        self.count += other.count;

        let count = BigDecimal::from(self.count);
        let (_, sum_scale) = self.sum.as_bigint_and_exponent();
        // sum / count terminates within sum_scale plus one digit per factor of 2 or 5
        let exact_scale = sum_scale.max(0) + i64::from(u32::BITS - self.count.leading_zeros());
        let quotient = &self.sum / &count;
        let mean = quotient.with_scale_round(exact_scale.max(scale), RoundingMode::HalfEven);

        self.amount = if &mean * &count == self.sum {
            mean
        } else {
            quotient.with_scale_round(scale, RoundingMode::HalfEven)
        };
    }

    /// Number of lines that contributed to this record
    pub fn observations(&self) -> u32 {
        self.count
    }

    /// Sum of all contributing amounts
    pub fn total(&self) -> &BigDecimal {
        &self.sum
    }
}

/// A degraded outcome recorded while loading.
///
/// None of these abort a batch; they are kept so callers can inspect
/// what was skipped or left unconverted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Diagnostic {
    /// The input did not look like the expected dataset; nothing was loaded
    StructuralRejection { reason: String },
    /// A line passed the structural filter but could not be parsed
    SkippedLine { line: String, error: String },
    /// An amount was left in its original currency
    ConversionSkipped { currency: String, error: String },
}

/// Errors raised while parsing a single line
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum FormatError {
    #[error("Expected {expected} tab-separated fields, found {found}")]
    FieldCount { expected: usize, found: usize },
    #[error("Invalid amount '{value}': {reason}")]
    InvalidAmount { value: String, reason: String },
    #[error("Empty field: {0}")]
    EmptyField(&'static str),
}

/// Errors raised while resolving an exchange rate
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ExchangeRateError {
    #[error("Exchange rate not registered: {0}")]
    Missing(String),
    #[error("Exchange rate for {pair} must be positive, got {rate}")]
    NonPositive { pair: String, rate: BigDecimal },
}

/// Errors raised while building a loader configuration
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Validation error: {0}")]
    Validation(String),
    #[error("Parse error: {0}")]
    Parse(String),
}

/// Result type for line parsing
pub type ParseResult<T> = Result<T, FormatError>;

/// Result type for rate resolution
pub type RateResult<T> = Result<T, ExchangeRateError>;

/// Result type for configuration
pub type ConfigResult<T> = Result<T, ConfigError>;

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    fn record(amount: &str) -> TransactionRecord {
        TransactionRecord::new(
            "C1".to_string(),
            [
                "x".to_string(),
                "y".to_string(),
                "z".to_string(),
                "w".to_string(),
            ],
            "EUR".to_string(),
            BigDecimal::from_str(amount).unwrap(),
        )
    }

    #[test]
    fn test_business_key_excludes_amount_and_currency() {
        let mut a = record("1.00");
        let b = record("99.00");
        a.currency = "CHF".to_string();
        assert_eq!(a.business_key(), "C1/x/y/z/w");
        assert_eq!(a.business_key(), b.business_key());
    }

    #[test]
    fn test_merge_two_is_plain_mean() {
        let mut a = record("100.00");
        a.merge(&record("200.00"), 10);
        assert_eq!(a.amount(), &BigDecimal::from(150));
        assert_eq!(a.observations(), 2);
    }

    #[test]
    fn test_merge_three_is_running_mean() {
        let mut a = record("10");
        a.merge(&record("20"), 10);
        a.merge(&record("60"), 10);
        // (10 + 20 + 60) / 3, not ((10 + 20) / 2 + 60) / 2
        assert_eq!(a.amount(), &BigDecimal::from(30));
        assert_eq!(a.total(), &BigDecimal::from(90));
    }

    #[test]
    fn test_merge_two_keeps_exact_mean_beyond_scale() {
        let mut a = record("1.00000000005");
        a.merge(&record("1.00000000005"), 10);
        assert_eq!(a.amount(), &BigDecimal::from_str("1.00000000005").unwrap());

        let mut b = record("0.0000000001");
        b.merge(&record("0"), 10);
        assert_eq!(b.observations(), 2);
        assert_eq!(b.amount(), &BigDecimal::from_str("0.00000000005").unwrap());
    }

    #[test]
    fn test_merge_non_terminating_mean_is_rounded() {
        let mut a = record("1");
        a.merge(&record("0"), 10);
        a.merge(&record("0"), 10);
        assert_eq!(a.amount(), &BigDecimal::from_str("0.3333333333").unwrap());
    }

    #[test]
    fn test_set_amount_on_merged_record() {
        let mut a = record("10");
        a.merge(&record("30"), 10);
        a.set_amount(BigDecimal::from(5));
        a.merge(&record("8"), 10);
        assert_eq!(a.amount(), &BigDecimal::from(6));
    }

    #[test]
    fn test_set_amount_keeps_accumulator_in_step() {
        let mut a = record("100");
        a.set_amount(BigDecimal::from(80));
        assert_eq!(a.total(), &BigDecimal::from(80));
        a.merge(&record("20"), 10);
        assert_eq!(a.amount(), &BigDecimal::from(50));
    }

    #[test]
    fn test_format_error_display() {
        let err = FormatError::FieldCount {
            expected: 7,
            found: 3,
        };
        assert_eq!(err.to_string(), "Expected 7 tab-separated fields, found 3");
    }
}
