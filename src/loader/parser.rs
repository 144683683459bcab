//! Turns one tab-separated line into a [`TransactionRecord`]

use bigdecimal::BigDecimal;
use std::str::FromStr;

use crate::types::*;

/// Field separator used by the input files
pub const FIELD_SEPARATOR: char = '\t';

/// Split a line into its raw fields
pub fn split_fields(line: &str) -> Vec<&str> {
    line.split(FIELD_SEPARATOR).collect()
}

/// Whether a line has the shape of a record (non-empty, exactly seven fields)
pub fn is_structurally_valid(line: &str) -> bool {
    !line.is_empty() && split_fields(line).len() == FIELD_COUNT
}

/// Longest amount literal accepted, in characters
pub const MAX_AMOUNT_LEN: usize = 64;

/// Most significant digits an amount may carry
pub const MAX_AMOUNT_DIGITS: u64 = 38;

/// Largest absolute scale (decimal exponent) an amount may carry
pub const MAX_AMOUNT_SCALE: i64 = 28;

/// Parse a decimal amount exactly; no floating point is involved.
///
/// Literals outside the supported magnitude are rejected, since exponent
/// notation like `1e50000000` would otherwise expand to millions of digits
/// once rescaled.
pub fn parse_amount(text: &str) -> ParseResult<BigDecimal> {
    let invalid = |reason: String| FormatError::InvalidAmount {
        value: text.to_string(),
        reason,
    };

    if text.len() > MAX_AMOUNT_LEN {
        return Err(invalid(format!(
            "longer than {} characters",
            MAX_AMOUNT_LEN
        )));
    }

    let amount = BigDecimal::from_str(text).map_err(|e| invalid(e.to_string()))?;

    let (_, scale) = amount.as_bigint_and_exponent();
    if scale.abs() > MAX_AMOUNT_SCALE {
        return Err(invalid(format!(
            "scale {} is outside ±{}",
            scale, MAX_AMOUNT_SCALE
        )));
    }

    if amount.digits() > MAX_AMOUNT_DIGITS {
        return Err(invalid(format!(
            "more than {} significant digits",
            MAX_AMOUNT_DIGITS
        )));
    }

    Ok(amount)
}

/// Parse a line into a record.
///
/// Column order: company code, four descriptive fields, currency, amount.
/// Surrounding whitespace is trimmed from every field.
pub fn parse_line(line: &str) -> ParseResult<TransactionRecord> {
    let fields: Vec<&str> = split_fields(line).into_iter().map(str::trim).collect();

    let [company_code, d1, d2, d3, d4, currency, amount] = fields.as_slice() else {
        return Err(FormatError::FieldCount {
            expected: FIELD_COUNT,
            found: fields.len(),
        });
    };

    if currency.is_empty() {
        return Err(FormatError::EmptyField("currency"));
    }

    let amount = parse_amount(amount)?;

    Ok(TransactionRecord::new(
        company_code.to_string(),
        [
            d1.to_string(),
            d2.to_string(),
            d3.to_string(),
            d4.to_string(),
        ],
        currency.to_string(),
        amount,
    ))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_line() {
        let record = parse_line("C1\tx\ty\tz\tw\tCHF\t100.00").unwrap();
        assert_eq!(record.company_code, "C1");
        assert_eq!(record.descriptors, ["x", "y", "z", "w"]);
        assert_eq!(record.currency, "CHF");
        assert_eq!(record.amount(), &BigDecimal::from(100));
        assert_eq!(record.business_key(), "C1/x/y/z/w");
    }

    #[test]
    fn test_parse_line_keeps_exact_decimal() {
        let record = parse_line("C1\tx\ty\tz\tw\tEUR\t0.1").unwrap();
        assert_eq!(record.amount().to_string(), "0.1");
    }

    #[test]
    fn test_parse_line_trims_crlf() {
        let record = parse_line("C1\tx\ty\tz\tw\tEUR\t-12.50\r").unwrap();
        assert_eq!(record.amount(), &BigDecimal::from_str("-12.5").unwrap());
    }

    #[test]
    fn test_parse_line_invalid_amount() {
        let err = parse_line("C1\tx\ty\tz\tw\tEUR\tabc").unwrap_err();
        assert!(matches!(err, FormatError::InvalidAmount { ref value, .. } if value == "abc"));
    }

    #[test]
    fn test_parse_amount_rejects_huge_exponent() {
        for text in ["1e50000000", "1E-50000000", "5e29"] {
            let err = parse_amount(text).unwrap_err();
            assert!(matches!(err, FormatError::InvalidAmount { ref value, .. } if value == text));
        }
        assert_eq!(parse_amount("1.5e3").unwrap(), BigDecimal::from(1500));
    }

    #[test]
    fn test_parse_amount_rejects_too_many_digits() {
        assert!(parse_amount(&"9".repeat(39)).is_err());
        assert!(parse_amount(&"9".repeat(65)).is_err());
        assert!(parse_amount(&"9".repeat(38)).is_ok());
    }

    #[test]
    fn test_trailing_tab_adds_a_field() {
        // A trailing empty field still counts, so the line has eight fields
        assert!(!is_structurally_valid("C1\ta\tb\tc\td\tEUR\t5\t"));
        // An empty amount keeps the line at seven fields but fails parsing
        assert!(is_structurally_valid("C1\ta\tb\tc\td\tEUR\t"));
        assert!(matches!(
            parse_line("C1\ta\tb\tc\td\tEUR\t"),
            Err(FormatError::InvalidAmount { .. })
        ));
    }

    #[test]
    fn test_parse_line_wrong_field_count() {
        let err = parse_line("C1\tx\tEUR\t1").unwrap_err();
        assert_eq!(
            err,
            FormatError::FieldCount {
                expected: 7,
                found: 4
            }
        );
    }

    #[test]
    fn test_parse_line_empty_currency() {
        let err = parse_line("C1\tx\ty\tz\tw\t\t1").unwrap_err();
        assert_eq!(err, FormatError::EmptyField("currency"));
    }

    #[test]
    fn test_structural_filter() {
        assert!(is_structurally_valid("a\tb\tc\td\te\tf\tg"));
        assert!(!is_structurally_valid(""));
        assert!(!is_structurally_valid("a\tb\tc"));
        assert!(!is_structurally_valid("a\tb\tc\td\te\tf\tg\th"));
    }
}
