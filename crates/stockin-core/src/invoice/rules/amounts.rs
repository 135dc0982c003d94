//! Amount and quantity parsing for invoice lines.

use rust_decimal::Decimal;
use std::ops::Range;
use std::str::FromStr;

use super::patterns::AMOUNT_PATTERN;

/// Parse a printed amount (e.g., "$1,234.50" or "9.00").
pub fn parse_amount(s: &str) -> Option<Decimal> {
    let cleaned: String = s
        .chars()
        .filter(|c| c.is_ascii_digit() || *c == '.' || *c == '-')
        .collect();

    if cleaned.is_empty() {
        return None;
    }

    Decimal::from_str(&cleaned).ok()
}

/// Parse a quantity column. Zero and negative quantities are rejected.
pub fn parse_quantity(s: &str) -> Option<Decimal> {
    parse_amount(s).filter(|q| *q > Decimal::ZERO)
}

/// The last two-decimal amount in a line, with its byte range.
pub fn last_amount(line: &str) -> Option<(Decimal, Range<usize>)> {
    AMOUNT_PATTERN
        .find_iter(line)
        .filter_map(|m| parse_amount(m.as_str()).map(|value| (value, m.range())))
        .last()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_amount() {
        assert_eq!(parse_amount("$1,234.50"), Some(Decimal::from_str("1234.50").unwrap()));
        assert_eq!(parse_amount("9.00"), Some(Decimal::from_str("9.00").unwrap()));
        assert_eq!(parse_amount("$ 12.50"), Some(Decimal::from_str("12.50").unwrap()));
        assert_eq!(parse_amount("abc"), None);
    }

    #[test]
    fn test_parse_quantity() {
        assert_eq!(parse_quantity("2"), Some(Decimal::from(2)));
        assert_eq!(parse_quantity("1.5"), Some(Decimal::from_str("1.5").unwrap()));
        assert_eq!(parse_quantity("0"), None);
    }

    #[test]
    fn test_last_amount() {
        let line = "Raw Cacao Powder 250g 2 .... $9.00";
        let (value, range) = last_amount(line).unwrap();
        assert_eq!(value, Decimal::from_str("9.00").unwrap());
        assert_eq!(&line[range], "9.00");

        assert!(last_amount("no prices here").is_none());
    }
}
