//! Best-effort parsing of priced lines that no table layout recognizes.

use rust_decimal::Decimal;

use super::amounts::{last_amount, parse_quantity};
use super::layouts::RowColumns;
use super::patterns::{AMOUNT_PATTERN, LETTER_RUN, NAME_BOUNDARY, STANDALONE_NUMBER};
use super::table::is_non_item_line;

/// Whether a line plausibly describes a priced item.
pub fn looks_like_line_item(line: &str) -> bool {
    line.chars().count() > 10
        && AMOUNT_PATTERN.is_match(line)
        && LETTER_RUN.is_match(line)
        && !is_non_item_line(line)
}

/// Recover name, quantity and unit price from a free-form priced line.
///
/// The last amount is the price; the text before the first standalone number
/// or currency sign is the name; the first other standalone number is the
/// quantity (default 1).
pub fn parse_loose_line(line: &str) -> Option<RowColumns> {
    if !looks_like_line_item(line) {
        return None;
    }

    let (unit_price, price_range) = last_amount(line)?;

    let name = NAME_BOUNDARY
        .find(line)
        .map(|m| line[..m.start()].trim())
        .filter(|name| name.chars().any(char::is_alphabetic))
        .map(str::to_string)
        .unwrap_or_else(|| worded_tokens(line));

    let quantity = STANDALONE_NUMBER
        .captures_iter(line)
        .filter(|caps| caps["currency"].is_empty())
        .filter_map(|caps| caps.name("number"))
        .find(|number| number.range() != price_range)
        .and_then(|number| parse_quantity(number.as_str()))
        .unwrap_or(Decimal::ONE);

    Some(RowColumns::new(name, quantity, unit_price))
}

/// Tokens of the line that contain letters, in order.
fn worded_tokens(line: &str) -> String {
    line.split_whitespace()
        .filter(|token| token.chars().any(char::is_alphabetic))
        .collect::<Vec<_>>()
        .join(" ")
}
