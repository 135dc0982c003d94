//! Product name cleaning.

use regex::Regex;

use super::patterns::{
    CODE_ALNUM_SEPARATOR, CODE_DASH_SEQUENCE, CODE_LABEL, CODE_SHORT_ALNUM, LEADING_PUNCTUATION,
    TRAILING_PUNCTUATION, WHITESPACE_RUN,
};

/// Names shorter than this after cleaning fall back to the raw description.
const MIN_NAME_CHARS: usize = 3;

/// Vendor code prefixes, most specific first. The flag marks prefixes that
/// only count as codes when they contain a digit.
fn code_prefixes() -> [(&'static Regex, bool); 4] {
    [
        (&*CODE_DASH_SEQUENCE, false),
        (&*CODE_SHORT_ALNUM, false),
        (&*CODE_LABEL, false),
        (&*CODE_ALNUM_SEPARATOR, true),
    ]
}

/// Strip a leading vendor product code from a description.
///
/// Only the first matching prefix is removed. If fewer than three characters
/// would remain, the description is returned as printed.
pub fn clean_product_name(raw: &str) -> String {
    let raw = collapse(raw);

    let stripped = code_prefixes()
        .into_iter()
        .find_map(|(pattern, needs_digit)| {
            let m = pattern.find(&raw)?;
            if needs_digit && !m.as_str().chars().any(|c| c.is_ascii_digit()) {
                return None;
            }
            Some(&raw[m.end()..])
        })
        .unwrap_or(raw.as_str());

    let cleaned = LEADING_PUNCTUATION.replace(stripped, "");
    let cleaned = TRAILING_PUNCTUATION.replace(&cleaned, "");
    let cleaned = collapse(&cleaned);

    if cleaned.chars().count() < MIN_NAME_CHARS {
        raw
    } else {
        cleaned
    }
}

fn collapse(s: &str) -> String {
    WHITESPACE_RUN.replace_all(s.trim(), " ").into_owned()
}
