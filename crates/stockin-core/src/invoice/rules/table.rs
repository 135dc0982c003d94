//! Item table segmentation and non-item line filtering.

use crate::models::config::TableConfig;

use super::patterns::{
    NON_ITEM_ANYWHERE, NON_ITEM_PREFIX, SEPARATOR_LINE, TABLE_HEADER_KEYWORD,
};

/// Column markers of the quantity-first layout's header row.
const MULTI_COLUMN_MARKERS: [&str; 4] = ["QTY", "ITEM NO", "DESCRIPTION", "PRICE"];

/// Index of the first line after the item table header.
///
/// Falls back to `min(fallback_start_index, lines.len())` when no header
/// row appears within the scan window.
pub fn find_line_items_start_index(lines: &[String], config: &TableConfig) -> usize {
    lines
        .iter()
        .take(config.header_scan_lines)
        .position(|line| is_table_header(line))
        .map(|i| i + 1)
        .unwrap_or_else(|| config.fallback_start_index.min(lines.len()))
}

fn is_table_header(line: &str) -> bool {
    if TABLE_HEADER_KEYWORD.is_match(line) {
        return true;
    }
    let upper = line.to_uppercase();
    MULTI_COLUMN_MARKERS.iter().all(|marker| upper.contains(marker))
}

/// Whether a line is a total, tax, freight, footer or separator row.
pub fn is_non_item_line(line: &str) -> bool {
    let line = line.trim();
    line.chars().count() < 3
        || SEPARATOR_LINE.is_match(line)
        || NON_ITEM_PREFIX.is_match(line)
        || NON_ITEM_ANYWHERE.is_match(line)
}
