//! Line splitting for OCR text.

/// Split raw text into trimmed, non-empty lines, preserving order.
pub fn split_lines(text: &str) -> Vec<String> {
    text.lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(str::to_string)
        .collect()
}
