//! Vendor and invoice number extraction from the invoice header.

use regex::Regex;
use tracing::trace;

use crate::models::config::{HeaderConfig, KnownVendor};
use crate::models::invoice::Vendor;

use super::patterns::{
    BARE_INVOICE_NUMBER, CONTACT_OR_REGISTRY_LABEL, DOLLAR_ONLY_LINE, INVOICE_NO_WITH_COLON,
    INVOICE_NUMBER_LABEL, INV_NO_SHORT, PAGE_MARKER, PURE_NUMBER_LINE, TAX_INVOICE_NUMBER,
    TAX_LABEL, TOTAL_LABEL, VENDOR_NAME_DISALLOWED, WHITESPACE_RUN,
};
use super::{ExtractionMatch, FieldExtractor};

const MAX_VENDOR_NAME_CHARS: usize = 50;

/// Vendor name extractor.
pub struct VendorExtractor {
    scan_lines: usize,
    known_vendors: Vec<KnownVendor>,
}

impl VendorExtractor {
    pub fn new(config: &HeaderConfig) -> Self {
        Self {
            scan_lines: config.vendor_scan_lines,
            known_vendors: config.known_vendors.clone(),
        }
    }

    /// Extract the vendor, falling back to [`Vendor::unknown`].
    pub fn extract_vendor(&self, lines: &[String]) -> Vendor {
        self.extract(lines)
            .map(|m| Vendor::new(m.value, m.confidence))
            .unwrap_or_else(Vendor::unknown)
    }

    fn known_vendor(&self, line: &str) -> Option<&KnownVendor> {
        let lower = line.to_lowercase();
        self.known_vendors
            .iter()
            .find(|v| !v.pattern.is_empty() && lower.contains(&v.pattern.to_lowercase()))
    }
}

impl Default for VendorExtractor {
    fn default() -> Self {
        Self::new(&HeaderConfig::default())
    }
}

impl FieldExtractor for VendorExtractor {
    type Output = ExtractionMatch<String>;

    fn extract(&self, lines: &[String]) -> Option<Self::Output> {
        let header = &lines[..lines.len().min(self.scan_lines)];

        for (i, line) in header.iter().enumerate() {
            if let Some(vendor) = self.known_vendor(line) {
                return Some(ExtractionMatch::new(vendor.name.clone(), 0.9, line).with_line(i));
            }
        }

        for (i, line) in header.iter().enumerate() {
            if is_non_vendor_line(line) {
                trace!("Skipping non-vendor header line: {}", line);
                continue;
            }
            if looks_like_company_name(line) {
                let name = clean_vendor_name(line);
                if !name.is_empty() {
                    return Some(ExtractionMatch::new(name, 0.8, line).with_line(i));
                }
            }
        }

        header
            .iter()
            .enumerate()
            .find(|(_, line)| line.chars().count() > 5 && !line.to_lowercase().contains("invoice"))
            .map(|(i, line)| ExtractionMatch::new(clean_vendor_name(line), 0.5, line).with_line(i))
            .filter(|m| !m.value.is_empty())
    }
}

/// Lines that can never be a vendor name: numbers, page markers, totals, tax labels.
fn is_non_vendor_line(line: &str) -> bool {
    PURE_NUMBER_LINE.is_match(line)
        || PAGE_MARKER.is_match(line)
        || TOTAL_LABEL.is_match(line)
        || TAX_LABEL.is_match(line)
        || DOLLAR_ONLY_LINE.is_match(line)
}

fn looks_like_company_name(line: &str) -> bool {
    let len = line.chars().count();
    let lower = line.to_lowercase();

    (3..=50).contains(&len)
        && line.chars().any(|c| c.is_uppercase())
        && !line.contains('$')
        && !line.starts_with(|c: char| c.is_ascii_digit())
        && !lower.contains("invoice")
        && !lower.contains("date")
}

/// Strip punctuation other than `&.-`, collapse whitespace, truncate to 50 characters.
pub fn clean_vendor_name(line: &str) -> String {
    let stripped = VENDOR_NAME_DISALLOWED.replace_all(line, "");
    let collapsed = WHITESPACE_RUN.replace_all(stripped.trim(), " ");
    collapsed
        .chars()
        .take(MAX_VENDOR_NAME_CHARS)
        .collect::<String>()
        .trim_end()
        .to_string()
}

/// Invoice number extractor.
pub struct InvoiceNumberExtractor {
    scan_lines: usize,
}

impl InvoiceNumberExtractor {
    pub fn new(config: &HeaderConfig) -> Self {
        Self {
            scan_lines: config.invoice_number_scan_lines,
        }
    }
}

impl Default for InvoiceNumberExtractor {
    fn default() -> Self {
        Self::new(&HeaderConfig::default())
    }
}

/// Labelled invoice number patterns, most specific first.
fn labelled_patterns() -> [&'static Regex; 4] {
    [
        &*INVOICE_NO_WITH_COLON,
        &*INVOICE_NUMBER_LABEL,
        &*INV_NO_SHORT,
        &*TAX_INVOICE_NUMBER,
    ]
}

impl FieldExtractor for InvoiceNumberExtractor {
    type Output = ExtractionMatch<String>;

    fn extract(&self, lines: &[String]) -> Option<Self::Output> {
        let header = &lines[..lines.len().min(self.scan_lines)];

        for pattern in labelled_patterns() {
            for (i, line) in header.iter().enumerate() {
                if let Some(caps) = pattern.captures(line) {
                    let id = caps["id"].trim_matches(|c| c == '-' || c == '/');
                    return Some(ExtractionMatch::new(id.to_string(), 0.9, line).with_line(i));
                }
            }
        }

        // Bare 6-8 digit numbers, ignoring phone/ABN/account lines
        for (i, line) in header.iter().enumerate() {
            if CONTACT_OR_REGISTRY_LABEL.is_match(line) {
                continue;
            }
            if let Some(caps) = BARE_INVOICE_NUMBER.captures(line) {
                return Some(ExtractionMatch::new(caps["id"].to_string(), 0.5, line).with_line(i));
            }
        }

        None
    }
}
