//! Document confidence and the wrong-document guard.

use serde::{Deserialize, Serialize};

use crate::models::invoice::{LineItem, Vendor};

/// Words that show up on rosters and timesheets but not on supplier invoices.
const NON_INVOICE_KEYWORDS: [&str; 15] = [
    "roster", "schedule", "staff", "shift", "manager", "barista", "kitchen", "hours", "monday",
    "tuesday", "wednesday", "thursday", "friday", "saturday", "sunday",
];

/// Hourly-rate marker, counted like a keyword.
const HOURLY_RATE_MARKER: &str = "/hr";

/// Distinct keyword hits at which an itemless document is treated as something else.
const NON_INVOICE_KEYWORD_THRESHOLD: usize = 3;

const NOT_AN_INVOICE_CONFIDENCE: f32 = 0.05;
const EXTRACTION_FAILED_CONFIDENCE: f32 = 0.1;

/// What the extractor concluded about the document as a whole.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DocumentAssessment {
    /// At least one line item was recovered.
    Invoice,
    /// Looks like an invoice, but no line item could be read.
    ExtractionFailed,
    /// Some other document (a staff roster, say) was fed in.
    NotAnInvoice,
}

impl DocumentAssessment {
    pub fn label(&self) -> &'static str {
        match self {
            DocumentAssessment::Invoice => "invoice",
            DocumentAssessment::ExtractionFailed => "extraction_failed",
            DocumentAssessment::NotAnInvoice => "not_an_invoice",
        }
    }
}

/// Aggregate the document confidence.
///
/// With items, the score is the mean of the vendor confidence and the mean
/// item confidence. Without items, the whole raw text is checked for roster
/// vocabulary to tell a failed extraction from the wrong kind of document.
pub fn assess_document(
    vendor: &Vendor,
    items: &[LineItem],
    raw_text: &str,
) -> (DocumentAssessment, f32) {
    if items.is_empty() {
        return if non_invoice_keyword_hits(raw_text) >= NON_INVOICE_KEYWORD_THRESHOLD {
            (DocumentAssessment::NotAnInvoice, NOT_AN_INVOICE_CONFIDENCE)
        } else {
            (DocumentAssessment::ExtractionFailed, EXTRACTION_FAILED_CONFIDENCE)
        };
    }

    let mean_item = items.iter().map(|item| item.confidence).sum::<f32>() / items.len() as f32;
    (DocumentAssessment::Invoice, (vendor.confidence + mean_item) / 2.0)
}

fn non_invoice_keyword_hits(raw_text: &str) -> usize {
    let lower = raw_text.to_lowercase();
    NON_INVOICE_KEYWORDS
        .iter()
        .chain(std::iter::once(&HOURLY_RATE_MARKER))
        .filter(|keyword| lower.contains(**keyword))
        .count()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::invoice::ItemSource;
    use rust_decimal::Decimal;

    fn item(confidence: f32) -> LineItem {
        LineItem {
            name: "Organic Kale".to_string(),
            quantity: Decimal::ONE,
            unit_cost_ex_tax: Decimal::TEN,
            detected_pack_size: None,
            effective_unit_cost_ex_tax: Decimal::TEN,
            category: "Fruit & Veg".to_string(),
            confidence,
            raw_text: String::new(),
            tax_rate: None,
            tax_amount: None,
            has_tax: None,
            parsed_by: ItemSource::Generic,
        }
    }

    #[test]
    fn test_mean_of_vendor_and_items() {
        let vendor = Vendor::new("Harvest Wholefoods", 0.9);
        let (assessment, confidence) = assess_document(&vendor, &[item(0.7), item(0.5)], "");
        assert_eq!(assessment, DocumentAssessment::Invoice);
        assert!((confidence - 0.75).abs() < 1e-6);
    }

    #[test]
    fn test_roster_is_not_an_invoice() {
        let text = "Staff Roster\nMonday: Sam (barista) 7-3\nTuesday: Alex kitchen shift\n$28.50/hr";
        let (assessment, confidence) = assess_document(&Vendor::unknown(), &[], text);
        assert_eq!(assessment, DocumentAssessment::NotAnInvoice);
        assert_eq!(confidence, 0.05);
    }

    #[test]
    fn test_itemless_invoice_failed() {
        let text = "Harvest Wholefoods\nTax Invoice 123456\nThank you for your business";
        let (assessment, confidence) = assess_document(&Vendor::unknown(), &[], text);
        assert_eq!(assessment, DocumentAssessment::ExtractionFailed);
        assert_eq!(confidence, 0.1);
    }

    #[test]
    fn test_keywords_counted_once() {
        // "shift" three times is one distinct keyword, "staff" a second
        let text = "shift shift shift staff";
        assert_eq!(non_invoice_keyword_hits(text), 2);
        let (_, confidence) = assess_document(&Vendor::unknown(), &[], text);
        assert_eq!(confidence, 0.1);
    }
}
