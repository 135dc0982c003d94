//! Invoice field extraction module.

mod parser;
pub mod rules;

pub use parser::{ExtractionResult, SupplierInvoiceParser};
pub use rules::DocumentAssessment;

use crate::models::invoice::Invoice;

/// Trait for invoice parsing.
///
/// Parsing never fails: unreadable input produces a low-confidence result
/// with warnings instead of an error.
pub trait InvoiceParser {
    /// Parse an invoice from OCR text.
    fn parse(&self, text: &str) -> ExtractionResult;

    /// Parse and keep only the invoice.
    fn extract(&self, text: &str) -> Invoice {
        self.parse(text).invoice
    }
}
