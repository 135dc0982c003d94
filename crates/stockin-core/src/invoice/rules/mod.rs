//! Rule-based extractors for supplier invoices.

pub mod amounts;
pub mod category;
pub mod confidence;
pub mod dates;
pub mod header;
pub mod layouts;
pub mod lines;
pub mod loose;
pub mod names;
pub mod pack_size;
pub mod patterns;
pub mod table;
pub mod tax;

pub use amounts::{last_amount, parse_amount, parse_quantity};
pub use category::{guess_category, DEFAULT_CATEGORY};
pub use confidence::{assess_document, DocumentAssessment};
pub use dates::DateExtractor;
pub use header::{InvoiceNumberExtractor, VendorExtractor};
pub use layouts::{match_layout, LayoutDescriptor, RowColumns, LAYOUT_CASCADE};
pub use lines::split_lines;
pub use loose::{looks_like_line_item, parse_loose_line};
pub use names::clean_product_name;
pub use pack_size::{apply_pack_size, PackSizeDetector, PatternPackSizeDetector};
pub use table::{find_line_items_start_index, is_non_item_line};
pub use tax::{TaxBreakdown, TaxPolicy};

/// Trait for header field extractors.
pub trait FieldExtractor {
    /// The type of value this extractor produces.
    type Output;

    /// Extract the field from the document lines.
    fn extract(&self, lines: &[String]) -> Option<Self::Output>;
}

/// Extracted value with its confidence score.
#[derive(Debug, Clone, PartialEq)]
pub struct ExtractionMatch<T> {
    /// Extracted value.
    pub value: T,
    /// Confidence score (0.0 - 1.0).
    pub confidence: f32,
    /// Index of the line the value came from.
    pub line: Option<usize>,
    /// Source text that was matched.
    pub source: String,
}

impl<T> ExtractionMatch<T> {
    pub fn new(value: T, confidence: f32, source: impl Into<String>) -> Self {
        Self {
            value,
            confidence,
            line: None,
            source: source.into(),
        }
    }

    pub fn with_line(mut self, line: usize) -> Self {
        self.line = Some(line);
        self
    }
}
