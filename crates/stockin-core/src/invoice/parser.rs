//! Supplier invoice parser combining header rules and the layout cascade.

use std::time::Instant;

use chrono::{Local, NaiveDate};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, trace, warn};

use crate::models::config::StockinConfig;
use crate::models::invoice::{Invoice, ItemSource, LineItem};

use super::rules::{
    apply_pack_size, assess_document, clean_product_name, find_line_items_start_index,
    guess_category, is_non_item_line, parse_loose_line, split_lines,
    DateExtractor, DocumentAssessment, FieldExtractor, InvoiceNumberExtractor, PackSizeDetector,
    PatternPackSizeDetector, RowColumns, TaxPolicy, VendorExtractor, LAYOUT_CASCADE,
};
use super::InvoiceParser;

/// Confidence of an item recognized by a table layout.
const LAYOUT_CONFIDENCE: f32 = 0.7;

/// Confidence of an item recovered by the loose fallback.
const LOOSE_CONFIDENCE: f32 = 0.5;

/// Result of invoice extraction.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExtractionResult {
    /// Extracted invoice data.
    pub invoice: Invoice,
    /// What kind of document this turned out to be.
    pub assessment: DocumentAssessment,
    /// Extraction warnings.
    pub warnings: Vec<String>,
    /// Item-table lines no parser could read.
    pub skipped_lines: Vec<String>,
    /// Processing time in milliseconds.
    pub processing_time_ms: u64,
}

/// Rule-based parser for supplier invoices.
///
/// Holds no mutable state, so one instance can serve many threads.
pub struct SupplierInvoiceParser {
    config: StockinConfig,
    pack_sizes: Box<dyn PackSizeDetector>,
    reference_date: Option<NaiveDate>,
}

impl SupplierInvoiceParser {
    /// Create a new parser with default settings.
    pub fn new() -> Self {
        Self {
            config: StockinConfig::default(),
            pack_sizes: Box::new(PatternPackSizeDetector::new()),
            reference_date: None,
        }
    }

    /// Use the given configuration.
    ///
    /// Invalid values are logged; a negative tax rate is applied as zero.
    pub fn with_config(mut self, config: StockinConfig) -> Self {
        if let Err(e) = config.validate() {
            warn!("{}", e);
        }
        self.config = config;
        self
    }

    /// Replace the pack-size detector.
    pub fn with_pack_size_detector(mut self, detector: impl PackSizeDetector + 'static) -> Self {
        self.pack_sizes = Box::new(detector);
        self
    }

    /// Date used when the document has none. Defaults to today.
    pub fn with_reference_date(mut self, date: NaiveDate) -> Self {
        self.reference_date = Some(date);
        self
    }

    pub fn config(&self) -> &StockinConfig {
        &self.config
    }

    fn reference_date(&self) -> NaiveDate {
        self.reference_date
            .unwrap_or_else(|| Local::now().date_naive())
    }

    /// Parse every line after the table header, returning items and unread lines.
    fn extract_line_items(&self, lines: &[String]) -> (Vec<LineItem>, Vec<String>) {
        let start = find_line_items_start_index(lines, &self.config.table);
        debug!("Item table starts at line {}", start);

        let mut items = Vec::new();
        let mut skipped = Vec::new();

        for line in &lines[start..] {
            if is_non_item_line(line) {
                trace!("Skipping non-item line: {}", line);
                continue;
            }

            match self.parse_line_item(line) {
                Some(item) => items.push(item),
                None => {
                    debug!("No parser matched line: {}", line);
                    skipped.push(line.clone());
                }
            }
        }

        (items, skipped)
    }

    fn parse_line_item(&self, line: &str) -> Option<LineItem> {
        // A layout whose amounts overflow falls through to the next one
        let layout_item = LAYOUT_CASCADE.iter().find_map(|layout| {
            let row = layout.try_match(line)?;
            debug!("Layout {} matched: {}", layout.source.label(), line);
            self.build_line_item(line, row, layout.tax_policy, layout.source, LAYOUT_CONFIDENCE)
        });
        if layout_item.is_some() {
            return layout_item;
        }

        let row = parse_loose_line(line)?;
        debug!("Loose parse: {}", line);
        self.build_line_item(line, row, TaxPolicy::Assumed, ItemSource::Loose, LOOSE_CONFIDENCE)
    }

    /// Derive tax, pack size, effective cost and category for a matched row.
    fn build_line_item(
        &self,
        line: &str,
        row: RowColumns,
        tax_policy: TaxPolicy,
        source: ItemSource,
        confidence: f32,
    ) -> Option<LineItem> {
        let Some(tax) = tax_policy.apply(&row, self.config.tax.default_rate_percent) else {
            debug!("Amounts out of range for {}: {}", source.label(), line);
            return None;
        };
        let name = clean_product_name(&row.description);
        let pack_size = self.pack_sizes.detect_pack_size(&name);
        let (detected_pack_size, effective_unit_cost_ex_tax) =
            apply_pack_size(row.unit_price, pack_size);

        Some(LineItem {
            category: guess_category(&name).to_string(),
            name,
            quantity: row.quantity,
            unit_cost_ex_tax: row.unit_price,
            detected_pack_size,
            effective_unit_cost_ex_tax,
            confidence,
            raw_text: line.to_string(),
            tax_rate: Some(tax.rate),
            tax_amount: Some(tax.amount),
            has_tax: Some(tax.has_tax()),
            parsed_by: source,
        })
    }
}

impl Default for SupplierInvoiceParser {
    fn default() -> Self {
        Self::new()
    }
}

impl InvoiceParser for SupplierInvoiceParser {
    fn parse(&self, text: &str) -> ExtractionResult {
        let start = Instant::now();
        let mut warnings = Vec::new();

        info!("Parsing invoice from {} characters of text", text.len());

        let lines = split_lines(text);
        let header = &self.config.header;

        let vendor = VendorExtractor::new(header).extract_vendor(&lines);
        if vendor.is_unknown() {
            warnings.push("Could not identify vendor".to_string());
        }

        let invoice_number = InvoiceNumberExtractor::new(header)
            .extract(&lines)
            .map(|m| m.value);
        if invoice_number.is_none() {
            warnings.push("Could not extract invoice number".to_string());
        }

        let invoice_date = match DateExtractor::new(header).extract(&lines) {
            Some(m) => m.value,
            None => {
                let fallback = self.reference_date();
                warnings.push(format!("Could not extract invoice date, using {}", fallback));
                fallback
            }
        };

        let (line_items, skipped_lines) = self.extract_line_items(&lines);
        if line_items.is_empty() {
            warnings.push("Could not extract line items".to_string());
        }
        if !skipped_lines.is_empty() {
            warnings.push(format!("{} item lines could not be read", skipped_lines.len()));
        }

        let (assessment, confidence) = assess_document(&vendor, &line_items, text);
        if assessment == DocumentAssessment::NotAnInvoice {
            warnings.push("Document does not look like a supplier invoice".to_string());
        }

        debug!(
            "Extracted {} items from {} with confidence {:.2}",
            line_items.len(),
            vendor.name,
            confidence
        );

        ExtractionResult {
            invoice: Invoice {
                vendor,
                invoice_number,
                invoice_date,
                line_items,
                confidence,
                raw_text: text.to_string(),
            },
            assessment,
            warnings,
            skipped_lines,
            processing_time_ms: start.elapsed().as_millis() as u64,
        }
    }
}
