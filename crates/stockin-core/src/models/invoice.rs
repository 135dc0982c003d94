//! Invoice data models produced by the extraction pipeline.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::config::ReviewConfig;

/// Vendor name used when nothing in the header qualifies.
pub const UNKNOWN_VENDOR: &str = "Unknown Vendor";

/// A supplier invoice recovered from OCR text.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Invoice {
    /// Supplier that issued the invoice.
    pub vendor: Vendor,

    /// Invoice number/identifier.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub invoice_number: Option<String>,

    /// Date printed on the invoice, or the reference date when none was found.
    pub invoice_date: NaiveDate,

    /// Line items in table order.
    pub line_items: Vec<LineItem>,

    /// Document confidence (0.0 - 1.0).
    pub confidence: f32,

    /// OCR text the invoice was extracted from.
    pub raw_text: String,
}

/// The supplier named in the invoice header.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Vendor {
    /// Cleaned or canonical vendor name.
    pub name: String,

    /// Confidence in the name (0.0 - 1.0).
    pub confidence: f32,
}

impl Vendor {
    pub fn new(name: impl Into<String>, confidence: f32) -> Self {
        Self {
            name: name.into(),
            confidence,
        }
    }

    /// Placeholder vendor for headers with no usable line.
    pub fn unknown() -> Self {
        Self::new(UNKNOWN_VENDOR, 0.1)
    }

    pub fn is_unknown(&self) -> bool {
        self.name == UNKNOWN_VENDOR
    }
}

/// A single priced row of the item table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LineItem {
    /// Product name with vendor codes stripped.
    pub name: String,

    /// Quantity ordered.
    pub quantity: Decimal,

    /// Unit cost as printed, before tax.
    pub unit_cost_ex_tax: Decimal,

    /// Units per pack, present only for multi-packs.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub detected_pack_size: Option<u32>,

    /// Cost of a single unit after dividing out the pack size.
    pub effective_unit_cost_ex_tax: Decimal,

    /// Store category guess.
    pub category: String,

    /// Parse confidence (0.0 - 1.0).
    pub confidence: f32,

    /// Source line as read from the document.
    pub raw_text: String,

    /// Tax rate in percent.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tax_rate: Option<Decimal>,

    /// Tax amount for the whole line.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tax_amount: Option<Decimal>,

    /// Whether the line attracts tax.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub has_tax: Option<bool>,

    /// Which parser produced this item.
    pub parsed_by: ItemSource,
}

impl LineItem {
    /// Units per pack, defaulting to one.
    pub fn pack_size(&self) -> u32 {
        self.detected_pack_size.unwrap_or(1)
    }

    /// Quantity multiplied by the printed unit cost, saturating at the
    /// `Decimal` bounds.
    pub fn line_cost_ex_tax(&self) -> Decimal {
        self.quantity.saturating_mul(self.unit_cost_ex_tax)
    }
}

/// The layout descriptor (or fallback) that recognized a line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ItemSource {
    /// Code, description, two quantities, unit, price, tax rate, tax amount, total.
    TaxAmountColumn,
    /// Code, description, two quantities, unit, price per unit, total.
    PricePerUnit,
    /// Quantity, item number, description, price, extended, TAXED/TAX-FREE.
    TaxIndicator,
    /// Name, quantity, price, total.
    Generic,
    /// Name, quantity, $price, $total.
    CurrencyPrefixed,
    /// Name | quantity | price | total.
    PipeDelimited,
    /// Best-effort recovery from a priced line no layout matched.
    Loose,
}

impl ItemSource {
    /// Short label for tabular output.
    pub fn label(&self) -> &'static str {
        match self {
            ItemSource::TaxAmountColumn => "tax_amount_column",
            ItemSource::PricePerUnit => "price_per_unit",
            ItemSource::TaxIndicator => "tax_indicator",
            ItemSource::Generic => "generic",
            ItemSource::CurrencyPrefixed => "currency_prefixed",
            ItemSource::PipeDelimited => "pipe_delimited",
            ItemSource::Loose => "loose",
        }
    }
}

impl Invoice {
    /// Sum of quantity times unit cost over all lines.
    pub fn subtotal_ex_tax(&self) -> Decimal {
        self.line_items
            .iter()
            .map(LineItem::line_cost_ex_tax)
            .fold(Decimal::ZERO, Decimal::saturating_add)
    }

    /// Sum of the tax amounts that were determined.
    pub fn total_tax(&self) -> Decimal {
        self.line_items
            .iter()
            .filter_map(|item| item.tax_amount)
            .fold(Decimal::ZERO, Decimal::saturating_add)
    }

    /// Items whose confidence falls below the review threshold.
    pub fn items_needing_review(&self, review: &ReviewConfig) -> Vec<&LineItem> {
        self.line_items
            .iter()
            .filter(|item| item.confidence < review.min_item_confidence)
            .collect()
    }

    /// Whether a person should look at this invoice before it is used.
    pub fn needs_review(&self, review: &ReviewConfig) -> bool {
        self.confidence < review.min_document_confidence
            || self.vendor.is_unknown()
            || !self.items_needing_review(review).is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    fn item(quantity: &str, unit_cost: &str, tax: Option<&str>, confidence: f32) -> LineItem {
        let unit_cost = Decimal::from_str(unit_cost).unwrap();
        let tax_amount = tax.map(|t| Decimal::from_str(t).unwrap());
        LineItem {
            name: "Organic Oats".to_string(),
            quantity: Decimal::from_str(quantity).unwrap(),
            unit_cost_ex_tax: unit_cost,
            detected_pack_size: None,
            effective_unit_cost_ex_tax: unit_cost,
            category: "Groceries".to_string(),
            confidence,
            raw_text: String::new(),
            tax_rate: None,
            tax_amount,
            has_tax: tax_amount.map(|t| t > Decimal::ZERO),
            parsed_by: ItemSource::Generic,
        }
    }

    fn invoice(items: Vec<LineItem>, confidence: f32) -> Invoice {
        Invoice {
            vendor: Vendor::new("Harvest Wholefoods", 0.9),
            invoice_number: Some("123456".to_string()),
            invoice_date: NaiveDate::from_ymd_opt(2024, 3, 12).unwrap(),
            line_items: items,
            confidence,
            raw_text: String::new(),
        }
    }

    #[test]
    fn test_totals() {
        let invoice = invoice(
            vec![
                item("2", "4.50", Some("0.90"), 0.7),
                item("1", "3.00", None, 0.7),
            ],
            0.8,
        );
        assert_eq!(invoice.subtotal_ex_tax(), Decimal::from_str("12.00").unwrap());
        assert_eq!(invoice.total_tax(), Decimal::from_str("0.90").unwrap());
    }

    #[test]
    fn test_totals_saturate() {
        let huge = "100000000000000000000";
        let invoice = invoice(
            vec![item(huge, huge, None, 0.5), item("1", "3.00", None, 0.7)],
            0.6,
        );
        assert_eq!(invoice.line_items[0].line_cost_ex_tax(), Decimal::MAX);
        assert_eq!(invoice.subtotal_ex_tax(), Decimal::MAX);
    }

    #[test]
    fn test_review_flags() {
        let review = ReviewConfig::default();

        let clean = invoice(vec![item("1", "3.00", None, 0.7)], 0.8);
        assert!(!clean.needs_review(&review));

        let loose = invoice(vec![item("1", "3.00", None, 0.5)], 0.7);
        assert_eq!(loose.items_needing_review(&review).len(), 1);
        assert!(loose.needs_review(&review));

        let mut unknown = invoice(vec![item("1", "3.00", None, 0.7)], 0.8);
        unknown.vendor = Vendor::unknown();
        assert!(unknown.needs_review(&review));
    }

    #[test]
    fn test_item_source_serialization() {
        let json = serde_json::to_string(&ItemSource::TaxIndicator).unwrap();
        assert_eq!(json, "\"tax_indicator\"");
        assert_eq!(ItemSource::Loose.label(), "loose");
    }
}
