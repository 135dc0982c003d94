//! Core library for supplier invoice line-item extraction.
//!
//! This crate provides:
//! - Header extraction (vendor, invoice number, invoice date) from OCR text
//! - A cascade of vendor table layouts with per-layout tax policies
//! - A loose fallback parser for priced lines no layout recognizes
//! - Pack-size aware unit costs, category guesses and confidence scoring
//! - Detection of documents that are not invoices at all

pub mod error;
pub mod models;
pub mod invoice;

pub use error::{Result, StockinError};
pub use models::config::StockinConfig;
pub use models::invoice::{Invoice, ItemSource, LineItem, Vendor};
pub use invoice::{
    DocumentAssessment, ExtractionResult, InvoiceParser, SupplierInvoiceParser,
};
pub use invoice::rules::{PackSizeDetector, PatternPackSizeDetector};
