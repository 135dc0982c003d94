//! Configuration structures for the extraction pipeline.

use std::path::Path;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::error::{Result, StockinError};

/// Main configuration for the stockin pipeline.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StockinConfig {
    /// Header extraction configuration.
    pub header: HeaderConfig,

    /// Item table segmentation configuration.
    pub table: TableConfig,

    /// Tax assumptions.
    pub tax: TaxConfig,

    /// Thresholds used to flag output for manual review.
    pub review: ReviewConfig,
}

/// Header region configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct HeaderConfig {
    /// Number of leading lines searched for the vendor name.
    pub vendor_scan_lines: usize,

    /// Number of leading lines searched for the invoice number.
    pub invoice_number_scan_lines: usize,

    /// Number of leading lines searched for the invoice date.
    pub date_scan_lines: usize,

    /// Suppliers recognized by a substring of their letterhead.
    pub known_vendors: Vec<KnownVendor>,
}

impl Default for HeaderConfig {
    fn default() -> Self {
        Self {
            vendor_scan_lines: 10,
            invoice_number_scan_lines: 15,
            date_scan_lines: 20,
            known_vendors: default_known_vendors(),
        }
    }
}

/// A supplier with a recognizable letterhead.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct KnownVendor {
    /// Case-insensitive substring to look for.
    pub pattern: String,

    /// Canonical vendor name returned on a hit.
    pub name: String,
}

impl KnownVendor {
    pub fn new(pattern: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            pattern: pattern.into(),
            name: name.into(),
        }
    }
}

fn default_known_vendors() -> Vec<KnownVendor> {
    vec![
        KnownVendor::new("green valley", "Green Valley Organics"),
        KnownVendor::new("harvest wholefoods", "Harvest Wholefoods"),
        KnownVendor::new("bio living", "Bio Living Distributors"),
        KnownVendor::new("country life", "Country Life Bakery"),
        KnownVendor::new("pure earth", "Pure Earth Naturals"),
    ]
}

/// Item table segmentation configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TableConfig {
    /// Number of leading lines searched for the table header row.
    pub header_scan_lines: usize,

    /// Start index used when no header row is found.
    pub fallback_start_index: usize,
}

impl Default for TableConfig {
    fn default() -> Self {
        Self {
            header_scan_lines: 30,
            fallback_start_index: 10,
        }
    }
}

/// Tax assumptions applied by the layout tax policies.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TaxConfig {
    /// Rate (percent) assumed for taxed lines without an explicit amount.
    pub default_rate_percent: Decimal,
}

impl Default for TaxConfig {
    fn default() -> Self {
        Self {
            default_rate_percent: Decimal::TEN,
        }
    }
}

/// Review thresholds.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ReviewConfig {
    /// Documents below this confidence are flagged.
    pub min_document_confidence: f32,

    /// Items below this confidence are flagged.
    pub min_item_confidence: f32,
}

impl Default for ReviewConfig {
    fn default() -> Self {
        Self {
            min_document_confidence: 0.6,
            min_item_confidence: 0.6,
        }
    }
}

impl StockinConfig {
    /// Load configuration from a JSON file.
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: Self = serde_json::from_str(&content)?;
        config.validate()?;
        Ok(config)
    }

    /// Reject values the pipeline cannot work with.
    pub fn validate(&self) -> Result<()> {
        if self.tax.default_rate_percent < Decimal::ZERO {
            return Err(StockinError::Config(format!(
                "tax.default_rate_percent must not be negative, got {}",
                self.tax.default_rate_percent
            )));
        }

        let thresholds = [
            ("review.min_document_confidence", self.review.min_document_confidence),
            ("review.min_item_confidence", self.review.min_item_confidence),
        ];
        for (key, value) in thresholds {
            if !(0.0..=1.0).contains(&value) {
                return Err(StockinError::Config(format!(
                    "{} must be between 0 and 1, got {}",
                    key, value
                )));
            }
        }

        Ok(())
    }

    /// Save configuration to a JSON file.
    pub fn save(&self, path: &Path) -> Result<()> {
        let content = serde_json::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        Ok(())
    }
}
