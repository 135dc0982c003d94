//! Vendor table layouts tried in a fixed order against each item line.
//!
//! Some lines satisfy more than one layout structurally, so the cascade is
//! first-match-wins in declaration order rather than best-match.

use lazy_static::lazy_static;
use regex::{Captures, Regex};
use rust_decimal::Decimal;

use crate::models::invoice::ItemSource;

use super::amounts::{parse_amount, parse_quantity};
use super::patterns::{
    LAYOUT_CURRENCY_PREFIXED, LAYOUT_GENERIC, LAYOUT_PIPE_DELIMITED, LAYOUT_PRICE_PER_UNIT,
    LAYOUT_TAX_AMOUNT_COLUMN, LAYOUT_TAX_INDICATOR,
};
use super::tax::TaxPolicy;

/// Columns recovered from one table row.
#[derive(Debug, Clone, PartialEq)]
pub struct RowColumns {
    /// Vendor product code, if the layout has one.
    pub code: Option<String>,
    /// Description as printed.
    pub description: String,
    /// Quantity ordered.
    pub quantity: Decimal,
    /// Second quantity column (supplied/backordered).
    pub quantity_supplied: Option<Decimal>,
    /// Unit of measure.
    pub unit: Option<String>,
    /// Unit price as printed.
    pub unit_price: Decimal,
    /// Printed tax amount.
    pub tax_amount: Option<Decimal>,
    /// Line or extended total.
    pub line_total: Option<Decimal>,
    /// TAXED / TAX-FREE flag.
    pub taxed: Option<bool>,
}

impl RowColumns {
    pub fn new(description: impl Into<String>, quantity: Decimal, unit_price: Decimal) -> Self {
        Self {
            code: None,
            description: description.into(),
            quantity,
            quantity_supplied: None,
            unit: None,
            unit_price,
            tax_amount: None,
            line_total: None,
            taxed: None,
        }
    }
}

/// A named column order paired with a tax policy.
pub struct LayoutDescriptor {
    /// Tag recorded on items this layout produces.
    pub source: ItemSource,
    /// How the layout's columns determine tax.
    pub tax_policy: TaxPolicy,
    pattern: &'static Regex,
    columns: fn(&Captures) -> Option<RowColumns>,
}

impl LayoutDescriptor {
    /// Match a line against this layout.
    pub fn try_match(&self, line: &str) -> Option<RowColumns> {
        let caps = self.pattern.captures(line)?;
        (self.columns)(&caps).filter(|row| row.description.chars().any(char::is_alphabetic))
    }
}

lazy_static! {
    /// Layouts in cascade order.
    pub static ref LAYOUT_CASCADE: [LayoutDescriptor; 6] = [
        LayoutDescriptor {
            source: ItemSource::TaxAmountColumn,
            tax_policy: TaxPolicy::ExplicitAmount,
            pattern: &*LAYOUT_TAX_AMOUNT_COLUMN,
            columns: coded_row_columns,
        },
        LayoutDescriptor {
            source: ItemSource::PricePerUnit,
            tax_policy: TaxPolicy::TaxFree,
            pattern: &*LAYOUT_PRICE_PER_UNIT,
            columns: coded_row_columns,
        },
        LayoutDescriptor {
            source: ItemSource::TaxIndicator,
            tax_policy: TaxPolicy::Indicator,
            pattern: &*LAYOUT_TAX_INDICATOR,
            columns: indicator_row_columns,
        },
        LayoutDescriptor {
            source: ItemSource::Generic,
            tax_policy: TaxPolicy::Assumed,
            pattern: &*LAYOUT_GENERIC,
            columns: name_qty_price_total_columns,
        },
        LayoutDescriptor {
            source: ItemSource::CurrencyPrefixed,
            tax_policy: TaxPolicy::Assumed,
            pattern: &*LAYOUT_CURRENCY_PREFIXED,
            columns: name_qty_price_total_columns,
        },
        LayoutDescriptor {
            source: ItemSource::PipeDelimited,
            tax_policy: TaxPolicy::Assumed,
            pattern: &*LAYOUT_PIPE_DELIMITED,
            columns: name_qty_price_total_columns,
        },
    ];
}

/// Run the cascade; the first layout that matches wins.
pub fn match_layout(line: &str) -> Option<(&'static LayoutDescriptor, RowColumns)> {
    LAYOUT_CASCADE
        .iter()
        .find_map(|layout| layout.try_match(line).map(|row| (layout, row)))
}

fn amount(caps: &Captures, name: &str) -> Option<Decimal> {
    caps.name(name).and_then(|m| parse_amount(m.as_str()))
}

fn text(caps: &Captures, name: &str) -> Option<String> {
    caps.name(name).map(|m| m.as_str().trim().to_string())
}

/// Code, description, qty, qty, unit, price[, rate, tax], total.
fn coded_row_columns(caps: &Captures) -> Option<RowColumns> {
    Some(RowColumns {
        code: text(caps, "code"),
        description: text(caps, "desc")?,
        quantity: parse_quantity(&caps["qty"])?,
        quantity_supplied: amount(caps, "qty2"),
        unit: text(caps, "unit"),
        unit_price: amount(caps, "price")?,
        tax_amount: amount(caps, "tax"),
        line_total: amount(caps, "total"),
        taxed: None,
    })
}

/// Qty, item no, description, price, extended, indicator.
fn indicator_row_columns(caps: &Captures) -> Option<RowColumns> {
    let flag = caps["flag"].to_uppercase();
    Some(RowColumns {
        code: text(caps, "code"),
        description: text(caps, "desc")?,
        quantity: parse_quantity(&caps["qty"])?,
        quantity_supplied: None,
        unit: None,
        unit_price: amount(caps, "price")?,
        tax_amount: None,
        line_total: amount(caps, "total"),
        taxed: Some(flag == "TAXED"),
    })
}

/// Name, qty, price, total.
fn name_qty_price_total_columns(caps: &Captures) -> Option<RowColumns> {
    let mut row = RowColumns::new(
        text(caps, "desc")?,
        parse_quantity(&caps["qty"])?,
        amount(caps, "price")?,
    );
    row.line_total = amount(caps, "total");
    Some(row)
}
