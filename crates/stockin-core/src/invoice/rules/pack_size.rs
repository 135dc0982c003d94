//! Pack-size detection and per-unit cost derivation.

use regex::Regex;
use rust_decimal::Decimal;

use super::patterns::{PACK_CARTON, PACK_MULTIPLIER, PACK_OF, PACK_SUFFIX};

/// Detects how many sellable units a printed product name describes.
pub trait PackSizeDetector: Send + Sync {
    /// Units per pack; 1 when the name is a single unit.
    fn detect_pack_size(&self, product_name: &str) -> u32;
}

impl<F> PackSizeDetector for F
where
    F: Fn(&str) -> u32 + Send + Sync,
{
    fn detect_pack_size(&self, product_name: &str) -> u32 {
        self(product_name)
    }
}

/// Pack-size detector reading common wholesale notations:
/// `6 x 500ml`, `12pk`, `12 pack`, `pack of 24`, `ctn 12`, `carton of 12`.
#[derive(Debug, Clone, Copy, Default)]
pub struct PatternPackSizeDetector;

impl PatternPackSizeDetector {
    pub fn new() -> Self {
        Self
    }
}

impl PackSizeDetector for PatternPackSizeDetector {
    fn detect_pack_size(&self, product_name: &str) -> u32 {
        let patterns: [&Regex; 4] = [&*PACK_MULTIPLIER, &*PACK_SUFFIX, &*PACK_OF, &*PACK_CARTON];
        patterns
            .iter()
            .find_map(|pattern| {
                pattern
                    .captures(product_name)
                    .and_then(|caps| caps[1].parse::<u32>().ok())
            })
            .filter(|&size| size > 0)
            .unwrap_or(1)
    }
}

/// Divide a printed unit cost by the pack size.
///
/// Returns the pack size to record (only when greater than one) and the
/// effective single-unit cost.
pub fn apply_pack_size(unit_cost: Decimal, pack_size: u32) -> (Option<u32>, Decimal) {
    if pack_size > 1 {
        let effective = (unit_cost / Decimal::from(pack_size)).round_dp(4);
        (Some(pack_size), effective)
    } else {
        (None, unit_cost)
    }
}
