//! Tax inference policies attached to table layouts.

use rust_decimal::Decimal;

use super::layouts::RowColumns;

/// Tax rate and amount determined for a line.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TaxBreakdown {
    /// Rate in percent.
    pub rate: Decimal,
    /// Tax for the whole line.
    pub amount: Decimal,
}

impl TaxBreakdown {
    pub fn free() -> Self {
        Self {
            rate: Decimal::ZERO,
            amount: Decimal::ZERO,
        }
    }

    pub fn has_tax(&self) -> bool {
        self.amount > Decimal::ZERO
    }
}

/// How a layout's columns determine the tax on a line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TaxPolicy {
    /// A printed tax amount column; the rate is derived from it.
    ExplicitAmount,
    /// Layout only carries untaxed goods (fresh produce).
    TaxFree,
    /// A TAXED / TAX-FREE flag; the extended price includes tax.
    Indicator,
    /// No tax information; the default rate is assumed on top of the price.
    Assumed,
}

impl TaxPolicy {
    /// Compute the tax breakdown for a matched row.
    ///
    /// Returns `None` when the amounts overflow `Decimal`. A negative rate is
    /// treated as zero.
    pub fn apply(&self, row: &RowColumns, default_rate: Decimal) -> Option<TaxBreakdown> {
        let rate = default_rate.max(Decimal::ZERO);
        let breakdown = match self {
            TaxPolicy::ExplicitAmount => {
                let amount = row.tax_amount.unwrap_or(Decimal::ZERO);
                let base = row.unit_price.checked_mul(row.quantity)?;
                let rate = if amount > Decimal::ZERO && base > Decimal::ZERO {
                    amount
                        .checked_div(base)?
                        .checked_mul(Decimal::ONE_HUNDRED)?
                        .round_dp(2)
                } else {
                    Decimal::ZERO
                };
                TaxBreakdown { rate, amount }
            }
            TaxPolicy::TaxFree => TaxBreakdown::free(),
            TaxPolicy::Indicator => match row.taxed {
                Some(true) => {
                    let extended = match row.line_total {
                        Some(total) => total,
                        None => row.unit_price.checked_mul(row.quantity)?,
                    };
                    let divisor = Decimal::ONE + rate / Decimal::ONE_HUNDRED;
                    let untaxed = extended.checked_div(divisor)?;
                    TaxBreakdown {
                        rate,
                        amount: extended.checked_sub(untaxed)?.round_dp(2),
                    }
                }
                _ => TaxBreakdown::free(),
            },
            TaxPolicy::Assumed => TaxBreakdown {
                rate,
                amount: row
                    .unit_price
                    .checked_mul(row.quantity)?
                    .checked_mul(rate)?
                    .checked_div(Decimal::ONE_HUNDRED)?
                    .round_dp(2),
            },
        };
        Some(breakdown)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    fn dec(s: &str) -> Decimal {
        Decimal::from_str(s).unwrap()
    }

    fn row(quantity: &str, unit_price: &str) -> RowColumns {
        RowColumns::new("Organic Kale", dec(quantity), dec(unit_price))
    }

    #[test]
    fn test_explicit_amount() {
        let mut taxed = row("2", "4.50");
        taxed.tax_amount = Some(dec("0.90"));
        let tax = TaxPolicy::ExplicitAmount.apply(&taxed, Decimal::TEN).unwrap();
        assert_eq!(tax.rate, dec("10"));
        assert!(tax.has_tax());

        let mut untaxed = row("2", "4.50");
        untaxed.tax_amount = Some(Decimal::ZERO);
        let tax = TaxPolicy::ExplicitAmount.apply(&untaxed, Decimal::TEN).unwrap();
        assert_eq!(tax, TaxBreakdown::free());
    }

    #[test]
    fn test_tax_free() {
        assert_eq!(
            TaxPolicy::TaxFree.apply(&row("5", "4.20"), Decimal::TEN),
            Some(TaxBreakdown::free())
        );
    }

    #[test]
    fn test_indicator_backs_out_tax() {
        let mut taxed = row("2", "3.30");
        taxed.line_total = Some(dec("6.60"));
        taxed.taxed = Some(true);
        let tax = TaxPolicy::Indicator.apply(&taxed, Decimal::TEN).unwrap();
        assert_eq!(tax.rate, Decimal::TEN);
        assert_eq!(tax.amount, dec("0.60"));

        let mut free = row("1", "12.50");
        free.line_total = Some(dec("12.50"));
        free.taxed = Some(false);
        let tax = TaxPolicy::Indicator.apply(&free, Decimal::TEN).unwrap();
        assert_eq!(tax.amount, Decimal::ZERO);
        assert!(!tax.has_tax());
    }

    #[test]
    fn test_assumed_rate() {
        let tax = TaxPolicy::Assumed.apply(&row("3", "4.50"), Decimal::TEN).unwrap();
        assert_eq!(tax.rate, Decimal::TEN);
        assert_eq!(tax.amount, dec("1.35"));
    }

    #[test]
    fn test_overflow_yields_none() {
        let huge = row("100000000000000000000", "100000000000000000000.00");
        assert_eq!(TaxPolicy::Assumed.apply(&huge, Decimal::TEN), None);
        assert_eq!(TaxPolicy::ExplicitAmount.apply(&huge, Decimal::TEN), None);

        let mut taxed = huge.clone();
        taxed.taxed = Some(true);
        assert_eq!(TaxPolicy::Indicator.apply(&taxed, Decimal::TEN), None);
    }

    #[test]
    fn test_negative_rate_treated_as_zero() {
        let mut taxed = row("2", "3.30");
        taxed.line_total = Some(dec("6.60"));
        taxed.taxed = Some(true);
        let tax = TaxPolicy::Indicator.apply(&taxed, dec("-100")).unwrap();
        assert_eq!(tax.rate, Decimal::ZERO);
        assert_eq!(tax.amount, Decimal::ZERO);

        let tax = TaxPolicy::Assumed.apply(&row("3", "4.50"), dec("-15")).unwrap();
        assert_eq!(tax.amount, Decimal::ZERO);
    }
}
