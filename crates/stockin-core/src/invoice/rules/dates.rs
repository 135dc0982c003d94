//! Invoice date extraction.
//!
//! Numeric dates are read day-first (`12/03/2024` is 12 March), as printed
//! on Australian supplier invoices.

use chrono::NaiveDate;
use regex::Captures;

use crate::models::config::HeaderConfig;

use super::patterns::{DATE_DAY_MONTH_NAME, DATE_DMY, DATE_YMD};
use super::{ExtractionMatch, FieldExtractor};

/// Date field extractor.
pub struct DateExtractor {
    scan_lines: usize,
}

impl DateExtractor {
    pub fn new(config: &HeaderConfig) -> Self {
        Self {
            scan_lines: config.date_scan_lines,
        }
    }
}

impl Default for DateExtractor {
    fn default() -> Self {
        Self::new(&HeaderConfig::default())
    }
}

impl FieldExtractor for DateExtractor {
    type Output = ExtractionMatch<NaiveDate>;

    fn extract(&self, lines: &[String]) -> Option<Self::Output> {
        lines
            .iter()
            .take(self.scan_lines)
            .enumerate()
            .find_map(|(i, line)| parse_date(line).map(|m| m.with_line(i)))
    }
}

/// Try the three date shapes against a single line, in order.
fn parse_date(line: &str) -> Option<ExtractionMatch<NaiveDate>> {
    let day_first = |caps: &Captures| {
        ymd(&caps[3], &caps[2], &caps[1])
    };
    let year_first = |caps: &Captures| {
        ymd(&caps[1], &caps[2], &caps[3])
    };
    let month_name = |caps: &Captures| {
        let year: i32 = caps[3].parse().ok()?;
        let day: u32 = caps[1].parse().ok()?;
        NaiveDate::from_ymd_opt(year, month_to_number(&caps[2])?, day)
    };

    DATE_DMY
        .captures_iter(line)
        .find_map(|caps| day_first(&caps).map(|d| (d, caps[0].to_string())))
        .or_else(|| {
            DATE_YMD
                .captures_iter(line)
                .find_map(|caps| year_first(&caps).map(|d| (d, caps[0].to_string())))
        })
        .or_else(|| {
            DATE_DAY_MONTH_NAME
                .captures_iter(line)
                .find_map(|caps| month_name(&caps).map(|d| (d, caps[0].to_string())))
        })
        .map(|(date, source)| ExtractionMatch::new(date, 0.9, source))
}

fn ymd(year: &str, month: &str, day: &str) -> Option<NaiveDate> {
    NaiveDate::from_ymd_opt(year.parse().ok()?, month.parse().ok()?, day.parse().ok()?)
}

fn month_to_number(month: &str) -> Option<u32> {
    let number = match month.get(..3)?.to_lowercase().as_str() {
        "jan" => 1,
        "feb" => 2,
        "mar" => 3,
        "apr" => 4,
        "may" => 5,
        "jun" => 6,
        "jul" => 7,
        "aug" => 8,
        "sep" => 9,
        "oct" => 10,
        "nov" => 11,
        "dec" => 12,
        _ => return None,
    };
    Some(number)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn extract(text: &str) -> Option<NaiveDate> {
        let lines = crate::invoice::rules::split_lines(text);
        DateExtractor::default().extract(&lines).map(|m| m.value)
    }

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_day_first() {
        assert_eq!(extract("Date: 12/03/2024"), Some(date(2024, 3, 12)));
        assert_eq!(extract("Date: 5-7-2024"), Some(date(2024, 7, 5)));
    }

    #[test]
    fn test_year_first() {
        assert_eq!(extract("Issued 2024/03/12"), Some(date(2024, 3, 12)));
        assert_eq!(extract("Issued 2024-3-2"), Some(date(2024, 3, 2)));
    }

    #[test]
    fn test_month_name() {
        assert_eq!(extract("Invoice Date: 3 Sep 2024"), Some(date(2024, 9, 3)));
        assert_eq!(extract("Date 21st March, 2024"), Some(date(2024, 3, 21)));
    }

    #[test]
    fn test_impossible_date_skipped() {
        // 31/02 cannot be built; the next line's date is used instead
        assert_eq!(extract("Date: 31/02/2024\nDelivered 01/03/2024"), Some(date(2024, 3, 1)));
    }

    #[test]
    fn test_no_date() {
        assert_eq!(extract("Tax Invoice\nNo dates here"), None);
    }

    #[test]
    fn test_scan_window() {
        let mut text = "filler\n".repeat(20);
        text.push_str("12/03/2024\n");
        assert_eq!(extract(&text), None);
    }
}
