//! Number and date formatting

use crate::{Result, TextError};
use chrono::NaiveDate;

/// Format a monetary amount with exactly two decimal places
///
/// Non-finite values format as zero and negative zero loses its sign.
///
/// # Examples
/// ```
/// use invoice_text::format_amount;
/// assert_eq!(format_amount(25.5 * 3.0), "76.50");
/// assert_eq!(format_amount(-0.001), "0.00");
/// ```
pub fn format_amount(n: f64) -> String {
    let text = format!("{:.2}", finite_or_zero(n));
    if text == "-0.00" {
        "0.00".to_string()
    } else {
        text
    }
}

/// Format a quantity at natural precision (`1`, `1.5`, `0.25`)
pub fn format_quantity(n: f64) -> String {
    let n = finite_or_zero(n);
    // -0.0 prints as "-0"
    let n = if n == 0.0 { 0.0 } else { n };
    format!("{n}")
}

/// Format a date as abbreviated month and full year, e.g. "Dec 2025"
pub fn format_month_year(date: NaiveDate) -> String {
    date.format("%b %Y").to_string()
}

/// Format a date as `YYYY-MM-DD`
pub fn format_iso_date(date: NaiveDate) -> String {
    date.format("%Y-%m-%d").to_string()
}

/// Parse a `YYYY-MM-DD` date
pub fn parse_iso_date(text: &str) -> Result<NaiveDate> {
    NaiveDate::parse_from_str(text.trim(), "%Y-%m-%d")
        .map_err(|e| TextError::InvalidDate(format!("{text}: {e}")))
}

/// Parse the leading number of a text field, falling back to zero
///
/// Leading whitespace is skipped, then the longest prefix that reads as a
/// decimal number (optional sign, digits, fraction, exponent) is taken.
/// Anything unparsable or non-finite yields `0.0`.
///
/// # Examples
/// ```
/// use invoice_text::coerce_number;
/// assert_eq!(coerce_number("12.5"), 12.5);
/// assert_eq!(coerce_number(" 3 units"), 3.0);
/// assert_eq!(coerce_number("abc"), 0.0);
/// ```
pub fn coerce_number(text: &str) -> f64 {
    let text = text.trim_start();
    let prefix = &text[..numeric_prefix_len(text)];
    prefix
        .parse::<f64>()
        .ok()
        .map(finite_or_zero)
        .unwrap_or(0.0)
}

fn finite_or_zero(n: f64) -> f64 {
    if n.is_finite() {
        n
    } else {
        0.0
    }
}

/// Byte length of the longest numeric prefix of `text`
fn numeric_prefix_len(text: &str) -> usize {
    let bytes = text.as_bytes();
    let mut i = 0;

    if matches!(bytes.first(), Some(b'+') | Some(b'-')) {
        i += 1;
    }

    let int_start = i;
    while i < bytes.len() && bytes[i].is_ascii_digit() {
        i += 1;
    }
    let mut digits = i - int_start;

    if i < bytes.len() && bytes[i] == b'.' {
        let frac_start = i + 1;
        let mut j = frac_start;
        while j < bytes.len() && bytes[j].is_ascii_digit() {
            j += 1;
        }
        digits += j - frac_start;
        // "5." is a number, "." alone is not
        if digits > 0 {
            i = j;
        }
    }

    if digits == 0 {
        return 0;
    }

    // Exponent only counts when digits follow it
    if i < bytes.len() && (bytes[i] == b'e' || bytes[i] == b'E') {
        let mut j = i + 1;
        if j < bytes.len() && (bytes[j] == b'+' || bytes[j] == b'-') {
            j += 1;
        }
        let exp_start = j;
        while j < bytes.len() && bytes[j].is_ascii_digit() {
            j += 1;
        }
        if j > exp_start {
            i = j;
        }
    }

    i
}
