//! Field-level parsing shared by the source extractors.

use crate::types::{MonitorError, Result};
use chrono::{NaiveDate, NaiveDateTime};

const DATETIME_FORMATS: &[&str] = &["%Y-%m-%d %H:%M:%S", "%Y-%m-%d %H:%M", "%m/%d/%Y %H:%M:%S"];
const DATE_FORMATS: &[&str] = &["%Y-%m-%d", "%m/%d/%Y", "%b %d, %Y", "%B %d, %Y"];

/// Parse a filing date as rendered by a source. Time-of-day, when present, is
/// discarded: recency is compared at calendar-date granularity.
pub fn parse_filed_date(raw: &str) -> Result<NaiveDate> {
    let trimmed = raw.trim();

    for format in DATETIME_FORMATS {
        if let Ok(datetime) = NaiveDateTime::parse_from_str(trimmed, format) {
            return Ok(datetime.date());
        }
    }
    for format in DATE_FORMATS {
        if let Ok(date) = NaiveDate::parse_from_str(trimmed, format) {
            return Ok(date);
        }
    }

    Err(MonitorError::DateParse {
        raw: raw.to_string(),
    })
}

/// Lower bound of a value or value range, in whole currency units.
///
/// `"$50,001 - $100,000"` gives `50001`, `"+$1,250,000"` gives `1250000`,
/// `"-$12,000"` gives `-12000`. Anything without a leading number is `None`.
pub fn amount_floor(raw: &str) -> Option<i64> {
    let compact: String = raw
        .chars()
        .filter(|c| !c.is_whitespace() && *c != ',' && *c != '$')
        .collect();

    let (negative, unsigned) = match compact.strip_prefix('-') {
        Some(rest) => (true, rest),
        None => (false, compact.strip_prefix('+').unwrap_or(&compact)),
    };

    let low = unsigned.split('-').next()?.trim_end_matches('+');
    let integral = low.split('.').next()?;
    if integral.is_empty() || !integral.chars().all(|c| c.is_ascii_digit()) {
        return None;
    }

    let value: i64 = integral.parse().ok()?;
    Some(if negative { -value } else { value })
}

/// Collapse runs of whitespace (including non-breaking spaces) to one space.
pub fn clean_text(raw: &str) -> String {
    raw.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// `50000` -> `"50,000"`.
pub fn format_thousands(value: i64) -> String {
    let digits = value.unsigned_abs().to_string();
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }
    if value < 0 {
        format!("-{}", grouped)
    } else {
        grouped
    }
}
