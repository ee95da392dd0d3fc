//! Scalar normalizers for raw spreadsheet cells.
//!
//! Each normalizer converts one raw cell value into one canonical scalar
//! and never fails: unparseable input degrades to a defined default (zero
//! for numbers, empty string or raw passthrough for dates and times).
//!
//! Dates arrive in three shapes: the export's structured `Date(...)`
//! marker (a year/month/day/hour/minute/second tuple with a 0-based
//! month), an already-canonical `DD.MM.YYYY` string, or a free-form date
//! string. Canonical output is always zero-padded `DD.MM.YYYY` / `HH:MM`.

use chrono::{NaiveDate, NaiveTime};
use once_cell::sync::Lazy;
use regex::Regex;

use crate::core::CellValue;

static CANONICAL_DATE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^\d{2}\.\d{2}\.\d{4}$").expect("valid canonical date pattern"));

static CLOCK: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^(\d{1,2}):(\d{1,2})(?::(\d{1,2}))?$").expect("valid clock pattern"));

/// Formats attempted for free-form date strings, in order.
const GENERAL_DATE_FORMATS: &[&str] = &["%d.%m.%Y", "%Y-%m-%d", "%Y/%m/%d", "%m/%d/%Y"];

/// Textual wrapper of the export's structured date marker.
const DATE_MARKER_PREFIX: &str = "Date(";

/// What a time normalizer returns when the cell cannot be parsed.
///
/// The detail/table path tolerates raw passthrough; the summary path that
/// feeds the metrics engine does not and gets an empty string instead.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TimeFallback {
    Empty,
    RawPassthrough,
}

/// Normalize a numeric cell. Accepts numbers directly and strings with a
/// locale `,` decimal separator; anything else becomes 0. Never NaN.
pub fn normalize_number(cell: Option<&CellValue>) -> f64 {
    match cell {
        Some(CellValue::Number(n)) if n.is_finite() => *n,
        Some(CellValue::Text(s)) => s
            .trim()
            .replacen(',', ".", 1)
            .parse::<f64>()
            .ok()
            .filter(|n| n.is_finite())
            .unwrap_or(0.0),
        _ => 0.0,
    }
}

/// Normalize a date cell to canonical `DD.MM.YYYY`, or empty on failure.
pub fn normalize_date(cell: Option<&CellValue>) -> String {
    let Some(CellValue::Text(raw)) = cell else {
        return String::new();
    };
    let text = raw.trim();
    if text.is_empty() {
        return String::new();
    }

    if text.starts_with(DATE_MARKER_PREFIX) {
        return marker_parts(text)
            .and_then(|parts| marker_date(&parts))
            .map(format_date)
            .unwrap_or_default();
    }

    if CANONICAL_DATE.is_match(text) {
        return text.to_string();
    }

    GENERAL_DATE_FORMATS
        .iter()
        .find_map(|fmt| NaiveDate::parse_from_str(text, fmt).ok())
        .map(format_date)
        .unwrap_or_default()
}

/// Normalize a time cell to canonical 24h `HH:MM`; on failure the caller's
/// [`TimeFallback`] policy decides between empty and raw passthrough.
pub fn normalize_time(cell: Option<&CellValue>, fallback: TimeFallback) -> String {
    let Some(value) = cell else {
        return String::new();
    };
    let raw = value.display();
    let text = raw.trim();
    if text.is_empty() {
        return String::new();
    }

    let parsed = if text.starts_with(DATE_MARKER_PREFIX) {
        marker_parts(text).and_then(|parts| marker_time(&parts))
    } else {
        parse_clock_text(text)
    };

    match parsed {
        Some(time) => time.format("%H:%M").to_string(),
        None => match fallback {
            TimeFallback::Empty => String::new(),
            TimeFallback::RawPassthrough => text.to_string(),
        },
    }
}

/// Split a `Date(y,m,d[,h,min,s])` marker into its numeric tuple.
fn marker_parts(text: &str) -> Option<Vec<i64>> {
    let inner = text
        .trim()
        .strip_prefix(DATE_MARKER_PREFIX)?
        .strip_suffix(')')?;
    let parts = inner
        .split(',')
        .map(|part| part.trim().parse::<i64>())
        .collect::<Result<Vec<_>, _>>()
        .ok()?;
    (parts.len() >= 3).then_some(parts)
}

fn marker_date(parts: &[i64]) -> Option<NaiveDate> {
    let year = i32::try_from(parts[0]).ok()?;
    let month0 = u32::try_from(parts[1]).ok()?;
    let day = u32::try_from(parts[2]).ok()?;
    // The marker month is 0-based.
    NaiveDate::from_ymd_opt(year, month0 + 1, day)
}

fn marker_time(parts: &[i64]) -> Option<NaiveTime> {
    let hour = u32::try_from(parts.get(3).copied().unwrap_or(0)).ok()?;
    let minute = u32::try_from(parts.get(4).copied().unwrap_or(0)).ok()?;
    NaiveTime::from_hms_opt(hour, minute, 0)
}

fn parse_clock_text(text: &str) -> Option<NaiveTime> {
    let captures = CLOCK.captures(text)?;
    let hour = captures.get(1)?.as_str().parse().ok()?;
    let minute = captures.get(2)?.as_str().parse().ok()?;
    let second = captures
        .get(3)
        .map(|m| m.as_str().parse().ok())
        .unwrap_or(Some(0))?;
    NaiveTime::from_hms_opt(hour, minute, second)
}

fn format_date(date: NaiveDate) -> String {
    date.format("%d.%m.%Y").to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn text(value: &str) -> CellValue {
        CellValue::Text(value.to_string())
    }

    #[test]
    fn number_accepts_comma_decimal_separator() {
        assert_eq!(normalize_number(Some(&text("7,5"))), 7.5);
    }

    #[test]
    fn number_defaults_to_zero_for_empty_and_missing() {
        assert_eq!(normalize_number(Some(&text(""))), 0.0);
        assert_eq!(normalize_number(None), 0.0);
    }

    #[test]
    fn number_passes_through_numeric_cells() {
        assert_eq!(normalize_number(Some(&CellValue::Number(8.25))), 8.25);
    }

    #[test]
    fn number_never_returns_non_finite_values() {
        assert_eq!(normalize_number(Some(&text("inf"))), 0.0);
        assert_eq!(normalize_number(Some(&text("NaN"))), 0.0);
        assert_eq!(normalize_number(Some(&CellValue::Number(f64::NAN))), 0.0);
    }

    #[test]
    fn number_rejects_trailing_junk() {
        assert_eq!(normalize_number(Some(&text("7.5abc"))), 0.0);
        assert_eq!(normalize_number(Some(&CellValue::Bool(true))), 0.0);
    }

    #[test]
    fn date_reinterprets_marker_month_as_zero_based() {
        let cell = text("Date(2025,1,23,9,0,0)");
        assert_eq!(normalize_date(Some(&cell)), "23.02.2025");
    }

    #[test]
    fn date_zero_pads_marker_output() {
        let cell = text("Date(2025,0,5)");
        assert_eq!(normalize_date(Some(&cell)), "05.01.2025");
    }

    #[test]
    fn date_passes_canonical_strings_through_unchanged() {
        assert_eq!(normalize_date(Some(&text("23.02.2025"))), "23.02.2025");
    }

    #[test]
    fn date_reformats_general_strings_with_zero_padding() {
        assert_eq!(normalize_date(Some(&text("1.2.2025"))), "01.02.2025");
        assert_eq!(normalize_date(Some(&text("2025-01-23"))), "23.01.2025");
    }

    #[test]
    fn date_returns_empty_on_failure() {
        assert_eq!(normalize_date(Some(&text("Date(abc)"))), "");
        assert_eq!(normalize_date(Some(&text("not a date"))), "");
        assert_eq!(normalize_date(Some(&CellValue::Number(45_000.0))), "");
        assert_eq!(normalize_date(None), "");
    }

    #[test]
    fn date_preserves_null_date_sentinel_year() {
        // The spreadsheet encodes missing dates as the 1899 epoch; the
        // validity filter downstream relies on seeing that year.
        let cell = text("Date(1899,11,30,0,0,0)");
        assert_eq!(normalize_date(Some(&cell)), "30.12.1899");
    }

    #[test]
    fn time_formats_marker_clock() {
        let cell = text("Date(2025,1,23,9,5,0)");
        assert_eq!(normalize_time(Some(&cell), TimeFallback::Empty), "09:05");
    }

    #[test]
    fn time_defaults_marker_without_clock_to_midnight() {
        let cell = text("Date(2025,1,23)");
        assert_eq!(normalize_time(Some(&cell), TimeFallback::Empty), "00:00");
    }

    #[test]
    fn time_reformats_clock_strings() {
        assert_eq!(normalize_time(Some(&text("12:23:00")), TimeFallback::Empty), "12:23");
        assert_eq!(normalize_time(Some(&text("9:5")), TimeFallback::Empty), "09:05");
    }

    #[test]
    fn time_failure_honors_fallback_policy() {
        let cell = text("after lunch");
        assert_eq!(normalize_time(Some(&cell), TimeFallback::Empty), "");
        assert_eq!(
            normalize_time(Some(&cell), TimeFallback::RawPassthrough),
            "after lunch"
        );
        assert_eq!(normalize_time(None, TimeFallback::RawPassthrough), "");
    }

    #[test]
    fn time_rejects_out_of_range_clock() {
        assert_eq!(normalize_time(Some(&text("25:00")), TimeFallback::Empty), "");
    }
}
