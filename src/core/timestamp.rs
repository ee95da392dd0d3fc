//! Composite date+time parsing for sort and range-filter consumers.
//!
//! Record dates are canonically dotted day-first (`23.02.2025`), but rows
//! that bypassed normalization can still carry ISO-like `-` or `/`
//! separated dates. The parser dispatches on the separator character and
//! degrades to an explicitly invalid timestamp instead of failing.

use chrono::{NaiveDate, NaiveDateTime, NaiveTime};

/// Formats tried for `-` and `/` separated dates, in order.
const SEPARATED_DATE_FORMATS: &[&str] = &["%Y-%m-%d", "%Y/%m/%d", "%m/%d/%Y", "%d/%m/%Y"];

/// Orderable timestamp of a call record.
///
/// An invalid timestamp orders before every valid one, so newest-first
/// orderings list unparseable entries last and "latest" scans never prefer
/// them. Equal timestamps must be tie-broken by the caller's input order
/// (stable sorts, `>=` latest scans).
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct CallTimestamp(Option<NaiveDateTime>);

impl CallTimestamp {
    pub const INVALID: CallTimestamp = CallTimestamp(None);

    pub fn is_valid(&self) -> bool {
        self.0.is_some()
    }

    pub fn date(&self) -> Option<NaiveDate> {
        self.0.map(|dt| dt.date())
    }

    pub fn datetime(&self) -> Option<NaiveDateTime> {
        self.0
    }
}

/// Parse a canonical date string plus optional time into one orderable
/// timestamp. Unrecognized input yields [`CallTimestamp::INVALID`].
pub fn parse_timestamp(date: &str, time: Option<&str>) -> CallTimestamp {
    let date = date.trim();
    if date.is_empty() {
        return CallTimestamp::INVALID;
    }

    let parsed = if date.contains('-') || date.contains('/') {
        parse_separated_date(date)
    } else {
        parse_dotted_date(date)
    };

    match parsed {
        Some(day) => CallTimestamp(Some(day.and_time(parse_clock(time)))),
        None => CallTimestamp::INVALID,
    }
}

fn parse_separated_date(date: &str) -> Option<NaiveDate> {
    SEPARATED_DATE_FORMATS
        .iter()
        .find_map(|fmt| NaiveDate::parse_from_str(date, fmt).ok())
}

fn parse_dotted_date(date: &str) -> Option<NaiveDate> {
    let mut parts = date.splitn(3, '.');
    let day: u32 = parts.next()?.trim().parse().ok()?;
    let month: u32 = parts.next()?.trim().parse().ok()?;
    let year: i32 = parts.next()?.trim().parse().ok()?;
    NaiveDate::from_ymd_opt(year, month, day)
}

// Clock components degrade to zero individually, so partial "HH" or
// "HH:MM" strings still produce an orderable time.
fn parse_clock(time: Option<&str>) -> NaiveTime {
    let Some(time) = time else {
        return NaiveTime::MIN;
    };
    let mut parts = time.trim().splitn(3, ':');
    let hour = clock_component(parts.next());
    let minute = clock_component(parts.next());
    let second = clock_component(parts.next());
    NaiveTime::from_hms_opt(hour, minute, second).unwrap_or(NaiveTime::MIN)
}

fn clock_component(part: Option<&str>) -> u32 {
    part.and_then(|p| p.trim().parse().ok()).unwrap_or(0)
}
