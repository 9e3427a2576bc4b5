//! Lenient parsing of report dates.

use chrono::{Datelike, NaiveDate, NaiveDateTime};

/// Date layouts seen in exported status reports, tried in order.
pub const REPORT_DATE_FORMATS: &[&str] = &[
    "%Y-%m-%d",
    "%m/%d/%Y",
    "%m/%d/%y",
    "%d-%b-%Y",
    "%d-%b-%y",
    "%Y/%m/%d",
    "%m-%d-%Y",
    "%m-%d-%y",
];

// `%Y` also accepts short years; real report years always have four digits.
const MIN_FULL_YEAR: i32 = 1000;

const TIME_SUFFIXES: &[&str] = &[" %H:%M:%S%.f", "T%H:%M:%S%.f", " %H:%M", " %I:%M:%S %p", " %I:%M %p"];

/// Parse a report date, with or without a time component.
///
/// Returns `None` for blank or unrecognised values.
#[must_use]
pub fn parse_report_date(raw: &str) -> Option<NaiveDateTime> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return None;
    }
    REPORT_DATE_FORMATS.iter().find_map(|format| {
        NaiveDate::parse_from_str(trimmed, format)
            .ok()
            .and_then(|date| date.and_hms_opt(0, 0, 0))
            .or_else(|| {
                TIME_SUFFIXES.iter().find_map(|suffix| {
                    NaiveDateTime::parse_from_str(trimmed, &format!("{format}{suffix}")).ok()
                })
            })
            .filter(|parsed| !format.contains("%Y") || parsed.year() >= MIN_FULL_YEAR)
    })
}
