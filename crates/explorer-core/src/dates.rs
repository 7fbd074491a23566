//! Best-effort parsing of `publish_time` values.
//!
//! The metadata mixes full dates, date-times, year-month and year-only
//! values. Anything that resolves to a calendar date is accepted; partial
//! dates resolve to the first day of the period.

use chrono::{DateTime, NaiveDate, NaiveDateTime};

/// Years outside this range are treated as unparseable, matching the span a
/// nanosecond timestamp can represent.
const MIN_YEAR: i32 = 1677;
const MAX_YEAR: i32 = 2262;

const DATETIME_FORMATS: &[&str] = &[
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%dT%H:%M:%S",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%d %H:%M",
];

const DATE_FORMATS: &[&str] = &[
    "%Y-%m-%d",
    "%Y/%m/%d",
    "%Y.%m.%d",
    "%Y %b %d",
    "%Y %B %d",
    "%d %b %Y",
    "%d %B %Y",
    "%b %d %Y",
    "%B %d %Y",
    "%b %d, %Y",
    "%B %d, %Y",
    "%m/%d/%Y",
];

/// Formats for year-month values; parsed by appending a day.
const MONTH_FORMATS: &[(&str, &str)] = &[
    ("-01", "%Y-%m-%d"),
    ("/01", "%Y/%m/%d"),
    (" 01", "%Y %b %d"),
    (" 01", "%Y %B %d"),
    (" 01", "%b %Y %d"),
    (" 01", "%B %Y %d"),
];

/// Parse a `publish_time` string into a calendar date.
///
/// Returns `None` for empty or unrecognised input.
///
/// ```
/// use explorer_core::dates::parse_publish_date;
/// use chrono::NaiveDate;
///
/// assert_eq!(parse_publish_date("2020-05-01"), NaiveDate::from_ymd_opt(2020, 5, 1));
/// assert_eq!(parse_publish_date("2019"), NaiveDate::from_ymd_opt(2019, 1, 1));
/// assert_eq!(parse_publish_date("not a date"), None);
/// ```
pub fn parse_publish_date(raw: &str) -> Option<NaiveDate> {
    let s = raw.trim();
    if s.is_empty() {
        return None;
    }
    parse_inner(s).filter(|d| within_range(d))
}

fn parse_inner(s: &str) -> Option<NaiveDate> {
    // Year only.
    if s.len() == 4 && s.bytes().all(|b| b.is_ascii_digit()) {
        let year: i32 = s.parse().ok()?;
        return NaiveDate::from_ymd_opt(year, 1, 1);
    }

    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Some(dt.date_naive());
    }
    if let Some(stripped) = s.strip_suffix('Z') {
        if let Ok(dt) = DateTime::parse_from_rfc3339(&format!("{stripped}+00:00")) {
            return Some(dt.date_naive());
        }
    }

    for fmt in DATETIME_FORMATS {
        if let Ok(naive) = NaiveDateTime::parse_from_str(s, fmt) {
            return Some(naive.date());
        }
    }

    for fmt in DATE_FORMATS {
        if let Ok(date) = NaiveDate::parse_from_str(s, fmt) {
            return Some(date);
        }
    }

    for (day, fmt) in MONTH_FORMATS {
        if let Ok(date) = NaiveDate::parse_from_str(&format!("{s}{day}"), fmt) {
            return Some(date);
        }
    }

    tracing::trace!("unparseable publish_time {:?}", s);
    None
}

fn within_range(date: &NaiveDate) -> bool {
    use chrono::Datelike;
    (MIN_YEAR..=MAX_YEAR).contains(&date.year())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ymd(y: i32, m: u32, d: u32) -> Option<NaiveDate> {
        NaiveDate::from_ymd_opt(y, m, d)
    }

    #[test]
    fn test_parse_iso_date() {
        assert_eq!(parse_publish_date("2020-05-01"), ymd(2020, 5, 1));
        assert_eq!(parse_publish_date("2019/12/31"), ymd(2019, 12, 31));
    }

    #[test]
    fn test_parse_trims_whitespace() {
        assert_eq!(parse_publish_date("  2020-05-01 "), ymd(2020, 5, 1));
    }

    #[test]
    fn test_parse_datetime_variants() {
        assert_eq!(parse_publish_date("2020-03-12T08:30:00"), ymd(2020, 3, 12));
        assert_eq!(parse_publish_date("2020-03-12 08:30:00"), ymd(2020, 3, 12));
        assert_eq!(parse_publish_date("2020-03-12T08:30:00Z"), ymd(2020, 3, 12));
        assert_eq!(
            parse_publish_date("2020-03-12T08:30:00+02:00"),
            ymd(2020, 3, 12)
        );
    }

    #[test]
    fn test_parse_year_only() {
        assert_eq!(parse_publish_date("2019"), ymd(2019, 1, 1));
    }

    #[test]
    fn test_parse_year_month() {
        assert_eq!(parse_publish_date("2020-03"), ymd(2020, 3, 1));
        assert_eq!(parse_publish_date("2020 Mar"), ymd(2020, 3, 1));
        assert_eq!(parse_publish_date("March 2020"), ymd(2020, 3, 1));
    }

    #[test]
    fn test_parse_textual_month() {
        assert_eq!(parse_publish_date("2020 Mar 12"), ymd(2020, 3, 12));
        assert_eq!(parse_publish_date("12 Mar 2020"), ymd(2020, 3, 12));
        assert_eq!(parse_publish_date("March 12, 2020"), ymd(2020, 3, 12));
    }

    #[test]
    fn test_parse_rejects_empty_and_garbage() {
        assert_eq!(parse_publish_date(""), None);
        assert_eq!(parse_publish_date("   "), None);
        assert_eq!(parse_publish_date("unknown"), None);
        assert_eq!(parse_publish_date("2020-13-01"), None);
        assert_eq!(parse_publish_date("2020-02-30"), None);
    }

    #[test]
    fn test_parse_rejects_out_of_range_years() {
        assert_eq!(parse_publish_date("1066"), None);
        assert_eq!(parse_publish_date("3000-01-01"), None);
        assert_eq!(parse_publish_date("1677"), ymd(1677, 1, 1));
    }
}
