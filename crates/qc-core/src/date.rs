//! Calendar-date parsing and weekday arithmetic shared by the engine.

use crate::error::{QcError, Result};
use chrono::{DateTime, Datelike, Duration, NaiveDate, NaiveDateTime, Weekday};

pub const DATE_FORMAT: &str = "%Y-%m-%d";

/// Parse an ISO calendar date.
///
/// Accepts a zero-padded `YYYY-MM-DD`, an RFC 3339 timestamp, or a bare
/// `YYYY-MM-DDTHH:MM:SS[.fff]` datetime. For timestamps the calendar date as
/// written is used, so `2024-01-15T23:30:00-05:00` is the 15th.
pub fn parse_date(s: &str) -> Result<NaiveDate> {
    let s = s.trim();
    if s.len() == 10 {
        return NaiveDate::parse_from_str(s, DATE_FORMAT)
            .ok()
            .filter(|d| d.format(DATE_FORMAT).to_string() == s)
            .ok_or_else(|| QcError::InvalidDate(s.to_string()));
    }
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Ok(dt.date_naive());
    }
    if let Ok(dt) = NaiveDateTime::parse_from_str(s, "%Y-%m-%dT%H:%M:%S%.f") {
        return Ok(dt.date());
    }
    Err(QcError::InvalidDate(s.to_string()))
}

pub fn format_date(date: NaiveDate) -> String {
    date.format(DATE_FORMAT).to_string()
}

pub fn is_weekday(date: NaiveDate) -> bool {
    !matches!(date.weekday(), Weekday::Sat | Weekday::Sun)
}

/// The first Monday–Friday date strictly after `date`.
pub fn next_weekday(date: NaiveDate) -> NaiveDate {
    on_or_after_weekday(date + Duration::days(1))
}

/// `date` itself if it is a weekday, otherwise the following Monday.
pub fn on_or_after_weekday(date: NaiveDate) -> NaiveDate {
    match date.weekday() {
        Weekday::Sat => date + Duration::days(2),
        Weekday::Sun => date + Duration::days(1),
        _ => date,
    }
}

/// `date` itself if it is a weekday, otherwise the preceding Friday.
pub fn on_or_before_weekday(date: NaiveDate) -> NaiveDate {
    match date.weekday() {
        Weekday::Sat => date - Duration::days(1),
        Weekday::Sun => date - Duration::days(2),
        _ => date,
    }
}

pub fn is_leap_year(year: i32) -> bool {
    (year % 4 == 0 && year % 100 != 0) || year % 400 == 0
}

pub fn days_in_month(year: i32, month: u32) -> i64 {
    match month {
        4 | 6 | 9 | 11 => 30,
        2 if is_leap_year(year) => 29,
        2 => 28,
        _ => 31,
    }
}

pub fn month_start(date: NaiveDate) -> NaiveDate {
    date - Duration::days(i64::from(date.day0()))
}

pub fn next_month_start(date: NaiveDate) -> NaiveDate {
    month_start(date) + Duration::days(days_in_month(date.year(), date.month()))
}

pub fn quarter_start(date: NaiveDate) -> NaiveDate {
    let mut start = month_start(date);
    for _ in 0..date.month0() % 3 {
        start = month_start(start - Duration::days(1));
    }
    start
}

pub fn year_start(date: NaiveDate) -> NaiveDate {
    date - Duration::days(i64::from(date.ordinal0()))
}

/// Quarter number 1..=4 of the date's month.
pub fn quarter_of(date: NaiveDate) -> u32 {
    date.month0() / 3 + 1
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    fn d(s: &str) -> NaiveDate {
        NaiveDate::parse_from_str(s, DATE_FORMAT).unwrap()
    }

    #[test]
    fn parses_plain_dates() {
        assert_eq!(parse_date("2024-01-15").unwrap(), d("2024-01-15"));
        assert_eq!(parse_date(" 2024-02-29 ").unwrap(), d("2024-02-29"));
    }

    #[test]
    fn parses_timestamps_as_written() {
        assert_eq!(
            parse_date("2024-01-15T23:30:00-05:00").unwrap(),
            d("2024-01-15")
        );
        assert_eq!(parse_date("2024-01-15T08:00:00Z").unwrap(), d("2024-01-15"));
        assert_eq!(parse_date("2024-01-15T08:00:00.250").unwrap(), d("2024-01-15"));
    }

    #[test]
    fn rejects_malformed_dates() {
        for bad in ["", "Invalid Date", "2024-13-01", "2023-02-29", "2024-1-5", "15/01/2024"] {
            assert!(
                matches!(parse_date(bad), Err(QcError::InvalidDate(_))),
                "expected invalid: {bad}"
            );
        }
    }

    #[test]
    fn weekday_helpers() {
        // 2024-01-05 is a Friday, 06/07 the weekend.
        assert_eq!(next_weekday(d("2024-01-05")), d("2024-01-08"));
        assert_eq!(next_weekday(d("2024-01-08")), d("2024-01-09"));
        assert_eq!(on_or_after_weekday(d("2024-01-06")), d("2024-01-08"));
        assert_eq!(on_or_before_weekday(d("2024-01-07")), d("2024-01-05"));
        assert!(is_weekday(d("2024-01-05")));
        assert!(!is_weekday(d("2024-01-06")));
    }

    #[test]
    fn month_lengths() {
        assert_eq!(days_in_month(2024, 2), 29);
        assert_eq!(days_in_month(2023, 2), 28);
        assert_eq!(days_in_month(1900, 2), 28);
        assert_eq!(days_in_month(2000, 2), 29);
        assert_eq!(days_in_month(2024, 4), 30);
        assert_eq!(days_in_month(2024, 12), 31);
    }

    #[test]
    fn calendar_starts() {
        assert_eq!(month_start(d("2024-02-17")), d("2024-02-01"));
        assert_eq!(next_month_start(d("2024-12-31")), d("2025-01-01"));
        assert_eq!(quarter_start(d("2024-05-10")), d("2024-04-01"));
        assert_eq!(quarter_start(d("2024-03-31")), d("2024-01-01"));
        assert_eq!(quarter_start(d("2024-12-01")), d("2024-10-01"));
        assert_eq!(year_start(d("2024-07-04")), d("2024-01-01"));
        assert_eq!(quarter_of(d("2024-05-10")), 2);
        assert_eq!(quarter_of(d("2024-12-31")), 4);
    }
}
