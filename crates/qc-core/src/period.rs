//! Canonical due periods.
//!
//! A `Period` is one occurrence slot of a recurring obligation. Internally it
//! is a tagged date; the string key (`2024-01-15`, `2024-01`, `2024-Q1`,
//! `2024`) only exists at the boundary through `Display` / `Period::parse`.
//!
//! | kind    | key          | closing boundary     | window              |
//! |---------|--------------|----------------------|---------------------|
//! | Day     | `YYYY-MM-DD` | the date             | the date            |
//! | Week    | `YYYY-MM-DD` | the date             | date ..= date + 6   |
//! | Month   | `YYYY-MM`    | last day of month    | the month           |
//! | Quarter | `YYYY-Qn`    | last day of quarter  | the quarter         |
//! | Year    | `YYYY`       | 31 December          | the year            |

use crate::date;
use crate::error::{QcError, Result};
use crate::types::Frequency;
use chrono::{Datelike, Duration, NaiveDate};
use serde::{Serialize, Serializer};
use std::fmt;

/// Each variant carries the first day of the period. Construct through
/// [`Period::containing`] or [`Period::parse`], which normalise to that day.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Period {
    Day(NaiveDate),
    Week(NaiveDate),
    Month(NaiveDate),
    Quarter(NaiveDate),
    Year(NaiveDate),
}

impl Period {
    /// The period of `frequency` that `date` falls into. This is the
    /// completion normaliser: a completion satisfies a period exactly when
    /// `containing(frequency, completion_date)` equals it.
    pub fn containing(frequency: Frequency, date: NaiveDate) -> Period {
        match frequency {
            Frequency::Daily => Period::Day(date),
            Frequency::Weekly => Period::Week(date),
            Frequency::Monthly => Period::Month(date::month_start(date)),
            Frequency::Quarterly => Period::Quarter(date::quarter_start(date)),
            Frequency::Annual => Period::Year(date::year_start(date)),
        }
    }

    /// Parse a canonical key for `frequency`. Keys are strict: `2024-1`,
    /// `2024-Q5` or a timestamp are rejected.
    pub fn parse(frequency: Frequency, key: &str) -> Result<Period> {
        let invalid = || QcError::InvalidPeriod {
            period: key.to_string(),
            frequency: frequency.to_string(),
        };
        match frequency {
            Frequency::Daily | Frequency::Weekly => {
                if key.len() != 10 {
                    return Err(invalid());
                }
                let d = date::parse_date(key).map_err(|_| invalid())?;
                Ok(Period::containing(frequency, d))
            }
            Frequency::Monthly => {
                let (year, month) = key.split_once('-').ok_or_else(invalid)?;
                let year = parse_year(year).ok_or_else(invalid)?;
                let month = parse_fixed_digits(month, 2).ok_or_else(invalid)?;
                let first = NaiveDate::from_ymd_opt(year, month, 1).ok_or_else(invalid)?;
                Ok(Period::Month(first))
            }
            Frequency::Quarterly => {
                let (year, quarter) = key.split_once("-Q").ok_or_else(invalid)?;
                let year = parse_year(year).ok_or_else(invalid)?;
                let quarter = parse_fixed_digits(quarter, 1)
                    .filter(|q| (1..=4).contains(q))
                    .ok_or_else(invalid)?;
                let first =
                    NaiveDate::from_ymd_opt(year, (quarter - 1) * 3 + 1, 1).ok_or_else(invalid)?;
                Ok(Period::Quarter(first))
            }
            Frequency::Annual => {
                let year = parse_year(key).ok_or_else(invalid)?;
                let first = NaiveDate::from_ymd_opt(year, 1, 1).ok_or_else(invalid)?;
                Ok(Period::Year(first))
            }
        }
    }

    pub fn frequency(&self) -> Frequency {
        match self {
            Period::Day(_) => Frequency::Daily,
            Period::Week(_) => Frequency::Weekly,
            Period::Month(_) => Frequency::Monthly,
            Period::Quarter(_) => Frequency::Quarterly,
            Period::Year(_) => Frequency::Annual,
        }
    }

    /// First day of the period.
    pub fn start(&self) -> NaiveDate {
        match *self {
            Period::Day(d)
            | Period::Week(d)
            | Period::Month(d)
            | Period::Quarter(d)
            | Period::Year(d) => d,
        }
    }

    /// Last day on which the period is current.
    pub fn window_end(&self) -> NaiveDate {
        match *self {
            Period::Day(d) => d,
            Period::Week(d) => d + Duration::days(6),
            _ => self.next().start() - Duration::days(1),
        }
    }

    /// The date overdue counts are measured from. For date-keyed periods this
    /// is the scheduled date itself, not the end of the week.
    pub fn closing_boundary(&self) -> NaiveDate {
        match *self {
            Period::Day(d) | Period::Week(d) => d,
            _ => self.window_end(),
        }
    }

    pub fn contains(&self, day: NaiveDate) -> bool {
        self.start() <= day && day <= self.window_end()
    }

    /// True once `today` is past the period's window.
    pub fn is_closed(&self, today: NaiveDate) -> bool {
        self.window_end() < today
    }

    /// The following period of the same kind. Daily periods skip weekends.
    pub fn next(&self) -> Period {
        match *self {
            Period::Day(d) => Period::Day(date::next_weekday(d)),
            Period::Week(d) => Period::Week(d + Duration::days(7)),
            Period::Month(d) => Period::Month(date::next_month_start(d)),
            Period::Quarter(d) => {
                let mut start = d;
                for _ in 0..3 {
                    start = date::next_month_start(start);
                }
                Period::Quarter(start)
            }
            Period::Year(d) => Period::Year(date::year_start(
                d + Duration::days(if date::is_leap_year(d.year()) { 366 } else { 365 }),
            )),
        }
    }

    /// The preceding period of the same kind. Daily periods skip weekends.
    pub fn prev(&self) -> Period {
        let day_before = self.start() - Duration::days(1);
        match *self {
            Period::Day(_) => Period::Day(date::on_or_before_weekday(day_before)),
            Period::Week(d) => Period::Week(d - Duration::days(7)),
            Period::Month(_) => Period::Month(date::month_start(day_before)),
            Period::Quarter(_) => Period::Quarter(date::quarter_start(day_before)),
            Period::Year(_) => Period::Year(date::year_start(day_before)),
        }
    }

    /// Number of whole periods from `self` to `later` (negative if `later`
    /// precedes `self`). Date-keyed periods count calendar days.
    pub fn periods_until(&self, later: &Period) -> i64 {
        match (self, later) {
            (Period::Month(a), Period::Month(b)) => month_index(*b) - month_index(*a),
            (Period::Quarter(a), Period::Quarter(b)) => {
                (month_index(*b) - month_index(*a)).div_euclid(3)
            }
            (Period::Year(a), Period::Year(b)) => i64::from(b.year() - a.year()),
            _ => (later.start() - self.start()).num_days(),
        }
    }

    pub fn key(&self) -> String {
        self.to_string()
    }
}

fn month_index(d: NaiveDate) -> i64 {
    i64::from(d.year()) * 12 + i64::from(d.month0())
}

fn parse_year(s: &str) -> Option<i32> {
    parse_fixed_digits(s, 4).and_then(|y| i32::try_from(y).ok())
}

fn parse_fixed_digits(s: &str, width: usize) -> Option<u32> {
    if s.len() != width || !s.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    s.parse().ok()
}

impl fmt::Display for Period {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Period::Day(d) | Period::Week(d) => write!(f, "{}", d.format(date::DATE_FORMAT)),
            Period::Month(d) => write!(f, "{}", d.format("%Y-%m")),
            Period::Quarter(d) => write!(f, "{:04}-Q{}", d.year(), date::quarter_of(*d)),
            Period::Year(d) => write!(f, "{:04}", d.year()),
        }
    }
}

impl Serialize for Period {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
