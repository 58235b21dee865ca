use crate::date;
use crate::error::Result;
use crate::period::Period;
use crate::types::Frequency;
use chrono::{Duration, NaiveDate};
use std::collections::BTreeSet;

/// Map a completion date onto the period it satisfies.
pub fn normalize(frequency: Frequency, completed_on: NaiveDate) -> Period {
    Period::containing(frequency, completed_on)
}

/// String form of [`normalize`]: accepts a date or timestamp, returns the
/// canonical key.
pub fn normalize_key(frequency: Frequency, completed_on: &str) -> Result<String> {
    Ok(normalize(frequency, date::parse_date(completed_on)?).key())
}

pub fn normalize_all<I>(frequency: Frequency, dates: I) -> BTreeSet<Period>
where
    I: IntoIterator<Item = NaiveDate>,
{
    dates
        .into_iter()
        .map(|d| normalize(frequency, d))
        .collect()
}

/// The period of a rule starting on `start` that a completion on
/// `completed_on` satisfies. Weekly rules run on a 7-day grid anchored on
/// `start`, so a mid-week completion lands on the grid week holding it. Other
/// frequencies ignore the anchor.
pub fn normalize_for_rule(frequency: Frequency, start: NaiveDate, completed_on: NaiveDate) -> Period {
    match frequency {
        Frequency::Weekly => {
            let weeks = (completed_on - start).num_days().div_euclid(7);
            Period::Week(start + Duration::days(weeks * 7))
        }
        _ => normalize(frequency, completed_on),
    }
}

pub fn normalize_all_for_rule<I>(frequency: Frequency, start: NaiveDate, dates: I) -> BTreeSet<Period>
where
    I: IntoIterator<Item = NaiveDate>,
{
    dates
        .into_iter()
        .map(|d| normalize_for_rule(frequency, start, d))
        .collect()
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
