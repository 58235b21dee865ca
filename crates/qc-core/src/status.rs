use crate::generate::{current_period, first_period};
use crate::normalize::normalize_for_rule;
use crate::period::Period;
use crate::types::Frequency;
use chrono::NaiveDate;
use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StatusRecord {
    pub next_due: Period,
    pub is_overdue: bool,
    pub days_overdue: i64,
    pub is_due_this_period: bool,
}

/// Work out the single next-due period of a rule.
///
/// With a last completion, the period after the one it satisfies is due (the
/// next weekday for daily rules, the next grid week for weekly ones). Without one, the current period is due, or the rule's
/// first period if it has not started yet.
///
/// `days_overdue` is exact for daily and weekly rules. For monthly and longer
/// rules it is the number of elapsed periods times 30, 90 or 365 days. That
/// count is a severity heuristic, not a calendar-exact day count, and callers
/// rely on it staying that way.
pub fn evaluate_status(
    frequency: Frequency,
    start: NaiveDate,
    last_completed: Option<NaiveDate>,
    today: NaiveDate,
) -> StatusRecord {
    let first = first_period(frequency, start);
    let next_due = match last_completed {
        Some(done) => normalize_for_rule(frequency, start, done).next().max(first),
        None => current_period(frequency, start, today).unwrap_or(first),
    };

    let is_overdue = next_due.is_closed(today);
    let days_overdue = if !is_overdue {
        0
    } else if frequency.is_date_keyed() {
        (today - next_due.closing_boundary()).num_days()
    } else {
        let now = Period::containing(frequency, today);
        next_due.periods_until(&now) * frequency.nominal_days()
    };

    StatusRecord {
        next_due,
        is_overdue,
        days_overdue,
        is_due_this_period: next_due.contains(today),
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
