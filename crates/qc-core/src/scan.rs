use crate::config::ScheduleConfig;
use crate::generate::recent_periods;
use crate::period::Period;
use crate::types::Frequency;
use chrono::NaiveDate;
use serde::Serialize;
use std::collections::BTreeSet;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MissedPeriod {
    pub period: Period,
    pub days_overdue: i64,
}

/// Every closed period of the rule without a matching completion, oldest
/// first.
///
/// The period holding `today` is never reported, and neither is anything past
/// the rule's `end`. `days_overdue` is measured from the period's closing
/// boundary (the scheduled date for daily and weekly rules, the last calendar
/// day otherwise) and is always at least 1.
///
/// Only the newest `schedule.max_periods` periods are examined.
pub fn scan_missed(
    frequency: Frequency,
    start: NaiveDate,
    end: Option<NaiveDate>,
    completed: &BTreeSet<Period>,
    today: NaiveDate,
    schedule: &ScheduleConfig,
) -> Vec<MissedPeriod> {
    let until = end.map_or(today, |end| end.min(today));
    recent_periods(frequency, start, until, schedule.max_periods)
        .into_iter()
        .filter(|p| p.is_closed(today) && !completed.contains(p))
        .filter_map(|period| {
            let days_overdue = (today - period.closing_boundary()).num_days();
            (days_overdue > 0).then_some(MissedPeriod {
                period,
                days_overdue,
            })
        })
        .collect()
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
