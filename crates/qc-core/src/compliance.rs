//! Worksheet-level views: full compliance status of one assignment and the
//! list of obligations due right now.

use crate::config::ScheduleConfig;
use crate::generate::{current_period, generate_periods};
use crate::model::{Assignment, Completion};
use crate::normalize::{normalize_all_for_rule, normalize_for_rule};
use crate::period::Period;
use crate::scan::{scan_missed, MissedPeriod};
use crate::status::evaluate_status;
use crate::types::{Frequency, Priority};
use chrono::NaiveDate;
use serde::Serialize;

#[derive(Debug, Clone, Serialize)]
pub struct ComplianceStatus {
    pub machine_id: String,
    pub worksheet_id: String,
    pub frequency: Frequency,
    pub due_periods: Vec<Period>,
    pub missed_periods: Vec<MissedPeriod>,
    pub next_due: Period,
    pub is_overdue: bool,
    pub days_overdue: i64,
    pub is_due_this_period: bool,
    /// Share of started periods that have a completion, 0.0..=100.0, one
    /// decimal place.
    pub completion_rate: f64,
}

pub fn compliance_status(
    assignment: &Assignment,
    completions: &[Completion],
    today: NaiveDate,
    schedule: &ScheduleConfig,
) -> ComplianceStatus {
    let frequency = assignment.frequency;
    let mine: Vec<&Completion> = completions.iter().filter(|c| assignment.matches(c)).collect();
    let completed =
        normalize_all_for_rule(frequency, assignment.start_date, mine.iter().map(|c| c.date));
    let last_completed = mine.iter().map(|c| c.date).max();

    let due_periods = generate_periods(
        frequency,
        assignment.start_date,
        assignment.end_date,
        today,
        schedule,
    );
    let missed_periods = scan_missed(
        frequency,
        assignment.start_date,
        assignment.end_date,
        &completed,
        today,
        schedule,
    );
    let status = evaluate_status(frequency, assignment.start_date, last_completed, today);

    let started: Vec<&Period> = due_periods.iter().filter(|p| p.start() <= today).collect();
    let completion_rate = if started.is_empty() {
        100.0
    } else {
        let done = started.iter().filter(|p| completed.contains(p)).count();
        (done as f64 * 1000.0 / started.len() as f64).round() / 10.0
    };

    ComplianceStatus {
        machine_id: assignment.machine_id.clone(),
        worksheet_id: assignment.worksheet_id.clone(),
        frequency,
        due_periods,
        missed_periods,
        next_due: status.next_due,
        is_overdue: status.is_overdue,
        days_overdue: status.days_overdue,
        is_due_this_period: status.is_due_this_period,
        completion_rate,
    }
}

// ---------------------------------------------------------------------------
// Due now
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DueItem {
    pub machine_id: String,
    pub worksheet_id: String,
    pub frequency: Frequency,
    pub period: Period,
    pub priority: Priority,
}

/// Assignments whose current period holds `today` and has no completion
/// yet. Items are due, not late, so they carry `Priority::Medium`.
pub fn due_now(
    assignments: &[Assignment],
    completions: &[Completion],
    today: NaiveDate,
) -> Vec<DueItem> {
    assignments
        .iter()
        .filter(|a| a.is_active(today))
        .filter_map(|a| {
            let period = current_period(a.frequency, a.start_date, today)?;
            if !period.contains(today) {
                return None;
            }
            let satisfied = completions
                .iter()
                .filter(|c| a.matches(c))
                .any(|c| normalize_for_rule(a.frequency, a.start_date, c.date) == period);
            (!satisfied).then(|| DueItem {
                machine_id: a.machine_id.clone(),
                worksheet_id: a.worksheet_id.clone(),
                frequency: a.frequency,
                period,
                priority: Priority::Medium,
            })
        })
        .collect()
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
