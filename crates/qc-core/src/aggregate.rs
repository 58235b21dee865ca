use crate::config::{ScheduleConfig, ThresholdConfig};
use crate::model::{Assignment, Completion};
use crate::normalize::normalize_all_for_rule;
use crate::period::Period;
use crate::scan::scan_missed;
use crate::types::{Frequency, Priority};
use chrono::NaiveDate;
use serde::Serialize;

// ---------------------------------------------------------------------------
// Output types
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct OverdueItem {
    pub machine_id: String,
    pub frequency: Frequency,
    pub worksheet_id: String,
    pub period: Period,
    pub days_overdue: i64,
    pub priority: Priority,
}

/// Items sharing a key, in the order the key first appears in the sorted
/// item list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct OverdueGroup {
    pub key: String,
    pub items: Vec<OverdueItem>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct PrioritySummary {
    pub critical: usize,
    pub high: usize,
    pub medium: usize,
    pub low: usize,
}

impl PrioritySummary {
    pub fn count(&self, priority: Priority) -> usize {
        match priority {
            Priority::Critical => self.critical,
            Priority::High => self.high,
            Priority::Medium => self.medium,
            Priority::Low => self.low,
        }
    }

    fn bump(&mut self, priority: Priority) {
        match priority {
            Priority::Critical => self.critical += 1,
            Priority::High => self.high += 1,
            Priority::Medium => self.medium += 1,
            Priority::Low => self.low += 1,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct OverdueSummary {
    pub total: usize,
    pub items: Vec<OverdueItem>,
    pub by_machine: Vec<OverdueGroup>,
    pub by_frequency: Vec<OverdueGroup>,
    pub critical: Vec<OverdueItem>,
    pub summary: PrioritySummary,
}

impl OverdueSummary {
    pub fn for_machine(&self, machine_id: &str) -> Option<&OverdueGroup> {
        self.by_machine.iter().find(|g| g.key == machine_id)
    }
}

// ---------------------------------------------------------------------------
// Aggregation
// ---------------------------------------------------------------------------

/// Scan every assignment against its completions and roll the misses up into
/// a system-wide report, most overdue first.
pub fn aggregate(
    assignments: &[Assignment],
    completions: &[Completion],
    today: NaiveDate,
    schedule: &ScheduleConfig,
    thresholds: &ThresholdConfig,
) -> OverdueSummary {
    let mut items: Vec<OverdueItem> = Vec::new();

    for assignment in assignments {
        let completed = normalize_all_for_rule(
            assignment.frequency,
            assignment.start_date,
            completions
                .iter()
                .filter(|c| assignment.matches(c))
                .map(|c| c.date),
        );
        let missed = scan_missed(
            assignment.frequency,
            assignment.start_date,
            assignment.end_date,
            &completed,
            today,
            schedule,
        );
        tracing::debug!(
            machine = %assignment.machine_id,
            worksheet = %assignment.worksheet_id,
            frequency = %assignment.frequency,
            completed = completed.len(),
            missed = missed.len(),
            "scanned assignment"
        );

        let table = thresholds.for_frequency(assignment.frequency);
        items.extend(missed.into_iter().map(|m| OverdueItem {
            machine_id: assignment.machine_id.clone(),
            frequency: assignment.frequency,
            worksheet_id: assignment.worksheet_id.clone(),
            period: m.period,
            days_overdue: m.days_overdue,
            priority: table.classify(m.days_overdue),
        }));
    }

    // Stable: ties keep assignment order, then chronological order.
    items.sort_by(|a, b| b.days_overdue.cmp(&a.days_overdue));

    let mut summary = PrioritySummary::default();
    for item in &items {
        summary.bump(item.priority);
    }

    OverdueSummary {
        total: items.len(),
        by_machine: group_by(&items, |i| i.machine_id.clone()),
        by_frequency: group_by(&items, |i| i.frequency.to_string()),
        critical: items
            .iter()
            .filter(|i| i.priority == Priority::Critical)
            .cloned()
            .collect(),
        summary,
        items,
    }
}

fn group_by<F>(items: &[OverdueItem], key: F) -> Vec<OverdueGroup>
where
    F: Fn(&OverdueItem) -> String,
{
    let mut groups: Vec<OverdueGroup> = Vec::new();
    for item in items {
        let k = key(item);
        match groups.iter_mut().find(|g| g.key == k) {
            Some(group) => group.items.push(item.clone()),
            None => groups.push(OverdueGroup {
                key: k,
                items: vec![item.clone()],
            }),
        }
    }
    groups
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::date::parse_date;
    use crate::priority::Thresholds;

    fn d(s: &str) -> NaiveDate {
        parse_date(s).unwrap()
    }

    fn run(assignments: &[Assignment], completions: &[Completion], today: &str) -> OverdueSummary {
        aggregate(
            assignments,
            completions,
            d(today),
            &ScheduleConfig::default(),
            &ThresholdConfig::default(),
        )
    }

    #[test]
    fn daily_end_to_end() {
        let a = Assignment::new("CT-01", "daily-phantom", Frequency::Daily, d("2024-01-01")).unwrap();
        let report = run(&[a], &[], "2024-01-10");

        let keys: Vec<String> = report.items.iter().map(|i| i.period.key()).collect();
        assert_eq!(
            keys,
            [
                "2024-01-01", "2024-01-02", "2024-01-03", "2024-01-04", "2024-01-05",
                "2024-01-08", "2024-01-09"
            ]
        );
        assert_eq!(report.items[0].days_overdue, 9);
        assert_eq!(report.items[0].priority, Priority::Critical);
        assert_eq!(report.items[5].priority, Priority::Medium); // 2 days
        assert_eq!(report.items[6].priority, Priority::Medium); // 1 day
        assert_eq!(report.total, 7);
        assert_eq!(report.summary.critical, 5);
        assert_eq!(report.summary.high, 0);
        assert_eq!(report.summary.medium, 2);
        assert_eq!(report.critical.len(), 5);
    }

    #[test]
    fn items_sorted_most_overdue_first_across_assignments() {
        let daily = Assignment::new("CT-01", "ws-d", Frequency::Daily, d("2024-03-04")).unwrap();
        let monthly = Assignment::new("MR-02", "ws-m", Frequency::Monthly, d("2024-01-01")).unwrap();
        let report = run(&[daily, monthly], &[], "2024-03-06");

        let days: Vec<i64> = report.items.iter().map(|i| i.days_overdue).collect();
        assert_eq!(days, [35, 6, 2, 1]);
        assert_eq!(report.items[0].machine_id, "MR-02");
        assert_eq!(report.items[0].priority, Priority::Medium);

        let machines: Vec<&str> = report.by_machine.iter().map(|g| g.key.as_str()).collect();
        assert_eq!(machines, ["MR-02", "CT-01"]);
        assert_eq!(report.for_machine("CT-01").unwrap().items.len(), 2);

        let freqs: Vec<&str> = report.by_frequency.iter().map(|g| g.key.as_str()).collect();
        assert_eq!(freqs, ["monthly", "daily"]);
    }

    #[test]
    fn completions_satisfy_by_period_not_exact_date() {
        let a = Assignment::new("MR-02", "ws", Frequency::Quarterly, d("2023-01-01")).unwrap();
        let done = vec![
            Completion::for_assignment(&a, d("2023-02-17")),
            Completion::for_assignment(&a, d("2023-09-30")),
        ];
        let report = run(&[a], &done, "2024-01-15");
        let keys: Vec<String> = report.items.iter().map(|i| i.period.key()).collect();
        assert_eq!(keys, ["2023-Q2", "2023-Q4"]);
    }

    #[test]
    fn future_and_empty_inputs_produce_nothing() {
        let future = Assignment::new("XR-04", "ws", Frequency::Annual, d("2030-01-01")).unwrap();
        let report = run(&[future], &[], "2024-01-15");
        assert_eq!(report.total, 0);
        assert_eq!(run(&[], &[], "2024-01-15"), OverdueSummary::default());
    }

    #[test]
    fn threshold_overrides_change_priorities() {
        let a = Assignment::new("US-03", "ws", Frequency::Weekly, d("2024-01-01")).unwrap();
        let mut thresholds = ThresholdConfig::default();
        thresholds.overrides.insert(
            Frequency::Weekly,
            Thresholds {
                critical: 8,
                high: 4,
                medium: 1,
            },
        );
        let report = aggregate(&[a], &[], d("2024-01-10"), &ScheduleConfig::default(), &thresholds);
        assert_eq!(report.items.len(), 1);
        assert_eq!(report.items[0].days_overdue, 9);
        assert_eq!(report.items[0].priority, Priority::Critical);
    }

    #[test]
    fn summary_counts_match_items() {
        let a = Assignment::new("CT-01", "ws", Frequency::Daily, d("2023-10-02")).unwrap();
        let b = Assignment::new("CT-01", "ws-w", Frequency::Weekly, d("2023-10-02")).unwrap();
        let report = run(&[a, b], &[], "2024-01-10");
        let total: usize = Priority::all().iter().map(|p| report.summary.count(*p)).sum();
        assert_eq!(total, report.total);
        assert_eq!(report.by_machine.len(), 1);
        assert_eq!(report.by_machine[0].items.len(), report.total);
    }

    #[test]
    fn midweek_completion_satisfies_its_grid_week() {
        let a = Assignment::new("US-03", "ws", Frequency::Weekly, d("2024-01-01")).unwrap();
        let done = vec![Completion::for_assignment(&a, d("2024-01-03"))];
        let report = run(&[a], &done, "2024-01-16");
        let keys: Vec<String> = report.items.iter().map(|i| i.period.key()).collect();
        assert_eq!(keys, ["2024-01-08"]);
    }
}
