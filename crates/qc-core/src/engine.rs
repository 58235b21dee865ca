//! `ComplianceEngine`: the operations bundled with a clock and a config.
//!
//! Every method reads "today" exactly once. The `*_str` methods take the raw
//! strings that arrive at a data boundary: an unknown frequency name gives an
//! empty result, a malformed date gives `QcError::InvalidDate`.

use crate::aggregate::{self, OverdueSummary};
use crate::compliance::{self, ComplianceStatus, DueItem};
use crate::config::Config;
use crate::date::parse_date;
use crate::error::Result;
use crate::generate;
use crate::model::{Assignment, Completion};
use crate::normalize::normalize_all_for_rule;
use crate::period::Period;
use crate::scan::{self, MissedPeriod};
use crate::status::{self, StatusRecord};
use crate::store::{AssignmentRegistry, CompletionLog};
use crate::types::{Frequency, Priority};
use chrono::NaiveDate;
use std::collections::BTreeSet;

// ---------------------------------------------------------------------------
// Clock
// ---------------------------------------------------------------------------

pub trait Clock: Send + Sync {
    fn today(&self) -> NaiveDate;
}

/// Local calendar date of the host.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn today(&self) -> NaiveDate {
        chrono::Local::now().date_naive()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FixedClock(pub NaiveDate);

impl Clock for FixedClock {
    fn today(&self) -> NaiveDate {
        self.0
    }
}

// ---------------------------------------------------------------------------
// Engine
// ---------------------------------------------------------------------------

#[derive(Debug, Clone)]
pub struct ComplianceEngine<C: Clock = SystemClock> {
    clock: C,
    config: Config,
}

impl ComplianceEngine<SystemClock> {
    pub fn new(config: Config) -> Self {
        Self::with_clock(config, SystemClock)
    }
}

impl<C: Clock> ComplianceEngine<C> {
    pub fn with_clock(config: Config, clock: C) -> Self {
        Self { clock, config }
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn today(&self) -> NaiveDate {
        self.clock.today()
    }

    // -----------------------------------------------------------------------
    // Typed operations
    // -----------------------------------------------------------------------

    pub fn generate_periods(
        &self,
        frequency: Frequency,
        start: NaiveDate,
        end: Option<NaiveDate>,
    ) -> Vec<Period> {
        generate::generate_periods(frequency, start, end, self.today(), &self.config.schedule)
    }

    pub fn evaluate_status(
        &self,
        frequency: Frequency,
        start: NaiveDate,
        last_completed: Option<NaiveDate>,
    ) -> StatusRecord {
        status::evaluate_status(frequency, start, last_completed, self.today())
    }

    pub fn scan_missed(
        &self,
        frequency: Frequency,
        start: NaiveDate,
        end: Option<NaiveDate>,
        completed: &BTreeSet<Period>,
    ) -> Vec<MissedPeriod> {
        scan::scan_missed(
            frequency,
            start,
            end,
            completed,
            self.today(),
            &self.config.schedule,
        )
    }

    /// Classify with the configured threshold table for `frequency`.
    pub fn classify_priority(&self, days_overdue: i64, frequency: Frequency) -> Priority {
        self.config
            .thresholds
            .for_frequency(frequency)
            .classify(days_overdue)
    }

    pub fn aggregate(
        &self,
        assignments: &[Assignment],
        completions: &[Completion],
    ) -> OverdueSummary {
        aggregate::aggregate(
            assignments,
            completions,
            self.today(),
            &self.config.schedule,
            &self.config.thresholds,
        )
    }

    /// Aggregate straight from a store.
    pub fn aggregate_from<S>(&self, store: &S) -> Result<OverdueSummary>
    where
        S: AssignmentRegistry + CompletionLog,
    {
        let assignments = store.assignments()?;
        let completions = store.completions()?;
        Ok(self.aggregate(&assignments, &completions))
    }

    pub fn compliance_status(
        &self,
        assignment: &Assignment,
        completions: &[Completion],
    ) -> ComplianceStatus {
        compliance::compliance_status(
            assignment,
            completions,
            self.today(),
            &self.config.schedule,
        )
    }

    pub fn due_now(
        &self,
        assignments: &[Assignment],
        completions: &[Completion],
    ) -> Vec<DueItem> {
        compliance::due_now(assignments, completions, self.today())
    }

    // -----------------------------------------------------------------------
    // String boundary
    // -----------------------------------------------------------------------

    /// Canonical period keys for a rule given as strings.
    pub fn generate_periods_str(
        &self,
        frequency: &str,
        start: &str,
        end: Option<&str>,
    ) -> Result<Vec<String>> {
        let start = parse_date(start)?;
        let end = end.map(parse_date).transpose()?;
        let Some(frequency) = Frequency::parse_lenient(frequency) else {
            return Ok(Vec::new());
        };
        Ok(self
            .generate_periods(frequency, start, end)
            .iter()
            .map(Period::key)
            .collect())
    }

    pub fn evaluate_status_str(
        &self,
        frequency: &str,
        start: &str,
        last_completed: Option<&str>,
    ) -> Result<Option<StatusRecord>> {
        let start = parse_date(start)?;
        let last_completed = last_completed.map(parse_date).transpose()?;
        Ok(Frequency::parse_lenient(frequency)
            .map(|f| self.evaluate_status(f, start, last_completed)))
    }

    /// `completed` may hold canonical period keys or completion dates; both
    /// are reduced to the period they satisfy.
    pub fn scan_missed_str(
        &self,
        frequency: &str,
        start: &str,
        completed: &[String],
    ) -> Result<Vec<MissedPeriod>> {
        let start = parse_date(start)?;
        let Some(frequency) = Frequency::parse_lenient(frequency) else {
            return Ok(Vec::new());
        };
        let mut dates = Vec::new();
        for entry in completed {
            match Period::parse(frequency, entry) {
                Ok(period) => dates.push(period.start()),
                Err(_) => dates.push(parse_date(entry)?),
            }
        }
        let periods = normalize_all_for_rule(frequency, start, dates);
        Ok(self.scan_missed(frequency, start, None, &periods))
    }

    pub fn classify_priority_str(&self, days_overdue: i64, frequency: &str) -> Option<Priority> {
        Frequency::parse_lenient(frequency).map(|f| self.classify_priority(days_overdue, f))
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::QcError;
    use crate::priority::Thresholds;
    use crate::store::MemoryStore;

    fn engine(today: &str) -> ComplianceEngine<FixedClock> {
        ComplianceEngine::with_clock(Config::default(), FixedClock(parse_date(today).unwrap()))
    }

    #[test]
    fn engine_is_send_and_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<ComplianceEngine<FixedClock>>();
        assert_send_sync::<ComplianceEngine<SystemClock>>();
    }

    #[test]
    fn generate_periods_from_strings() {
        let e = engine("2024-01-10");
        assert_eq!(
            e.generate_periods_str("daily", "2024-01-01", Some("2024-01-07"))
                .unwrap(),
            ["2024-01-01", "2024-01-02", "2024-01-03", "2024-01-04", "2024-01-05"]
        );
        assert_eq!(
            e.generate_periods_str("monthly", "2024-01-15", Some("2024-03-01"))
                .unwrap(),
            ["2024-01", "2024-02", "2024-03"]
        );
    }

    #[test]
    fn open_ended_generation_uses_lookahead() {
        let e = engine("2024-01-10");
        let keys = e.generate_periods_str("weekly", "2024-01-01", None).unwrap();
        // Lookahead end is 2024-02-09.
        assert_eq!(keys.last().map(String::as_str), Some("2024-02-05"));
    }

    #[test]
    fn unknown_frequency_yields_empty() {
        let e = engine("2024-01-10");
        assert!(e
            .generate_periods_str("fortnightly", "2024-01-01", None)
            .unwrap()
            .is_empty());
        assert!(e
            .evaluate_status_str("fortnightly", "2024-01-01", None)
            .unwrap()
            .is_none());
        assert!(e
            .scan_missed_str("fortnightly", "2024-01-01", &[])
            .unwrap()
            .is_empty());
        assert_eq!(e.classify_priority_str(10, "fortnightly"), None);
    }

    #[test]
    fn malformed_dates_are_errors() {
        let e = engine("2024-01-10");
        assert!(matches!(
            e.generate_periods_str("daily", "Invalid Date", None),
            Err(QcError::InvalidDate(_))
        ));
        assert!(matches!(
            e.evaluate_status_str("daily", "2024-01-01", Some("01/05/2024")),
            Err(QcError::InvalidDate(_))
        ));
        assert!(matches!(
            e.scan_missed_str("monthly", "2024-01-01", &["garbage".to_string()]),
            Err(QcError::InvalidDate(_))
        ));
    }

    #[test]
    fn scan_accepts_keys_and_dates() {
        let e = engine("2024-05-15");
        let completed = vec!["2024-01".to_string(), "2024-03-09".to_string()];
        let missed = e.scan_missed_str("monthly", "2024-01-01", &completed).unwrap();
        let keys: Vec<String> = missed.iter().map(|m| m.period.key()).collect();
        assert_eq!(keys, ["2024-02", "2024-04"]);
    }

    #[test]
    fn status_from_strings() {
        let e = engine("2024-01-10");
        let status = e
            .evaluate_status_str("daily", "2024-01-01", Some("2024-01-03"))
            .unwrap()
            .unwrap();
        assert_eq!(status.next_due.key(), "2024-01-04");
        assert!(status.is_overdue);
        assert_eq!(status.days_overdue, 6);
    }

    #[test]
    fn classify_uses_configured_thresholds() {
        let mut config = Config::default();
        config.thresholds.overrides.insert(
            Frequency::Monthly,
            Thresholds {
                critical: 10,
                high: 5,
                medium: 2,
            },
        );
        let e = ComplianceEngine::with_clock(config, FixedClock(parse_date("2024-01-10").unwrap()));
        assert_eq!(e.classify_priority(10, Frequency::Monthly), Priority::Critical);
        assert_eq!(e.classify_priority_str(1, "monthly"), Some(Priority::Low));
        assert_eq!(e.classify_priority(5, Frequency::Daily), Priority::Critical);
    }

    #[test]
    fn aggregate_from_store() {
        let e = engine("2024-01-10");
        let a = Assignment::new("CT-01", "ws", Frequency::Daily, parse_date("2024-01-01").unwrap())
            .unwrap();
        let done = Completion::for_assignment(&a, parse_date("2024-01-09").unwrap());
        let store = MemoryStore::new(vec![a], vec![done]);
        let report = e.aggregate_from(&store).unwrap();
        assert_eq!(report.total, 6);
        assert_eq!(report.items.last().unwrap().period.key(), "2024-01-08");
    }
}
