use crate::config::ScheduleConfig;
use crate::date;
use crate::normalize::normalize_for_rule;
use crate::period::Period;
use crate::types::Frequency;
use chrono::NaiveDate;

/// First period a rule starting on `start` owes. Daily rules starting on a
/// weekend begin the following Monday.
pub fn first_period(frequency: Frequency, start: NaiveDate) -> Period {
    match frequency {
        Frequency::Daily => Period::Day(date::on_or_after_weekday(start)),
        _ => Period::containing(frequency, start),
    }
}

/// The latest period of the rule that has started on or before `today`, or
/// `None` when the rule has not started yet.
///
/// Weekly periods are anchored on the rule's start date, so the current week
/// is the 7-day window starting `start + 7k` that holds `today`. On a weekend
/// the current daily period is the preceding Friday.
pub fn current_period(frequency: Frequency, start: NaiveDate, today: NaiveDate) -> Option<Period> {
    let first = first_period(frequency, start);
    let current = match frequency {
        Frequency::Daily => Period::Day(date::on_or_before_weekday(today)),
        Frequency::Weekly => normalize_for_rule(frequency, start, today),
        _ => Period::containing(frequency, today),
    };
    (current >= first).then_some(current)
}

/// Expand a rule into its ordered due periods, from the period holding
/// `start` through the last period that starts on or before `end`.
///
/// Output is capped at `max_periods`; hitting the cap truncates silently for
/// the caller and logs a warning.
pub fn periods_between(
    frequency: Frequency,
    start: NaiveDate,
    end: NaiveDate,
    max_periods: usize,
) -> Vec<Period> {
    let mut periods: Vec<Period> = Vec::new();
    let mut current = first_period(frequency, start);
    while current.start() <= end {
        if periods.len() >= max_periods {
            tracing::warn!(
                frequency = %frequency,
                start = %start,
                end = %end,
                max_periods,
                "period generation capped; remaining periods dropped"
            );
            break;
        }
        // Stepping always advances a whole period, so this only guards the
        // no-duplicates guarantee.
        if periods.last() != Some(&current) {
            periods.push(current);
        }
        current = current.next();
    }
    periods
}

/// The newest `max_periods` periods of [`periods_between`], walking back from
/// the period holding `end`. Long-running rules keep their recent periods
/// when the cap is hit; the oldest ones are dropped and a warning is logged.
pub fn recent_periods(
    frequency: Frequency,
    start: NaiveDate,
    end: NaiveDate,
    max_periods: usize,
) -> Vec<Period> {
    let first = first_period(frequency, start);
    let Some(mut current) = current_period(frequency, start, end) else {
        return Vec::new();
    };
    let mut periods: Vec<Period> = Vec::new();
    while periods.len() < max_periods {
        periods.push(current);
        if current <= first {
            break;
        }
        current = current.prev();
    }
    if periods.last().is_some_and(|oldest| *oldest > first) {
        tracing::warn!(
            frequency = %frequency,
            start = %start,
            end = %end,
            max_periods,
            "period scan capped; oldest periods dropped"
        );
    }
    periods.reverse();
    periods
}

/// `generatePeriods`: the rule's periods up to `end`, or up to today plus the
/// configured lookahead when the rule is open-ended.
pub fn generate_periods(
    frequency: Frequency,
    start: NaiveDate,
    end: Option<NaiveDate>,
    today: NaiveDate,
    schedule: &ScheduleConfig,
) -> Vec<Period> {
    let end = end.unwrap_or_else(|| schedule.default_end(today));
    periods_between(frequency, start, end, schedule.max_periods)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    fn d(s: &str) -> NaiveDate {
        date::parse_date(s).unwrap()
    }

    fn keys(periods: &[Period]) -> Vec<String> {
        periods.iter().map(Period::key).collect()
    }

    fn between(freq: Frequency, start: &str, end: &str) -> Vec<String> {
        keys(&periods_between(freq, d(start), d(end), 1000))
    }

    #[test]
    fn daily_skips_weekends() {
        assert_eq!(
            between(Frequency::Daily, "2024-01-01", "2024-01-07"),
            ["2024-01-01", "2024-01-02", "2024-01-03", "2024-01-04", "2024-01-05"]
        );
    }

    #[test]
    fn daily_starting_on_weekend_begins_monday() {
        assert_eq!(
            between(Frequency::Daily, "2024-01-06", "2024-01-09"),
            ["2024-01-08", "2024-01-09"]
        );
    }

    #[test]
    fn weekly_steps_seven_days() {
        assert_eq!(
            between(Frequency::Weekly, "2024-01-01", "2024-01-22"),
            ["2024-01-01", "2024-01-08", "2024-01-15", "2024-01-22"]
        );
    }

    #[test]
    fn weekly_does_not_filter_weekends() {
        assert_eq!(
            between(Frequency::Weekly, "2024-01-06", "2024-01-13"),
            ["2024-01-06", "2024-01-13"]
        );
    }

    #[test]
    fn monthly_one_entry_per_month() {
        assert_eq!(
            between(Frequency::Monthly, "2024-01-15", "2024-03-01"),
            ["2024-01", "2024-02", "2024-03"]
        );
    }

    #[test]
    fn monthly_from_month_end_does_not_skip_february() {
        assert_eq!(
            between(Frequency::Monthly, "2024-01-31", "2024-04-30"),
            ["2024-01", "2024-02", "2024-03", "2024-04"]
        );
    }

    #[test]
    fn quarterly_and_annual_labels() {
        assert_eq!(
            between(Frequency::Quarterly, "2023-11-20", "2024-05-10"),
            ["2023-Q4", "2024-Q1", "2024-Q2"]
        );
        assert_eq!(
            between(Frequency::Annual, "2022-06-01", "2024-01-01"),
            ["2022", "2023", "2024"]
        );
    }

    #[test]
    fn end_before_start_is_empty() {
        assert!(between(Frequency::Daily, "2024-02-01", "2024-01-01").is_empty());
        assert!(between(Frequency::Monthly, "2024-03-10", "2024-02-28").is_empty());
    }

    #[test]
    fn generation_is_capped() {
        let periods = periods_between(Frequency::Weekly, d("1990-01-01"), d("2024-01-01"), 1000);
        assert_eq!(periods.len(), 1000);
        assert_eq!(periods[0].key(), "1990-01-01");

        let few = periods_between(Frequency::Daily, d("2024-01-01"), d("2024-12-31"), 3);
        assert_eq!(keys(&few), ["2024-01-01", "2024-01-02", "2024-01-03"]);
    }

    #[test]
    fn generation_is_deterministic() {
        let schedule = ScheduleConfig::default();
        let a = generate_periods(Frequency::Daily, d("2024-01-01"), None, d("2024-01-10"), &schedule);
        let b = generate_periods(Frequency::Daily, d("2024-01-01"), None, d("2024-01-10"), &schedule);
        assert_eq!(a, b);
    }

    #[test]
    fn default_end_uses_lookahead() {
        let schedule = ScheduleConfig::default();
        let periods =
            generate_periods(Frequency::Weekly, d("2024-01-01"), None, d("2024-01-10"), &schedule);
        // today + 30 days = 2024-02-09
        assert_eq!(periods.last().unwrap().key(), "2024-02-05");
    }

    #[test]
    fn current_period_per_frequency() {
        let today = d("2024-01-13"); // Saturday
        assert_eq!(
            current_period(Frequency::Daily, d("2024-01-01"), today).unwrap().key(),
            "2024-01-12"
        );
        assert_eq!(
            current_period(Frequency::Weekly, d("2024-01-03"), today).unwrap().key(),
            "2024-01-10"
        );
        assert_eq!(
            current_period(Frequency::Monthly, d("2023-06-15"), today).unwrap().key(),
            "2024-01"
        );
        assert!(current_period(Frequency::Monthly, d("2024-02-01"), today).is_none());
        assert!(current_period(Frequency::Daily, d("2024-01-13"), today).is_none());
    }

    #[test]
    fn recent_periods_match_forward_expansion_under_the_cap() {
        for freq in Frequency::all() {
            let forward = periods_between(*freq, d("2023-12-30"), d("2024-09-17"), 1000);
            let backward = recent_periods(*freq, d("2023-12-30"), d("2024-09-17"), 1000);
            assert_eq!(forward, backward, "{freq}");
        }
        assert!(recent_periods(Frequency::Daily, d("2024-01-06"), d("2024-01-07"), 1000).is_empty());
    }

    #[test]
    fn recent_periods_keep_the_newest_when_capped() {
        let all = periods_between(Frequency::Weekly, d("2024-01-03"), d("2024-06-30"), 1000);
        let recent = recent_periods(Frequency::Weekly, d("2024-01-03"), d("2024-06-30"), 3);
        assert_eq!(recent, all[all.len() - 3..]);
        assert_eq!(recent.last().unwrap().key(), "2024-06-26");
    }

    #[test]
    fn huge_lookahead_is_capped_not_a_panic() {
        let schedule = ScheduleConfig {
            lookahead_days: 200_000_000,
            ..ScheduleConfig::default()
        };
        let periods =
            generate_periods(Frequency::Monthly, d("2024-01-01"), None, d("2024-01-10"), &schedule);
        assert_eq!(periods.len(), 1000);
        assert_eq!(periods[0].key(), "2024-01");
    }
}
