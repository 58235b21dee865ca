use crate::types::{Frequency, Priority};
use serde::{Deserialize, Serialize};

/// Minimum days overdue for each escalation level of one frequency.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Thresholds {
    pub critical: i64,
    pub high: i64,
    pub medium: i64,
}

impl Thresholds {
    /// Daily QC is safety-critical and escalates within days; annual QC
    /// escalates over years.
    pub fn defaults_for(frequency: Frequency) -> Thresholds {
        let (critical, high, medium) = match frequency {
            Frequency::Daily => (5, 3, 1),
            Frequency::Weekly => (14, 7, 3),
            Frequency::Monthly => (90, 60, 30),
            Frequency::Quarterly => (270, 180, 90),
            Frequency::Annual => (1095, 730, 365),
        };
        Thresholds {
            critical,
            high,
            medium,
        }
    }

    /// Zero days overdue means "due now" and is always `Medium`. Counts below
    /// the medium threshold (and negative counts) fall through to `Low`; that
    /// branch is kept as-is, including where it looks unreachable.
    pub fn classify(&self, days_overdue: i64) -> Priority {
        if days_overdue == 0 {
            return Priority::Medium;
        }
        if days_overdue >= self.critical {
            Priority::Critical
        } else if days_overdue >= self.high {
            Priority::High
        } else if days_overdue >= self.medium {
            Priority::Medium
        } else {
            Priority::Low
        }
    }
}

/// `classifyPriority` with the built-in threshold table.
pub fn classify_priority(days_overdue: i64, frequency: Frequency) -> Priority {
    Thresholds::defaults_for(frequency).classify(days_overdue)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
