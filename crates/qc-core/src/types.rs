use serde::{Deserialize, Serialize};
use std::fmt;

// ---------------------------------------------------------------------------
// Frequency
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Frequency {
    Daily,
    Weekly,
    Monthly,
    Quarterly,
    Annual,
}

impl Frequency {
    pub fn all() -> &'static [Frequency] {
        &[
            Frequency::Daily,
            Frequency::Weekly,
            Frequency::Monthly,
            Frequency::Quarterly,
            Frequency::Annual,
        ]
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Frequency::Daily => "daily",
            Frequency::Weekly => "weekly",
            Frequency::Monthly => "monthly",
            Frequency::Quarterly => "quarterly",
            Frequency::Annual => "annual",
        }
    }

    /// Lenient lookup used at the data boundary, where an unrecognised
    /// frequency means "nothing is due" rather than an error.
    pub fn parse_lenient(s: &str) -> Option<Frequency> {
        s.trim().to_ascii_lowercase().parse().ok()
    }

    /// Nominal length of one period in days.
    ///
    /// Only used for the approximate overdue count of the status evaluator;
    /// monthly/quarterly/annual periods are deliberately counted as 30/90/365
    /// days regardless of the real calendar length.
    pub fn nominal_days(self) -> i64 {
        match self {
            Frequency::Daily => 1,
            Frequency::Weekly => 7,
            Frequency::Monthly => 30,
            Frequency::Quarterly => 90,
            Frequency::Annual => 365,
        }
    }

    /// True for frequencies whose periods are keyed by an exact calendar date.
    pub fn is_date_keyed(self) -> bool {
        matches!(self, Frequency::Daily | Frequency::Weekly)
    }
}

impl fmt::Display for Frequency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for Frequency {
    type Err = crate::error::QcError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "daily" => Ok(Frequency::Daily),
            "weekly" => Ok(Frequency::Weekly),
            "monthly" => Ok(Frequency::Monthly),
            "quarterly" => Ok(Frequency::Quarterly),
            "annual" | "annually" | "yearly" => Ok(Frequency::Annual),
            _ => Err(crate::error::QcError::UnknownFrequency(s.to_string())),
        }
    }
}

// ---------------------------------------------------------------------------
// Priority
// ---------------------------------------------------------------------------

/// Escalation level of an overdue period. Ordered by severity, so
/// `Priority::Low < Priority::Critical`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Priority {
    Low,
    Medium,
    High,
    Critical,
}

impl Priority {
    /// Most severe first, the order reports list them in.
    pub fn all() -> &'static [Priority] {
        &[
            Priority::Critical,
            Priority::High,
            Priority::Medium,
            Priority::Low,
        ]
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Priority::Low => "low",
            Priority::Medium => "medium",
            Priority::High => "high",
            Priority::Critical => "critical",
        }
    }
}

impl fmt::Display for Priority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
