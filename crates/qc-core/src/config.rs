use crate::error::{QcError, Result};
use crate::paths;
use crate::priority::Thresholds;
use crate::types::Frequency;
use chrono::{Duration, NaiveDate};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::Path;

// ---------------------------------------------------------------------------
// ConfigWarning / WarnLevel
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConfigWarning {
    pub level: WarnLevel,
    pub message: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WarnLevel {
    Warning,
    Error,
}

// ---------------------------------------------------------------------------
// ScheduleConfig
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScheduleConfig {
    /// Days past today that open-ended rules are expanded to, so near-future
    /// periods are visible before they are due.
    #[serde(default = "default_lookahead_days")]
    pub lookahead_days: i64,
    /// Upper bound on periods produced by a single expansion.
    #[serde(default = "default_max_periods")]
    pub max_periods: usize,
}

fn default_lookahead_days() -> i64 {
    30
}

fn default_max_periods() -> usize {
    1000
}

impl Default for ScheduleConfig {
    fn default() -> Self {
        Self {
            lookahead_days: default_lookahead_days(),
            max_periods: default_max_periods(),
        }
    }
}

impl ScheduleConfig {
    /// `today` plus the lookahead, clamped to the representable date range.
    pub fn default_end(&self, today: NaiveDate) -> NaiveDate {
        Duration::try_days(self.lookahead_days)
            .and_then(|lookahead| today.checked_add_signed(lookahead))
            .unwrap_or(if self.lookahead_days < 0 {
                NaiveDate::MIN
            } else {
                NaiveDate::MAX
            })
    }
}

// ---------------------------------------------------------------------------
// ThresholdConfig
// ---------------------------------------------------------------------------

/// Per-frequency overrides of the escalation table. Frequencies without an
/// entry use [`Thresholds::defaults_for`].
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ThresholdConfig {
    pub overrides: BTreeMap<Frequency, Thresholds>,
}

impl ThresholdConfig {
    pub fn for_frequency(&self, frequency: Frequency) -> Thresholds {
        self.overrides
            .get(&frequency)
            .copied()
            .unwrap_or_else(|| Thresholds::defaults_for(frequency))
    }

    pub fn is_empty(&self) -> bool {
        self.overrides.is_empty()
    }
}

// ---------------------------------------------------------------------------
// FacilityConfig
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FacilityConfig {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

// ---------------------------------------------------------------------------
// Config (top-level)
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    #[serde(default = "default_version")]
    pub version: u32,
    pub facility: FacilityConfig,
    #[serde(default)]
    pub schedule: ScheduleConfig,
    #[serde(default, skip_serializing_if = "ThresholdConfig::is_empty")]
    pub thresholds: ThresholdConfig,
}

fn default_version() -> u32 {
    1
}

impl Default for Config {
    fn default() -> Self {
        Self::new("QC")
    }
}

impl Config {
    pub fn new(facility_name: impl Into<String>) -> Self {
        Self {
            version: 1,
            facility: FacilityConfig {
                name: facility_name.into(),
                description: None,
            },
            schedule: ScheduleConfig::default(),
            thresholds: ThresholdConfig::default(),
        }
    }

    pub fn load(root: &Path) -> Result<Self> {
        let path = paths::config_path(root);
        if !path.exists() {
            return Err(QcError::NotInitialized);
        }
        let data = std::fs::read_to_string(&path)?;
        let cfg: Config = serde_yaml::from_str(&data)?;
        Ok(cfg)
    }

    pub fn save(&self, root: &Path) -> Result<()> {
        let path = paths::config_path(root);
        crate::io::write_yaml(&path, self)
    }

    // -----------------------------------------------------------------------
    // Validation
    // -----------------------------------------------------------------------

    pub fn validate(&self) -> Vec<ConfigWarning> {
        let mut warnings = Vec::new();

        if self.schedule.max_periods == 0 {
            warnings.push(ConfigWarning {
                level: WarnLevel::Error,
                message: "schedule.max_periods is 0: no period will ever be generated".to_string(),
            });
        }

        if self.schedule.lookahead_days < 0 {
            warnings.push(ConfigWarning {
                level: WarnLevel::Error,
                message: format!(
                    "schedule.lookahead_days={} is negative; current periods would be hidden",
                    self.schedule.lookahead_days
                ),
            });
        } else if self.schedule.lookahead_days > 366 {
            warnings.push(ConfigWarning {
                level: WarnLevel::Warning,
                message: format!(
                    "schedule.lookahead_days={} (>366 is unusual)",
                    self.schedule.lookahead_days
                ),
            });
        }

        for (frequency, t) in &self.thresholds.overrides {
            if !(t.medium <= t.high && t.high <= t.critical) {
                warnings.push(ConfigWarning {
                    level: WarnLevel::Error,
                    message: format!(
                        "thresholds.{frequency} must satisfy medium <= high <= critical \
                         (got medium={}, high={}, critical={})",
                        t.medium, t.high, t.critical
                    ),
                });
            }
            if t.medium < 1 {
                warnings.push(ConfigWarning {
                    level: WarnLevel::Warning,
                    message: format!(
                        "thresholds.{frequency}.medium={} is below 1 day",
                        t.medium
                    ),
                });
            }
        }

        warnings
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
