pub mod assign;
pub mod classify;
pub mod complete;
pub mod config;
pub mod due;
pub mod init;
pub mod missed;
pub mod overdue;
pub mod periods;
pub mod status;

use anyhow::Context;
use chrono::NaiveDate;
use qc_core::config::Config;
use qc_core::date::parse_date;
use qc_core::engine::{Clock, ComplianceEngine, FixedClock, SystemClock};
use qc_core::QcError;
use std::path::Path;

/// The evaluation date: `--today` / `QC_TODAY` when given, else the system
/// date. Read once per invocation.
pub fn resolve_today(today: Option<&str>) -> anyhow::Result<NaiveDate> {
    match today {
        Some(s) => parse_date(s).context("invalid --today"),
        None => Ok(SystemClock.today()),
    }
}

/// Engine over the facility config. Fails when `qc init` has not run.
pub fn engine(root: &Path, today: Option<&str>) -> anyhow::Result<ComplianceEngine<FixedClock>> {
    let config = Config::load(root).context("failed to load config")?;
    Ok(ComplianceEngine::with_clock(
        config,
        FixedClock(resolve_today(today)?),
    ))
}

/// Engine for commands that also work outside an initialized facility.
pub fn engine_or_default(
    root: &Path,
    today: Option<&str>,
) -> anyhow::Result<ComplianceEngine<FixedClock>> {
    let config = match Config::load(root) {
        Ok(config) => config,
        Err(QcError::NotInitialized) => {
            tracing::debug!("no config found, using defaults");
            Config::default()
        }
        Err(e) => return Err(e).context("failed to load config"),
    };
    Ok(ComplianceEngine::with_clock(
        config,
        FixedClock(resolve_today(today)?),
    ))
}
