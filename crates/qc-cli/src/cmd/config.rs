use crate::output::{print_json, print_table};
use anyhow::Context;
use clap::Subcommand;
use qc_core::config::{Config, WarnLevel};
use qc_core::Frequency;
use std::collections::BTreeMap;
use std::path::Path;

// ---------------------------------------------------------------------------
// Subcommand types
// ---------------------------------------------------------------------------

#[derive(Subcommand)]
pub enum ConfigSubcommand {
    /// Show the effective configuration, including default thresholds
    Show,

    /// Validate the config for common mistakes
    Validate,
}

// ---------------------------------------------------------------------------
// Entry point
// ---------------------------------------------------------------------------

pub fn run(root: &Path, subcmd: ConfigSubcommand, json: bool) -> anyhow::Result<()> {
    match subcmd {
        ConfigSubcommand::Show => show(root, json),
        ConfigSubcommand::Validate => validate(root, json),
    }
}

// ---------------------------------------------------------------------------
// show
// ---------------------------------------------------------------------------

fn show(root: &Path, json: bool) -> anyhow::Result<()> {
    let config = Config::load(root).context("failed to load config")?;
    let effective: BTreeMap<Frequency, _> = Frequency::all()
        .iter()
        .map(|&f| (f, config.thresholds.for_frequency(f)))
        .collect();

    if json {
        let value = serde_json::json!({
            "config": config,
            "effective_thresholds": effective,
        });
        print_json(&value)?;
        return Ok(());
    }

    println!("Facility:       {}", config.facility.name);
    if let Some(desc) = &config.facility.description {
        println!("Description:    {desc}");
    }
    println!("Lookahead days: {}", config.schedule.lookahead_days);
    println!("Max periods:    {}", config.schedule.max_periods);
    println!();

    let rows = effective
        .iter()
        .map(|(f, t)| {
            let source = if config.thresholds.overrides.contains_key(f) {
                "config"
            } else {
                "default"
            };
            vec![
                f.to_string(),
                t.critical.to_string(),
                t.high.to_string(),
                t.medium.to_string(),
                source.to_string(),
            ]
        })
        .collect();
    print_table(&["FREQUENCY", "CRITICAL", "HIGH", "MEDIUM", "SOURCE"], rows);
    Ok(())
}

// ---------------------------------------------------------------------------
// validate
// ---------------------------------------------------------------------------

fn validate(root: &Path, json: bool) -> anyhow::Result<()> {
    let config = Config::load(root).context("failed to load config")?;
    let warnings = config.validate();

    if json {
        let value = serde_json::json!({
            "warnings": warnings,
        });
        print_json(&value)?;
    } else if warnings.is_empty() {
        println!("Config is valid. No warnings.");
    } else {
        for w in &warnings {
            let prefix = match w.level {
                WarnLevel::Warning => "warning",
                WarnLevel::Error => "error",
            };
            println!("[{prefix}] {}", w.message);
        }
    }

    if warnings.iter().any(|w| w.level == WarnLevel::Error) {
        anyhow::bail!("config validation found errors");
    }

    Ok(())
}
