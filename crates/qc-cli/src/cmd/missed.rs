use crate::cmd::engine;
use crate::output::{print_json, print_table};
use anyhow::Context;
use qc_core::normalize::normalize_all_for_rule;
use qc_core::store::{AssignmentRegistry, CompletionLog, YamlStore};
use qc_core::{Period, Priority};
use serde::Serialize;
use std::path::Path;

#[derive(Serialize)]
struct MissedRow {
    period: Period,
    days_overdue: i64,
    priority: Priority,
}

pub fn run(
    root: &Path,
    machine: &str,
    worksheet: &str,
    today: Option<&str>,
    json: bool,
) -> anyhow::Result<()> {
    let engine = engine(root, today)?;
    let store = YamlStore::open(root).context("failed to open store")?;
    let assignment = store.find(machine, worksheet)?;

    let completed = normalize_all_for_rule(
        assignment.frequency,
        assignment.start_date,
        store
            .completions()?
            .iter()
            .filter(|c| assignment.matches(c))
            .map(|c| c.date),
    );
    let rows: Vec<MissedRow> = engine
        .scan_missed(
            assignment.frequency,
            assignment.start_date,
            assignment.end_date,
            &completed,
        )
        .into_iter()
        .map(|m| MissedRow {
            priority: engine.classify_priority(m.days_overdue, assignment.frequency),
            period: m.period,
            days_overdue: m.days_overdue,
        })
        .collect();

    if json {
        print_json(&rows)?;
        return Ok(());
    }
    if rows.is_empty() {
        println!("No missed periods for {machine}/{worksheet}.");
        return Ok(());
    }

    let table = rows
        .iter()
        .map(|r| {
            vec![
                r.period.key(),
                r.days_overdue.to_string(),
                r.priority.to_string(),
            ]
        })
        .collect();
    print_table(&["PERIOD", "DAYS", "PRIORITY"], table);
    Ok(())
}
