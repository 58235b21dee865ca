use crate::cmd::engine;
use crate::output::print_json;
use anyhow::Context;
use qc_core::store::{AssignmentRegistry, CompletionLog, YamlStore};
use std::path::Path;

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
    let completions = store.completions()?;
    let status = engine.compliance_status(&assignment, &completions);

    if json {
        print_json(&status)?;
        return Ok(());
    }

    println!("{machine}/{worksheet} ({})", status.frequency);
    println!("  next due:        {}", status.next_due);
    if status.is_overdue {
        println!("  overdue:         yes, {} days", status.days_overdue);
    } else {
        println!("  overdue:         no");
    }
    println!(
        "  due this period: {}",
        if status.is_due_this_period { "yes" } else { "no" }
    );
    println!("  missed periods:  {}", status.missed_periods.len());
    println!("  completion rate: {:.1}%", status.completion_rate);
    Ok(())
}
