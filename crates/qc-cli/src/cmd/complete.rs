use crate::cmd::resolve_today;
use crate::output::print_json;
use anyhow::Context;
use qc_core::date::{format_date, parse_date};
use qc_core::normalize::normalize_for_rule;
use qc_core::store::{AssignmentRegistry, CompletionLog, YamlStore};
use qc_core::Completion;
use std::path::Path;

pub fn run(
    root: &Path,
    machine: &str,
    worksheet: &str,
    date: Option<&str>,
    by: Option<&str>,
    today: Option<&str>,
    json: bool,
) -> anyhow::Result<()> {
    let mut store = YamlStore::open(root).context("failed to open store")?;
    let assignment = store.find(machine, worksheet)?;

    let date = match date {
        Some(d) => parse_date(d)?,
        None => resolve_today(today)?,
    };
    if date < assignment.start_date {
        tracing::warn!(
            machine,
            worksheet,
            date = %format_date(date),
            start = %format_date(assignment.start_date),
            "completion predates the assignment start"
        );
    }

    let mut completion = Completion::for_assignment(&assignment, date);
    if let Some(who) = by {
        completion = completion.performed_by(who);
    }
    let period = normalize_for_rule(assignment.frequency, assignment.start_date, date);
    store
        .append(completion.clone())
        .context("failed to record completion")?;

    if json {
        print_json(&serde_json::json!({
            "completion": completion,
            "period": period,
        }))?;
    } else {
        println!(
            "Recorded {machine}/{worksheet} on {} (period {period})",
            format_date(date)
        );
    }
    Ok(())
}
