use crate::cmd::engine;
use crate::output::{print_json, print_table};
use anyhow::Context;
use qc_core::aggregate::OverdueItem;
use qc_core::store::YamlStore;
use std::path::Path;

pub fn run(
    root: &Path,
    critical_only: bool,
    machine: Option<&str>,
    today: Option<&str>,
    json: bool,
) -> anyhow::Result<()> {
    let engine = engine(root, today)?;
    let store = YamlStore::open(root).context("failed to open store")?;
    let summary = engine
        .aggregate_from(&store)
        .context("failed to build overdue report")?;

    if !critical_only && machine.is_none() {
        if json {
            print_json(&summary)?;
        } else {
            print_items(&summary.items);
            let s = summary.summary;
            println!(
                "\n{} overdue: {} critical, {} high, {} medium, {} low",
                summary.total, s.critical, s.high, s.medium, s.low
            );
        }
        return Ok(());
    }

    let items: Vec<OverdueItem> = match machine {
        Some(m) => summary
            .for_machine(m)
            .map(|g| g.items.clone())
            .unwrap_or_default(),
        None => summary.items,
    }
    .into_iter()
    .filter(|i| !critical_only || i.priority == qc_core::Priority::Critical)
    .collect();

    if json {
        print_json(&items)?;
    } else {
        print_items(&items);
    }
    Ok(())
}

fn print_items(items: &[OverdueItem]) {
    if items.is_empty() {
        println!("Nothing overdue.");
        return;
    }
    let rows = items
        .iter()
        .map(|i| {
            vec![
                i.machine_id.clone(),
                i.worksheet_id.clone(),
                i.frequency.to_string(),
                i.period.key(),
                i.days_overdue.to_string(),
                i.priority.to_string(),
            ]
        })
        .collect();
    print_table(
        &["MACHINE", "WORKSHEET", "FREQUENCY", "PERIOD", "DAYS", "PRIORITY"],
        rows,
    );
}
