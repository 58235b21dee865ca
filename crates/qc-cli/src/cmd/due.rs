use crate::cmd::engine;
use crate::output::{print_json, print_table};
use anyhow::Context;
use qc_core::date::format_date;
use qc_core::store::{AssignmentRegistry, CompletionLog, YamlStore};
use std::path::Path;

pub fn run(root: &Path, today: Option<&str>, json: bool) -> anyhow::Result<()> {
    let engine = engine(root, today)?;
    let store = YamlStore::open(root).context("failed to open store")?;
    let due = engine.due_now(&store.assignments()?, &store.completions()?);

    if json {
        print_json(&due)?;
        return Ok(());
    }
    if due.is_empty() {
        println!("Nothing due on {}.", format_date(engine.today()));
        return Ok(());
    }

    let rows = due
        .iter()
        .map(|i| {
            vec![
                i.machine_id.clone(),
                i.worksheet_id.clone(),
                i.frequency.to_string(),
                i.period.key(),
                format_date(i.period.window_end()),
            ]
        })
        .collect();
    print_table(&["MACHINE", "WORKSHEET", "FREQUENCY", "PERIOD", "DUE BY"], rows);
    Ok(())
}
