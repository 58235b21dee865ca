use crate::output::{or_dash, print_json, print_table};
use anyhow::Context;
use clap::Subcommand;
use qc_core::date::{format_date, parse_date};
use qc_core::store::{AssignmentRegistry, YamlStore};
use qc_core::{Assignment, Frequency};
use std::path::Path;

#[derive(Subcommand)]
pub enum AssignSubcommand {
    /// Assign a recurring worksheet to a machine
    Add {
        machine: String,
        worksheet: String,
        /// daily, weekly, monthly, quarterly, or annual
        #[arg(long)]
        frequency: String,
        /// First date the worksheet is owed (YYYY-MM-DD)
        #[arg(long)]
        start: String,
        /// Last date the worksheet is owed
        #[arg(long)]
        end: Option<String>,
    },
    /// List assignments
    List {
        /// Only assignments for this machine
        #[arg(long)]
        machine: Option<String>,
    },
    /// Remove an assignment
    Remove { machine: String, worksheet: String },
    /// Terminate an assignment's recurrence
    End {
        machine: String,
        worksheet: String,
        #[arg(long)]
        end: String,
    },
}

pub fn run(root: &Path, subcmd: AssignSubcommand, json: bool) -> anyhow::Result<()> {
    let store = YamlStore::open(root).context("failed to open store")?;
    match subcmd {
        AssignSubcommand::Add {
            machine,
            worksheet,
            frequency,
            start,
            end,
        } => add(&store, &machine, &worksheet, &frequency, &start, end.as_deref(), json),
        AssignSubcommand::List { machine } => list(&store, machine.as_deref(), json),
        AssignSubcommand::Remove { machine, worksheet } => {
            remove(&store, &machine, &worksheet, json)
        }
        AssignSubcommand::End {
            machine,
            worksheet,
            end,
        } => end_assignment(&store, &machine, &worksheet, &end, json),
    }
}

fn add(
    store: &YamlStore,
    machine: &str,
    worksheet: &str,
    frequency: &str,
    start: &str,
    end: Option<&str>,
    json: bool,
) -> anyhow::Result<()> {
    let frequency: Frequency = frequency.parse()?;
    let mut assignment = Assignment::new(machine, worksheet, frequency, parse_date(start)?)?;
    if let Some(end) = end {
        assignment.set_end(Some(parse_date(end)?))?;
    }
    store
        .add_assignment(assignment.clone())
        .context("failed to add assignment")?;

    if json {
        print_json(&assignment)?;
    } else {
        println!(
            "Assigned {frequency} worksheet '{worksheet}' to {machine} from {}",
            format_date(assignment.start_date)
        );
    }
    Ok(())
}

fn list(store: &YamlStore, machine: Option<&str>, json: bool) -> anyhow::Result<()> {
    let assignments: Vec<Assignment> = store
        .assignments()?
        .into_iter()
        .filter(|a| machine.map_or(true, |m| a.machine_id == m))
        .collect();

    if json {
        print_json(&assignments)?;
        return Ok(());
    }
    if assignments.is_empty() {
        println!("No assignments.");
        return Ok(());
    }

    let rows = assignments
        .iter()
        .map(|a| {
            vec![
                a.machine_id.clone(),
                a.worksheet_id.clone(),
                a.frequency.to_string(),
                format_date(a.start_date),
                or_dash(a.end_date.map(format_date)),
            ]
        })
        .collect();
    print_table(&["MACHINE", "WORKSHEET", "FREQUENCY", "START", "END"], rows);
    Ok(())
}

fn remove(store: &YamlStore, machine: &str, worksheet: &str, json: bool) -> anyhow::Result<()> {
    let removed = store
        .remove_assignment(machine, worksheet)
        .context("failed to remove assignment")?;

    if json {
        print_json(&removed)?;
    } else {
        println!("Removed assignment {machine}/{worksheet}");
    }
    Ok(())
}

fn end_assignment(
    store: &YamlStore,
    machine: &str,
    worksheet: &str,
    end: &str,
    json: bool,
) -> anyhow::Result<()> {
    let mut assignment = store.find(machine, worksheet)?;
    assignment.set_end(Some(parse_date(end)?))?;
    store
        .update_assignment(assignment.clone())
        .context("failed to update assignment")?;

    if json {
        print_json(&assignment)?;
    } else {
        println!("Assignment {machine}/{worksheet} ends {end}");
    }
    Ok(())
}
