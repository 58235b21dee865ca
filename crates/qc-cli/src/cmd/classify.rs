use crate::cmd::engine_or_default;
use crate::output::print_json;
use qc_core::Frequency;
use std::path::Path;

pub fn run(root: &Path, days: i64, frequency: &str, json: bool) -> anyhow::Result<()> {
    let frequency: Frequency = frequency.parse()?;
    let engine = engine_or_default(root, None)?;
    let priority = engine.classify_priority(days, frequency);

    if json {
        print_json(&serde_json::json!({
            "days_overdue": days,
            "frequency": frequency,
            "priority": priority,
        }))?;
    } else {
        println!("{priority}");
    }
    Ok(())
}
