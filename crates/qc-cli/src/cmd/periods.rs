use crate::cmd::engine_or_default;
use crate::output::{print_json, print_table};
use qc_core::date::{format_date, parse_date};
use qc_core::Frequency;
use std::path::Path;

pub fn run(
    root: &Path,
    frequency: &str,
    start: &str,
    end: Option<&str>,
    today: Option<&str>,
    json: bool,
) -> anyhow::Result<()> {
    let frequency: Frequency = frequency.parse()?;
    let start = parse_date(start)?;
    let end = end.map(parse_date).transpose()?;
    let engine = engine_or_default(root, today)?;
    let periods = engine.generate_periods(frequency, start, end);

    if json {
        print_json(&periods)?;
        return Ok(());
    }
    if periods.is_empty() {
        println!("No periods.");
        return Ok(());
    }

    let rows = periods
        .iter()
        .map(|p| {
            vec![
                p.key(),
                format_date(p.start()),
                format_date(p.window_end()),
                format_date(p.closing_boundary()),
            ]
        })
        .collect();
    print_table(&["PERIOD", "FROM", "TO", "CLOSES"], rows);
    Ok(())
}
