use anyhow::Context;
use qc_core::{config::Config, paths, store::YamlStore};
use std::path::Path;

pub fn run(root: &Path, name: Option<&str>) -> anyhow::Result<()> {
    let facility_name = name.map(str::to_string).unwrap_or_else(|| {
        root.file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| "facility".to_string())
    });

    println!("Initializing QC in: {}", root.display());

    let config_path = paths::config_path(root);
    if !config_path.exists() {
        Config::new(&facility_name)
            .save(root)
            .context("failed to write config.yaml")?;
        println!("  created: {}", paths::CONFIG_FILE);
    } else {
        println!("  exists:  {}", paths::CONFIG_FILE);
    }

    for (file, path) in [
        (paths::ASSIGNMENTS_FILE, paths::assignments_path(root)),
        (paths::COMPLETIONS_FILE, paths::completions_path(root)),
    ] {
        if path.exists() {
            println!("  exists:  {file}");
        } else {
            println!("  created: {file}");
        }
    }
    YamlStore::init(root).context("failed to create stores")?;

    println!("\nQC initialized. Next: qc assign add <machine> <worksheet> --frequency daily --start <date>");
    Ok(())
}
