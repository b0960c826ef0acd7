//! Import-motion command: parse, shape and resample a capture CSV.

use std::path::{Path, PathBuf};
use std::process::ExitCode;

use anyhow::{Context, Result};
use charkit_rig::motion::{load_csv, process, ImportOptions};
use colored::Colorize;

/// Processes the clip and writes it as JSON next to the input (or to the
/// explicit output path).
pub fn run(
    input: &Path,
    output: Option<&Path>,
    filter: f64,
    variance: f64,
    seed: u64,
    exclude: &[String],
) -> Result<ExitCode> {
    let clip = load_csv(input).with_context(|| format!("loading {}", input.display()))?;
    let options = ImportOptions {
        filter,
        variance,
        seed,
        exclude: exclude.to_vec(),
    };
    let processed = process(&clip, &options);

    let target: PathBuf = match output {
        Some(path) => path.to_path_buf(),
        None => input.with_extension("json"),
    };
    let json = serde_json::to_string_pretty(&processed)?;
    std::fs::write(&target, json).with_context(|| format!("writing {}", target.display()))?;

    println!(
        "{} {} channel(s), {} frame(s) at {} fps -> {}",
        "Imported:".green().bold(),
        processed.channels.len(),
        processed.times.len(),
        processed.fps,
        target.display()
    );
    Ok(ExitCode::SUCCESS)
}
