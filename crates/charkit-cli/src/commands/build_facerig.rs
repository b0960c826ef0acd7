//! Build-facerig command: compile the facial-control config into bones
//! and drivers.

use std::path::Path;
use std::process::ExitCode;

use anyhow::{Context, Result};
use charkit_rig::{compile_facerig, WidgetLibrary};
use charkit_spec::FaceRigConfig;
use colored::Colorize;

use crate::input;
use crate::reporting;

/// Validates the config against the widget template, compiles the rig,
/// and saves the document. Validation errors fail the command; build
/// misses only warn.
pub fn run(doc_path: &Path, config_path: &Path, output: Option<&Path>) -> Result<ExitCode> {
    let mut doc = input::load_document(doc_path)?;
    let text = std::fs::read_to_string(config_path)
        .with_context(|| format!("reading facerig config {}", config_path.display()))?;
    let config: FaceRigConfig = serde_json::from_str(&text)
        .with_context(|| format!("parsing facerig config {}", config_path.display()))?;
    let widgets = WidgetLibrary::load(input::document_dir(doc_path), &input::install_dir())?;

    let validation = config.validate(widgets.template_vertex_count());
    reporting::warnings(&validation.warnings);
    if !validation.is_ok() {
        reporting::errors(&validation.errors);
        eprintln!(
            "{} config has {} error(s)",
            "invalid:".red().bold(),
            validation.errors.len()
        );
        return Ok(ExitCode::from(1));
    }

    let report = compile_facerig(&mut doc, &config, &widgets)?;
    input::save_document(&doc, doc_path, output)?;
    reporting::warnings(&report.warnings);
    println!(
        "{} {} control(s), {} driver(s)",
        "Compiled:".green().bold(),
        report.processed,
        report.drivers
    );
    Ok(ExitCode::SUCCESS)
}
