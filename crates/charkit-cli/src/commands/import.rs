//! Import command: texture scan plus a full material build.

use std::path::Path;
use std::process::ExitCode;

use anyhow::Result;
use charkit_material::{build_material, refresh_all, BuildReport};
use charkit_spec::{ImportType, MaterialParams, Prefs};
use colored::Colorize;

use crate::input;
use crate::reporting;

/// Runs the import: loads the scene document, scans the source-relative
/// texture directories, rebuilds every material, and saves.
pub fn run(
    doc_path: &Path,
    source_path: &Path,
    import_type: ImportType,
    params_path: Option<&Path>,
    prefs_path: Option<&Path>,
    output: Option<&Path>,
) -> Result<ExitCode> {
    let mut doc = input::load_document(doc_path)?;
    let params: MaterialParams = input::load_json_or_default(params_path, "material params")?;
    let prefs: Prefs = input::load_json_or_default(prefs_path, "prefs")?;
    let library = input::load_library(doc_path)?;
    let ctx = input::build_context(&doc, source_path, import_type, params, prefs);

    println!(
        "{} {} ({} textures indexed)",
        "Importing:".cyan().bold(),
        ctx.character.name,
        ctx.character.textures.len()
    );

    let names: Vec<String> = doc.materials.iter().map(|m| m.name.clone()).collect();
    let mut report = BuildReport::new();
    for name in &names {
        report.merge(build_material(&mut doc, name, &ctx, &library)?);
    }
    // Seed current parameter values everywhere before first save.
    report.merge(refresh_all(&mut doc, &ctx.params));

    input::save_document(&doc, doc_path, output)?;
    reporting::warnings(&report.warnings);
    reporting::summary("materials", names.len(), report.warnings.len());
    Ok(ExitCode::SUCCESS)
}
