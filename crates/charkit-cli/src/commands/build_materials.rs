//! Build-materials command: rebuild a selection of material graphs.

use std::path::Path;
use std::process::ExitCode;

use anyhow::Result;
use charkit_material::{build_material, BuildReport};
use charkit_spec::{ImportType, MaterialParams, Prefs};

use crate::input;
use crate::reporting;

/// Rebuilds the selected materials (all of them when the selection and
/// filter are empty) and saves the document.
#[allow(clippy::too_many_arguments)]
pub fn run(
    doc_path: &Path,
    source_path: &Path,
    import_type: ImportType,
    params_path: Option<&Path>,
    prefs_path: Option<&Path>,
    selection: &[String],
    filter: Option<&str>,
    output: Option<&Path>,
) -> Result<ExitCode> {
    let mut doc = input::load_document(doc_path)?;
    let params: MaterialParams = input::load_json_or_default(params_path, "material params")?;
    let prefs: Prefs = input::load_json_or_default(prefs_path, "prefs")?;
    let library = input::load_library(doc_path)?;
    let ctx = input::build_context(&doc, source_path, import_type, params, prefs);

    let names = input::select_materials(&doc, selection, filter)?;
    let mut report = BuildReport::new();
    for name in &names {
        report.merge(build_material(&mut doc, name, &ctx, &library)?);
    }

    input::save_document(&doc, doc_path, output)?;
    reporting::warnings(&report.warnings);
    reporting::summary("materials", report.processed, report.warnings.len());
    Ok(ExitCode::SUCCESS)
}
