//! Quickset command: batch blend/culling/refresh/rebuild operations.

use std::path::Path;
use std::process::ExitCode;

use anyhow::Result;
use charkit_material::{quickset, QuickSetMode};
use charkit_spec::{ImportType, MaterialParams, Prefs};

use crate::input;
use crate::reporting;

/// Applies one quick-set mode to the selected materials and saves.
#[allow(clippy::too_many_arguments)]
pub fn run(
    doc_path: &Path,
    mode: QuickSetMode,
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

    // An empty resolved selection falls through to "all" inside quickset.
    let names = match (selection.is_empty(), filter) {
        (true, None) => Vec::new(),
        _ => input::select_materials(&doc, selection, filter)?,
    };

    let report = quickset(&mut doc, mode, &names, &ctx, &library)?;
    input::save_document(&doc, doc_path, output)?;
    reporting::warnings(&report.warnings);
    reporting::summary("materials", report.processed, report.warnings.len());
    Ok(ExitCode::SUCCESS)
}
