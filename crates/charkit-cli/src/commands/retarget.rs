//! Retarget command: drive the compiled rig from a foreign performance.

use std::path::Path;
use std::process::ExitCode;

use anyhow::{Context, Result};
use charkit_rig::{retarget, RemapSession, RetargetSource, SourceKind, WidgetLibrary};
use charkit_spec::FaceRigConfig;
use colored::Colorize;

use crate::input;
use crate::reporting;

/// Wires the foreign source object into the rig's control nubs, with the
/// ARKit remap registered from the proxy rig when one is named.
pub fn run(
    doc_path: &Path,
    config_path: &Path,
    source_object: &str,
    kind: SourceKind,
    arkit_proxy: Option<&str>,
    output: Option<&Path>,
) -> Result<ExitCode> {
    let mut doc = input::load_document(doc_path)?;
    let text = std::fs::read_to_string(config_path)
        .with_context(|| format!("reading facerig config {}", config_path.display()))?;
    let config: FaceRigConfig = serde_json::from_str(&text)
        .with_context(|| format!("parsing facerig config {}", config_path.display()))?;
    let widgets = WidgetLibrary::load(input::document_dir(doc_path), &input::install_dir())?;

    let mut session = RemapSession::new();
    if let Some(proxy) = arkit_proxy {
        let armature = doc
            .object(proxy)?
            .as_armature()
            .with_context(|| format!("'{proxy}' is not an armature"))?
            .clone();
        session.register_from(&armature);
    }

    let source = RetargetSource {
        object: source_object.to_string(),
        kind,
    };
    let report = retarget(&mut doc, &config, &widgets, &source, &session)?;
    input::save_document(&doc, doc_path, output)?;
    reporting::warnings(&report.warnings);
    println!(
        "{} {} control(s) wired to '{}'",
        "Retargeted:".green().bold(),
        report.processed,
        source_object
    );
    Ok(ExitCode::SUCCESS)
}
