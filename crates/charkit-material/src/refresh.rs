//! Live update: re-pushing parameter values into built graphs.
//!
//! Refresh never rewires anything. It walks the tagged nodes of a built
//! material and writes the current values from the same resolution table
//! the assembler seeded them from, so a slider change lands in every node
//! carrying that parameter without a rebuild.

use charkit_scene::{Document, NodeKind};
use charkit_spec::{MaterialParams, WarningCode};

use crate::error::MaterialError;
use crate::params::mixer_inputs;
use crate::report::BuildReport;

/// Pushes current parameter values into one material's tagged nodes.
pub fn refresh_material(
    doc: &mut Document,
    material_name: &str,
    params: &MaterialParams,
) -> Result<BuildReport, MaterialError> {
    let material = doc.material_mut(material_name)?;
    let mut report = BuildReport::new();

    let tagged: Vec<_> = material
        .tree
        .iter()
        .filter_map(|(id, n)| n.tag.clone().map(|t| (id, t, n.kind.clone())))
        .collect();

    for (id, tag, kind) in tagged {
        let inputs = mixer_inputs(params, tag.mixer, tag.role);
        match kind {
            // Value nodes carry a single scalar on their output socket.
            NodeKind::Value => {
                if let Some((_, value)) = inputs.first() {
                    let result = material.tree.set_output(id, "Value", *value);
                    report.absorb(result);
                }
            }
            NodeKind::Rgb => {
                if let Some((_, value)) = inputs.first() {
                    let result = material.tree.set_output(id, "Color", *value);
                    report.absorb(result);
                }
            }
            NodeKind::Group { .. } | NodeKind::Bump => {
                for (socket, value) in inputs {
                    let result = material.tree.set_input(id, socket, value);
                    report.absorb(result);
                }
            }
            other => {
                report.warn(
                    WarningCode::ContributionDropped,
                    format!(
                        "tagged node '{}' has unexpected kind {other:?}",
                        tag.param
                    ),
                );
            }
        }
        report.processed += 1;
    }

    Ok(report)
}

/// Refreshes every material in the document, merging the reports.
pub fn refresh_all(doc: &mut Document, params: &MaterialParams) -> BuildReport {
    let names: Vec<String> = doc.materials.iter().map(|m| m.name.clone()).collect();
    let mut report = BuildReport::new();
    for name in names {
        match refresh_material(doc, &name, params) {
            Ok(r) => report.merge(r),
            Err(e) => report.warn(WarningCode::ContributionDropped, e.to_string()),
        }
    }
    report
}
