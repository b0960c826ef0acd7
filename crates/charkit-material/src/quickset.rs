//! Quick-set batch operations over materials.
//!
//! These are the blunt instruments: force a blend mode, flip culling,
//! re-push parameters, or rebuild outright, across a selection of
//! materials (an empty selection means all of them).

use charkit_scene::Document;
use charkit_spec::WarningCode;
use serde::{Deserialize, Serialize};

use crate::alpha::{apply_alpha_policy, AlphaPolicy};
use crate::assembler::build_material;
use crate::context::BuildContext;
use crate::error::MaterialError;
use crate::library::NodeGroupLibrary;
use crate::refresh::refresh_material;
use crate::report::BuildReport;

/// A batch operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum QuickSetMode {
    /// Force opaque blending.
    Opaque,
    /// Force sorted alpha blending.
    Blend,
    /// Force hashed blending.
    Hashed,
    /// Enable backface culling.
    SingleSided,
    /// Disable backface culling.
    DoubleSided,
    /// Re-push parameters into the selection.
    UpdateSelected,
    /// Re-push parameters into every material.
    UpdateAll,
    /// Rebuild the selection from scratch.
    Reset,
}

/// Applies a quick-set operation.
pub fn quickset(
    doc: &mut Document,
    mode: QuickSetMode,
    selection: &[String],
    ctx: &BuildContext,
    library: &NodeGroupLibrary,
) -> Result<BuildReport, MaterialError> {
    let names: Vec<String> = if selection.is_empty() || mode == QuickSetMode::UpdateAll {
        doc.materials.iter().map(|m| m.name.clone()).collect()
    } else {
        selection.to_vec()
    };

    let mut report = BuildReport::new();
    for name in &names {
        match mode {
            QuickSetMode::Opaque => {
                set_policy(doc, name, AlphaPolicy::Opaque, &mut report);
            }
            QuickSetMode::Blend => {
                set_policy(doc, name, AlphaPolicy::Blend, &mut report);
            }
            QuickSetMode::Hashed => {
                set_policy(doc, name, AlphaPolicy::Hashed, &mut report);
            }
            QuickSetMode::SingleSided => {
                set_culling(doc, name, true, &mut report);
            }
            QuickSetMode::DoubleSided => {
                set_culling(doc, name, false, &mut report);
            }
            QuickSetMode::UpdateSelected | QuickSetMode::UpdateAll => {
                match refresh_material(doc, name, &ctx.params) {
                    Ok(r) => report.merge(r),
                    Err(e) => report.warn(WarningCode::ContributionDropped, e.to_string()),
                }
            }
            QuickSetMode::Reset => {
                // A missing library asset must still abort here.
                let r = build_material(doc, name, ctx, library)?;
                report.merge(r);
            }
        }
    }
    Ok(report)
}

fn set_policy(doc: &mut Document, name: &str, policy: AlphaPolicy, report: &mut BuildReport) {
    match doc.material_mut(name) {
        Ok(material) => {
            apply_alpha_policy(material, policy);
            report.processed += 1;
        }
        Err(e) => report.warn(WarningCode::ContributionDropped, e.to_string()),
    }
}

fn set_culling(doc: &mut Document, name: &str, cull: bool, report: &mut BuildReport) {
    match doc.material_mut(name) {
        Ok(material) => {
            material.use_backface_culling = cull;
            report.processed += 1;
        }
        Err(e) => report.warn(WarningCode::ContributionDropped, e.to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::assembler::tests::{test_context, test_library};
    use charkit_scene::{BlendMethod, Material, MeshData, Object, ShadowMethod};

    fn doc_with(names: &[&str]) -> Document {
        let mut doc = Document::new();
        for (i, name) in names.iter().enumerate() {
            doc.materials.push(Material::new(*name));
            doc.objects.push(Object::mesh(
                format!("Obj{i}"),
                MeshData {
                    data_name: format!("Obj{i}_mesh"),
                    material_slots: vec![i],
                    shape_keys: Vec::new(),
                },
            ));
        }
        doc
    }

    #[test]
    fn empty_selection_means_all() {
        let mut doc = doc_with(&["A", "B"]);
        let report = quickset(
            &mut doc,
            QuickSetMode::Hashed,
            &[],
            &test_context(),
            &test_library(),
        )
        .unwrap();
        assert_eq!(report.processed, 2);
        assert!(doc
            .materials
            .iter()
            .all(|m| m.blend_method == BlendMethod::Hashed));
    }

    #[test]
    fn selection_scopes_the_operation() {
        let mut doc = doc_with(&["A", "B"]);
        quickset(
            &mut doc,
            QuickSetMode::Blend,
            &["B".to_string()],
            &test_context(),
            &test_library(),
        )
        .unwrap();
        assert_eq!(doc.material("A").unwrap().blend_method, BlendMethod::Opaque);
        let b = doc.material("B").unwrap();
        assert_eq!(b.blend_method, BlendMethod::Blend);
        assert_eq!(b.shadow_method, ShadowMethod::Clip);
        assert!(b.use_backface_culling);
    }

    #[test]
    fn sidedness_toggles_only_culling() {
        let mut doc = doc_with(&["A"]);
        quickset(
            &mut doc,
            QuickSetMode::SingleSided,
            &[],
            &test_context(),
            &test_library(),
        )
        .unwrap();
        assert!(doc.material("A").unwrap().use_backface_culling);
        assert_eq!(doc.material("A").unwrap().blend_method, BlendMethod::Opaque);

        quickset(
            &mut doc,
            QuickSetMode::DoubleSided,
            &[],
            &test_context(),
            &test_library(),
        )
        .unwrap();
        assert!(!doc.material("A").unwrap().use_backface_culling);
    }

    #[test]
    fn unknown_selection_entry_warns() {
        let mut doc = doc_with(&["A"]);
        let report = quickset(
            &mut doc,
            QuickSetMode::Opaque,
            &["Nope".to_string()],
            &test_context(),
            &test_library(),
        )
        .unwrap();
        assert!(!report.is_clean());
        assert_eq!(report.processed, 0);
    }

    #[test]
    fn reset_rebuilds_the_graphs() {
        let mut doc = doc_with(&["Std_Skin_Head"]);
        let report = quickset(
            &mut doc,
            QuickSetMode::Reset,
            &[],
            &test_context(),
            &test_library(),
        )
        .unwrap();
        assert_eq!(report.processed, 1);
        assert!(doc
            .material("Std_Skin_Head")
            .unwrap()
            .tree
            .iter()
            .any(|(_, n)| n.tag.is_some()));
    }
}
