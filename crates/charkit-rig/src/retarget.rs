//! Retargeting: driving the face rig from a foreign performance.
//!
//! The retargeter emits one driver per control nub, reconstructing the
//! control's normalized value from a foreign mesh's shape keys or a
//! foreign rig's bone transforms and scaling it onto the nub's travel.
//! Parent controls' expressions are subtracted from their children so a
//! hierarchical control only carries its own delta. Contributions may be
//! shaped by the session-registered ARKit remap, except for the channels
//! on the blink/jaw/eye-roll exclusion list.

use charkit_scene::{
    BoneSpace, Document, Driver, DriverTarget, DriverVar, Expr, VarSource,
};
use charkit_spec::{ControlDef, FaceRigConfig, TransformChannel, WarningCode};

use crate::arkit::{remap_excluded, RemapSession};
use crate::compile::nub_bone_name;
use crate::error::RigError;
use crate::report::RigReport;
use crate::widgets::WidgetLibrary;

/// Owner tag on every retargeter-created driver. Distinct from the rig
/// compiler's so either side can rebuild without touching the other.
pub const RETARGET_OWNER: &str = "charkit_retarget";

/// What kind of foreign data the performance object supplies.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SourceKind {
    /// A mesh whose shape keys carry the performance.
    ShapeKeys,
    /// An armature whose bone transforms carry the performance.
    Bones,
}

/// The foreign performance source.
#[derive(Debug, Clone)]
pub struct RetargetSource {
    /// Foreign object name in the document.
    pub object: String,
    /// How its values are read.
    pub kind: SourceKind,
}

/// Which control axis an expression is built for.
#[derive(Clone, Copy, PartialEq)]
enum Axis {
    Primary,
    Secondary,
}

/// Per-driver variable allocation.
#[derive(Default)]
struct VarAlloc {
    vars: Vec<DriverVar>,
}

impl VarAlloc {
    fn bind(&mut self, source: VarSource) -> String {
        let name = format!("v{}", self.vars.len());
        self.vars.push(DriverVar::new(name.clone(), source));
        name
    }
}

/// Wires the foreign performance into the compiled rig's nub bones.
///
/// Controls whose nub does not exist (the rig was not compiled) or whose
/// sources cannot be resolved on the foreign object are skipped with a
/// warning.
pub fn retarget(
    doc: &mut Document,
    config: &FaceRigConfig,
    widgets: &WidgetLibrary,
    source: &RetargetSource,
    session: &RemapSession,
) -> Result<RigReport, RigError> {
    let armature_name = doc.first_armature().ok_or(RigError::NoArmature)?.name.clone();
    let foreign = doc.object(&source.object)?;
    let foreign_keys: Vec<String> = foreign
        .as_mesh()
        .map(|m| m.shape_keys.iter().map(|k| k.name.clone()).collect())
        .unwrap_or_default();
    let foreign_bones: Vec<String> = foreign
        .as_armature()
        .map(|a| a.bones.iter().map(|b| b.name.clone()).collect())
        .unwrap_or_default();
    let rig_bones: Vec<String> = doc
        .object(&armature_name)?
        .as_armature()
        .map(|a| a.bones.iter().map(|b| b.name.clone()).collect())
        .unwrap_or_default();

    doc.remove_drivers_owned_by(RETARGET_OWNER);

    let mut report = RigReport::new();
    for control in &config.controls {
        let nub = nub_bone_name(&control.name);
        if !rig_bones.contains(&nub) {
            report.warn(
                WarningCode::ControlSkipped,
                format!("control '{}': rig bone '{nub}' not built", control.name),
            );
            continue;
        }

        let geometry = widgets.track_geometry(control);
        let mut axes = vec![(Axis::Primary, TransformChannel::LocY, geometry.primary_distance())];
        if control.widget.secondary_range().is_some() && !control.shape_weights_x.is_empty() {
            axes.push((
                Axis::Secondary,
                TransformChannel::LocX,
                geometry.secondary_distance(),
            ));
        }

        let mut built = 0;
        for (axis, channel, distance) in axes {
            let mut vars = VarAlloc::default();
            let Some(raw) = value_expr(
                config,
                control,
                axis,
                source,
                &foreign_keys,
                &foreign_bones,
                &mut vars,
                &mut report,
            ) else {
                continue;
            };

            let shaped = if session.is_registered() && !remap_excluded(&control.name) {
                Expr::ArkitRemap {
                    value: Box::new(raw),
                    vertical: axis == Axis::Primary,
                }
            } else {
                raw
            };
            let (lo, hi) = match axis {
                Axis::Primary => (geometry.min_y, geometry.max_y),
                Axis::Secondary => (geometry.min_x, geometry.max_x),
            };
            let travel = Expr::Mul {
                lhs: Box::new(shaped),
                rhs: Box::new(Expr::constant(distance)),
            }
            .clamped(lo, hi);

            let mut driver = Driver::new(
                RETARGET_OWNER,
                DriverTarget::BoneChannel {
                    object: armature_name.clone(),
                    bone: nub.clone(),
                    channel,
                },
                travel,
            );
            for var in vars.vars {
                driver = driver.with_var(var);
            }
            doc.drivers.push(driver);
            report.drivers += 1;
            built += 1;
        }

        if built == 0 {
            report.warn(
                WarningCode::ControlSkipped,
                format!(
                    "control '{}': no source on '{}' resolved",
                    control.name, source.object
                ),
            );
        } else {
            report.processed += 1;
        }
    }
    Ok(report)
}

/// The control's normalized value read from the foreign source, with the
/// parent control's value subtracted when one is declared.
#[allow(clippy::too_many_arguments)]
fn value_expr(
    config: &FaceRigConfig,
    control: &ControlDef,
    axis: Axis,
    source: &RetargetSource,
    foreign_keys: &[String],
    foreign_bones: &[String],
    vars: &mut VarAlloc,
    report: &mut RigReport,
) -> Option<Expr> {
    let own = raw_expr(control, axis, source, foreign_keys, foreign_bones, vars, report)?;
    let parent = control
        .parent
        .as_deref()
        .and_then(|name| config.control(name))
        .and_then(|p| raw_expr(p, axis, source, foreign_keys, foreign_bones, vars, report));
    match parent {
        Some(parent) => Some(Expr::Sub {
            lhs: Box::new(own),
            rhs: Box::new(parent),
        }),
        None => Some(own),
    }
}

/// The raw weighted read of one control axis from the foreign source.
fn raw_expr(
    control: &ControlDef,
    axis: Axis,
    source: &RetargetSource,
    foreign_keys: &[String],
    foreign_bones: &[String],
    vars: &mut VarAlloc,
    report: &mut RigReport,
) -> Option<Expr> {
    let mut terms = Vec::new();
    match source.kind {
        SourceKind::ShapeKeys => {
            let weights = match axis {
                Axis::Primary => &control.shape_weights,
                Axis::Secondary => &control.shape_weights_x,
            };
            for (shape, weight) in weights {
                if !foreign_keys.contains(shape) {
                    report.warn(
                        WarningCode::ContributionDropped,
                        format!(
                            "control '{}': shape key '{shape}' missing on '{}'",
                            control.name, source.object
                        ),
                    );
                    continue;
                }
                let var = vars.bind(VarSource::ShapeKey {
                    object: source.object.clone(),
                    key: shape.clone(),
                });
                terms.push(Expr::Mul {
                    lhs: Box::new(Expr::constant(*weight)),
                    rhs: Box::new(Expr::var(var)),
                });
            }
        }
        SourceKind::Bones => {
            // Bone sourcing inverts the compile-time mapping: a channel
            // written as value*scale + offset reads back as
            // (channel - offset) / scale.
            if axis == Axis::Secondary {
                return None;
            }
            for map in &control.bone_channels {
                if !foreign_bones.contains(&map.bone) {
                    report.warn(
                        WarningCode::ContributionDropped,
                        format!(
                            "control '{}': bone '{}' missing on '{}'",
                            control.name, map.bone, source.object
                        ),
                    );
                    continue;
                }
                if map.scale.abs() < f64::EPSILON {
                    report.warn(
                        WarningCode::ContributionDropped,
                        format!("control '{}': zero-scale channel on '{}'", control.name, map.bone),
                    );
                    continue;
                }
                let var = vars.bind(VarSource::BoneTransform {
                    object: source.object.clone(),
                    bone: map.bone.clone(),
                    channel: map.channel,
                    space: BoneSpace::LocalSpace,
                });
                terms.push(Expr::Div {
                    lhs: Box::new(Expr::Sub {
                        lhs: Box::new(Expr::var(var)),
                        rhs: Box::new(Expr::constant(map.offset)),
                    }),
                    rhs: Box::new(Expr::constant(map.scale)),
                });
            }
            if terms.len() > 1 {
                let count = terms.len() as f64;
                return Some(Expr::Div {
                    lhs: Box::new(Expr::Sum { terms }),
                    rhs: Box::new(Expr::constant(count)),
                });
            }
        }
    }
    match terms.len() {
        0 => None,
        1 => terms.into_iter().next(),
        _ => Some(Expr::Sum { terms }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::compile::tests::{rig_doc, test_widgets};
    use crate::compile::{compile_facerig, DRIVER_OWNER};
    use charkit_scene::{Armature, Bone, EvalContext, MeshData, Object, ShapeKey};
    use pretty_assertions::assert_eq;
    use std::collections::HashMap;

    fn performance_mesh() -> Object {
        Object::mesh(
            "Performance",
            MeshData {
                data_name: "PerformanceMesh".to_string(),
                material_slots: Vec::new(),
                shape_keys: vec![
                    ShapeKey::new("Mouth_Open"),
                    ShapeKey::new("Mouth_Smile_L"),
                ],
            },
        )
    }

    fn shape_source() -> RetargetSource {
        RetargetSource {
            object: "Performance".to_string(),
            kind: SourceKind::ShapeKeys,
        }
    }

    fn config() -> FaceRigConfig {
        FaceRigConfig {
            profile: Default::default(),
            controls: vec![
                ControlDef::slider("Mouth_Base", [0.0, 1.0])
                    .with_shape("Mouth_Open", 1.0)
                    .with_widget_indices(vec![0, 1]),
                ControlDef::slider("Mouth_Wide", [0.0, 1.0])
                    .with_shape("Mouth_Open", 1.0)
                    .with_shape("Mouth_Smile_L", 1.0)
                    .with_parent("Mouth_Base")
                    .with_widget_indices(vec![0, 1]),
            ],
        }
    }

    fn eval_with(driver: &Driver, keys: &HashMap<String, f64>) -> f64 {
        let resolver = |name: &str| {
            driver.vars.iter().find(|v| v.name == name).and_then(|v| match &v.source {
                VarSource::ShapeKey { key, .. } => keys.get(key).copied(),
                _ => None,
            })
        };
        driver.expr.eval(&EvalContext::new(&resolver))
    }

    fn nub_driver<'a>(doc: &'a Document, control: &str) -> &'a Driver {
        let nub = nub_bone_name(control);
        doc.drivers
            .iter()
            .find(|d| {
                d.owner == RETARGET_OWNER
                    && matches!(&d.target, DriverTarget::BoneChannel { bone, .. } if *bone == nub)
            })
            .unwrap()
    }

    #[test]
    fn parent_contribution_subtracts_out() {
        let mut doc = rig_doc();
        doc.objects.push(performance_mesh());
        let config = config();
        compile_facerig(&mut doc, &config, &test_widgets()).unwrap();
        let report = retarget(
            &mut doc,
            &config,
            &test_widgets(),
            &shape_source(),
            &RemapSession::new(),
        )
        .unwrap();
        assert!(report.is_clean(), "warnings: {:?}", report.warnings);
        assert_eq!(report.processed, 2);

        // Child raw value is (open + smile); subtracting the parent's
        // (open) leaves exactly the smile delta, scaled onto 10 units of
        // travel: (0.65 - 0.4) * 10 = 2.5.
        let driver = nub_driver(&doc, "Mouth_Wide");
        let mut keys = HashMap::new();
        keys.insert("Mouth_Open".to_string(), 0.4);
        keys.insert("Mouth_Smile_L".to_string(), 0.25);
        assert!((eval_with(driver, &keys) - 2.5).abs() < 1e-9);
    }

    #[test]
    fn remap_skips_the_exclusion_list() {
        let mut doc = rig_doc();
        doc.objects.push(performance_mesh());
        let config = FaceRigConfig {
            profile: Default::default(),
            controls: vec![
                ControlDef::slider("Jaw_Open", [0.0, 1.0])
                    .with_shape("Mouth_Open", 1.0)
                    .with_widget_indices(vec![0, 1]),
                ControlDef::slider("Smile", [0.0, 1.0])
                    .with_shape("Mouth_Smile_L", 1.0)
                    .with_widget_indices(vec![0, 1]),
            ],
        };
        compile_facerig(&mut doc, &config, &test_widgets()).unwrap();

        let mut session = RemapSession::new();
        session.register(charkit_scene::RemapParams::default());
        retarget(&mut doc, &config, &test_widgets(), &shape_source(), &session).unwrap();

        assert!(!nub_driver(&doc, "Jaw_Open").expr.to_string().contains("rl_arkit"));
        assert!(nub_driver(&doc, "Smile").expr.to_string().contains("rl_arkit"));
    }

    #[test]
    fn missing_foreign_shape_drops_contribution() {
        let mut doc = rig_doc();
        doc.objects.push(performance_mesh());
        let config = FaceRigConfig {
            profile: Default::default(),
            controls: vec![ControlDef::slider("Blend", [0.0, 1.0])
                .with_shape("Mouth_Open", 0.5)
                .with_shape("Not_Captured", 0.5)
                .with_widget_indices(vec![0, 1])],
        };
        compile_facerig(&mut doc, &config, &test_widgets()).unwrap();
        let report = retarget(
            &mut doc,
            &config,
            &test_widgets(),
            &shape_source(),
            &RemapSession::new(),
        )
        .unwrap();
        assert_eq!(report.processed, 1);
        assert_eq!(report.warnings.len(), 1);
        assert_eq!(report.warnings[0].code, WarningCode::ContributionDropped);
        assert_eq!(nub_driver(&doc, "Blend").vars.len(), 1);
    }

    #[test]
    fn uncompiled_rig_skips_every_control() {
        let mut doc = rig_doc();
        doc.objects.push(performance_mesh());
        let config = config();
        let report = retarget(
            &mut doc,
            &config,
            &test_widgets(),
            &shape_source(),
            &RemapSession::new(),
        )
        .unwrap();
        assert_eq!(report.processed, 0);
        assert_eq!(report.warnings.len(), 2);
        assert!(report
            .warnings
            .iter()
            .all(|w| w.code == WarningCode::ControlSkipped));
    }

    #[test]
    fn rerun_replaces_only_retarget_drivers() {
        let mut doc = rig_doc();
        doc.objects.push(performance_mesh());
        let config = config();
        compile_facerig(&mut doc, &config, &test_widgets()).unwrap();
        let facerig_drivers = doc.drivers.iter().filter(|d| d.owner == DRIVER_OWNER).count();

        let source = shape_source();
        retarget(&mut doc, &config, &test_widgets(), &source, &RemapSession::new()).unwrap();
        let total = doc.drivers.len();
        retarget(&mut doc, &config, &test_widgets(), &source, &RemapSession::new()).unwrap();
        assert_eq!(doc.drivers.len(), total);
        assert_eq!(
            doc.drivers.iter().filter(|d| d.owner == DRIVER_OWNER).count(),
            facerig_drivers
        );
    }

    #[test]
    fn bone_source_inverts_the_channel_mapping() {
        let mut doc = rig_doc();
        let mut performance = Armature::default();
        performance
            .bones
            .push(Bone::new("JawRoot", [0.0; 3], [0.0, 0.2, 0.0]));
        doc.objects.push(Object::armature("Capture", performance));

        let config = FaceRigConfig {
            profile: Default::default(),
            controls: vec![ControlDef::slider("Jaw_Open", [0.0, 1.0])
                .with_shape("Mouth_Open", 1.0)
                .with_bone(charkit_spec::BoneChannelMap {
                    bone: "JawRoot".to_string(),
                    channel: TransformChannel::RotX,
                    offset: 0.05,
                    scale: 0.1,
                })
                .with_widget_indices(vec![0, 1])],
        };
        compile_facerig(&mut doc, &config, &test_widgets()).unwrap();
        retarget(
            &mut doc,
            &config,
            &test_widgets(),
            &RetargetSource {
                object: "Capture".to_string(),
                kind: SourceKind::Bones,
            },
            &RemapSession::new(),
        )
        .unwrap();

        // A captured rotation of 0.15 maps back to value 1.0, which fills
        // the 10-unit travel.
        let driver = nub_driver(&doc, "Jaw_Open");
        let resolver = |name: &str| {
            driver.vars.iter().find(|v| v.name == name).map(|_| 0.15)
        };
        let value = driver.expr.eval(&EvalContext::new(&resolver));
        assert!((value - 10.0).abs() < 1e-9);
    }
}
