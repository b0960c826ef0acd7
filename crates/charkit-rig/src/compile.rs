//! The facial rig compiler.
//!
//! Turns a declarative control list into proxy bones plus scripted
//! drivers. Each control gets a "track" bone showing the widget travel
//! and a "nub" bone the animator actually moves, limit-constrained to the
//! travel bounds derived from the widget template. Every driven target
//! (shape key or bone channel) receives exactly one driver whose
//! expression combines all contributing controls; contributions are
//! summed (or max-combined for mutually-exclusive sets), never
//! overwritten.
//!
//! The compiler is idempotent: everything it creates is scoped by the
//! [`RIG_COLLECTION`] bone collection, the `ck_` naming prefix, and the
//! [`DRIVER_OWNER`] tag, and a rebuild clears only that.

use std::collections::BTreeMap;

use charkit_scene::{
    Armature, Bone, BoneSpace, Constraint, Document, Driver, DriverTarget, DriverVar, Expr,
    ObjectData, VarSource,
};
use charkit_spec::{ControlDef, FaceRigConfig, TransformChannel, WarningCode};

use crate::error::RigError;
use crate::report::RigReport;
use crate::widgets::{TrackGeometry, WidgetLibrary, NUB_SHAPE, TEMPLATE_SHAPE};

/// Bone collection owning every compiler-created bone.
pub const RIG_COLLECTION: &str = "charkit_facerig";

/// Owner tag on every compiler-created driver.
pub const DRIVER_OWNER: &str = "charkit_facerig";

/// Name prefix on every compiler-created bone and constraint.
const BONE_PREFIX: &str = "ck_";

/// Track bone name for a control.
pub fn track_bone_name(control: &str) -> String {
    format!("{BONE_PREFIX}{control}_track")
}

/// Nub (handle) bone name for a control.
pub fn nub_bone_name(control: &str) -> String {
    format!("{BONE_PREFIX}{control}_nub")
}

/// One weighted read of a control's nub position.
struct Term {
    source: VarSource,
    weight: f64,
    distance: f64,
}

/// All contributions accumulated against one driven target.
struct TargetAccum {
    target: DriverTarget,
    terms: Vec<Term>,
    offset: f64,
    /// Max-combined only when every contributing control opted in.
    exclusive: bool,
    /// Any negative weight switches the clamp from one-sided to symmetric.
    symmetric: bool,
}

/// Compiles the facial-control config into the document's first armature.
///
/// Invalid or unresolvable controls are skipped with a
/// [`WarningCode::ControlSkipped`] warning; the build itself only fails
/// when there is no armature to build into.
pub fn compile_facerig(
    doc: &mut Document,
    config: &FaceRigConfig,
    widgets: &WidgetLibrary,
) -> Result<RigReport, RigError> {
    let armature_name = doc.first_armature().ok_or(RigError::NoArmature)?.name.clone();
    let mut report = RigReport::new();

    // Shape key name -> owning mesh objects, resolved up front so the
    // armature can be borrowed mutably for the whole build.
    let mut shape_owners: BTreeMap<String, Vec<String>> = BTreeMap::new();
    for (_, object) in doc.meshes() {
        if let Some(mesh) = object.as_mesh() {
            for key in &mesh.shape_keys {
                shape_owners
                    .entry(key.name.clone())
                    .or_default()
                    .push(object.name.clone());
            }
        }
    }

    doc.remove_drivers_owned_by(DRIVER_OWNER);

    let mut accums: Vec<TargetAccum> = Vec::new();
    {
        let armature = armature_mut(doc, &armature_name).ok_or(RigError::NoArmature)?;
        armature.remove_collection(RIG_COLLECTION);
        for bone in &mut armature.bones {
            bone.constraints.retain(|c| !c.name().starts_with(BONE_PREFIX));
        }
        let existing: Vec<String> = armature.bones.iter().map(|b| b.name.clone()).collect();

        for control in &config.controls {
            if let Some(reason) = skip_reason(control, &shape_owners, &existing) {
                report.warn(
                    WarningCode::ControlSkipped,
                    format!("control '{}': {reason}", control.name),
                );
                continue;
            }
            let geometry = widgets.track_geometry(control);
            let nub = build_bones(armature, control, &geometry);
            accumulate(
                &mut accums,
                control,
                &geometry,
                &armature_name,
                &nub,
                &shape_owners,
            );
            report.processed += 1;
        }
    }

    for accum in accums {
        doc.drivers.push(emit_driver(accum));
        report.drivers += 1;
    }
    Ok(report)
}

fn armature_mut<'a>(doc: &'a mut Document, name: &str) -> Option<&'a mut Armature> {
    doc.objects
        .iter_mut()
        .find(|o| o.name == name)
        .and_then(|o| match &mut o.data {
            ObjectData::Armature(a) => Some(a),
            _ => None,
        })
}

/// Why a control cannot be built, or `None` when it can.
fn skip_reason(
    control: &ControlDef,
    shape_owners: &BTreeMap<String, Vec<String>>,
    bones: &[String],
) -> Option<String> {
    let [lo, hi] = control.widget.primary_range();
    if (hi - lo).abs() < f64::EPSILON {
        return Some("empty value range".to_string());
    }
    if control.shape_weights.is_empty()
        && control.shape_weights_x.is_empty()
        && control.bone_channels.is_empty()
    {
        return Some("drives no blend shape and no bone channel".to_string());
    }
    for shape in control.shape_weights.keys().chain(control.shape_weights_x.keys()) {
        if !shape_owners.contains_key(shape) {
            return Some(format!("blend shape '{shape}' not found on any mesh"));
        }
    }
    for map in &control.bone_channels {
        if !bones.iter().any(|b| b == &map.bone) {
            return Some(format!("bone '{}' not found", map.bone));
        }
    }
    None
}

/// Creates the track and nub bones for one control; returns the nub name.
fn build_bones(armature: &mut Armature, control: &ControlDef, g: &TrackGeometry) -> String {
    let track_name = track_bone_name(&control.name);
    let nub_name = nub_bone_name(&control.name);
    let o = g.origin;

    let mut track = Bone::new(&track_name, o, [o[0], o[1] + g.length as f32, o[2]]);
    track.collections.push(RIG_COLLECTION.to_string());
    track.custom_shape = Some(TEMPLATE_SHAPE.to_string());
    armature.bones.push(track);

    let mut nub = Bone::new(&nub_name, o, [o[0], o[1] + g.length as f32 * 0.1, o[2]]);
    nub.parent = Some(track_name);
    nub.collections.push(RIG_COLLECTION.to_string());
    nub.custom_shape = Some(NUB_SHAPE.to_string());
    nub.constraints.push(Constraint::LimitLocation {
        name: format!("{BONE_PREFIX}travel"),
        min: [g.min_x as f32, g.min_y as f32, 0.0],
        max: [g.max_x as f32, g.max_y as f32, 0.0],
        use_min: [true; 3],
        use_max: [true; 3],
        space: BoneSpace::LocalSpace,
    });
    armature.bones.push(nub);
    nub_name
}

/// Folds one control's weighted targets into the per-target accumulators.
fn accumulate(
    accums: &mut Vec<TargetAccum>,
    control: &ControlDef,
    g: &TrackGeometry,
    armature_name: &str,
    nub: &str,
    shape_owners: &BTreeMap<String, Vec<String>>,
) {
    let primary = VarSource::BoneTransform {
        object: armature_name.to_string(),
        bone: nub.to_string(),
        channel: TransformChannel::LocY,
        space: BoneSpace::LocalSpace,
    };
    let dist_y = g.primary_distance();
    let symmetric = control.has_negative_weights();

    for (shape, weight) in &control.shape_weights {
        for owner in &shape_owners[shape] {
            push_term(
                accums,
                DriverTarget::ShapeKey {
                    object: owner.clone(),
                    key: shape.clone(),
                },
                Term {
                    source: primary.clone(),
                    weight: *weight,
                    distance: dist_y,
                },
                control.mutually_exclusive,
                symmetric,
                0.0,
            );
        }
    }

    if control.widget.secondary_range().is_some() {
        let secondary = VarSource::BoneTransform {
            object: armature_name.to_string(),
            bone: nub.to_string(),
            channel: TransformChannel::LocX,
            space: BoneSpace::LocalSpace,
        };
        let dist_x = g.secondary_distance();
        for (shape, weight) in &control.shape_weights_x {
            for owner in &shape_owners[shape] {
                push_term(
                    accums,
                    DriverTarget::ShapeKey {
                        object: owner.clone(),
                        key: shape.clone(),
                    },
                    Term {
                        source: secondary.clone(),
                        weight: *weight,
                        distance: dist_x,
                    },
                    control.mutually_exclusive,
                    symmetric,
                    0.0,
                );
            }
        }
    }

    for map in &control.bone_channels {
        push_term(
            accums,
            DriverTarget::BoneChannel {
                object: armature_name.to_string(),
                bone: map.bone.clone(),
                channel: map.channel,
            },
            Term {
                source: primary.clone(),
                weight: map.scale,
                distance: dist_y,
            },
            control.mutually_exclusive,
            symmetric,
            map.offset,
        );
    }
}

fn push_term(
    accums: &mut Vec<TargetAccum>,
    target: DriverTarget,
    term: Term,
    exclusive: bool,
    symmetric: bool,
    offset: f64,
) {
    match accums.iter_mut().find(|a| a.target == target) {
        Some(accum) => {
            accum.terms.push(term);
            accum.offset += offset;
            accum.exclusive &= exclusive;
            accum.symmetric |= symmetric;
        }
        None => accums.push(TargetAccum {
            target,
            terms: vec![term],
            offset,
            exclusive,
            symmetric,
        }),
    }
}

/// Builds the single driver for one target from its accumulated terms.
fn emit_driver(accum: TargetAccum) -> Driver {
    let mut vars = Vec::new();
    let mut terms = Vec::new();
    for (i, term) in accum.terms.iter().enumerate() {
        let name = format!("v{i}");
        terms.push(Expr::contribution(term.weight, name.as_str(), term.distance));
        vars.push(DriverVar::new(name, term.source.clone()));
    }

    let combined = if accum.exclusive && terms.len() > 1 {
        Expr::Max { terms }
    } else if terms.len() == 1 {
        terms.into_iter().next().unwrap_or(Expr::constant(0.0))
    } else {
        Expr::Sum { terms }
    };
    let with_offset = if accum.offset.abs() > f64::EPSILON {
        Expr::Sum {
            terms: vec![combined, Expr::constant(accum.offset)],
        }
    } else {
        combined
    };
    // Shape keys are normalized sliders; bone channels keep raw units.
    let expr = match &accum.target {
        DriverTarget::ShapeKey { .. } => {
            if accum.symmetric {
                with_offset.clamped(-1.0, 1.0)
            } else {
                with_offset.clamped(0.0, 1.0)
            }
        }
        DriverTarget::BoneChannel { .. } => with_offset,
    };

    let mut driver = Driver::new(DRIVER_OWNER, accum.target, expr);
    for var in vars {
        driver = driver.with_var(var);
    }
    driver
}
