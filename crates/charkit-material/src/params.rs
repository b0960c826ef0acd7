//! Parameter resolution table.
//!
//! One accessor per concern, each role-dispatching in its own fixed chain
//! that mirrors the classifier's priority order without sharing code with
//! it. The dispatch granularity is part of the observable behavior: skin
//! has per-part overrides for micro-normal strength and tiling but *not*
//! for AO or blend strength, and that asymmetry is deliberate.
//!
//! For "no role matched" the fallback is the shader's current default
//! socket value passed in by the caller, not a hardcoded constant — the
//! escape hatch that leaves fully custom materials alone.
//!
//! [`mixer_inputs`] aggregates the accessors per mixer kind; the assembler
//! sets sockets from it at build time and the refresh pass re-pushes from
//! the same table, so generation and live update cannot drift apart.

use charkit_scene::SocketValue;
use charkit_spec::{MaterialParams, MaterialRole, MixerKind, ParamKey};

/// Ambient-occlusion strength. No skin per-part override.
pub fn ao_strength(params: &MaterialParams, role: MaterialRole) -> (ParamKey, f32) {
    let (key, value) = if role.is_skin() {
        ("skin_ao", params.skin.ao)
    } else if role == MaterialRole::Hair || role == MaterialRole::Scalp {
        ("hair_ao", params.hair.ao)
    } else if role == MaterialRole::Eye {
        ("eye_ao", params.eye.ao)
    } else if role.is_teeth() {
        ("teeth_ao", params.teeth.ao)
    } else if role == MaterialRole::Tongue {
        ("tongue_ao", params.tongue.ao)
    } else if role == MaterialRole::Nails {
        ("nails_ao", params.nails.ao)
    } else {
        ("default_ao", params.default.ao)
    };
    (ParamKey::new(key), value)
}

/// Color-blend overlay strength.
pub fn blend_strength(params: &MaterialParams, role: MaterialRole) -> (ParamKey, f32) {
    let (key, value) = if role.is_skin() {
        ("skin_blend", params.skin.blend)
    } else if role == MaterialRole::Hair || role == MaterialRole::Scalp {
        ("hair_blend", params.hair.blend)
    } else if role == MaterialRole::Eye {
        ("eye_blend", params.eye.blend)
    } else {
        ("default_blend", params.default.blend)
    };
    (ParamKey::new(key), value)
}

/// Normal-blend overlay strength. Skin only; everything else keeps the
/// caller's fallback.
pub fn normal_blend_strength(
    params: &MaterialParams,
    role: MaterialRole,
    fallback: f32,
) -> (ParamKey, f32) {
    if role.is_skin() {
        (
            ParamKey::new("skin_normal_blend"),
            params.skin.normal_blend,
        )
    } else {
        (ParamKey::new("default_normal_blend"), fallback)
    }
}

/// Specular level. Hair distinguishes cards/scalp/eyelash; `fallback` is
/// the shader's current Specular default.
pub fn specular_strength(
    params: &MaterialParams,
    role: MaterialRole,
    fallback: f32,
) -> (ParamKey, f32) {
    let (key, value) = match role {
        r if r.is_skin() => ("skin_specular", params.skin.specular),
        MaterialRole::Hair => ("hair_specular", params.hair.specular),
        MaterialRole::Scalp => ("hair_scalp_specular", params.hair.scalp_specular),
        MaterialRole::Eyelash => ("hair_eyelash_specular", params.hair.eyelash_specular),
        MaterialRole::Eye => ("eye_specular", params.eye.specular),
        MaterialRole::TeethUpper | MaterialRole::TeethLower => {
            ("teeth_specular", params.teeth.specular)
        }
        MaterialRole::Tongue => ("tongue_specular", params.tongue.specular),
        MaterialRole::Nails => ("nails_specular", params.nails.specular),
        _ => ("default_specular", fallback),
    };
    (ParamKey::new(key), value)
}

/// Roughness remap upper bound. Eye uses the sclera value here; the iris
/// value is wired inside the iris branch of the eye builder.
pub fn roughness_remap(
    params: &MaterialParams,
    role: MaterialRole,
    fallback: f32,
) -> (ParamKey, f32) {
    let (key, value) = match role {
        r if r.is_skin() => ("skin_roughness", params.skin.roughness),
        MaterialRole::Hair => ("hair_roughness", params.hair.roughness),
        MaterialRole::Scalp => ("hair_scalp_roughness", params.hair.scalp_roughness),
        MaterialRole::Eyelash => ("hair_eyelash_roughness", params.hair.eyelash_roughness),
        MaterialRole::Eye => ("eye_sclera_roughness", params.eye.sclera_roughness),
        MaterialRole::Tearline => ("eye_tearline_roughness", params.eye.tearline_roughness),
        MaterialRole::TeethUpper | MaterialRole::TeethLower => {
            ("teeth_roughness", params.teeth.roughness)
        }
        MaterialRole::Tongue => ("tongue_roughness", params.tongue.roughness),
        MaterialRole::Nails => ("nails_roughness", params.nails.roughness),
        _ => ("default_roughness", fallback),
    };
    (ParamKey::new(key), value)
}

/// Subsurface radius in scene units.
pub fn sss_radius(params: &MaterialParams, role: MaterialRole) -> (ParamKey, f32) {
    let (key, value) = if role.is_skin() {
        ("skin_sss_radius", params.skin.sss_radius)
    } else if role == MaterialRole::Hair || role == MaterialRole::Scalp {
        ("hair_sss_radius", params.hair.sss_radius)
    } else if role == MaterialRole::Eye {
        ("eye_sss_radius", params.eye.sss_radius)
    } else if role.is_teeth() {
        ("teeth_sss_radius", params.teeth.sss_radius)
    } else if role == MaterialRole::Tongue {
        ("tongue_sss_radius", params.tongue.sss_radius)
    } else if role == MaterialRole::Nails {
        ("nails_sss_radius", params.nails.sss_radius)
    } else {
        ("default_sss_radius", params.default.sss_radius)
    };
    (ParamKey::new(key), value)
}

/// Per-channel subsurface falloff color.
pub fn sss_falloff(params: &MaterialParams, role: MaterialRole) -> (ParamKey, [f32; 4]) {
    let (key, value) = if role.is_skin() {
        ("skin_sss_falloff", params.skin.sss_falloff)
    } else if role == MaterialRole::Hair || role == MaterialRole::Scalp {
        ("hair_sss_falloff", params.hair.sss_falloff)
    } else if role == MaterialRole::Eye {
        ("eye_sss_falloff", params.eye.sss_falloff)
    } else if role.is_teeth() {
        ("teeth_sss_falloff", params.teeth.sss_falloff)
    } else if role == MaterialRole::Tongue {
        ("tongue_sss_falloff", params.tongue.sss_falloff)
    } else if role == MaterialRole::Nails {
        ("nails_sss_falloff", params.nails.sss_falloff)
    } else {
        ("default_sss_falloff", params.default.sss_falloff)
    };
    (ParamKey::new(key), value)
}

/// Micro-normal strength. Skin dispatches per part — this is one of the
/// two concerns with sub-part overrides.
pub fn micronormal_strength(params: &MaterialParams, role: MaterialRole) -> (ParamKey, f32) {
    let (key, value) = match role {
        MaterialRole::SkinHead => ("skin_head_micronormal", params.skin.micronormal_head),
        MaterialRole::SkinBody | MaterialRole::Skin => {
            ("skin_body_micronormal", params.skin.micronormal_body)
        }
        MaterialRole::SkinArm => ("skin_arm_micronormal", params.skin.micronormal_arm),
        MaterialRole::SkinLeg => ("skin_leg_micronormal", params.skin.micronormal_leg),
        MaterialRole::TeethUpper | MaterialRole::TeethLower => {
            ("teeth_micronormal", params.teeth.micronormal)
        }
        MaterialRole::Tongue => ("tongue_micronormal", params.tongue.micronormal),
        MaterialRole::Nails => ("nails_micronormal", params.nails.micronormal),
        _ => ("default_micronormal", params.default.micronormal),
    };
    (ParamKey::new(key), value)
}

/// Micro-normal tiling. The other sub-part-overridden concern.
pub fn micronormal_tiling(params: &MaterialParams, role: MaterialRole) -> (ParamKey, f32) {
    let (key, value) = match role {
        MaterialRole::SkinHead => ("skin_head_tiling", params.skin.tiling_head),
        MaterialRole::SkinBody | MaterialRole::Skin => ("skin_body_tiling", params.skin.tiling_body),
        MaterialRole::SkinArm => ("skin_arm_tiling", params.skin.tiling_arm),
        MaterialRole::SkinLeg => ("skin_leg_tiling", params.skin.tiling_leg),
        MaterialRole::TeethUpper | MaterialRole::TeethLower => ("teeth_tiling", params.teeth.tiling),
        MaterialRole::Tongue => ("tongue_tiling", params.tongue.tiling),
        MaterialRole::Nails => ("nails_tiling", params.nails.tiling),
        _ => ("default_tiling", params.default.tiling),
    };
    (ParamKey::new(key), value)
}

/// Bump height scale.
pub fn bump_strength(params: &MaterialParams, role: MaterialRole) -> (ParamKey, f32) {
    let (key, value) = match role {
        MaterialRole::Hair | MaterialRole::Scalp | MaterialRole::Eyelash => {
            ("hair_bump", params.hair.bump)
        }
        _ => ("default_bump", params.default.bump),
    };
    (ParamKey::new(key), value)
}

/// The complete input set for one mixer kind at one role.
///
/// This table is the single vocabulary shared by generation and live
/// update: the assembler writes these sockets when it instantiates a
/// mixer, and [`crate::refresh`] re-pushes them on update.
pub fn mixer_inputs(
    params: &MaterialParams,
    mixer: MixerKind,
    role: MaterialRole,
) -> Vec<(&'static str, SocketValue)> {
    match mixer {
        MixerKind::Color => {
            let mut inputs = vec![
                ("AO Strength", SocketValue::Scalar(ao_strength(params, role).1)),
                (
                    "Blend Strength",
                    SocketValue::Scalar(blend_strength(params, role).1),
                ),
            ];
            if role.is_skin() {
                inputs.push(("Mouth AO", SocketValue::Scalar(params.skin.mouth_ao)));
                inputs.push(("Nostril AO", SocketValue::Scalar(params.skin.nostril_ao)));
                inputs.push(("Lips AO", SocketValue::Scalar(params.skin.lips_ao)));
            }
            if role == MaterialRole::Hair || role == MaterialRole::Scalp {
                inputs.push(("Brightness", SocketValue::Scalar(params.hair.brightness)));
            }
            if role == MaterialRole::Eye {
                inputs.extend([
                    (
                        "Sclera Brightness",
                        SocketValue::Scalar(params.eye.sclera_brightness),
                    ),
                    (
                        "Iris Brightness",
                        SocketValue::Scalar(params.eye.iris_brightness),
                    ),
                    ("Shadow Radius", SocketValue::Scalar(params.eye.shadow_radius)),
                    (
                        "Shadow Hardness",
                        SocketValue::Scalar(params.eye.shadow_hardness),
                    ),
                    ("Shadow Color", SocketValue::Color(params.eye.shadow_color)),
                ]);
            }
            inputs
        }
        MixerKind::Subsurface => {
            let mut inputs = vec![
                ("Radius", SocketValue::Scalar(sss_radius(params, role).1)),
                ("Falloff", SocketValue::Color(sss_falloff(params, role).1)),
            ];
            if role.is_teeth() {
                inputs.push((
                    "Gums Scatter",
                    SocketValue::Scalar(params.teeth.gums_sss_scatter),
                ));
                inputs.push((
                    "Teeth Scatter",
                    SocketValue::Scalar(params.teeth.teeth_sss_scatter),
                ));
            }
            if role == MaterialRole::Tongue {
                inputs.push(("Scatter", SocketValue::Scalar(params.tongue.sss_scatter)));
            }
            inputs
        }
        MixerKind::Msr => vec![
            ("Metallic", SocketValue::Scalar(0.0)),
            (
                "Specular",
                SocketValue::Scalar(specular_strength(params, role, 0.5).1),
            ),
            (
                "Roughness",
                SocketValue::Scalar(roughness_remap(params, role, 0.5).1),
            ),
        ],
        MixerKind::Normal => vec![
            (
                "Normal Blend",
                SocketValue::Scalar(normal_blend_strength(params, role, 0.0).1),
            ),
            (
                "Micro Strength",
                SocketValue::Scalar(micronormal_strength(params, role).1),
            ),
        ],
        MixerKind::Tiling => vec![(
            "Tiling",
            SocketValue::Scalar(micronormal_tiling(params, role).1),
        )],
        MixerKind::IrisMask => {
            let [scale, radius, hardness, limbus_radius, limbus_hardness] =
                params.eye.iris_mask_inputs();
            vec![
                ("Scale", SocketValue::Scalar(scale)),
                ("Radius", SocketValue::Scalar(radius)),
                ("Hardness", SocketValue::Scalar(hardness)),
                ("Limbus Radius", SocketValue::Scalar(limbus_radius)),
                ("Limbus Hardness", SocketValue::Scalar(limbus_hardness)),
            ]
        }
        MixerKind::TeethGradient => vec![
            (
                "Gums Brightness",
                SocketValue::Scalar(params.teeth.gums_brightness),
            ),
            (
                "Teeth Brightness",
                SocketValue::Scalar(params.teeth.teeth_brightness),
            ),
            (
                "Gums Desaturation",
                SocketValue::Scalar(params.teeth.gums_desaturation),
            ),
            (
                "Teeth Desaturation",
                SocketValue::Scalar(params.teeth.teeth_desaturation),
            ),
            ("Front AO", SocketValue::Scalar(params.teeth.front_ao)),
            ("Rear AO", SocketValue::Scalar(params.teeth.rear_ao)),
        ],
        MixerKind::TongueGradient => vec![
            ("Brightness", SocketValue::Scalar(params.tongue.brightness)),
            (
                "Desaturation",
                SocketValue::Scalar(params.tongue.desaturation),
            ),
            ("Front AO", SocketValue::Scalar(params.tongue.front_ao)),
            ("Rear AO", SocketValue::Scalar(params.tongue.rear_ao)),
        ],
        MixerKind::Emission => vec![("Value", SocketValue::Scalar(1.0))],
        MixerKind::Alpha => match role {
            MaterialRole::Tearline => {
                vec![("Value", SocketValue::Scalar(params.eye.tearline_alpha))]
            }
            MaterialRole::EyeOcclusion => vec![
                ("Strength", SocketValue::Scalar(params.eye.occlusion)),
                ("Color", SocketValue::Color(params.eye.occlusion_color)),
            ],
            _ => vec![("Value", SocketValue::Scalar(1.0))],
        },
        MixerKind::Bump => vec![(
            "Strength",
            SocketValue::Scalar(bump_strength(params, role).1),
        )],
    }
}

/// Resolves the tag param key for a (mixer, role) pair, unique per
/// character-role combination.
pub fn resolve_param(mixer: MixerKind, role: MaterialRole) -> ParamKey {
    ParamKey::new(format!("{}_{}", role.key(), mixer.key()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn skin_parts_share_ao_but_not_tiling() {
        let params = MaterialParams::default();
        let (head_ao, _) = ao_strength(&params, MaterialRole::SkinHead);
        let (leg_ao, _) = ao_strength(&params, MaterialRole::SkinLeg);
        assert_eq!(head_ao, leg_ao);

        let (head_tile, head_v) = micronormal_tiling(&params, MaterialRole::SkinHead);
        let (leg_tile, leg_v) = micronormal_tiling(&params, MaterialRole::SkinLeg);
        assert_ne!(head_tile, leg_tile);
        assert_eq!(head_tile.as_str(), "skin_head_tiling");
        assert!((head_v - 25.0).abs() < 1e-6);
        assert!((leg_v - 20.0).abs() < 1e-6);
    }

    #[test]
    fn unmatched_roles_keep_shader_fallback() {
        let params = MaterialParams::default();
        let (_, v) = specular_strength(&params, MaterialRole::Default, 0.123);
        assert_eq!(v, 0.123);
        let (_, v) = roughness_remap(&params, MaterialRole::Default, 0.77);
        assert_eq!(v, 0.77);
    }

    #[test]
    fn generic_skin_uses_body_overrides() {
        let params = MaterialParams::default();
        let (key, v) = micronormal_strength(&params, MaterialRole::Skin);
        assert_eq!(key.as_str(), "skin_body_micronormal");
        assert_eq!(v, params.skin.micronormal_body);
    }

    #[test]
    fn hair_family_dispatch() {
        let params = MaterialParams::default();
        assert_eq!(
            specular_strength(&params, MaterialRole::Scalp, 0.5).1,
            params.hair.scalp_specular
        );
        assert_eq!(
            specular_strength(&params, MaterialRole::Eyelash, 0.5).1,
            params.hair.eyelash_specular
        );
        assert_eq!(
            specular_strength(&params, MaterialRole::Hair, 0.5).1,
            params.hair.specular
        );
    }

    #[test]
    fn mixer_input_sets_match_roles() {
        let params = MaterialParams::default();
        let skin = mixer_inputs(&params, MixerKind::Color, MaterialRole::SkinHead);
        assert!(skin.iter().any(|(n, _)| *n == "Mouth AO"));

        let eye = mixer_inputs(&params, MixerKind::Color, MaterialRole::Eye);
        assert!(eye.iter().any(|(n, _)| *n == "Sclera Brightness"));
        assert!(!eye.iter().any(|(n, _)| *n == "Mouth AO"));

        let teeth = mixer_inputs(&params, MixerKind::Subsurface, MaterialRole::TeethUpper);
        assert!(teeth.iter().any(|(n, _)| *n == "Gums Scatter"));
    }

    #[test]
    fn param_keys_are_unique_per_role_mixer() {
        let mut seen = std::collections::HashSet::new();
        for role in MaterialRole::all() {
            for mixer in [
                MixerKind::Color,
                MixerKind::Subsurface,
                MixerKind::Msr,
                MixerKind::Normal,
                MixerKind::Tiling,
            ] {
                assert!(seen.insert(resolve_param(mixer, *role)));
            }
        }
    }
}
