//! Alpha/blend policy.
//!
//! Whether a material is transparent is decided by inspecting the shader's
//! Alpha socket (linked, or default below 1.0), never by name. Hair cards,
//! scalp and eyelashes are the exception: they are forced to hashed
//! blending regardless of the user's preference, because sorted blending
//! on layered cards produces depth-sorting artifacts.

use charkit_scene::{BlendMethod, Material, NodeKind, ShadowMethod};
use charkit_spec::{BlendPreference, MaterialRole};

/// The resolved blend treatment for one material.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AlphaPolicy {
    /// No transparency.
    Opaque,
    /// Sorted alpha blending with clip shadows and backface culling.
    Blend,
    /// Dithered hashed blending, hashed shadows, no culling.
    Hashed,
}

/// True if the shader consumes alpha: its Alpha input is linked or its
/// unlinked default is below 1.0.
pub fn material_uses_alpha(material: &Material) -> bool {
    let Some(shader) = material
        .tree
        .find_kind(|k| matches!(k, NodeKind::PrincipledBsdf))
    else {
        return false;
    };
    if material.tree.is_input_linked(shader, "Alpha") {
        return true;
    }
    material
        .tree
        .input_default(shader, "Alpha")
        .ok()
        .and_then(|v| v.as_scalar())
        .map(|a| a < 1.0)
        .unwrap_or(false)
}

/// Resolves the policy for a classified material.
pub fn resolve_policy(
    material: &Material,
    role: MaterialRole,
    preference: BlendPreference,
) -> AlphaPolicy {
    // Card-stack roles are hashed no matter what.
    if matches!(
        role,
        MaterialRole::Hair | MaterialRole::Scalp | MaterialRole::Eyelash
    ) {
        return AlphaPolicy::Hashed;
    }
    if !material_uses_alpha(material) {
        return AlphaPolicy::Opaque;
    }
    match preference {
        BlendPreference::Hashed => AlphaPolicy::Hashed,
        BlendPreference::Blend => AlphaPolicy::Blend,
    }
}

/// Writes the policy onto the material's surface flags.
pub fn apply_alpha_policy(material: &mut Material, policy: AlphaPolicy) {
    match policy {
        AlphaPolicy::Opaque => {
            material.blend_method = BlendMethod::Opaque;
            material.shadow_method = ShadowMethod::Opaque;
            material.use_backface_culling = false;
            material.show_transparent_back = false;
        }
        AlphaPolicy::Blend => {
            material.blend_method = BlendMethod::Blend;
            material.shadow_method = ShadowMethod::Clip;
            material.use_backface_culling = true;
            material.show_transparent_back = true;
            material.alpha_threshold = 0.5;
        }
        AlphaPolicy::Hashed => {
            material.blend_method = BlendMethod::Hashed;
            material.shadow_method = ShadowMethod::Hashed;
            material.use_backface_culling = false;
            material.show_transparent_back = false;
        }
    }
}
