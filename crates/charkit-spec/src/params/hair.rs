//! Hair and scalp tunables.

use serde::{Deserialize, Serialize};

/// Hair material tunables. Scalp materials reuse this set with their own
/// specular/roughness values; the canonical hair object's tunables win when
/// a character carries several hair-bearing meshes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct HairParams {
    /// Ambient occlusion strength.
    pub ao: f32,
    /// Color-blend overlay strength.
    pub blend: f32,
    /// Specular level on hair cards.
    pub specular: f32,
    /// Roughness remap upper bound on hair cards.
    pub roughness: f32,
    /// Specular level on the scalp.
    pub scalp_specular: f32,
    /// Roughness on the scalp.
    pub scalp_roughness: f32,
    /// Specular level on eyelashes.
    pub eyelash_specular: f32,
    /// Roughness on eyelashes.
    pub eyelash_roughness: f32,
    /// Subsurface radius in scene units.
    pub sss_radius: f32,
    /// Per-channel subsurface falloff color.
    pub sss_falloff: [f32; 4],
    /// Bump-map height scale.
    pub bump: f32,
    /// Overall brightness multiplier.
    pub brightness: f32,
}

impl Default for HairParams {
    fn default() -> Self {
        Self {
            ao: 1.0,
            blend: 0.0,
            specular: 0.5,
            roughness: 0.0,
            scalp_specular: 0.0,
            scalp_roughness: 0.0,
            eyelash_specular: 0.25,
            eyelash_roughness: 0.0,
            sss_radius: 1.0,
            sss_falloff: [1.0, 1.0, 1.0, 1.0],
            bump: 1.0,
            brightness: 1.0,
        }
    }
}
