//! Skin tunables.

use serde::{Deserialize, Serialize};

/// Skin material tunables.
///
/// Micro-normal strength and tiling carry per-part overrides
/// (head/body/arm/leg); every other concern is shared across all skin
/// sub-parts. Which concerns have overrides is part of the pipeline's
/// observable behavior and must not be "tidied up".
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SkinParams {
    /// Ambient occlusion strength (shared by all skin parts).
    pub ao: f32,
    /// Color-blend overlay strength.
    pub blend: f32,
    /// Normal-blend overlay strength.
    pub normal_blend: f32,
    /// Roughness remap upper bound.
    pub roughness: f32,
    /// Specular level.
    pub specular: f32,
    /// Specular level used by the basic (non-advanced) builder path.
    pub basic_specular: f32,
    /// Roughness used by the basic builder path.
    pub basic_roughness: f32,
    /// Subsurface radius in scene units.
    pub sss_radius: f32,
    /// Per-channel subsurface falloff color.
    pub sss_falloff: [f32; 4],
    /// Mouth interior cavity AO strength.
    pub mouth_ao: f32,
    /// Nostril cavity AO strength.
    pub nostril_ao: f32,
    /// Lip crease AO strength.
    pub lips_ao: f32,

    /// Micro-normal strength, head.
    pub micronormal_head: f32,
    /// Micro-normal strength, body.
    pub micronormal_body: f32,
    /// Micro-normal strength, arms.
    pub micronormal_arm: f32,
    /// Micro-normal strength, legs.
    pub micronormal_leg: f32,

    /// Micro-normal tiling, head.
    pub tiling_head: f32,
    /// Micro-normal tiling, body.
    pub tiling_body: f32,
    /// Micro-normal tiling, arms.
    pub tiling_arm: f32,
    /// Micro-normal tiling, legs.
    pub tiling_leg: f32,
}

impl Default for SkinParams {
    fn default() -> Self {
        Self {
            ao: 1.0,
            blend: 0.0,
            normal_blend: 0.0,
            roughness: 0.15,
            specular: 0.4,
            basic_specular: 0.4,
            basic_roughness: 0.15,
            sss_radius: 1.5,
            sss_falloff: [1.0, 0.112, 0.072, 1.0],
            mouth_ao: 2.5,
            nostril_ao: 2.5,
            lips_ao: 2.5,
            micronormal_head: 0.5,
            micronormal_body: 0.8,
            micronormal_arm: 0.8,
            micronormal_leg: 0.8,
            tiling_head: 25.0,
            tiling_body: 20.0,
            tiling_arm: 20.0,
            tiling_leg: 20.0,
        }
    }
}

impl SkinParams {
    /// Micro-normal strength for the given skin sub-part key
    /// ("skin_head", "skin_body", ...). Generic skin uses the body value.
    pub fn micronormal_for(&self, part_key: &str) -> f32 {
        match part_key {
            "skin_head" => self.micronormal_head,
            "skin_arm" => self.micronormal_arm,
            "skin_leg" => self.micronormal_leg,
            _ => self.micronormal_body,
        }
    }

    /// Micro-normal tiling for the given skin sub-part key.
    pub fn tiling_for(&self, part_key: &str) -> f32 {
        match part_key {
            "skin_head" => self.tiling_head,
            "skin_arm" => self.tiling_arm,
            "skin_leg" => self.tiling_leg,
            _ => self.tiling_body,
        }
    }
}
