//! Teeth and tongue tunables.

use serde::{Deserialize, Serialize};

/// Teeth material tunables (upper and lower share one set; the
/// front/rear gradient separates them spatially instead).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct TeethParams {
    /// Ambient occlusion strength.
    pub ao: f32,
    /// Gums brightness multiplier.
    pub gums_brightness: f32,
    /// Teeth brightness multiplier.
    pub teeth_brightness: f32,
    /// Gums desaturation amount.
    pub gums_desaturation: f32,
    /// Teeth desaturation amount.
    pub teeth_desaturation: f32,
    /// Front-of-mouth AO gradient strength.
    pub front_ao: f32,
    /// Rear-of-mouth AO gradient strength.
    pub rear_ao: f32,
    /// Specular level.
    pub specular: f32,
    /// Roughness remap upper bound.
    pub roughness: f32,
    /// Subsurface scatter weight on gums.
    pub gums_sss_scatter: f32,
    /// Subsurface scatter weight on teeth.
    pub teeth_sss_scatter: f32,
    /// Subsurface radius in scene units.
    pub sss_radius: f32,
    /// Per-channel subsurface falloff color.
    pub sss_falloff: [f32; 4],
    /// Micro-normal strength.
    pub micronormal: f32,
    /// Micro-normal tiling factor.
    pub tiling: f32,
}

impl Default for TeethParams {
    fn default() -> Self {
        Self {
            ao: 1.0,
            gums_brightness: 0.9,
            teeth_brightness: 0.7,
            gums_desaturation: 0.0,
            teeth_desaturation: 0.1,
            front_ao: 1.0,
            rear_ao: 0.0,
            specular: 0.25,
            roughness: 0.4,
            gums_sss_scatter: 1.0,
            teeth_sss_scatter: 0.5,
            sss_radius: 1.0,
            sss_falloff: [0.381, 0.198, 0.13, 1.0],
            micronormal: 0.3,
            tiling: 10.0,
        }
    }
}

/// Tongue material tunables.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct TongueParams {
    /// Ambient occlusion strength.
    pub ao: f32,
    /// Brightness multiplier.
    pub brightness: f32,
    /// Desaturation amount.
    pub desaturation: f32,
    /// Front-of-mouth AO gradient strength.
    pub front_ao: f32,
    /// Rear-of-mouth AO gradient strength.
    pub rear_ao: f32,
    /// Specular level.
    pub specular: f32,
    /// Roughness remap upper bound.
    pub roughness: f32,
    /// Subsurface scatter weight.
    pub sss_scatter: f32,
    /// Subsurface radius in scene units.
    pub sss_radius: f32,
    /// Per-channel subsurface falloff color.
    pub sss_falloff: [f32; 4],
    /// Micro-normal strength.
    pub micronormal: f32,
    /// Micro-normal tiling factor.
    pub tiling: f32,
}

impl Default for TongueParams {
    fn default() -> Self {
        Self {
            ao: 1.0,
            brightness: 1.0,
            desaturation: 0.05,
            front_ao: 1.0,
            rear_ao: 0.0,
            specular: 0.26,
            roughness: 1.0,
            sss_scatter: 1.0,
            sss_radius: 1.0,
            sss_falloff: [1.0, 0.112, 0.072, 1.0],
            micronormal: 0.5,
            tiling: 4.0,
        }
    }
}
