//! Eye, occlusion and tearline tunables.

use serde::{Deserialize, Serialize};

/// Eye material tunables, covering the iris/sclera material itself plus the
/// occlusion shell and the tearline wet layer that share its region.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct EyeParams {
    /// Ambient occlusion strength.
    pub ao: f32,
    /// Color-blend overlay strength.
    pub blend: f32,
    /// Specular level.
    pub specular: f32,
    /// Sclera roughness.
    pub sclera_roughness: f32,
    /// Iris roughness.
    pub iris_roughness: f32,
    /// Iris UV scale.
    pub iris_scale: f32,
    /// Sclera UV scale.
    pub sclera_scale: f32,
    /// Iris mask radius (UV units from eye center).
    pub iris_radius: f32,
    /// Iris mask edge hardness.
    pub iris_hardness: f32,
    /// Limbus ring radius.
    pub limbus_radius: f32,
    /// Limbus ring hardness.
    pub limbus_hardness: f32,
    /// Sclera brightness multiplier.
    pub sclera_brightness: f32,
    /// Iris brightness multiplier.
    pub iris_brightness: f32,
    /// Corner shadow radius.
    pub shadow_radius: f32,
    /// Corner shadow hardness.
    pub shadow_hardness: f32,
    /// Corner shadow tint.
    pub shadow_color: [f32; 4],
    /// Subsurface radius in scene units.
    pub sss_radius: f32,
    /// Per-channel subsurface falloff color.
    pub sss_falloff: [f32; 4],
    /// Roughness used by the basic builder path.
    pub basic_roughness: f32,
    /// Normal flatten factor used by the basic builder path.
    pub basic_normal: f32,

    /// Occlusion shell darkening strength.
    pub occlusion: f32,
    /// Occlusion shell tint.
    pub occlusion_color: [f32; 4],

    /// Tearline layer alpha.
    pub tearline_alpha: f32,
    /// Tearline layer roughness.
    pub tearline_roughness: f32,
}

impl Default for EyeParams {
    fn default() -> Self {
        Self {
            ao: 0.2,
            blend: 0.0,
            specular: 0.8,
            sclera_roughness: 0.2,
            iris_roughness: 0.0,
            iris_scale: 1.0,
            sclera_scale: 1.0,
            iris_radius: 0.13,
            iris_hardness: 0.85,
            limbus_radius: 0.125,
            limbus_hardness: 0.8,
            sclera_brightness: 0.75,
            iris_brightness: 1.0,
            shadow_radius: 0.3,
            shadow_hardness: 0.75,
            shadow_color: [1.0, 0.497, 0.445, 1.0],
            sss_radius: 1.0,
            sss_falloff: [1.0, 1.0, 1.0, 1.0],
            basic_roughness: 0.05,
            basic_normal: 0.1,
            occlusion: 0.5,
            occlusion_color: [0.014, 0.007, 0.005, 1.0],
            tearline_alpha: 0.05,
            tearline_roughness: 0.15,
        }
    }
}

impl EyeParams {
    /// Overall iris mask parameter block in the order the iris-mask
    /// node-group consumes it: (scale, radius, hardness, limbus radius,
    /// limbus hardness).
    pub fn iris_mask_inputs(&self) -> [f32; 5] {
        [
            self.iris_scale,
            self.iris_radius,
            self.iris_hardness,
            self.limbus_radius,
            self.limbus_hardness,
        ]
    }
}
