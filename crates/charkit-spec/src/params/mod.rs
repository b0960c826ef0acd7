//! Per-role tunable parameter sets.
//!
//! The pipeline exposes roughly 150 artist-facing tunables, grouped here as
//! one structured config type per material role (rather than a flat string
//! keyed property bag). Every field has a serde default equal to the
//! shipped preset value, so older parameter documents keep loading as new
//! tunables are added.
//!
//! The parameter *resolution* table (which tunable applies to which
//! classified material, and under which stable [`crate::ParamKey`]) lives in
//! the material crate; this module only owns the stored values.

mod eye;
mod hair;
mod mouth;
mod skin;

pub use eye::EyeParams;
pub use hair::HairParams;
pub use mouth::{TeethParams, TongueParams};
pub use skin::SkinParams;

use serde::{Deserialize, Serialize};

use crate::error::{ErrorCode, ValidationError, ValidationResult};

/// Nail material tunables.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct NailsParams {
    /// Ambient occlusion strength.
    pub ao: f32,
    /// Specular level.
    pub specular: f32,
    /// Roughness remap upper bound.
    pub roughness: f32,
    /// Subsurface radius in scene units.
    pub sss_radius: f32,
    /// Per-channel subsurface falloff color.
    pub sss_falloff: [f32; 4],
    /// Micro-normal strength.
    pub micronormal: f32,
    /// Micro-normal tiling factor.
    pub tiling: f32,
}

impl Default for NailsParams {
    fn default() -> Self {
        Self {
            ao: 1.0,
            specular: 0.4,
            roughness: 0.0,
            sss_radius: 1.5,
            sss_falloff: [1.0, 0.112, 0.072, 1.0],
            micronormal: 1.0,
            tiling: 42.0,
        }
    }
}

/// Tunables for unclassified materials (the basic generic path).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct DefaultParams {
    /// Ambient occlusion strength.
    pub ao: f32,
    /// Color-blend overlay strength.
    pub blend: f32,
    /// Roughness remap upper bound.
    pub roughness: f32,
    /// Micro-normal strength.
    pub micronormal: f32,
    /// Micro-normal tiling factor.
    pub tiling: f32,
    /// Bump-map height scale (millimeter-ish units).
    pub bump: f32,
    /// Subsurface radius in scene units.
    pub sss_radius: f32,
    /// Per-channel subsurface falloff color.
    pub sss_falloff: [f32; 4],
}

impl Default for DefaultParams {
    fn default() -> Self {
        Self {
            ao: 1.0,
            blend: 0.5,
            roughness: 0.0,
            micronormal: 0.5,
            tiling: 10.0,
            bump: 5.0,
            sss_radius: 1.0,
            sss_falloff: [1.0, 1.0, 1.0, 1.0],
        }
    }
}

/// The complete tunable set for one character.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct MaterialParams {
    /// Skin tunables (with per-part overrides).
    pub skin: SkinParams,
    /// Eye, occlusion and tearline tunables.
    pub eye: EyeParams,
    /// Hair and scalp tunables.
    pub hair: HairParams,
    /// Teeth tunables.
    pub teeth: TeethParams,
    /// Tongue tunables.
    pub tongue: TongueParams,
    /// Nail tunables.
    pub nails: NailsParams,
    /// Fallback tunables for unrecognized materials.
    pub default: DefaultParams,
}

impl MaterialParams {
    /// Validates numeric ranges across all roles.
    ///
    /// Range violations are errors; the build pipeline refuses to run with
    /// an invalid parameter document rather than clamping silently.
    pub fn validate(&self) -> ValidationResult {
        let mut result = ValidationResult::new();

        let tilings = [
            ("skin.tiling_head", self.skin.tiling_head),
            ("skin.tiling_body", self.skin.tiling_body),
            ("skin.tiling_arm", self.skin.tiling_arm),
            ("skin.tiling_leg", self.skin.tiling_leg),
            ("teeth.tiling", self.teeth.tiling),
            ("tongue.tiling", self.tongue.tiling),
            ("nails.tiling", self.nails.tiling),
            ("default.tiling", self.default.tiling),
        ];
        for (path, value) in tilings {
            if value <= 0.0 {
                result.add_error(ValidationError::with_path(
                    ErrorCode::InvalidTiling,
                    format!("tiling must be positive, got {value}"),
                    path,
                ));
            }
        }

        let falloffs = [
            ("skin.sss_falloff", self.skin.sss_falloff),
            ("eye.sss_falloff", self.eye.sss_falloff),
            ("teeth.sss_falloff", self.teeth.sss_falloff),
            ("tongue.sss_falloff", self.tongue.sss_falloff),
            ("nails.sss_falloff", self.nails.sss_falloff),
            ("hair.sss_falloff", self.hair.sss_falloff),
            ("default.sss_falloff", self.default.sss_falloff),
        ];
        for (path, value) in falloffs {
            if value.iter().any(|c| *c < 0.0) {
                result.add_error(ValidationError::with_path(
                    ErrorCode::InvalidFalloff,
                    "falloff channels must be non-negative",
                    path,
                ));
            }
        }

        result
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_validate_clean() {
        let params = MaterialParams::default();
        let result = params.validate();
        assert!(result.is_ok(), "errors: {:?}", result.errors);
        assert!(result.warnings.is_empty());
    }

    #[test]
    fn zero_tiling_is_an_error() {
        let mut params = MaterialParams::default();
        params.teeth.tiling = 0.0;
        let result = params.validate();
        assert!(!result.is_ok());
        assert_eq!(result.errors[0].code, ErrorCode::InvalidTiling);
    }

    #[test]
    fn negative_falloff_is_an_error() {
        let mut params = MaterialParams::default();
        params.skin.sss_falloff = [1.0, -0.1, 0.0, 1.0];
        let result = params.validate();
        assert!(!result.is_ok());
        assert_eq!(result.errors[0].code, ErrorCode::InvalidFalloff);
    }

    #[test]
    fn params_round_trip_json() {
        let params = MaterialParams::default();
        let json = serde_json::to_string(&params).unwrap();
        let back: MaterialParams = serde_json::from_str(&json).unwrap();
        assert_eq!(params, back);
    }

    #[test]
    fn empty_document_loads_full_defaults() {
        // Older or partial parameter documents must keep loading.
        let params: MaterialParams = serde_json::from_str("{}").unwrap();
        assert_eq!(params, MaterialParams::default());
    }
}
