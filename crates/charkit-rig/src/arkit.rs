//! ARKit proxy remap registration.
//!
//! Retargeted motion-capture contributions can be shaped by a nonlinear
//! remap whose tuning lives as custom properties on the ARKit proxy rig.
//! The remap is registered once per session; re-registration is a no-op
//! so repeated retarget runs cannot drift the curve mid-session. Blink,
//! jaw and eye-roll channels always bypass the remap.

use charkit_scene::{Armature, EvalContext, RemapParams};

/// Custom property holding the overall output strength.
pub const PROP_STRENGTH: &str = "remap_strength";
/// Custom property holding the curve relaxation.
pub const PROP_RELAXATION: &str = "remap_relaxation";
/// Custom property holding the horizontal-axis bias.
pub const PROP_H_BIAS: &str = "remap_h_bias";
/// Custom property holding the vertical-axis bias.
pub const PROP_V_BIAS: &str = "remap_v_bias";

/// Reads remap tuning from the proxy rig's custom properties, defaulting
/// any missing property.
pub fn remap_from_props(armature: &Armature) -> RemapParams {
    let defaults = RemapParams::default();
    let get = |key: &str, fallback: f64| armature.custom_props.get(key).copied().unwrap_or(fallback);
    RemapParams {
        strength: get(PROP_STRENGTH, defaults.strength),
        relaxation: get(PROP_RELAXATION, defaults.relaxation),
        h_bias: get(PROP_H_BIAS, defaults.h_bias),
        v_bias: get(PROP_V_BIAS, defaults.v_bias),
    }
}

/// True for control names whose contributions must never be remapped.
///
/// Blinks and jaw motion need a linear response, and eye rolls are driven
/// past the normalized range the curve is shaped for.
pub fn remap_excluded(control_name: &str) -> bool {
    let name = control_name.to_ascii_lowercase();
    name.contains("blink")
        || name.contains("jaw")
        || (name.contains("eye") && name.contains("roll"))
}

/// The per-session remap registration.
///
/// Drivers reference the remap by the [`charkit_scene::Expr::ArkitRemap`]
/// call; evaluation is the identity until a session registers parameters.
#[derive(Debug, Clone, Copy, Default)]
pub struct RemapSession {
    remap: Option<RemapParams>,
}

impl RemapSession {
    /// Creates a session with nothing registered.
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers remap parameters. Only the first registration of a
    /// session takes; returns whether this call registered.
    pub fn register(&mut self, params: RemapParams) -> bool {
        if self.remap.is_some() {
            return false;
        }
        self.remap = Some(params);
        true
    }

    /// Registers from the proxy rig's custom properties.
    pub fn register_from(&mut self, proxy: &Armature) -> bool {
        self.register(remap_from_props(proxy))
    }

    /// True once parameters are registered.
    pub fn is_registered(&self) -> bool {
        self.remap.is_some()
    }

    /// The registered parameters, if any.
    pub fn params(&self) -> Option<RemapParams> {
        self.remap
    }

    /// Builds an evaluation context carrying the session's registration.
    pub fn eval_context<'a>(&self, resolver: &'a dyn Fn(&str) -> Option<f64>) -> EvalContext<'a> {
        EvalContext {
            resolver,
            remap: self.remap,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn props_override_defaults() {
        let mut proxy = Armature::default();
        proxy.custom_props.insert(PROP_STRENGTH.to_string(), 0.8);
        proxy.custom_props.insert(PROP_V_BIAS.to_string(), 0.1);
        let params = remap_from_props(&proxy);
        assert_eq!(params.strength, 0.8);
        assert_eq!(params.v_bias, 0.1);
        assert_eq!(params.relaxation, 0.0);
        assert_eq!(params.h_bias, 0.0);
    }

    #[test]
    fn registration_is_once_per_session() {
        let mut session = RemapSession::new();
        assert!(!session.is_registered());
        assert!(session.register(RemapParams {
            strength: 0.5,
            ..RemapParams::default()
        }));
        assert!(!session.register(RemapParams::default()));
        assert_eq!(session.params().unwrap().strength, 0.5);
    }

    #[test]
    fn exclusion_list_covers_blink_jaw_eye_roll() {
        assert!(remap_excluded("Eye_Blink_L"));
        assert!(remap_excluded("Jaw_Open"));
        assert!(remap_excluded("Eye_L_Roll"));
        assert!(!remap_excluded("Mouth_Smile_L"));
        assert!(!remap_excluded("Brow_Raise_R"));
    }
}
