//! CharKit Declarative Configuration Library
//!
//! This crate provides the typed configuration surface for the CharKit
//! character pipeline:
//!
//! - **Material roles**: the closed semantic taxonomy (skin sub-parts, eye,
//!   hair, teeth, tongue, nails, default) that drives builder dispatch and
//!   parameter defaulting.
//! - **Tunable parameters**: per-role structured parameter sets (specular,
//!   roughness remaps, subsurface radius/falloff, tiling, micro-normal
//!   strength, ...) with serde-backed versioned defaults.
//! - **Facial controls**: the declarative slider/rect widget schema that the
//!   rig compiler turns into proxy bones and scripted drivers.
//! - **Validation**: error/warning codes and a `ValidationResult` collecting
//!   both, so callers decide what is fatal.
//!
//! # Modules
//!
//! - [`error`]: Error and warning types for validation
//! - [`roles`]: Material role taxonomy and generated-node tags
//! - [`params`]: Per-role tunable parameter structs
//! - [`facerig`]: Facial control definitions and profiles
//! - [`prefs`]: User preferences (hint lists, blend mode, import options)

pub mod error;
pub mod facerig;
pub mod params;
pub mod prefs;
pub mod roles;

pub use error::{
    ConfigError, ErrorCode, ValidationError, ValidationResult, ValidationWarning, WarningCode,
};
pub use facerig::{
    BoneChannelMap, ControlDef, ControlWidget, FaceRigConfig, FacialProfile, TransformChannel,
};
pub use params::{
    DefaultParams, EyeParams, HairParams, MaterialParams, NailsParams, SkinParams, TeethParams,
    TongueParams,
};
pub use prefs::{BlendPreference, ImportType, Prefs};
pub use roles::{MaterialRole, MixerKind, NodeTag, ParamKey};

/// Current configuration schema version, embedded into generated node names
/// so stale node-group versions can be told apart from current ones.
pub const SCHEMA_VERSION: &str = "1.0.0";

/// Private namespace prefix carried by every generated node and node-group.
pub const NODE_PREFIX: &str = "(charkit)";
