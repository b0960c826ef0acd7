//! Material role taxonomy and generated-node tags.
//!
//! A [`MaterialRole`] is always *derived* from an (object, material) name
//! pair by the classifier; it is never stored on the material, so renames
//! silently reclassify. The closed set below drives builder dispatch and
//! parameter defaulting throughout the pipeline.

use serde::{Deserialize, Serialize};

/// Semantic classification of one (object, material) pair.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MaterialRole {
    /// Head skin (has its own micro-normal and tiling overrides).
    SkinHead,
    /// Body/torso skin.
    SkinBody,
    /// Arm skin.
    SkinArm,
    /// Leg skin.
    SkinLeg,
    /// Generic skin (no sub-part matched).
    Skin,
    /// Hair cards / strands.
    Hair,
    /// Scalp under hair cards.
    Scalp,
    /// Eyelashes (alpha-carded, hard-overridden to hashed blending).
    Eyelash,
    /// Iris/sclera eye material.
    Eye,
    /// Eye occlusion shadow shell.
    EyeOcclusion,
    /// Tearline wet layer.
    Tearline,
    /// Upper teeth.
    TeethUpper,
    /// Lower teeth.
    TeethLower,
    /// Tongue.
    Tongue,
    /// Finger/toe nails.
    Nails,
    /// Anything unrecognized; gets the basic generic treatment.
    #[default]
    Default,
}

impl MaterialRole {
    /// True for any of the skin roles, generic included.
    pub fn is_skin(&self) -> bool {
        matches!(
            self,
            MaterialRole::SkinHead
                | MaterialRole::SkinBody
                | MaterialRole::SkinArm
                | MaterialRole::SkinLeg
                | MaterialRole::Skin
        )
    }

    /// True for upper or lower teeth.
    pub fn is_teeth(&self) -> bool {
        matches!(self, MaterialRole::TeethUpper | MaterialRole::TeethLower)
    }

    /// True for any eye-region role (eye, occlusion, tearline).
    pub fn is_eye_region(&self) -> bool {
        matches!(
            self,
            MaterialRole::Eye | MaterialRole::EyeOcclusion | MaterialRole::Tearline
        )
    }

    /// Stable lowercase key used in parameter keys and node names.
    pub fn key(&self) -> &'static str {
        match self {
            MaterialRole::SkinHead => "skin_head",
            MaterialRole::SkinBody => "skin_body",
            MaterialRole::SkinArm => "skin_arm",
            MaterialRole::SkinLeg => "skin_leg",
            MaterialRole::Skin => "skin",
            MaterialRole::Hair => "hair",
            MaterialRole::Scalp => "scalp",
            MaterialRole::Eyelash => "eyelash",
            MaterialRole::Eye => "eye",
            MaterialRole::EyeOcclusion => "eye_occlusion",
            MaterialRole::Tearline => "tearline",
            MaterialRole::TeethUpper => "teeth_upper",
            MaterialRole::TeethLower => "teeth_lower",
            MaterialRole::Tongue => "tongue",
            MaterialRole::Nails => "nails",
            MaterialRole::Default => "default",
        }
    }

    /// All roles, in classifier priority order.
    pub fn all() -> &'static [MaterialRole] {
        &[
            MaterialRole::SkinHead,
            MaterialRole::SkinBody,
            MaterialRole::SkinArm,
            MaterialRole::SkinLeg,
            MaterialRole::Skin,
            MaterialRole::Hair,
            MaterialRole::Scalp,
            MaterialRole::Eyelash,
            MaterialRole::EyeOcclusion,
            MaterialRole::Tearline,
            MaterialRole::Eye,
            MaterialRole::TeethUpper,
            MaterialRole::TeethLower,
            MaterialRole::Tongue,
            MaterialRole::Nails,
            MaterialRole::Default,
        ]
    }
}

impl std::fmt::Display for MaterialRole {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.key())
    }
}

/// Kind of parametric mixer (or other tagged node) the assembler generates.
///
/// This is the single vocabulary shared between graph generation and the
/// live-update refresh pass; both dispatch on it, so the two can never
/// drift apart.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MixerKind {
    /// Base-color mixer (diffuse/AO/blend).
    Color,
    /// Subsurface radius/falloff mixer.
    Subsurface,
    /// Metallic/specular/roughness mixer.
    Msr,
    /// Normal/micro-normal blend mixer.
    Normal,
    /// Micro-normal tiling mapping group.
    Tiling,
    /// Eye iris mask (shared context for color and subsurface chains).
    IrisMask,
    /// Teeth gums-mask gradient mixer.
    TeethGradient,
    /// Tongue gradient-AO mixer.
    TongueGradient,
    /// Scalar emission strength node.
    Emission,
    /// Scalar alpha value node.
    Alpha,
    /// Bump-to-normal strength node.
    Bump,
}

impl MixerKind {
    /// Stable lowercase key used in node names.
    pub fn key(&self) -> &'static str {
        match self {
            MixerKind::Color => "color",
            MixerKind::Subsurface => "sss",
            MixerKind::Msr => "msr",
            MixerKind::Normal => "normal",
            MixerKind::Tiling => "tiling",
            MixerKind::IrisMask => "iris_mask",
            MixerKind::TeethGradient => "teeth_gradient",
            MixerKind::TongueGradient => "tongue_gradient",
            MixerKind::Emission => "emission",
            MixerKind::Alpha => "alpha",
            MixerKind::Bump => "bump",
        }
    }
}

/// A stable string key identifying one user tunable (e.g.
/// `"skin_head_micronormal"`). Embedded into generated node names and kept
/// unique per character-role combination; a collision would cross-talk
/// between unrelated nodes during live update.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ParamKey(String);

impl ParamKey {
    /// Creates a key from a raw string.
    pub fn new(key: impl Into<String>) -> Self {
        Self(key.into())
    }

    /// Creates the conventional `<role>_<concern>` key.
    pub fn for_role(role: MaterialRole, concern: &str) -> Self {
        Self(format!("{}_{}", role.key(), concern))
    }

    /// The raw key string.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for ParamKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Structured tag attached to every generated node at creation time.
///
/// The refresh pass consumes this directly instead of re-deriving intent
/// from name substrings, eliminating the vocabulary-drift hazard between
/// generation and live update. The embedded name string
/// `"(charkit)(<mixer>_<role>_mixer)[<version>]"` is still written for
/// human readability but is never parsed back.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct NodeTag {
    /// Which mixer family this node belongs to.
    pub mixer: MixerKind,
    /// The role the material was classified as when the node was built.
    pub role: MaterialRole,
    /// The parameter key whose value this node carries.
    pub param: ParamKey,
}

impl NodeTag {
    /// Creates a tag for a mixer node of the given role.
    pub fn new(mixer: MixerKind, role: MaterialRole, param: ParamKey) -> Self {
        Self { mixer, role, param }
    }

    /// The human-readable node name this tag renders to.
    pub fn node_name(&self, prefix: &str, version: &str) -> String {
        format!(
            "{}({}_{}_mixer)[{}]",
            prefix,
            self.mixer.key(),
            self.role.key(),
            version
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn role_keys_are_unique() {
        let mut seen = std::collections::HashSet::new();
        for role in MaterialRole::all() {
            assert!(seen.insert(role.key()), "duplicate key {}", role.key());
        }
    }

    #[test]
    fn skin_predicate() {
        assert!(MaterialRole::SkinHead.is_skin());
        assert!(MaterialRole::Skin.is_skin());
        assert!(!MaterialRole::Hair.is_skin());
        assert!(!MaterialRole::Default.is_skin());
    }

    #[test]
    fn tag_renders_namespaced_name() {
        let tag = NodeTag::new(
            MixerKind::Color,
            MaterialRole::SkinHead,
            ParamKey::for_role(MaterialRole::SkinHead, "ao"),
        );
        assert_eq!(
            tag.node_name("(charkit)", "1.0.0"),
            "(charkit)(color_skin_head_mixer)[1.0.0]"
        );
    }

    #[test]
    fn param_key_for_role() {
        let key = ParamKey::for_role(MaterialRole::Tongue, "tiling");
        assert_eq!(key.as_str(), "tongue_tiling");
    }
}
