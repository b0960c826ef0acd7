//! Materials and their surface flags.

use serde::{Deserialize, Serialize};

use crate::tree::NodeTree;

/// Surface blend mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum BlendMethod {
    /// Fully opaque.
    #[default]
    Opaque,
    /// Clip against the alpha threshold.
    Clip,
    /// Dithered hashed transparency.
    Hashed,
    /// Sorted alpha blending.
    Blend,
}

/// Shadow render mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ShadowMethod {
    /// No shadow.
    None,
    /// Opaque shadow.
    #[default]
    Opaque,
    /// Clip shadow against the alpha threshold.
    Clip,
    /// Hashed shadow.
    Hashed,
}

/// One material: a node tree plus the surface flags the alpha policy sets.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Material {
    /// Material name (classification input; renames silently reclassify).
    pub name: String,
    /// The node graph.
    pub tree: NodeTree,
    /// Surface blend mode.
    #[serde(default)]
    pub blend_method: BlendMethod,
    /// Shadow mode.
    #[serde(default)]
    pub shadow_method: ShadowMethod,
    /// Cull backfaces when true.
    #[serde(default)]
    pub use_backface_culling: bool,
    /// Show the transparent backside (sorted blending only).
    #[serde(default)]
    pub show_transparent_back: bool,
    /// Alpha clip threshold.
    #[serde(default = "default_threshold")]
    pub alpha_threshold: f32,
}

fn default_threshold() -> f32 {
    0.5
}

impl Material {
    /// Creates an empty material.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            tree: NodeTree::new(),
            blend_method: BlendMethod::default(),
            shadow_method: ShadowMethod::default(),
            use_backface_culling: false,
            show_transparent_back: false,
            alpha_threshold: default_threshold(),
        }
    }

    /// Material name with any trailing `.NNN` duplicate suffix removed.
    /// `"Std_Skin_Head.001"` and `"Std_Skin_Head"` resolve textures the
    /// same way.
    pub fn stripped_name(&self) -> &str {
        strip_duplicate_suffix(&self.name)
    }
}

/// Strips a trailing `.NNN` duplicate suffix (exactly a dot followed by
/// digits) from a name.
pub fn strip_duplicate_suffix(name: &str) -> &str {
    if let Some((stem, suffix)) = name.rsplit_once('.') {
        if !suffix.is_empty() && suffix.chars().all(|c| c.is_ascii_digit()) {
            return stem;
        }
    }
    name
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn duplicate_suffix_stripping() {
        assert_eq!(strip_duplicate_suffix("Std_Skin_Head.001"), "Std_Skin_Head");
        assert_eq!(strip_duplicate_suffix("Std_Skin_Head"), "Std_Skin_Head");
        assert_eq!(strip_duplicate_suffix("Mat.0"), "Mat");
        // Not a pure-digit suffix: untouched.
        assert_eq!(strip_duplicate_suffix("Mat.v2"), "Mat.v2");
        assert_eq!(strip_duplicate_suffix("Mat."), "Mat.");
    }
}
