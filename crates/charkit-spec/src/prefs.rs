//! User preferences: import options, blend-mode choice, classifier hints.

use serde::{Deserialize, Serialize};

/// Which transparent blend mode the user wants on alpha-bearing materials.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum BlendPreference {
    /// Dithered hashed transparency (order independent, grainy).
    #[default]
    Hashed,
    /// Sorted alpha blending (smooth, sorting artifacts possible).
    Blend,
}

/// Source file type of an import, which decides the texture directory
/// conventions the resolver scans.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ImportType {
    /// FBX export: embedded textures land in a sibling `.fbm` folder, or in
    /// nested `textures/<char>/<object>/<mesh>/<material>` paths.
    Fbx,
    /// OBJ export: a flat `<name>/` texture folder next to the file.
    Obj,
}

fn default_hair_hint() -> String {
    "hair,scalp,beard,mustache,sideburn,ponytail,braid".to_string()
}

fn default_scalp_hint() -> String {
    "base,scalp".to_string()
}

/// User-editable preferences consulted during classification and building.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Prefs {
    /// Blend mode applied to alpha-bearing materials.
    pub blend_mode: BlendPreference,
    /// Comma-separated substrings marking an object/material as hair.
    pub hair_hint: String,
    /// Comma-separated substrings marking a hair-object material as scalp.
    pub hair_scalp_hint: String,
    /// Build the advanced (node-group mixer) materials instead of the basic
    /// texture-to-socket wiring.
    pub advanced_materials: bool,
}

impl Default for Prefs {
    fn default() -> Self {
        Self {
            blend_mode: BlendPreference::default(),
            hair_hint: default_hair_hint(),
            hair_scalp_hint: default_scalp_hint(),
            advanced_materials: true,
        }
    }
}

impl Prefs {
    /// The hair hint list, split and trimmed, lowercase.
    pub fn hair_hints(&self) -> Vec<String> {
        split_hints(&self.hair_hint)
    }

    /// The scalp hint list, split and trimmed, lowercase.
    pub fn scalp_hints(&self) -> Vec<String> {
        split_hints(&self.hair_scalp_hint)
    }
}

fn split_hints(csv: &str) -> Vec<String> {
    csv.split(',')
        .map(|h| h.trim().to_lowercase())
        .filter(|h| !h.is_empty())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hints_split_and_normalize() {
        let prefs = Prefs {
            hair_hint: " Hair, PonyTail ,,beard".to_string(),
            ..Prefs::default()
        };
        assert_eq!(prefs.hair_hints(), vec!["hair", "ponytail", "beard"]);
    }

    #[test]
    fn default_prefs_prefer_hashed() {
        assert_eq!(Prefs::default().blend_mode, BlendPreference::Hashed);
    }
}
