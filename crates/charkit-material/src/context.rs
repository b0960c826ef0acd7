//! Per-character build state.

use std::path::PathBuf;

use charkit_spec::{FacialProfile, ImportType, MaterialParams, Prefs};

use crate::textures::TextureIndex;

/// One imported character: source file, import conventions, the texture
/// index built once at import, and the canonical hair object.
///
/// Created on import; mutated by material builds and rig generation;
/// dropped with the document.
#[derive(Debug, Clone)]
pub struct Character {
    /// Source file the character was imported from.
    pub source_path: PathBuf,
    /// Import type, which decides texture directory conventions.
    pub import_type: ImportType,
    /// Character name (the armature/root name).
    pub name: String,
    /// Blend-shape naming convention of the face meshes.
    pub profile: FacialProfile,
    /// The first hair-bearing object found during a full-character scan.
    /// Once set it stays canonical for the session: hair specular,
    /// roughness and tiling defaults all key off this one object.
    pub hair_object: Option<String>,
    /// Texture file index, built once per import, read-only afterwards.
    pub textures: TextureIndex,
}

impl Character {
    /// Creates a character shell at import time.
    pub fn new(
        source_path: impl Into<PathBuf>,
        import_type: ImportType,
        name: impl Into<String>,
    ) -> Self {
        Self {
            source_path: source_path.into(),
            import_type,
            name: name.into(),
            profile: FacialProfile::default(),
            hair_object: None,
            textures: TextureIndex::new(),
        }
    }

    /// True if the named object is the canonical hair object.
    pub fn is_hair_object(&self, object_name: &str) -> bool {
        self.hair_object
            .as_deref()
            .map(|h| h == object_name)
            .unwrap_or(false)
    }
}

/// Everything one material build reads: the character state, the stored
/// tunables, and the user preferences. Shared immutably across the
/// materials of one build pass.
#[derive(Debug, Clone)]
pub struct BuildContext {
    /// The character being built.
    pub character: Character,
    /// Stored tunable values.
    pub params: MaterialParams,
    /// User preferences (hints, blend mode, advanced toggle).
    pub prefs: Prefs,
}

impl BuildContext {
    /// Creates a context from its parts.
    pub fn new(character: Character, params: MaterialParams, prefs: Prefs) -> Self {
        Self {
            character,
            params,
            prefs,
        }
    }
}
