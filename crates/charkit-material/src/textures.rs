//! Texture file indexing and resolution.
//!
//! The index is built once per import: embedded/cached images are recorded
//! first under synthesized `name_suffix.ext` keys, then the import-type
//! directory conventions are walked. It stays read-only for the rest of
//! the session and is cleared when a new import begins.
//!
//! Resolution is a pure prefix probe: strip the material's `.NNN`
//! duplicate suffix, then for each suffix in a family's priority list look
//! for a registered filename starting with `"{name}_{suffix}."`. First
//! suffix wins; ties inside one suffix resolve by index order (lowercase
//! filename), never by file recency. A miss is a miss — the graph branch
//! is simply omitted.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use charkit_scene::{material::strip_duplicate_suffix, Document};
use charkit_spec::ImportType;
use walkdir::WalkDir;

/// Image extensions the resolver recognizes.
pub const IMAGE_EXTENSIONS: &[&str] = &[
    "png", "jpg", "jpeg", "tga", "bmp", "tif", "tiff", "exr", "hdr", "webp", "dds", "psd", "gif",
    "jp2", "ppm",
];

/// Suffix families, in priority order (first entry wins when several maps
/// exist for one material).
pub mod suffix {
    /// Base color.
    pub const BASE_COLOR: &[&str] = &["diffuse", "albedo", "basecolor", "base_color"];
    /// Subsurface scatter mask.
    pub const SUBSURFACE: &[&str] = &["sssmap", "sss"];
    /// Metallic.
    pub const METALLIC: &[&str] = &["metallic", "metalness"];
    /// Specular level.
    pub const SPECULAR: &[&str] = &["specular", "spec"];
    /// Specular mask.
    pub const SPECULAR_MASK: &[&str] = &["specmask", "specularmask", "hspecmap"];
    /// Roughness.
    pub const ROUGHNESS: &[&str] = &["roughness", "rough"];
    /// Emission.
    pub const EMISSION: &[&str] = &["glow", "emission", "emissive"];
    /// Alpha/opacity.
    pub const ALPHA: &[&str] = &["opacity", "alpha", "transparency"];
    /// Tangent normal.
    pub const NORMAL: &[&str] = &["normal", "nrm"];
    /// Height/bump.
    pub const BUMP: &[&str] = &["bump", "height"];
    /// Color-blend overlay.
    pub const BLEND: &[&str] = &["blend_multiply", "blend"];
    /// Normal-blend overlay.
    pub const NORMAL_BLEND: &[&str] = &["normalblend", "nbmap"];
    /// Ambient occlusion.
    pub const AO: &[&str] = &["ao", "ambientocclusion", "occlusion"];
    /// Micro detail normal.
    pub const MICRO_NORMAL: &[&str] = &["micronormal", "micron"];
    /// Micro detail normal mask.
    pub const MICRO_NORMAL_MASK: &[&str] = &["micronormalmask", "micronmask"];
    /// Mouth interior gradient AO.
    pub const GRADIENT_AO: &[&str] = &["gradao", "gradientao"];
    /// Teeth gums mask.
    pub const GUMS_MASK: &[&str] = &["gumsmask", "gums"];
    /// Sclera color.
    pub const SCLERA: &[&str] = &["sclera"];
    /// Sclera detail normal.
    pub const SCLERA_NORMAL: &[&str] = &["scleranormal", "scleran"];
    /// Hair root mask.
    pub const HAIR_ROOT: &[&str] = &["root"];
    /// Hair strand id map.
    pub const HAIR_ID: &[&str] = &["hairid", "id"];
}

/// One indexed texture file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TextureEntry {
    /// Original filename.
    pub filename: String,
    /// Absolute path.
    pub path: PathBuf,
}

/// The per-import texture file index, keyed by lowercase filename.
///
/// A `BTreeMap` keeps probe order deterministic, which the resolution
/// determinism contract depends on.
#[derive(Debug, Clone, Default)]
pub struct TextureIndex {
    entries: BTreeMap<String, TextureEntry>,
}

impl TextureIndex {
    /// Creates an empty index.
    pub fn new() -> Self {
        Self::default()
    }

    /// Clears the index (a new import begins).
    pub fn clear(&mut self) {
        self.entries.clear();
    }

    /// Number of indexed files.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// True if nothing is indexed.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Registers one file under its lowercase filename. The first
    /// registration of a name wins; later duplicates are ignored.
    pub fn insert(&mut self, path: &Path) {
        let filename = match path.file_name().and_then(|f| f.to_str()) {
            Some(f) => f.to_string(),
            None => return,
        };
        let key = filename.to_lowercase();
        self.entries.entry(key).or_insert(TextureEntry {
            filename,
            path: path.to_path_buf(),
        });
    }

    /// Registers an embedded/cached image under a synthesized
    /// `name_suffix.ext` key so it resolves like an on-disk file.
    pub fn insert_embedded(&mut self, material_name: &str, map_suffix: &str, path: &Path) {
        let ext = path
            .extension()
            .and_then(|e| e.to_str())
            .unwrap_or("png")
            .to_lowercase();
        let stripped = strip_duplicate_suffix(material_name);
        let key = format!("{}_{}.{}", stripped.to_lowercase(), map_suffix, ext);
        self.entries.entry(key.clone()).or_insert(TextureEntry {
            filename: key,
            path: path.to_path_buf(),
        });
    }

    /// Walks one directory (non-recursive past `depth`) registering every
    /// recognized image file.
    fn scan_dir(&mut self, dir: &Path, depth: usize) {
        if !dir.is_dir() {
            return;
        }
        for entry in WalkDir::new(dir)
            .max_depth(depth)
            .sort_by_file_name()
            .into_iter()
            .filter_map(|e| e.ok())
        {
            let path = entry.path();
            if !path.is_file() {
                continue;
            }
            let ext = path
                .extension()
                .and_then(|e| e.to_str())
                .map(|e| e.to_lowercase());
            if let Some(ext) = ext {
                if IMAGE_EXTENSIONS.contains(&ext.as_str()) {
                    self.insert(path);
                }
            }
        }
    }

    /// Builds the directory side of the index for one imported character.
    ///
    /// FBX: a sibling `<stem>.fbm` folder (embedded texture extraction),
    /// plus `textures/<character>/<object>/<mesh-data>/<material>` nested
    /// paths probed per mesh/material triad, each path level stripped of
    /// `.NNN` duplicate suffixes. OBJ: a flat `<stem>/` folder.
    pub fn scan_character_dirs(
        &mut self,
        doc: &Document,
        source_path: &Path,
        import_type: ImportType,
        character_name: &str,
    ) {
        let parent = match source_path.parent() {
            Some(p) => p,
            None => return,
        };
        let stem = source_path
            .file_stem()
            .and_then(|s| s.to_str())
            .unwrap_or_default();

        match import_type {
            ImportType::Fbx => {
                self.scan_dir(&parent.join(format!("{stem}.fbm")), 1);

                let tex_root = parent.join("textures").join(character_name);
                for (_, object) in doc.meshes() {
                    let mesh = match object.as_mesh() {
                        Some(m) => m,
                        None => continue,
                    };
                    for slot in &mesh.material_slots {
                        let mat_name = match doc.materials.get(*slot) {
                            Some(m) => m.name.as_str(),
                            None => continue,
                        };
                        let dir = tex_root
                            .join(strip_duplicate_suffix(&object.name))
                            .join(strip_duplicate_suffix(&mesh.data_name))
                            .join(strip_duplicate_suffix(mat_name));
                        self.scan_dir(&dir, 1);
                    }
                }
            }
            ImportType::Obj => {
                self.scan_dir(&parent.join(stem), 1);
            }
        }
    }

    /// Probes the index for a filename starting with `search` (lowercase).
    pub fn find_prefix(&self, search: &str) -> Option<&TextureEntry> {
        // Position-0 occurrence of the search key, i.e. a prefix match.
        self.entries
            .values()
            .find(|e| e.filename.to_lowercase().find(search) == Some(0))
    }
}

/// Resolves the best texture file for a material and suffix family.
///
/// Pure in (stripped material name, index): running it twice without
/// mutating the index yields the same result.
pub fn find_material_image(
    index: &TextureIndex,
    material_name: &str,
    family: &[&str],
) -> Option<PathBuf> {
    let stripped = strip_duplicate_suffix(material_name).to_lowercase();
    for map_suffix in family {
        let search = format!("{stripped}_{map_suffix}.");
        if let Some(entry) = index.find_prefix(&search) {
            return Some(entry.path.clone());
        }
    }
    None
}
