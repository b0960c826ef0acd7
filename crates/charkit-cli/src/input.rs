//! Input loading and shared command plumbing.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use charkit_material::{scan_for_hair_object, BuildContext, Character, NodeGroupLibrary};
use charkit_scene::Document;
use charkit_spec::{ImportType, MaterialParams, Prefs};
use regex::Regex;
use serde::de::DeserializeOwned;

/// Loads a scene document JSON file.
pub fn load_document(path: &Path) -> Result<Document> {
    Document::load(path).with_context(|| format!("loading document {}", path.display()))
}

/// Saves a document, defaulting to overwriting its source path.
pub fn save_document(doc: &Document, source: &Path, output: Option<&Path>) -> Result<()> {
    let target = output.unwrap_or(source);
    doc.save(target)
        .with_context(|| format!("saving document {}", target.display()))
}

/// Loads an optional JSON config, falling back to defaults when no path
/// is given.
pub fn load_json_or_default<T: DeserializeOwned + Default>(
    path: Option<&Path>,
    what: &str,
) -> Result<T> {
    match path {
        Some(path) => {
            let text = std::fs::read_to_string(path)
                .with_context(|| format!("reading {what} {}", path.display()))?;
            serde_json::from_str(&text)
                .with_context(|| format!("parsing {what} {}", path.display()))
        }
        None => Ok(T::default()),
    }
}

/// Directory packaged assets are resolved against when the document
/// directory has no pinned copy.
pub fn install_dir() -> PathBuf {
    std::env::current_exe()
        .ok()
        .and_then(|p| p.parent().map(Path::to_path_buf))
        .unwrap_or_else(|| PathBuf::from("."))
}

/// The directory of a document path, for asset probing.
pub fn document_dir(path: &Path) -> Option<&Path> {
    path.parent().filter(|p| !p.as_os_str().is_empty())
}

/// Loads the node-group library for a document.
pub fn load_library(doc_path: &Path) -> Result<NodeGroupLibrary> {
    Ok(NodeGroupLibrary::load(
        document_dir(doc_path),
        &install_dir(),
    )?)
}

/// Assembles the per-character build context: texture scan plus the
/// canonical-hair-object scan.
pub fn build_context(
    doc: &Document,
    source_path: &Path,
    import_type: ImportType,
    params: MaterialParams,
    prefs: Prefs,
) -> BuildContext {
    let name = doc
        .first_armature()
        .map(|o| o.name.clone())
        .or_else(|| {
            source_path
                .file_stem()
                .and_then(|s| s.to_str())
                .map(str::to_string)
        })
        .unwrap_or_else(|| "Character".to_string());

    let mut character = Character::new(source_path, import_type, name.clone());
    character
        .textures
        .scan_character_dirs(doc, source_path, import_type, &name);
    scan_for_hair_object(doc, &mut character, &prefs);
    BuildContext::new(character, params, prefs)
}

/// Resolves the material names a command operates on: an explicit
/// selection wins, then a name regex, then every material.
pub fn select_materials(
    doc: &Document,
    selection: &[String],
    filter: Option<&str>,
) -> Result<Vec<String>> {
    if !selection.is_empty() {
        return Ok(selection.to_vec());
    }
    let names = doc.materials.iter().map(|m| m.name.clone());
    match filter {
        Some(pattern) => {
            let re = Regex::new(pattern)
                .with_context(|| format!("invalid material filter '{pattern}'"))?;
            Ok(names.filter(|n| re.is_match(n)).collect())
        }
        None => Ok(names.collect()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use charkit_scene::Material;
    use pretty_assertions::assert_eq;

    fn doc() -> Document {
        let mut doc = Document::new();
        for name in ["Std_Skin_Head", "Std_Skin_Body", "Hair"] {
            doc.materials.push(Material::new(name));
        }
        doc
    }

    #[test]
    fn explicit_selection_wins_over_filter() {
        let names =
            select_materials(&doc(), &["Hair".to_string()], Some("Skin")).unwrap();
        assert_eq!(names, vec!["Hair".to_string()]);
    }

    #[test]
    fn filter_narrows_by_regex() {
        let names = select_materials(&doc(), &[], Some("^Std_Skin")).unwrap();
        assert_eq!(
            names,
            vec!["Std_Skin_Head".to_string(), "Std_Skin_Body".to_string()]
        );
    }

    #[test]
    fn no_selection_means_all() {
        assert_eq!(select_materials(&doc(), &[], None).unwrap().len(), 3);
    }

    #[test]
    fn bad_filter_is_an_error() {
        assert!(select_materials(&doc(), &[], Some("(")).is_err());
    }

    #[test]
    fn missing_config_falls_back_to_defaults() {
        let prefs: Prefs = load_json_or_default(None, "prefs").unwrap();
        assert_eq!(prefs, Prefs::default());
    }
}
