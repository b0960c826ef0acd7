//! The top-level scene document.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::driver::Driver;
use crate::error::SceneError;
use crate::material::Material;
use crate::node::Socket;
use crate::object::{Object, ObjectData};

/// A reusable node-group definition instantiated into the document's group
/// table. Identity is the (logical name, version) pair; stale versions
/// coexist and are only ever shadowed by newer appends, never upgraded in
/// place.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NodeGroup {
    /// Concrete namespaced name, e.g. `"(charkit)(msr_mixer)[1.0.0]"`.
    pub name: String,
    /// Logical library name, e.g. `"msr_mixer"`.
    pub logical: String,
    /// Version string baked into the concrete name.
    pub version: String,
    /// Content fingerprint of the library definition this was built from.
    pub fingerprint: String,
    /// Input interface.
    pub inputs: Vec<Socket>,
    /// Output interface.
    pub outputs: Vec<Socket>,
}

/// The document: objects, materials, the group table, and drivers.
///
/// Serializes to JSON; a document file on disk is the pipeline's stand-in
/// for the host scene file.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Document {
    /// All objects, parent indices pointing into this table.
    #[serde(default)]
    pub objects: Vec<Object>,
    /// All materials; mesh slots index into this table.
    #[serde(default)]
    pub materials: Vec<Material>,
    /// Document-level node-group table.
    #[serde(default)]
    pub node_groups: Vec<NodeGroup>,
    /// All scripted drivers.
    #[serde(default)]
    pub drivers: Vec<Driver>,
}

impl Document {
    /// Creates an empty document.
    pub fn new() -> Self {
        Self::default()
    }

    /// Loads a document from a JSON file.
    pub fn load(path: &Path) -> Result<Self, std::io::Error> {
        let text = std::fs::read_to_string(path)?;
        serde_json::from_str(&text).map_err(std::io::Error::other)
    }

    /// Saves the document as pretty JSON.
    pub fn save(&self, path: &Path) -> Result<(), std::io::Error> {
        let text = serde_json::to_string_pretty(self).map_err(std::io::Error::other)?;
        std::fs::write(path, text)
    }

    /// Looks up an object by name.
    pub fn object(&self, name: &str) -> Result<&Object, SceneError> {
        self.objects
            .iter()
            .find(|o| o.name == name)
            .ok_or_else(|| SceneError::MissingObject(name.to_string()))
    }

    /// Looks up a material by name.
    pub fn material(&self, name: &str) -> Result<&Material, SceneError> {
        self.materials
            .iter()
            .find(|m| m.name == name)
            .ok_or_else(|| SceneError::MissingMaterial(name.to_string()))
    }

    /// Mutable material lookup.
    pub fn material_mut(&mut self, name: &str) -> Result<&mut Material, SceneError> {
        self.materials
            .iter_mut()
            .find(|m| m.name == name)
            .ok_or_else(|| SceneError::MissingMaterial(name.to_string()))
    }

    /// Index of a material by name.
    pub fn material_index(&self, name: &str) -> Option<usize> {
        self.materials.iter().position(|m| m.name == name)
    }

    /// All mesh objects with their indices.
    pub fn meshes(&self) -> impl Iterator<Item = (usize, &Object)> {
        self.objects
            .iter()
            .enumerate()
            .filter(|(_, o)| matches!(o.data, ObjectData::Mesh(_)))
    }

    /// First armature object in the document, by convention the character
    /// root.
    pub fn first_armature(&self) -> Option<&Object> {
        self.objects
            .iter()
            .find(|o| matches!(o.data, ObjectData::Armature(_)))
    }

    /// Finds a concrete node group whose name contains all three of:
    /// the namespace prefix, the logical name, and the version string.
    pub fn find_node_group(
        &self,
        prefix: &str,
        logical: &str,
        version: &str,
    ) -> Option<&NodeGroup> {
        self.node_groups.iter().find(|g| {
            g.name.contains(prefix) && g.name.contains(logical) && g.name.contains(version)
        })
    }

    /// Removes every driver owned by the given subsystem tag.
    pub fn remove_drivers_owned_by(&mut self, owner: &str) {
        self.drivers.retain(|d| d.owner != owner);
    }

    /// The object names of every mesh using the material at `index`.
    pub fn users_of_material(&self, index: usize) -> Vec<&str> {
        self.meshes()
            .filter(|(_, o)| {
                o.as_mesh()
                    .map(|m| m.material_slots.contains(&index))
                    .unwrap_or(false)
            })
            .map(|(_, o)| o.name.as_str())
            .collect()
    }
}
