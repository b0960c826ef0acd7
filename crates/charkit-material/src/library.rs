//! The packaged node-group library.
//!
//! Group interfaces (socket names and defaults) ship as a JSON asset next
//! to the binary; the document directory is probed first so a project can
//! pin its own library copy. A missing asset is the one fatal error in the
//! pipeline: interfaces cannot be synthesized.
//!
//! Instantiation is memoized per document by (logical name, version).
//! Upgrading the library appends new-version groups; stale versions stay
//! in the table until [`NodeGroupLibrary::rebuild_groups`] retargets the
//! group nodes that reference them.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use charkit_scene::{Document, Node, NodeGroup, NodeKind, Socket};
use charkit_spec::NODE_PREFIX;
use serde::Deserialize;

use crate::error::MaterialError;

/// File name of the library asset, looked up under an `assets/` directory.
pub const LIBRARY_FILE: &str = "node_groups.json";

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
struct LibraryFile {
    version: String,
    groups: Vec<GroupDef>,
}

/// One group interface from the library asset.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct GroupDef {
    /// Logical name, e.g. `"msr_mixer"`.
    pub name: String,
    /// Input sockets with defaults.
    #[serde(default)]
    pub inputs: Vec<Socket>,
    /// Output sockets.
    #[serde(default)]
    pub outputs: Vec<Socket>,
}

/// The loaded library: interfaces keyed by logical name, plus the library
/// version and content fingerprint baked into every instantiation.
#[derive(Debug, Clone)]
pub struct NodeGroupLibrary {
    version: String,
    fingerprint: String,
    groups: BTreeMap<String, GroupDef>,
}

impl NodeGroupLibrary {
    /// Loads the asset, probing `<document dir>/assets/` then
    /// `<install dir>/assets/`. Fatal if neither exists.
    pub fn load(document_dir: Option<&Path>, install_dir: &Path) -> Result<Self, MaterialError> {
        let mut searched: Vec<PathBuf> = Vec::new();
        let candidates = document_dir
            .map(|d| d.join("assets").join(LIBRARY_FILE))
            .into_iter()
            .chain(std::iter::once(install_dir.join("assets").join(LIBRARY_FILE)));
        for path in candidates {
            if path.is_file() {
                return Self::from_path(&path);
            }
            searched.push(path);
        }
        Err(MaterialError::LibraryAssetMissing { searched })
    }

    /// Loads the asset from an explicit path.
    pub fn from_path(path: &Path) -> Result<Self, MaterialError> {
        let bytes = std::fs::read(path)?;
        Self::from_bytes(&bytes)
    }

    /// Parses the asset from raw bytes.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, MaterialError> {
        let file: LibraryFile = serde_json::from_slice(bytes)
            .map_err(|e| MaterialError::LibraryAssetMalformed(e.to_string()))?;
        let fingerprint = blake3::hash(bytes).to_hex().to_string();
        let mut groups = BTreeMap::new();
        for def in file.groups {
            let name = def.name.clone();
            if groups.insert(name.clone(), def).is_some() {
                return Err(MaterialError::LibraryAssetMalformed(format!(
                    "duplicate group '{name}'"
                )));
            }
        }
        Ok(Self {
            version: file.version,
            fingerprint,
            groups,
        })
    }

    /// The library version string.
    pub fn version(&self) -> &str {
        &self.version
    }

    /// True if the library defines the logical group.
    pub fn contains(&self, logical: &str) -> bool {
        self.groups.contains_key(logical)
    }

    /// Logical names defined by the library, sorted.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.groups.keys().map(String::as_str)
    }

    /// The namespaced concrete name this library instantiates a logical
    /// group under.
    pub fn concrete_name(&self, logical: &str) -> String {
        format!("{}({})[{}]", NODE_PREFIX, logical, self.version)
    }

    /// Produces a group node referencing the logical group, registering it
    /// in the document group table if this (name, version) is not there
    /// yet. The returned node still needs a tree, a tag, and a location.
    pub fn instantiate(&self, doc: &mut Document, logical: &str) -> Result<Node, MaterialError> {
        self.instantiate_into(&mut doc.node_groups, logical)
    }

    /// [`Self::instantiate`] against a bare group table, for callers that
    /// already hold a mutable borrow elsewhere in the document.
    pub fn instantiate_into(
        &self,
        table: &mut Vec<NodeGroup>,
        logical: &str,
    ) -> Result<Node, MaterialError> {
        let def = self
            .groups
            .get(logical)
            .ok_or_else(|| MaterialError::UnknownNodeGroup(logical.to_string()))?;
        let concrete = self.concrete_name(logical);
        if !table.iter().any(|g| g.name == concrete) {
            table.push(NodeGroup {
                name: concrete.clone(),
                logical: logical.to_string(),
                version: self.version.clone(),
                fingerprint: self.fingerprint.clone(),
                inputs: def.inputs.clone(),
                outputs: def.outputs.clone(),
            });
        }
        Ok(Node::group(
            concrete.clone(),
            &concrete,
            def.inputs.clone(),
            def.outputs.clone(),
        ))
    }

    /// Retargets every owned group node in the document to this library's
    /// version and interface, preserving socket values that still exist.
    /// Stale owned table entries are dropped. Returns the number of group
    /// nodes retargeted.
    pub fn rebuild_groups(&self, doc: &mut Document) -> usize {
        doc.node_groups.retain(|g| !g.name.starts_with(NODE_PREFIX));

        let mut retargeted = 0;
        let mut used: Vec<String> = Vec::new();
        for material in &mut doc.materials {
            let ids: Vec<_> = material.tree.iter().map(|(id, _)| id).collect();
            for id in ids {
                let node = match material.tree.node_mut(id) {
                    Ok(n) => n,
                    Err(_) => continue,
                };
                let group_name = match &node.kind {
                    NodeKind::Group { group } if group.starts_with(NODE_PREFIX) => group.clone(),
                    _ => continue,
                };
                let Some(def) = self
                    .groups
                    .values()
                    .find(|d| group_name.contains(&format!("({})", d.name)))
                else {
                    continue;
                };
                let concrete = self.concrete_name(&def.name);
                node.kind = NodeKind::Group {
                    group: concrete.clone(),
                };
                node.name = concrete;
                node.inputs = merge_sockets(&node.inputs, &def.inputs);
                node.outputs = def.outputs.clone();
                retargeted += 1;
                if !used.contains(&def.name) {
                    used.push(def.name.clone());
                }
            }
        }

        for logical in used {
            let def = &self.groups[&logical];
            doc.node_groups.push(NodeGroup {
                name: self.concrete_name(&logical),
                logical,
                version: self.version.clone(),
                fingerprint: self.fingerprint.clone(),
                inputs: def.inputs.clone(),
                outputs: def.outputs.clone(),
            });
        }
        retargeted
    }
}

/// New interface with old socket values carried over where names survive.
fn merge_sockets(old: &[Socket], new: &[Socket]) -> Vec<Socket> {
    new.iter()
        .map(|socket| {
            old.iter()
                .find(|o| o.name == socket.name)
                .cloned()
                .unwrap_or_else(|| socket.clone())
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use charkit_scene::{Material, SocketValue};

    fn asset(version: &str) -> String {
        format!(
            r#"{{
                "version": "{version}",
                "groups": [
                    {{
                        "name": "msr_mixer",
                        "inputs": [
                            {{"name": "Specular", "value": {{"scalar": 0.5}}}},
                            {{"name": "Roughness", "value": {{"scalar": 0.5}}}}
                        ],
                        "outputs": [
                            {{"name": "Specular", "value": {{"scalar": 0.0}}}},
                            {{"name": "Roughness", "value": {{"scalar": 0.0}}}}
                        ]
                    }}
                ]
            }}"#
        )
    }

    #[test]
    fn instantiation_is_memoized_per_version() {
        let lib = NodeGroupLibrary::from_bytes(asset("1.0.0").as_bytes()).unwrap();
        let mut doc = Document::new();
        let a = lib.instantiate(&mut doc, "msr_mixer").unwrap();
        let b = lib.instantiate(&mut doc, "msr_mixer").unwrap();
        assert_eq!(doc.node_groups.len(), 1);
        assert_eq!(a.name, b.name);
        assert_eq!(a.name, "(charkit)(msr_mixer)[1.0.0]");
    }

    #[test]
    fn unknown_group_is_an_error() {
        let lib = NodeGroupLibrary::from_bytes(asset("1.0.0").as_bytes()).unwrap();
        let mut doc = Document::new();
        assert!(matches!(
            lib.instantiate(&mut doc, "nope"),
            Err(MaterialError::UnknownNodeGroup(_))
        ));
    }

    #[test]
    fn missing_asset_reports_probed_paths() {
        let dir = tempfile::tempdir().unwrap();
        let err = NodeGroupLibrary::load(Some(dir.path()), dir.path()).unwrap_err();
        match err {
            MaterialError::LibraryAssetMissing { searched } => {
                assert_eq!(searched.len(), 2);
            }
            other => panic!("unexpected {other}"),
        }
    }

    #[test]
    fn document_copy_shadows_install_copy() {
        let doc_dir = tempfile::tempdir().unwrap();
        let install_dir = tempfile::tempdir().unwrap();
        std::fs::create_dir(doc_dir.path().join("assets")).unwrap();
        std::fs::create_dir(install_dir.path().join("assets")).unwrap();
        std::fs::write(
            doc_dir.path().join("assets").join(LIBRARY_FILE),
            asset("2.0.0"),
        )
        .unwrap();
        std::fs::write(
            install_dir.path().join("assets").join(LIBRARY_FILE),
            asset("1.0.0"),
        )
        .unwrap();
        let lib = NodeGroupLibrary::load(Some(doc_dir.path()), install_dir.path()).unwrap();
        assert_eq!(lib.version(), "2.0.0");
    }

    #[test]
    fn rebuild_retargets_nodes_and_keeps_values() {
        let old = NodeGroupLibrary::from_bytes(asset("1.0.0").as_bytes()).unwrap();
        let mut doc = Document::new();
        let mut material = Material::new("Std_Skin_Head");
        let node = old.instantiate(&mut doc, "msr_mixer").unwrap();
        let id = material.tree.add(node);
        material.tree.set_input(id, "Specular", 0.9f32).unwrap();
        doc.materials.push(material);

        let new = NodeGroupLibrary::from_bytes(asset("1.1.0").as_bytes()).unwrap();
        let retargeted = new.rebuild_groups(&mut doc);
        assert_eq!(retargeted, 1);
        assert_eq!(doc.node_groups.len(), 1);
        assert_eq!(doc.node_groups[0].version, "1.1.0");

        let tree = &doc.materials[0].tree;
        let node = tree.node(id).unwrap();
        assert_eq!(node.name, "(charkit)(msr_mixer)[1.1.0]");
        assert_eq!(
            tree.input_default(id, "Specular").unwrap(),
            SocketValue::Scalar(0.9)
        );
    }

    #[test]
    fn malformed_asset_is_not_fatal_missing() {
        let err = NodeGroupLibrary::from_bytes(b"{ not json").unwrap_err();
        assert!(matches!(err, MaterialError::LibraryAssetMalformed(_)));
    }
}
