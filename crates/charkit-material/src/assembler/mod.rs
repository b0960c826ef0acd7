//! The material graph assembler.
//!
//! [`build_material`] is the one entry point: it resets the target
//! material's tree to its shader/output anchors, classifies it, and
//! dispatches to the role builder. Builds are destructive by contract —
//! a rebuild starts from the anchors and manual edits do not survive.
//!
//! Every builder works through [`GraphBuilder`], which owns the warning
//! report and absorbs socket/link misses so one bad wire never aborts the
//! material.

mod eye;
mod generic;
mod mouth;

use charkit_scene::{Document, Node, NodeGroup, NodeId, NodeKind, NodeTree, SocketValue};
use charkit_spec::{MaterialRole, MixerKind, NodeTag, WarningCode, NODE_PREFIX};

use crate::alpha::{apply_alpha_policy, resolve_policy};
use crate::classify::classify;
use crate::context::BuildContext;
use crate::error::MaterialError;
use crate::layout::LayoutCursor;
use crate::library::NodeGroupLibrary;
use crate::params::{mixer_inputs, resolve_param};
use crate::report::BuildReport;
use crate::textures::find_material_image;

/// Builds (or rebuilds) one material's node graph in place.
pub fn build_material(
    doc: &mut Document,
    material_name: &str,
    ctx: &BuildContext,
    library: &NodeGroupLibrary,
) -> Result<BuildReport, MaterialError> {
    let index = doc
        .material_index(material_name)
        .ok_or_else(|| charkit_scene::SceneError::MissingMaterial(material_name.to_string()))?;
    let object_name = doc
        .users_of_material(index)
        .first()
        .map(|s| s.to_string())
        .unwrap_or_default();

    let role = classify(
        &object_name,
        material_name,
        &ctx.prefs,
        ctx.character.hair_object.as_deref(),
    );

    // Split borrow: the tree lives in the material table, group
    // instantiation appends to the group table.
    let groups = &mut doc.node_groups;
    let material = &mut doc.materials[index];
    let stripped = material.stripped_name().to_string();

    let (shader, output) = reset_tree(&mut material.tree);
    let mut builder = GraphBuilder {
        tree: &mut material.tree,
        groups,
        library,
        ctx,
        role,
        stripped,
        shader,
        output,
        report: BuildReport::new(),
    };

    let advanced = ctx.prefs.advanced_materials;
    match role {
        MaterialRole::Eye => {
            if advanced {
                eye::build_eye_advanced(&mut builder);
            } else {
                eye::build_eye_basic(&mut builder);
            }
        }
        MaterialRole::EyeOcclusion => eye::build_occlusion(&mut builder),
        MaterialRole::Tearline => eye::build_tearline(&mut builder),
        MaterialRole::TeethUpper | MaterialRole::TeethLower if advanced => {
            mouth::build_teeth(&mut builder)
        }
        MaterialRole::Tongue if advanced => mouth::build_tongue(&mut builder),
        _ => {
            if advanced {
                generic::build_advanced(&mut builder);
            } else {
                generic::build_basic(&mut builder);
            }
        }
    }

    let mut report = builder.report;
    report.processed = 1;

    let policy = resolve_policy(&doc.materials[index], role, ctx.prefs.blend_mode);
    apply_alpha_policy(&mut doc.materials[index], policy);

    Ok(report)
}

/// The logical library group a (mixer, role) pair instantiates, or None
/// for mixers realized as native nodes (value, bump) instead of groups.
pub(crate) fn group_logical(mixer: MixerKind, role: MaterialRole) -> Option<&'static str> {
    match mixer {
        MixerKind::Color => Some(if role.is_skin() {
            "color_skin_mixer"
        } else if matches!(role, MaterialRole::Hair | MaterialRole::Scalp) {
            "color_hair_mixer"
        } else if role == MaterialRole::Eye {
            "color_eye_mixer"
        } else if role.is_teeth() {
            "color_teeth_mixer"
        } else if role == MaterialRole::Tongue {
            "color_tongue_mixer"
        } else {
            "color_blend_mixer"
        }),
        MixerKind::Subsurface => Some("sss_mixer"),
        MixerKind::Msr => Some("msr_mixer"),
        MixerKind::Normal => Some("normal_mixer"),
        MixerKind::Tiling => Some("tiling_mapping"),
        MixerKind::IrisMask => Some("iris_mask"),
        MixerKind::TeethGradient => Some("teeth_gradient"),
        MixerKind::TongueGradient => Some("tongue_gradient"),
        MixerKind::Alpha => (role == MaterialRole::EyeOcclusion).then_some("occlusion_mask"),
        MixerKind::Emission | MixerKind::Bump => None,
    }
}

/// Strips the tree back to its anchors, creating them if the material was
/// empty, and returns (shader, output).
fn reset_tree(tree: &mut NodeTree) -> (NodeId, NodeId) {
    tree.remove_non_anchors();
    let shader = tree
        .find_kind(|k| matches!(k, NodeKind::PrincipledBsdf))
        .unwrap_or_else(|| tree.add(Node::new("Principled BSDF", NodeKind::PrincipledBsdf)));
    let output = tree
        .find_kind(|k| matches!(k, NodeKind::OutputMaterial))
        .unwrap_or_else(|| tree.add(Node::new("Material Output", NodeKind::OutputMaterial)));
    if let Ok(node) = tree.node_mut(shader) {
        node.location = (0.0, 0.0);
    }
    if let Ok(node) = tree.node_mut(output) {
        node.location = (crate::layout::COLUMN_WIDTH, 0.0);
    }
    // The anchor link may already exist; relinking replaces it harmlessly.
    let _ = tree.link(shader, "BSDF", output, "Surface");
    (shader, output)
}

/// Shared builder state for one material build.
pub(crate) struct GraphBuilder<'a> {
    pub tree: &'a mut NodeTree,
    pub groups: &'a mut Vec<NodeGroup>,
    pub library: &'a NodeGroupLibrary,
    pub ctx: &'a BuildContext,
    pub role: MaterialRole,
    /// Material name with the duplicate suffix stripped; texture lookups
    /// key off this.
    pub stripped: String,
    pub shader: NodeId,
    pub output: NodeId,
    pub report: BuildReport,
}

impl GraphBuilder<'_> {
    /// True if a texture exists for the family without creating a node.
    pub fn has_image(&self, family: &[&str]) -> bool {
        find_material_image(&self.ctx.character.textures, &self.stripped, family).is_some()
    }

    /// Adds an image node for the family at the cursor, if a file
    /// resolves. Does not warn; callers warn for maps they consider
    /// essential.
    pub fn image(
        &mut self,
        family: &[&str],
        non_color: bool,
        cursor: &mut LayoutCursor,
    ) -> Option<NodeId> {
        let path = find_material_image(&self.ctx.character.textures, &self.stripped, family)?;
        let name = path
            .file_name()
            .map(|f| f.to_string_lossy().into_owned())
            .unwrap_or_else(|| family[0].to_string());
        let mut node = Node::new(
            name,
            NodeKind::ImageTexture {
                path: path.display().to_string(),
                non_color,
            },
        );
        let at = cursor.place();
        node.location = (at[0], at[1]);
        Some(self.tree.add(node))
    }

    /// Like [`Self::image`], warning when the family resolves nothing.
    pub fn required_image(
        &mut self,
        family: &[&str],
        non_color: bool,
        cursor: &mut LayoutCursor,
    ) -> Option<NodeId> {
        let found = self.image(family, non_color, cursor);
        if found.is_none() {
            self.report.warn(
                WarningCode::TextureNotFound,
                format!("no '{}' texture for material '{}'", family[0], self.stripped),
            );
        }
        found
    }

    /// Instantiates a library group as a tagged mixer node and seeds its
    /// parameter sockets from the resolution table. A missing logical
    /// group drops the mixer's contribution with a warning.
    pub fn mixer(&mut self, mixer: MixerKind, logical: &str, at: [f32; 2]) -> Option<NodeId> {
        let mut node = match self.library.instantiate_into(self.groups, logical) {
            Ok(n) => n,
            Err(e) => {
                self.report
                    .warn(WarningCode::ContributionDropped, e.to_string());
                return None;
            }
        };
        let tag = NodeTag::new(mixer, self.role, resolve_param(mixer, self.role));
        node.name = tag.node_name(NODE_PREFIX, self.library.version());
        node.tag = Some(tag);
        node.location = (at[0], at[1]);
        let id = self.tree.add(node);
        for (socket, value) in mixer_inputs(&self.ctx.params, mixer, self.role) {
            // Sockets from the table that the group interface lacks are
            // individually absorbed; the mixer keeps its other values.
            self.set(id, socket, value);
        }
        Some(id)
    }

    /// Adds a tagged scalar Value node.
    pub fn value_node(&mut self, mixer: MixerKind, value: f32, at: [f32; 2]) -> NodeId {
        let tag = NodeTag::new(mixer, self.role, resolve_param(mixer, self.role));
        let mut node = Node::new(
            tag.node_name(NODE_PREFIX, self.library.version()),
            NodeKind::Value,
        );
        node.tag = Some(tag);
        node.location = (at[0], at[1]);
        let id = self.tree.add(node);
        let _ = self.tree.set_output(id, "Value", value);
        id
    }

    /// Links two sockets, absorbing a miss into the report.
    pub fn link(&mut self, from: NodeId, from_socket: &str, to: NodeId, to_socket: &str) -> bool {
        let result = self.tree.link(from, from_socket, to, to_socket);
        self.report.absorb(result)
    }

    /// Writes an input default, absorbing a miss into the report.
    pub fn set(&mut self, id: NodeId, socket: &str, value: impl Into<SocketValue>) -> bool {
        let result = self.tree.set_input(id, socket, value);
        self.report.absorb(result)
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::context::Character;
    use crate::library::NodeGroupLibrary;
    use charkit_scene::{Material, MeshData, Object};
    use charkit_spec::{ImportType, MaterialParams, Prefs};

    pub(crate) fn test_library() -> NodeGroupLibrary {
        let asset = std::fs::read(
            std::path::Path::new(env!("CARGO_MANIFEST_DIR"))
                .join("../../assets/node_groups.json"),
        )
        .expect("packaged library asset");
        NodeGroupLibrary::from_bytes(&asset).expect("asset parses")
    }

    pub(crate) fn test_context() -> BuildContext {
        BuildContext::new(
            Character::new("c.fbx", ImportType::Fbx, "C"),
            MaterialParams::default(),
            Prefs::default(),
        )
    }

    pub(crate) fn doc_with_material(object: &str, material: &str) -> Document {
        let mut doc = Document::new();
        doc.materials.push(Material::new(material));
        doc.objects.push(Object::mesh(
            object,
            MeshData {
                data_name: format!("{object}_mesh"),
                material_slots: vec![0],
                shape_keys: Vec::new(),
            },
        ));
        doc
    }

    fn count_tagged(doc: &Document, name: &str) -> usize {
        doc.material(name)
            .unwrap()
            .tree
            .iter()
            .filter(|(_, n)| n.tag.is_some())
            .count()
    }

    #[test]
    fn build_is_idempotent() {
        let library = test_library();
        let ctx = test_context();
        let mut doc = doc_with_material("Body", "Std_Skin_Head");

        build_material(&mut doc, "Std_Skin_Head", &ctx, &library).unwrap();
        let first = count_tagged(&doc, "Std_Skin_Head");
        let first_len = doc.material("Std_Skin_Head").unwrap().tree.len();
        let first_groups = doc.node_groups.len();

        build_material(&mut doc, "Std_Skin_Head", &ctx, &library).unwrap();
        assert_eq!(count_tagged(&doc, "Std_Skin_Head"), first);
        assert_eq!(doc.material("Std_Skin_Head").unwrap().tree.len(), first_len);
        // Group instantiation is memoized; a rebuild adds no table entries.
        assert_eq!(doc.node_groups.len(), first_groups);
    }

    #[test]
    fn rebuild_discards_manual_edits() {
        let library = test_library();
        let ctx = test_context();
        let mut doc = doc_with_material("Body", "Std_Skin_Head");
        build_material(&mut doc, "Std_Skin_Head", &ctx, &library).unwrap();

        let stray = doc
            .material_mut("Std_Skin_Head")
            .unwrap()
            .tree
            .add(Node::new("manual", NodeKind::Value));
        build_material(&mut doc, "Std_Skin_Head", &ctx, &library).unwrap();
        assert!(doc.material("Std_Skin_Head").unwrap().tree.node(stray).is_err());
    }

    #[test]
    fn anchors_survive_and_stay_linked() {
        let library = test_library();
        let ctx = test_context();
        let mut doc = doc_with_material("Shirt", "Cotton");
        build_material(&mut doc, "Cotton", &ctx, &library).unwrap();

        let tree = &doc.material("Cotton").unwrap().tree;
        let shader = tree
            .find_kind(|k| matches!(k, NodeKind::PrincipledBsdf))
            .unwrap();
        let output = tree
            .find_kind(|k| matches!(k, NodeKind::OutputMaterial))
            .unwrap();
        assert!(tree
            .links()
            .iter()
            .any(|l| l.from_node == shader && l.to_node == output));
    }

    #[test]
    fn missing_material_is_an_error() {
        let library = test_library();
        let ctx = test_context();
        let mut doc = Document::new();
        assert!(build_material(&mut doc, "Nope", &ctx, &library).is_err());
    }

    #[test]
    fn every_generated_node_is_tagged_or_anchor_or_support() {
        let library = test_library();
        let ctx = test_context();
        let mut doc = doc_with_material("Body", "Std_Skin_Head");
        build_material(&mut doc, "Std_Skin_Head", &ctx, &library).unwrap();
        for (_, node) in doc.material("Std_Skin_Head").unwrap().tree.iter() {
            let owned = node.tag.is_some()
                || node.is_anchor()
                || matches!(
                    node.kind,
                    NodeKind::ImageTexture { .. } | NodeKind::Bump | NodeKind::NormalMap
                );
            assert!(owned, "unexpected untagged node {}", node.name);
        }
    }
}
