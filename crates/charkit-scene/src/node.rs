//! Node kinds and their socket layouts.

use charkit_spec::NodeTag;
use serde::{Deserialize, Serialize};

use crate::value::SocketValue;

/// Math node operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum MathOp {
    Add,
    Subtract,
    Multiply,
    Divide,
    Power,
    Minimum,
    Maximum,
}

/// Color mix node blend mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum MixBlend {
    Mix,
    Multiply,
    Overlay,
    Add,
    Screen,
}

/// The typed node vocabulary the assembler can instantiate.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum NodeKind {
    /// Image sampler. `path` is the resolved texture file.
    ImageTexture {
        /// Absolute path of the image file.
        path: String,
        /// True for data maps (normals, masks) that bypass color transform.
        non_color: bool,
    },
    /// Single scalar value.
    Value,
    /// Single RGBA color value.
    Rgb,
    /// Two-input scalar math.
    Math {
        /// Operation applied to the two inputs.
        op: MathOp,
    },
    /// Fac-weighted color mix.
    MixRgb {
        /// Blend mode.
        blend: MixBlend,
    },
    /// Instance of a reusable node group, referenced by concrete
    /// (namespaced, versioned) group name in the document group table.
    Group {
        /// Concrete group name.
        group: String,
    },
    /// The render shader all chains terminate at.
    PrincipledBsdf,
    /// Material output.
    OutputMaterial,
    /// Tangent-space normal map decoder.
    NormalMap,
    /// Height-to-normal bump node.
    Bump,
    /// UV transform (used for micro-normal tiling).
    Mapping,
    /// UV source.
    TextureCoordinate,
    /// Fac-to-color ramp.
    GradientRamp,
    /// Color channel split.
    SeparateRgb,
}

/// A named input or output socket with a default value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Socket {
    /// Socket name, unique per direction per node.
    pub name: String,
    /// Default value used when the socket is unlinked.
    pub value: SocketValue,
}

impl Socket {
    /// Creates a socket.
    pub fn new(name: impl Into<String>, value: impl Into<SocketValue>) -> Self {
        Self {
            name: name.into(),
            value: value.into(),
        }
    }
}

/// One node in a material node tree.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Node {
    /// Display name; generated nodes carry the namespaced parameter-key
    /// name for human readability (never parsed back).
    pub name: String,
    /// Optional label shown under the node.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
    /// What the node is.
    pub kind: NodeKind,
    /// 2D canvas position.
    pub location: (f32, f32),
    /// Input sockets.
    pub inputs: Vec<Socket>,
    /// Output sockets.
    pub outputs: Vec<Socket>,
    /// Structured tag identifying the generated node's role to the
    /// live-update pass; None for nodes the pipeline does not own.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tag: Option<NodeTag>,
}

impl Node {
    /// Creates a node of the given kind with its default socket layout.
    pub fn new(name: impl Into<String>, kind: NodeKind) -> Self {
        let (inputs, outputs) = default_sockets(&kind);
        Self {
            name: name.into(),
            label: None,
            kind,
            location: (0.0, 0.0),
            inputs,
            outputs,
            tag: None,
        }
    }

    /// Creates a group node with sockets copied from a group interface.
    pub fn group(name: impl Into<String>, group: &str, inputs: Vec<Socket>, outputs: Vec<Socket>) -> Self {
        Self {
            name: name.into(),
            label: None,
            kind: NodeKind::Group {
                group: group.to_string(),
            },
            location: (0.0, 0.0),
            inputs,
            outputs,
            tag: None,
        }
    }

    /// Index of a named input socket.
    pub fn input_index(&self, socket: &str) -> Option<usize> {
        self.inputs.iter().position(|s| s.name == socket)
    }

    /// Index of a named output socket.
    pub fn output_index(&self, socket: &str) -> Option<usize> {
        self.outputs.iter().position(|s| s.name == socket)
    }

    /// True for the two anchor nodes a material reset preserves.
    pub fn is_anchor(&self) -> bool {
        matches!(
            self.kind,
            NodeKind::PrincipledBsdf | NodeKind::OutputMaterial
        )
    }
}

/// Default socket layout per node kind, mirroring the host shader nodes the
/// pipeline targets.
fn default_sockets(kind: &NodeKind) -> (Vec<Socket>, Vec<Socket>) {
    fn s(name: &str, value: impl Into<SocketValue>) -> Socket {
        Socket::new(name, value)
    }
    match kind {
        NodeKind::ImageTexture { .. } => (
            vec![s("Vector", [0.0f32; 3])],
            vec![s("Color", [0.0f32, 0.0, 0.0, 1.0]), s("Alpha", 1.0f32)],
        ),
        NodeKind::Value => (vec![], vec![s("Value", 0.0f32)]),
        NodeKind::Rgb => (vec![], vec![s("Color", [1.0f32, 1.0, 1.0, 1.0])]),
        NodeKind::Math { .. } => (
            vec![s("Value1", 0.0f32), s("Value2", 0.0f32)],
            vec![s("Value", 0.0f32)],
        ),
        NodeKind::MixRgb { .. } => (
            vec![
                s("Fac", 0.5f32),
                s("Color1", [0.0f32, 0.0, 0.0, 1.0]),
                s("Color2", [0.0f32, 0.0, 0.0, 1.0]),
            ],
            vec![s("Color", [0.0f32, 0.0, 0.0, 1.0])],
        ),
        // Group sockets come from the group interface; Node::group is the
        // constructor for those.
        NodeKind::Group { .. } => (vec![], vec![]),
        NodeKind::PrincipledBsdf => (
            vec![
                s("Base Color", [0.8f32, 0.8, 0.8, 1.0]),
                s("Subsurface", 0.0f32),
                s("Subsurface Radius", [1.0f32, 0.2, 0.1]),
                s("Subsurface Color", [0.8f32, 0.8, 0.8, 1.0]),
                s("Metallic", 0.0f32),
                s("Specular", 0.5f32),
                s("Roughness", 0.5f32),
                s("Emission", [0.0f32, 0.0, 0.0, 1.0]),
                s("Alpha", 1.0f32),
                s("Normal", [0.0f32; 3]),
                s("Clearcoat", 0.0f32),
                s("Clearcoat Roughness", 0.03f32),
            ],
            vec![s("BSDF", 0.0f32)],
        ),
        NodeKind::OutputMaterial => (vec![s("Surface", 0.0f32)], vec![]),
        NodeKind::NormalMap => (
            vec![s("Strength", 1.0f32), s("Color", [0.5f32, 0.5, 1.0, 1.0])],
            vec![s("Normal", [0.0f32; 3])],
        ),
        NodeKind::Bump => (
            vec![
                s("Strength", 1.0f32),
                s("Distance", 1.0f32),
                s("Height", 1.0f32),
                s("Normal", [0.0f32; 3]),
            ],
            vec![s("Normal", [0.0f32; 3])],
        ),
        NodeKind::Mapping => (
            vec![
                s("Vector", [0.0f32; 3]),
                s("Location", [0.0f32; 3]),
                s("Rotation", [0.0f32; 3]),
                s("Scale", [1.0f32; 3]),
            ],
            vec![s("Vector", [0.0f32; 3])],
        ),
        NodeKind::TextureCoordinate => (vec![], vec![s("UV", [0.0f32; 3])]),
        NodeKind::GradientRamp => (
            vec![s("Fac", 0.5f32)],
            vec![s("Color", [0.0f32, 0.0, 0.0, 1.0]), s("Alpha", 1.0f32)],
        ),
        NodeKind::SeparateRgb => (
            vec![s("Image", [0.0f32, 0.0, 0.0, 1.0])],
            vec![s("R", 0.0f32), s("G", 0.0f32), s("B", 0.0f32)],
        ),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn principled_has_all_terminal_sockets() {
        let node = Node::new("shader", NodeKind::PrincipledBsdf);
        for socket in [
            "Base Color",
            "Subsurface",
            "Metallic",
            "Specular",
            "Roughness",
            "Emission",
            "Alpha",
            "Normal",
            "Clearcoat",
        ] {
            assert!(
                node.input_index(socket).is_some(),
                "missing socket {socket}"
            );
        }
    }

    #[test]
    fn anchor_detection() {
        assert!(Node::new("s", NodeKind::PrincipledBsdf).is_anchor());
        assert!(Node::new("o", NodeKind::OutputMaterial).is_anchor());
        assert!(!Node::new("v", NodeKind::Value).is_anchor());
    }
}
