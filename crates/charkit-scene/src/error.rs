//! Scene access errors.

use thiserror::Error;

/// Errors raised by scene document access.
///
/// Most of these are *absorbed* by the material and rig builders (a missing
/// socket degrades to "this wire doesn't get made"); they are still typed so
/// each call site makes that choice explicitly.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SceneError {
    /// A node id did not resolve (deleted out-of-band or never existed).
    #[error("node {0} not found")]
    MissingNode(u32),

    /// A named socket does not exist on the node (host version mismatch).
    #[error("socket '{socket}' not found on node '{node}'")]
    MissingSocket {
        /// Node name.
        node: String,
        /// Socket name that was requested.
        socket: String,
    },

    /// A socket exists but holds an incompatible value type.
    #[error("socket '{socket}' on '{node}' cannot accept a {given} value")]
    SocketTypeMismatch {
        /// Node name.
        node: String,
        /// Socket name.
        socket: String,
        /// Human name of the value type that was pushed.
        given: &'static str,
    },

    /// A named object does not exist in the document.
    #[error("object '{0}' not found")]
    MissingObject(String),

    /// A named material does not exist in the document.
    #[error("material '{0}' not found")]
    MissingMaterial(String),

    /// A named bone does not exist on the armature.
    #[error("bone '{bone}' not found on armature '{armature}'")]
    MissingBone {
        /// Armature object name.
        armature: String,
        /// Bone name.
        bone: String,
    },

    /// A named shape key does not exist on the mesh.
    #[error("shape key '{key}' not found on mesh '{mesh}'")]
    MissingShapeKey {
        /// Mesh object name.
        mesh: String,
        /// Shape key name.
        key: String,
    },

    /// A node group referenced by name is not in the document group table.
    #[error("node group '{0}' not found")]
    MissingNodeGroup(String),
}
