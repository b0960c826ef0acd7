//! CharKit Scene Document
//!
//! An in-memory, serde-serializable model of the slice of a host DCC scene
//! the character pipeline works against: an object hierarchy, meshes with
//! material slots and shape keys, materials owning typed node trees,
//! armatures with bones/constraints, and scripted drivers whose expressions
//! are explicit trees evaluated by [`expr::Expr::eval`] rather than strings
//! fed to an embedded interpreter.
//!
//! All socket and node access returns `Result`; callers decide per call
//! site whether a miss is absorbed (almost always) or propagated.
//!
//! # Modules
//!
//! - [`error`]: Scene access errors
//! - [`value`]: Socket value types
//! - [`node`]: Node kinds and socket layouts
//! - [`tree`]: Node trees (nodes + links)
//! - [`material`]: Materials and blend/shadow modes
//! - [`object`]: Objects, meshes, shape keys, armatures, bones, constraints
//! - [`driver`]: Scripted drivers and variable bindings
//! - [`expr`]: Driver expression trees and the evaluator
//! - [`document`]: The top-level document with JSON load/save

pub mod document;
pub mod driver;
pub mod error;
pub mod expr;
pub mod material;
pub mod node;
pub mod object;
pub mod tree;
pub mod value;

pub use document::{Document, NodeGroup};
pub use driver::{Driver, DriverTarget, DriverVar, VarSource};
pub use error::SceneError;
pub use expr::{EvalContext, Expr, RemapParams};
pub use material::{BlendMethod, Material, ShadowMethod};
pub use node::{MathOp, MixBlend, Node, NodeKind, Socket};
pub use object::{
    Armature, Bone, BoneSpace, Constraint, MeshData, Object, ObjectData, PoseTransform, ShapeKey,
};
pub use tree::{Link, NodeId, NodeTree};
pub use value::SocketValue;
