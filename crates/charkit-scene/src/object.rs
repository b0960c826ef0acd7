//! Objects, meshes, shape keys, armatures, bones and constraints.

use serde::{Deserialize, Serialize};

/// Space a constraint or driver variable reads transforms in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum BoneSpace {
    /// Bone-local space (the rig compiler reads controls here).
    #[default]
    LocalSpace,
    /// Armature space.
    PoseSpace,
    /// World space.
    WorldSpace,
}

/// Pose transform channels of one bone.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PoseTransform {
    /// Local translation.
    pub location: [f32; 3],
    /// Local euler rotation (radians).
    pub rotation_euler: [f32; 3],
    /// Local scale.
    pub scale: [f32; 3],
}

impl Default for PoseTransform {
    fn default() -> Self {
        Self {
            location: [0.0; 3],
            rotation_euler: [0.0; 3],
            scale: [1.0; 3],
        }
    }
}

/// A bone constraint. The rig compiler only creates the subset below and
/// clears only the ones it owns (by name prefix) on rebuild.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Constraint {
    /// Clamp local location per axis.
    LimitLocation {
        /// Constraint name (ownership scoping).
        name: String,
        /// Per-axis minimum (only applied where `use_min` is true).
        min: [f32; 3],
        /// Per-axis maximum (only applied where `use_max` is true).
        max: [f32; 3],
        /// Which axes the minimum applies to.
        use_min: [bool; 3],
        /// Which axes the maximum applies to.
        use_max: [bool; 3],
        /// Space the limits are expressed in.
        space: BoneSpace,
    },
    /// Clamp local rotation per axis.
    LimitRotation {
        /// Constraint name.
        name: String,
        /// Per-axis minimum (radians).
        min: [f32; 3],
        /// Per-axis maximum (radians).
        max: [f32; 3],
        /// Space the limits are expressed in.
        space: BoneSpace,
    },
    /// Copy another bone's location.
    CopyLocation {
        /// Constraint name.
        name: String,
        /// Source bone.
        target: String,
        /// Blend factor.
        influence: f32,
    },
    /// Copy another bone's rotation.
    CopyRotation {
        /// Constraint name.
        name: String,
        /// Source bone.
        target: String,
        /// Blend factor.
        influence: f32,
    },
    /// Aim at another bone.
    TrackTo {
        /// Constraint name.
        name: String,
        /// Target bone.
        target: String,
    },
    /// Parent to another bone while keeping the offset.
    ChildOf {
        /// Constraint name.
        name: String,
        /// Parent bone.
        target: String,
    },
}

impl Constraint {
    /// The constraint's name, whatever its kind.
    pub fn name(&self) -> &str {
        match self {
            Constraint::LimitLocation { name, .. }
            | Constraint::LimitRotation { name, .. }
            | Constraint::CopyLocation { name, .. }
            | Constraint::CopyRotation { name, .. }
            | Constraint::TrackTo { name, .. }
            | Constraint::ChildOf { name, .. } => name,
        }
    }
}

/// One bone of an armature.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Bone {
    /// Bone name, unique per armature.
    pub name: String,
    /// Parent bone name.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parent: Option<String>,
    /// Rest head position.
    pub head: [f32; 3],
    /// Rest tail position.
    pub tail: [f32; 3],
    /// Bone collections this bone belongs to (ownership scoping).
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub collections: Vec<String>,
    /// Name of the custom display shape object.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub custom_shape: Option<String>,
    /// Constraint stack.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub constraints: Vec<Constraint>,
    /// Live pose transform.
    #[serde(default)]
    pub pose: PoseTransform,
}

impl Bone {
    /// Creates a bone spanning head to tail.
    pub fn new(name: impl Into<String>, head: [f32; 3], tail: [f32; 3]) -> Self {
        Self {
            name: name.into(),
            parent: None,
            head,
            tail,
            collections: Vec::new(),
            custom_shape: None,
            constraints: Vec::new(),
            pose: PoseTransform::default(),
        }
    }

    /// Rest length of the bone.
    pub fn length(&self) -> f32 {
        let d = [
            self.tail[0] - self.head[0],
            self.tail[1] - self.head[1],
            self.tail[2] - self.head[2],
        ];
        (d[0] * d[0] + d[1] * d[1] + d[2] * d[2]).sqrt()
    }
}

/// Armature data.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Armature {
    /// All bones.
    pub bones: Vec<Bone>,
    /// Custom scalar properties (ARKit proxy tuning lives here).
    #[serde(default, skip_serializing_if = "std::collections::BTreeMap::is_empty")]
    pub custom_props: std::collections::BTreeMap<String, f64>,
}

impl Armature {
    /// Looks up a bone by name.
    pub fn bone(&self, name: &str) -> Option<&Bone> {
        self.bones.iter().find(|b| b.name == name)
    }

    /// Mutable bone lookup.
    pub fn bone_mut(&mut self, name: &str) -> Option<&mut Bone> {
        self.bones.iter_mut().find(|b| b.name == name)
    }

    /// Removes every bone that belongs to the given collection.
    pub fn remove_collection(&mut self, collection: &str) {
        self.bones
            .retain(|b| !b.collections.iter().any(|c| c == collection));
    }
}

/// One shape key on a mesh.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ShapeKey {
    /// Shape key name.
    pub name: String,
    /// Current value.
    #[serde(default)]
    pub value: f64,
    /// Slider minimum.
    #[serde(default)]
    pub min: f64,
    /// Slider maximum.
    #[serde(default = "default_key_max")]
    pub max: f64,
}

fn default_key_max() -> f64 {
    1.0
}

impl ShapeKey {
    /// Creates a shape key with the default [0, 1] slider range.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            value: 0.0,
            min: 0.0,
            max: 1.0,
        }
    }
}

/// Mesh data attached to a mesh object.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct MeshData {
    /// Mesh-data name (distinct from the object name; the texture resolver
    /// scans both).
    pub data_name: String,
    /// Indices into the document material table, one per slot.
    #[serde(default)]
    pub material_slots: Vec<usize>,
    /// Shape keys.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub shape_keys: Vec<ShapeKey>,
}

impl MeshData {
    /// Looks up a shape key by name.
    pub fn shape_key(&self, name: &str) -> Option<&ShapeKey> {
        self.shape_keys.iter().find(|k| k.name == name)
    }
}

/// Per-kind object payload; the kind tag of the host's object model falls
/// out of the variant.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ObjectData {
    /// Mesh object.
    Mesh(MeshData),
    /// Armature object.
    Armature(Armature),
    /// Empty/locator.
    Empty,
    /// Light.
    Light,
    /// Camera.
    Camera,
}

/// One scene object.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Object {
    /// Object name (classification input).
    pub name: String,
    /// Parent object index in the document.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parent: Option<usize>,
    /// The object's data payload.
    pub data: ObjectData,
}

impl Object {
    /// Creates a mesh object.
    pub fn mesh(name: impl Into<String>, data: MeshData) -> Self {
        Self {
            name: name.into(),
            parent: None,
            data: ObjectData::Mesh(data),
        }
    }

    /// Creates an armature object.
    pub fn armature(name: impl Into<String>, data: Armature) -> Self {
        Self {
            name: name.into(),
            parent: None,
            data: ObjectData::Armature(data),
        }
    }

    /// The mesh payload, if this is a mesh.
    pub fn as_mesh(&self) -> Option<&MeshData> {
        match &self.data {
            ObjectData::Mesh(m) => Some(m),
            _ => None,
        }
    }

    /// The armature payload, if this is an armature.
    pub fn as_armature(&self) -> Option<&Armature> {
        match &self.data {
            ObjectData::Armature(a) => Some(a),
            _ => None,
        }
    }
}
