//! Scripted drivers: a target, an expression tree, and variable bindings.

use charkit_spec::TransformChannel;
use serde::{Deserialize, Serialize};

use crate::expr::Expr;
use crate::object::BoneSpace;

/// What a driver writes to.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum DriverTarget {
    /// A shape-key value on a named mesh object.
    ShapeKey {
        /// Mesh object name.
        object: String,
        /// Shape key name.
        key: String,
    },
    /// One channel of a bone's transform.
    BoneChannel {
        /// Armature object name.
        object: String,
        /// Bone name.
        bone: String,
        /// Driven channel.
        channel: TransformChannel,
    },
}

/// Where a driver variable reads from.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum VarSource {
    /// A bone transform channel in a given space.
    BoneTransform {
        /// Armature object name.
        object: String,
        /// Bone name.
        bone: String,
        /// Read channel.
        channel: TransformChannel,
        /// Space the channel is read in.
        space: BoneSpace,
    },
    /// A shape-key value on a mesh.
    ShapeKey {
        /// Mesh object name.
        object: String,
        /// Shape key name.
        key: String,
    },
    /// A custom scalar property on an object.
    CustomProp {
        /// Owner object name.
        object: String,
        /// Property name.
        prop: String,
    },
}

/// One named variable binding on a driver.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DriverVar {
    /// Variable name referenced by the expression.
    pub name: String,
    /// Value provider.
    pub source: VarSource,
}

impl DriverVar {
    /// Creates a binding.
    pub fn new(name: impl Into<String>, source: VarSource) -> Self {
        Self {
            name: name.into(),
            source,
        }
    }
}

/// A scripted driver. Regenerated wholesale whenever any contributing
/// control changes; there is no incremental expression update.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Driver {
    /// Tag naming the subsystem that created this driver; rebuilds clear
    /// only their own tag and never touch foreign drivers.
    pub owner: String,
    /// What the driver writes.
    pub target: DriverTarget,
    /// The expression tree.
    pub expr: Expr,
    /// Ordered variable bindings.
    pub vars: Vec<DriverVar>,
}

impl Driver {
    /// Creates a driver.
    pub fn new(owner: impl Into<String>, target: DriverTarget, expr: Expr) -> Self {
        Self {
            owner: owner.into(),
            target,
            expr,
            vars: Vec::new(),
        }
    }

    /// Adds a variable binding.
    pub fn with_var(mut self, var: DriverVar) -> Self {
        self.vars.push(var);
        self
    }

    /// True when every variable the expression reads has a binding.
    pub fn is_fully_bound(&self) -> bool {
        self.expr
            .variables()
            .iter()
            .all(|v| self.vars.iter().any(|b| b.name == *v))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fully_bound_check() {
        let driver = Driver::new(
            "charkit_facerig",
            DriverTarget::ShapeKey {
                object: "Head".to_string(),
                key: "Mouth_Open".to_string(),
            },
            Expr::contribution(1.0, "v0", 10.0),
        )
        .with_var(DriverVar::new(
            "v0",
            VarSource::BoneTransform {
                object: "FaceRig".to_string(),
                bone: "ck_jaw_nub".to_string(),
                channel: TransformChannel::LocY,
                space: BoneSpace::LocalSpace,
            },
        ));
        assert!(driver.is_fully_bound());

        let unbound = Driver::new(
            "charkit_facerig",
            DriverTarget::ShapeKey {
                object: "Head".to_string(),
                key: "Mouth_Open".to_string(),
            },
            Expr::contribution(1.0, "v1", 10.0),
        );
        assert!(!unbound.is_fully_bound());
    }
}
