//! Material node trees: an arena of nodes plus named-socket links.

use serde::{Deserialize, Serialize};

use crate::error::SceneError;
use crate::node::{Node, NodeKind};
use crate::value::SocketValue;

/// Stable handle to a node within one tree. Slots are never reused within
/// a tree's lifetime, so a stale id resolves to a missing-node error rather
/// than a different node.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct NodeId(pub u32);

/// A directed link from an output socket to an input socket.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Link {
    /// Source node.
    pub from_node: NodeId,
    /// Source output socket name.
    pub from_socket: String,
    /// Destination node.
    pub to_node: NodeId,
    /// Destination input socket name.
    pub to_socket: String,
}

/// One material's node graph.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct NodeTree {
    nodes: Vec<Option<Node>>,
    links: Vec<Link>,
}

impl NodeTree {
    /// Creates an empty tree.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a node, returning its handle.
    pub fn add(&mut self, node: Node) -> NodeId {
        let id = NodeId(self.nodes.len() as u32);
        self.nodes.push(Some(node));
        id
    }

    /// Removes a node and every link touching it.
    pub fn remove(&mut self, id: NodeId) {
        if let Some(slot) = self.nodes.get_mut(id.0 as usize) {
            *slot = None;
        }
        self.links
            .retain(|l| l.from_node != id && l.to_node != id);
    }

    /// Removes every node that is not a shader/output anchor. This is the
    /// hard reset a material rebuild starts from; manual edits to built
    /// graphs do not survive it.
    pub fn remove_non_anchors(&mut self) {
        let doomed: Vec<NodeId> = self
            .iter()
            .filter(|(_, n)| !n.is_anchor())
            .map(|(id, _)| id)
            .collect();
        for id in doomed {
            self.remove(id);
        }
    }

    /// Borrows a node.
    pub fn node(&self, id: NodeId) -> Result<&Node, SceneError> {
        self.nodes
            .get(id.0 as usize)
            .and_then(|n| n.as_ref())
            .ok_or(SceneError::MissingNode(id.0))
    }

    /// Mutably borrows a node.
    pub fn node_mut(&mut self, id: NodeId) -> Result<&mut Node, SceneError> {
        self.nodes
            .get_mut(id.0 as usize)
            .and_then(|n| n.as_mut())
            .ok_or(SceneError::MissingNode(id.0))
    }

    /// Iterates live nodes with their ids.
    pub fn iter(&self) -> impl Iterator<Item = (NodeId, &Node)> {
        self.nodes
            .iter()
            .enumerate()
            .filter_map(|(i, n)| n.as_ref().map(|n| (NodeId(i as u32), n)))
    }

    /// Number of live nodes.
    pub fn len(&self) -> usize {
        self.nodes.iter().filter(|n| n.is_some()).count()
    }

    /// True if no live nodes remain.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// All links.
    pub fn links(&self) -> &[Link] {
        &self.links
    }

    /// First live node of the given kind.
    pub fn find_kind(&self, want: impl Fn(&NodeKind) -> bool) -> Option<NodeId> {
        self.iter().find(|(_, n)| want(&n.kind)).map(|(id, _)| id)
    }

    /// Connects an output socket to an input socket, replacing any existing
    /// link into that input. Both sockets must exist.
    pub fn link(
        &mut self,
        from_node: NodeId,
        from_socket: &str,
        to_node: NodeId,
        to_socket: &str,
    ) -> Result<(), SceneError> {
        let from = self.node(from_node)?;
        if from.output_index(from_socket).is_none() {
            return Err(SceneError::MissingSocket {
                node: from.name.clone(),
                socket: from_socket.to_string(),
            });
        }
        let to = self.node(to_node)?;
        if to.input_index(to_socket).is_none() {
            return Err(SceneError::MissingSocket {
                node: to.name.clone(),
                socket: to_socket.to_string(),
            });
        }
        self.links
            .retain(|l| !(l.to_node == to_node && l.to_socket == to_socket));
        self.links.push(Link {
            from_node,
            from_socket: from_socket.to_string(),
            to_node,
            to_socket: to_socket.to_string(),
        });
        Ok(())
    }

    /// True if anything links into the given input socket.
    pub fn is_input_linked(&self, node: NodeId, socket: &str) -> bool {
        self.links
            .iter()
            .any(|l| l.to_node == node && l.to_socket == socket)
    }

    /// Writes an input socket's default value, coercing scalars into
    /// vector/color sockets.
    pub fn set_input(
        &mut self,
        id: NodeId,
        socket: &str,
        value: impl Into<SocketValue>,
    ) -> Result<(), SceneError> {
        let value = value.into();
        let node = self.node_mut(id)?;
        let name = node.name.clone();
        let index = node.input_index(socket).ok_or(SceneError::MissingSocket {
            node: name.clone(),
            socket: socket.to_string(),
        })?;
        let slot = &mut node.inputs[index];
        match slot.value.coerce(value) {
            Some(coerced) => {
                slot.value = coerced;
                Ok(())
            }
            None => Err(SceneError::SocketTypeMismatch {
                node: name,
                socket: socket.to_string(),
                given: value.type_name(),
            }),
        }
    }

    /// Reads an input socket's default value.
    pub fn input_default(&self, id: NodeId, socket: &str) -> Result<SocketValue, SceneError> {
        let node = self.node(id)?;
        let index = node.input_index(socket).ok_or(SceneError::MissingSocket {
            node: node.name.clone(),
            socket: socket.to_string(),
        })?;
        Ok(node.inputs[index].value)
    }

    /// Writes an output socket's default value (Value/RGB nodes).
    pub fn set_output(
        &mut self,
        id: NodeId,
        socket: &str,
        value: impl Into<SocketValue>,
    ) -> Result<(), SceneError> {
        let value = value.into();
        let node = self.node_mut(id)?;
        let name = node.name.clone();
        let index = node.output_index(socket).ok_or(SceneError::MissingSocket {
            node: name.clone(),
            socket: socket.to_string(),
        })?;
        let slot = &mut node.outputs[index];
        match slot.value.coerce(value) {
            Some(coerced) => {
                slot.value = coerced;
                Ok(())
            }
            None => Err(SceneError::SocketTypeMismatch {
                node: name,
                socket: socket.to_string(),
                given: value.type_name(),
            }),
        }
    }

    /// Moves a block of nodes by a shared offset (used to relocate the
    /// iris-mask region as one unit).
    pub fn translate(&mut self, ids: &[NodeId], dx: f32, dy: f32) {
        for id in ids {
            if let Ok(node) = self.node_mut(*id) {
                node.location.0 += dx;
                node.location.1 += dy;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::node::MathOp;

    fn math() -> Node {
        Node::new("m", NodeKind::Math { op: MathOp::Multiply })
    }

    #[test]
    fn link_validates_both_sockets() {
        let mut tree = NodeTree::new();
        let a = tree.add(math());
        let b = tree.add(math());
        assert!(tree.link(a, "Value", b, "Value1").is_ok());
        assert!(matches!(
            tree.link(a, "Nope", b, "Value1"),
            Err(SceneError::MissingSocket { .. })
        ));
        assert!(matches!(
            tree.link(a, "Value", b, "Nope"),
            Err(SceneError::MissingSocket { .. })
        ));
    }

    #[test]
    fn relink_replaces_existing_input_link() {
        let mut tree = NodeTree::new();
        let a = tree.add(math());
        let b = tree.add(math());
        let c = tree.add(math());
        tree.link(a, "Value", c, "Value1").unwrap();
        tree.link(b, "Value", c, "Value1").unwrap();
        let into_c: Vec<_> = tree
            .links()
            .iter()
            .filter(|l| l.to_node == c && l.to_socket == "Value1")
            .collect();
        assert_eq!(into_c.len(), 1);
        assert_eq!(into_c[0].from_node, b);
    }

    #[test]
    fn remove_non_anchors_keeps_shader_and_output() {
        let mut tree = NodeTree::new();
        let shader = tree.add(Node::new("s", NodeKind::PrincipledBsdf));
        let output = tree.add(Node::new("o", NodeKind::OutputMaterial));
        let stray = tree.add(math());
        tree.link(shader, "BSDF", output, "Surface").unwrap();
        tree.link(stray, "Value", shader, "Roughness").unwrap();

        tree.remove_non_anchors();
        assert_eq!(tree.len(), 2);
        assert!(tree.node(stray).is_err());
        // The anchor-to-anchor link survives; the stray link is gone.
        assert_eq!(tree.links().len(), 1);
    }

    #[test]
    fn stale_ids_stay_stale() {
        let mut tree = NodeTree::new();
        let a = tree.add(math());
        tree.remove(a);
        let b = tree.add(math());
        assert_ne!(a, b);
        assert!(tree.node(a).is_err());
    }

    #[test]
    fn set_input_coerces_scalar_to_color() {
        let mut tree = NodeTree::new();
        let shader = tree.add(Node::new("s", NodeKind::PrincipledBsdf));
        tree.set_input(shader, "Base Color", 0.25f32).unwrap();
        assert_eq!(
            tree.input_default(shader, "Base Color").unwrap(),
            SocketValue::Color([0.25, 0.25, 0.25, 1.0])
        );
    }
}
