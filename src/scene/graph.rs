//! Retained scene graph
//!
//! Entities own a [`NodeId`] for as long as they are alive and must detach it
//! when they are destroyed; the graph never removes nodes on its own.

use std::collections::BTreeMap;
use std::rc::Rc;

use glam::{Quat, Vec3};

use super::template::MeshTemplate;

/// Handle to an attached node
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct NodeId(u32);

/// Per-node placement
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Transform {
    pub translation: Vec3,
    pub rotation: Quat,
    pub scale: Vec3,
}

impl Default for Transform {
    fn default() -> Self {
        Self::IDENTITY
    }
}

impl Transform {
    pub const IDENTITY: Self = Self {
        translation: Vec3::ZERO,
        rotation: Quat::IDENTITY,
        scale: Vec3::ONE,
    };

    pub fn from_translation(translation: Vec3) -> Self {
        Self {
            translation,
            ..Self::IDENTITY
        }
    }
}

/// An attached template instance
#[derive(Debug, Clone)]
pub struct Node {
    pub template: Rc<MeshTemplate>,
    pub transform: Transform,
}

/// Node store, iterated in attachment order
#[derive(Debug, Default)]
pub struct SceneGraph {
    nodes: BTreeMap<NodeId, Node>,
    next_id: u32,
}

impl SceneGraph {
    pub fn new() -> Self {
        Self::default()
    }

    /// Attach a template instance and return its handle
    pub fn attach(&mut self, template: Rc<MeshTemplate>, transform: Transform) -> NodeId {
        let id = NodeId(self.next_id);
        self.next_id += 1;
        self.nodes.insert(id, Node { template, transform });
        id
    }

    /// Detach a node, releasing its template reference
    ///
    /// Returns `None` if the handle was already detached.
    pub fn detach(&mut self, id: NodeId) -> Option<Node> {
        self.nodes.remove(&id)
    }

    pub fn get(&self, id: NodeId) -> Option<&Node> {
        self.nodes.get(&id)
    }

    pub fn transform_mut(&mut self, id: NodeId) -> Option<&mut Transform> {
        self.nodes.get_mut(&id).map(|n| &mut n.transform)
    }

    /// Move a node (no-op for detached handles)
    pub fn set_translation(&mut self, id: NodeId, translation: Vec3) {
        if let Some(t) = self.transform_mut(id) {
            t.translation = translation;
        }
    }

    pub fn contains(&self, id: NodeId) -> bool {
        self.nodes.contains_key(&id)
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (NodeId, &Node)> {
        self.nodes.iter().map(|(id, node)| (*id, node))
    }

    /// Count nodes using the named template
    pub fn count_named(&self, name: &str) -> usize {
        self.nodes.values().filter(|n| n.template.name == name).count()
    }
}
