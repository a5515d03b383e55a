//! Scene graph module
//!
//! The simulation attaches one node per visible entity and detaches it when
//! the entity dies. Renderers only read from it.

pub mod graph;
pub mod template;

pub use graph::{Node, NodeId, SceneGraph, Transform};
pub use template::{Material, MeshShape, MeshTemplate, RenderLayer, TemplateLibrary};
