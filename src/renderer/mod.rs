//! WebGPU rendering module
//!
//! Draws the scene graph as instanced unit cubes, layer by layer and far to
//! near.

pub mod pipeline;
pub mod shapes;
pub mod vertex;

pub use pipeline::SceneRenderer;
pub use shapes::build_instances;
pub use vertex::{InstanceRaw, Vertex};
