//! Vertex and instance layouts for the instanced cube pipeline

use bytemuck::{Pod, Zeroable};
use glam::Vec3;

/// Unit-cube vertex with position and face normal
#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, Pod, Zeroable)]
pub struct Vertex {
    pub position: [f32; 3],
    pub normal: [f32; 3],
}

impl Vertex {
    pub const fn new(position: [f32; 3], normal: [f32; 3]) -> Self {
        Self { position, normal }
    }

    pub fn desc() -> wgpu::VertexBufferLayout<'static> {
        wgpu::VertexBufferLayout {
            array_stride: std::mem::size_of::<Vertex>() as wgpu::BufferAddress,
            step_mode: wgpu::VertexStepMode::Vertex,
            attributes: &[
                wgpu::VertexAttribute {
                    offset: 0,
                    shader_location: 0,
                    format: wgpu::VertexFormat::Float32x3,
                },
                wgpu::VertexAttribute {
                    offset: std::mem::size_of::<[f32; 3]>() as wgpu::BufferAddress,
                    shader_location: 1,
                    format: wgpu::VertexFormat::Float32x3,
                },
            ],
        }
    }
}

/// Per-instance data (must match `InstanceInput` in the shader)
#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, Pod, Zeroable)]
pub struct InstanceRaw {
    /// Column-major model matrix
    pub model: [[f32; 4]; 4],
    pub color: [f32; 4],
    /// rgb = emissive * intensity, a = 1 for unlit
    pub emissive: [f32; 4],
}

impl InstanceRaw {
    const ATTRIBUTES: [wgpu::VertexAttribute; 6] = wgpu::vertex_attr_array![
        2 => Float32x4,
        3 => Float32x4,
        4 => Float32x4,
        5 => Float32x4,
        6 => Float32x4,
        7 => Float32x4,
    ];

    pub fn desc() -> wgpu::VertexBufferLayout<'static> {
        wgpu::VertexBufferLayout {
            array_stride: std::mem::size_of::<InstanceRaw>() as wgpu::BufferAddress,
            step_mode: wgpu::VertexStepMode::Instance,
            attributes: &Self::ATTRIBUTES,
        }
    }

    /// World-space origin of the instance
    pub fn origin(&self) -> Vec3 {
        Vec3::new(self.model[3][0], self.model[3][1], self.model[3][2])
    }
}

/// 36 vertices of a unit cube centered on the origin, CCW outward
pub fn unit_cube() -> Vec<Vertex> {
    // (normal, u, v) with u x v == normal
    let faces = [
        (Vec3::X, Vec3::Y, Vec3::Z),
        (Vec3::NEG_X, Vec3::Z, Vec3::Y),
        (Vec3::Y, Vec3::Z, Vec3::X),
        (Vec3::NEG_Y, Vec3::X, Vec3::Z),
        (Vec3::Z, Vec3::X, Vec3::Y),
        (Vec3::NEG_Z, Vec3::Y, Vec3::X),
    ];

    let mut vertices = Vec::with_capacity(36);
    for (normal, u, v) in faces {
        let center = normal * 0.5;
        let (u, v) = (u * 0.5, v * 0.5);
        let corners = [
            center - u - v,
            center + u - v,
            center + u + v,
            center - u + v,
        ];
        for i in [0, 1, 2, 0, 2, 3] {
            vertices.push(Vertex::new(corners[i].to_array(), normal.to_array()));
        }
    }
    vertices
}

/// Scene clear color (matches the fog)
pub mod colors {
    pub const BACKGROUND: u32 = 0x000011;
    pub const FOG: u32 = 0x000011;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unit_cube_winding_faces_outward() {
        let cube = unit_cube();
        assert_eq!(cube.len(), 36);
        for tri in cube.chunks(3) {
            let a = Vec3::from(tri[0].position);
            let b = Vec3::from(tri[1].position);
            let c = Vec3::from(tri[2].position);
            let n = Vec3::from(tri[0].normal);
            assert!((b - a).cross(c - a).dot(n) > 0.0);
            for v in tri {
                assert!(Vec3::from(v.position).abs().max_element() <= 0.5 + 1e-6);
            }
        }
    }

    #[test]
    fn test_instance_layout_size() {
        assert_eq!(std::mem::size_of::<InstanceRaw>(), 96);
    }
}
