//! Immutable mesh templates shared between scene nodes
//!
//! A template describes what a node looks like; where it is lives in the
//! node's [`Transform`](super::Transform). Templates are handed out as
//! `Rc<MeshTemplate>` and never mutated after construction.

use std::rc::Rc;

use glam::Vec3;
use rand::Rng;

use crate::hex_to_rgba;
use crate::tuning::{ObstacleTuning, TrackTuning};

/// Draw ordering bucket (lower draws first)
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum RenderLayer {
    /// Stars and the floor plane
    Backdrop,
    /// Grid lines lying on the floor
    Ground,
    /// Everything above the floor
    Objects,
}

/// Geometry description
#[derive(Debug, Clone, PartialEq)]
pub enum MeshShape {
    /// Axis-aligned box with full edge lengths
    Box { size: Vec3 },
    /// Cone pointing down -z
    Cone { radius: f32, length: f32 },
    Sphere { radius: f32 },
    /// Square line grid on the xz plane
    Grid { size: f32, divisions: u32 },
    /// Point cloud in local space
    Points { positions: Rc<[Vec3]>, size: f32 },
}

/// Surface description
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Material {
    pub color: [f32; 4],
    pub emissive: [f32; 4],
    pub emissive_intensity: f32,
    /// Unlit materials ignore scene lighting and fog
    pub unlit: bool,
    /// Grid only: color of the center lines
    pub accent: [f32; 4],
}

impl Material {
    /// Lit material with an emissive glow
    pub fn standard(color: u32, emissive: u32, emissive_intensity: f32) -> Self {
        Self {
            color: hex_to_rgba(color),
            emissive: hex_to_rgba(emissive),
            emissive_intensity,
            unlit: false,
            accent: hex_to_rgba(color),
        }
    }

    /// Flat color, no lighting
    pub fn basic(color: u32) -> Self {
        Self {
            color: hex_to_rgba(color),
            emissive: [0.0; 4],
            emissive_intensity: 0.0,
            unlit: true,
            accent: hex_to_rgba(color),
        }
    }

    /// Grid lines with a highlighted center line
    pub fn grid(center: u32, lines: u32) -> Self {
        Self {
            accent: hex_to_rgba(center),
            ..Self::basic(lines)
        }
    }
}

/// Shared mesh + material definition
#[derive(Debug, Clone, PartialEq)]
pub struct MeshTemplate {
    pub name: &'static str,
    pub shape: MeshShape,
    pub material: Material,
    pub layer: RenderLayer,
}

impl MeshTemplate {
    /// Red glowing cube obstacle
    pub fn obstacle(size: f32) -> Self {
        Self {
            name: "obstacle",
            shape: MeshShape::Box { size: Vec3::splat(size) },
            material: Material::standard(0xff0055, 0xff0000, 0.8),
            layer: RenderLayer::Objects,
        }
    }

    /// Cyan cone hull
    pub fn player_hull() -> Self {
        Self {
            name: "player_hull",
            shape: MeshShape::Cone {
                radius: 0.5,
                length: 2.0,
            },
            material: Material::standard(0x00ffff, 0x0088ff, 0.5),
            layer: RenderLayer::Objects,
        }
    }

    pub fn engine_glow() -> Self {
        Self {
            name: "engine_glow",
            shape: MeshShape::Sphere { radius: 0.2 },
            material: Material::basic(0x00ffff),
            layer: RenderLayer::Objects,
        }
    }

    /// Small cube used for crash debris
    pub fn debris(color: u32) -> Self {
        Self {
            name: "debris",
            shape: MeshShape::Box {
                size: Vec3::splat(0.2),
            },
            material: Material::basic(color),
            layer: RenderLayer::Objects,
        }
    }

    pub fn grid_tile(size: f32, divisions: u32) -> Self {
        Self {
            name: "grid_tile",
            shape: MeshShape::Grid { size, divisions },
            material: Material::grid(0xff00ff, 0x220033),
            layer: RenderLayer::Ground,
        }
    }

    /// Dark plane under the grid (a flat box)
    pub fn floor_plane(width: f32, length: f32) -> Self {
        Self {
            name: "floor_plane",
            shape: MeshShape::Box {
                size: Vec3::new(width, 0.01, length),
            },
            material: Material::basic(0x000011),
            layer: RenderLayer::Backdrop,
        }
    }

    /// Random stars uniformly inside a cube of edge `extent`
    pub fn starfield(rng: &mut impl Rng, count: usize, extent: f32) -> Self {
        let positions: Rc<[Vec3]> = (0..count)
            .map(|_| {
                Vec3::new(
                    (rng.random::<f32>() - 0.5) * extent,
                    (rng.random::<f32>() - 0.5) * extent,
                    (rng.random::<f32>() - 0.5) * extent,
                )
            })
            .collect();
        Self {
            name: "starfield",
            shape: MeshShape::Points {
                positions,
                size: 2.0,
            },
            material: Material::basic(0xffffff),
            layer: RenderLayer::Backdrop,
        }
    }
}

/// The templates every game needs, built once
#[derive(Debug, Clone)]
pub struct TemplateLibrary {
    pub obstacle: Rc<MeshTemplate>,
    pub player_hull: Rc<MeshTemplate>,
    pub engine_glow: Rc<MeshTemplate>,
    pub grid_tile: Rc<MeshTemplate>,
    pub floor_plane: Rc<MeshTemplate>,
}

impl TemplateLibrary {
    pub fn new(obstacles: &ObstacleTuning, track: &TrackTuning) -> Self {
        Self {
            obstacle: Rc::new(MeshTemplate::obstacle(obstacles.size)),
            player_hull: Rc::new(MeshTemplate::player_hull()),
            engine_glow: Rc::new(MeshTemplate::engine_glow()),
            grid_tile: Rc::new(MeshTemplate::grid_tile(track.tile_length, track.tile_divisions)),
            floor_plane: Rc::new(MeshTemplate::floor_plane(
                track.tile_length,
                track.tile_length * 2.0,
            )),
        }
    }
}

impl Default for TemplateLibrary {
    fn default() -> Self {
        Self::new(&ObstacleTuning::default(), &TrackTuning::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_pcg::Pcg32;

    #[test]
    fn test_starfield_bounds() {
        let mut rng = Pcg32::seed_from_u64(7);
        let stars = MeshTemplate::starfield(&mut rng, 200, 2000.0);
        let MeshShape::Points { positions, .. } = &stars.shape else {
            panic!("starfield should be a point cloud");
        };
        assert_eq!(positions.len(), 200);
        assert!(positions.iter().all(|p| p.abs().max_element() <= 1000.0));
    }

    #[test]
    fn test_grid_material_accent() {
        let grid = MeshTemplate::grid_tile(100.0, 100);
        assert_eq!(grid.material.accent, hex_to_rgba(0xff00ff));
        assert_eq!(grid.material.color, hex_to_rgba(0x220033));
        assert_eq!(grid.layer, RenderLayer::Ground);
    }
}
