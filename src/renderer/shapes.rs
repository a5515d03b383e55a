//! Expand scene nodes into cube instances
//!
//! Every shape is drawn with the same unit cube: boxes map one-to-one, cones
//! become a short stack of tapering slabs, spheres a single cube, grids a set
//! of thin line boxes and point clouds one tiny cube per point.

use glam::{Mat4, Quat, Vec3};

use super::vertex::InstanceRaw;
use crate::scene::{Material, MeshShape, MeshTemplate, RenderLayer, SceneGraph};
use crate::sim::Camera;

/// Slabs used to approximate a cone
const CONE_SLABS: usize = 3;
/// Line thickness for grid instances
const GRID_LINE_WIDTH: f32 = 0.05;
const GRID_LINE_HEIGHT: f32 = 0.01;
/// Sphere drawn as a cube of this fraction of its diameter
const SPHERE_FILL: f32 = 0.8;

struct Pending {
    layer: RenderLayer,
    distance: f32,
    instance: InstanceRaw,
}

fn instance(model: Mat4, color: [f32; 4], material: &Material) -> InstanceRaw {
    let e = material.emissive;
    let k = material.emissive_intensity;
    InstanceRaw {
        model: model.to_cols_array_2d(),
        color,
        emissive: [e[0] * k, e[1] * k, e[2] * k, if material.unlit { 1.0 } else { 0.0 }],
    }
}

fn boxed(center: Vec3, size: Vec3) -> Mat4 {
    Mat4::from_scale_rotation_translation(size, Quat::IDENTITY, center)
}

/// Local-space cube placements for one template, with their colors
fn local_boxes(template: &MeshTemplate) -> Vec<(Mat4, [f32; 4])> {
    let color = template.material.color;
    match &template.shape {
        MeshShape::Box { size } => vec![(boxed(Vec3::ZERO, *size), color)],
        MeshShape::Sphere { radius } => {
            vec![(boxed(Vec3::ZERO, Vec3::splat(radius * 2.0 * SPHERE_FILL)), color)]
        }
        MeshShape::Cone { radius, length } => {
            let slab = length / CONE_SLABS as f32;
            (0..CONE_SLABS)
                .map(|i| {
                    // Base at +z, tip toward -z
                    let t = (i as f32 + 0.5) / CONE_SLABS as f32;
                    let width = radius * 2.0 * (1.0 - t);
                    let z = length * 0.5 - slab * (i as f32 + 0.5);
                    (boxed(Vec3::new(0.0, 0.0, z), Vec3::new(width, width, slab)), color)
                })
                .collect()
        }
        MeshShape::Grid { size, divisions } => {
            let divisions = (*divisions).max(1);
            let step = size / divisions as f32;
            let half = size * 0.5;
            let mut boxes = Vec::with_capacity((divisions as usize + 1) * 2);
            for i in 0..=divisions {
                let offset = -half + step * i as f32;
                let line_color = if i * 2 == divisions {
                    template.material.accent
                } else {
                    color
                };
                // Along z, then along x
                boxes.push((
                    boxed(
                        Vec3::new(offset, 0.0, 0.0),
                        Vec3::new(GRID_LINE_WIDTH, GRID_LINE_HEIGHT, *size),
                    ),
                    line_color,
                ));
                boxes.push((
                    boxed(
                        Vec3::new(0.0, 0.0, offset),
                        Vec3::new(*size, GRID_LINE_HEIGHT, GRID_LINE_WIDTH),
                    ),
                    line_color,
                ));
            }
            boxes
        }
        MeshShape::Points { positions, size } => positions
            .iter()
            .map(|&p| (boxed(p, Vec3::splat(*size)), color))
            .collect(),
    }
}

/// Flatten the scene into instances ordered for painter's-algorithm drawing
///
/// Instances are grouped by render layer and drawn far-to-near within a
/// layer, so no depth buffer is needed.
pub fn build_instances(scene: &SceneGraph, camera: &Camera) -> Vec<InstanceRaw> {
    let mut pending = Vec::new();
    for (_, node) in scene.iter() {
        let t = &node.transform;
        let world = Mat4::from_scale_rotation_translation(t.scale, t.rotation, t.translation);
        let template = &node.template;
        for (local, color) in local_boxes(template) {
            let model = world * local;
            let origin = model.w_axis.truncate();
            pending.push(Pending {
                layer: template.layer,
                distance: origin.distance_squared(camera.position),
                instance: instance(model, color, &template.material),
            });
        }
    }

    pending.sort_by(|a, b| {
        a.layer
            .cmp(&b.layer)
            .then_with(|| b.distance.total_cmp(&a.distance))
    });
    pending.into_iter().map(|p| p.instance).collect()
}
