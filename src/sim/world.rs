//! Scrolling track
//!
//! Two grid tiles leapfrog each other to fake an infinite floor. The lead
//! tile (closest to the camera) is advanced and the trailing tile is kept
//! exactly one tile length behind it; once the lead passes the wrap line it
//! jumps behind the other and the roles swap.

use glam::Vec3;
use rand::Rng;
use std::rc::Rc;

use crate::scene::{MeshTemplate, NodeId, SceneGraph, TemplateLibrary, Transform};
use crate::tuning::TrackTuning;

#[derive(Debug, Clone, Copy)]
struct Segment {
    z: f32,
    node: NodeId,
}

/// Floor tiles plus the static backdrop
#[derive(Debug)]
pub struct World {
    segments: [Segment; 2],
    /// Index of the segment closest to the camera
    lead: usize,
    floor: NodeId,
    stars: NodeId,
    tuning: TrackTuning,
}

impl World {
    pub fn new(
        scene: &mut SceneGraph,
        templates: &TemplateLibrary,
        tuning: TrackTuning,
        star_count: usize,
        rng: &mut impl Rng,
    ) -> Self {
        let tile = tuning.tile_length;
        let mut segment = |z: f32| Segment {
            z,
            node: scene.attach(
                templates.grid_tile.clone(),
                Transform::from_translation(Vec3::new(0.0, 0.0, z)),
            ),
        };
        let segments = [segment(0.0), segment(-tile)];

        let floor = scene.attach(
            templates.floor_plane.clone(),
            Transform::from_translation(Vec3::new(0.0, -0.1, -tile * 0.5)),
        );
        let starfield = Rc::new(MeshTemplate::starfield(rng, star_count, tuning.starfield_extent));
        let stars = scene.attach(starfield, Transform::IDENTITY);

        Self {
            segments,
            lead: 0,
            floor,
            stars,
            tuning,
        }
    }

    /// Scroll-axis positions of both tiles
    pub fn segment_positions(&self) -> [f32; 2] {
        [self.segments[0].z, self.segments[1].z]
    }

    /// Advance the floor by `speed * dt`
    pub fn update(&mut self, dt: f32, speed: f32, scene: &mut SceneGraph) {
        let tile = self.tuning.tile_length;
        let mut lead_z = self.segments[self.lead].z + speed * dt;

        let excess = lead_z - self.tuning.wrap_z;
        if excess >= 0.0 {
            // Each wrap hands the lead to the other tile
            let wraps = (excess / tile).floor() as u64 + 1;
            lead_z = self.tuning.wrap_z - tile + excess.rem_euclid(tile);
            if wraps % 2 == 1 {
                self.lead = 1 - self.lead;
            }
        }

        let trail = 1 - self.lead;
        self.segments[self.lead].z = lead_z;
        self.segments[trail].z = lead_z - tile;

        for segment in &self.segments {
            scene.set_translation(segment.node, Vec3::new(0.0, 0.0, segment.z));
        }
    }

    /// Detach tiles, floor and stars
    pub fn dispose(&self, scene: &mut SceneGraph) {
        for segment in &self.segments {
            scene.detach(segment.node);
        }
        scene.detach(self.floor);
        scene.detach(self.stars);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use rand::SeedableRng;
    use rand_pcg::Pcg32;

    fn world(scene: &mut SceneGraph) -> World {
        let mut rng = Pcg32::seed_from_u64(21);
        World::new(scene, &TemplateLibrary::default(), TrackTuning::default(), 100, &mut rng)
    }

    #[test]
    fn test_initial_layout() {
        let mut scene = SceneGraph::new();
        let world = world(&mut scene);
        assert_eq!(world.segment_positions(), [0.0, -100.0]);
        assert_eq!(scene.len(), 4);
        assert_eq!(scene.count_named("grid_tile"), 2);
    }

    #[test]
    fn test_wraps_lead_behind_trail() {
        let mut scene = SceneGraph::new();
        let mut world = world(&mut scene);
        // 0 -> 50 hits the wrap line exactly
        world.update(1.0, 50.0, &mut scene);
        let [a, b] = world.segment_positions();
        assert_eq!(b, -50.0);
        assert_eq!(a, -150.0);
    }

    #[test]
    fn test_large_step_wraps_repeatedly() {
        let mut scene = SceneGraph::new();
        let mut world = world(&mut scene);
        world.update(1.0, 260.0, &mut scene);
        let [a, b] = world.segment_positions();
        assert!(((a - b).abs() - 100.0).abs() < 1e-3);
        assert!(a.max(b) < 50.0);
    }

    #[test]
    fn test_enormous_step_returns() {
        let mut scene = SceneGraph::new();
        let mut world = world(&mut scene);
        world.update(1.0e9, 20.0, &mut scene);
        let [a, b] = world.segment_positions();
        assert!(a.is_finite() && b.is_finite());
        assert!(a.max(b) < 50.0);
    }

    #[test]
    fn test_scene_follows_segments() {
        let mut scene = SceneGraph::new();
        let mut world = world(&mut scene);
        world.update(0.5, 20.0, &mut scene);
        let zs: Vec<f32> = scene
            .iter()
            .filter(|(_, n)| n.template.name == "grid_tile")
            .map(|(_, n)| n.transform.translation.z)
            .collect();
        assert_eq!(zs, vec![10.0, -90.0]);
    }

    #[test]
    fn test_dispose() {
        let mut scene = SceneGraph::new();
        let world = world(&mut scene);
        world.dispose(&mut scene);
        assert!(scene.is_empty());
    }

    proptest! {
        #[test]
        fn prop_segments_one_tile_apart(
            frames in proptest::collection::vec((0.0f32..0.1, 0.0f32..200.0), 1..300),
        ) {
            let mut scene = SceneGraph::new();
            let mut world = world(&mut scene);
            for (dt, speed) in frames {
                world.update(dt, speed, &mut scene);
                let [a, b] = world.segment_positions();
                prop_assert!(((a - b).abs() - 100.0).abs() < 1e-3);
                prop_assert!(a.max(b) < 50.0);
            }
        }
    }
}
