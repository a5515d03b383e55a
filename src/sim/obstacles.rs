//! Obstacle spawning, scrolling and collision
//!
//! Obstacles appear far down the track in a random lane, slide toward the
//! camera at the current speed and are retired once they pass it. Within an
//! update the order is spawn-check, move, cleanup: a fresh obstacle is moved
//! once before the cleanup pass sees it, and at the far spawn distance it
//! cannot reach the near plane in the frame that created it.

use glam::Vec3;
use rand::Rng;
use std::rc::Rc;

use super::bounds::Aabb;
use super::player::{Lane, Player};
use crate::scene::{MeshTemplate, NodeId, SceneGraph, Transform};
use crate::tuning::ObstacleTuning;

/// A live obstacle
#[derive(Debug, Clone)]
pub struct Obstacle {
    pub position: Vec3,
    pub lane: Lane,
    pub active: bool,
    node: NodeId,
}

impl Obstacle {
    pub fn node(&self) -> NodeId {
        self.node
    }
}

/// Owns every live obstacle
#[derive(Debug)]
pub struct ObstacleField {
    items: Vec<Obstacle>,
    spawn_timer: f32,
    lane_width: f32,
    tuning: ObstacleTuning,
    template: Rc<MeshTemplate>,
    /// Total spawned since construction
    spawned: u64,
}

impl ObstacleField {
    pub fn new(tuning: ObstacleTuning, lane_width: f32, template: Rc<MeshTemplate>) -> Self {
        Self {
            items: Vec::new(),
            spawn_timer: 0.0,
            lane_width,
            tuning,
            template,
            spawned: 0,
        }
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Obstacle> {
        self.items.iter()
    }

    pub fn spawned(&self) -> u64 {
        self.spawned
    }

    pub fn spawn_timer(&self) -> f32 {
        self.spawn_timer
    }

    /// Seconds between spawns at `speed`
    ///
    /// Shrinks linearly with speed but never below the floor interval.
    pub fn spawn_interval(&self, speed: f32) -> f32 {
        let t = &self.tuning;
        (t.base_interval - t.ramp * (speed - t.reference_speed)).max(t.floor_interval)
    }

    /// Spawn one obstacle at the far spawn distance in a random lane
    pub fn spawn(&mut self, scene: &mut SceneGraph, rng: &mut impl Rng) {
        self.spawn_at(scene, rng, self.tuning.spawn_z);
    }

    /// Spawn in a random lane at a chosen scroll-axis position
    pub fn spawn_at(&mut self, scene: &mut SceneGraph, rng: &mut impl Rng, z: f32) {
        let lane = Lane::ALL[rng.random_range(0..Lane::ALL.len())];
        self.place(scene, lane, z);
    }

    /// Place an obstacle in a specific lane
    pub fn place(&mut self, scene: &mut SceneGraph, lane: Lane, z: f32) {
        let position = Vec3::new(lane.offset(self.lane_width), self.tuning.size * 0.5, z);
        let node = scene.attach(self.template.clone(), Transform::from_translation(position));
        self.items.push(Obstacle {
            position,
            lane,
            active: true,
            node,
        });
        self.spawned += 1;
    }

    /// Advance spawning, movement and cleanup by one frame
    pub fn update(&mut self, dt: f32, speed: f32, scene: &mut SceneGraph, rng: &mut impl Rng) {
        self.spawn_timer += dt;
        if self.spawn_timer > self.spawn_interval(speed) {
            self.spawn(scene, rng);
            self.spawn_timer = 0.0;
        }

        let step = speed * dt;
        for item in &mut self.items {
            item.position.z += step;
            scene.set_translation(item.node, item.position);
        }

        let despawn_z = self.tuning.despawn_z;
        self.items.retain_mut(|item| {
            if item.position.z > despawn_z {
                item.active = false;
                scene.detach(item.node);
                false
            } else {
                true
            }
        });
    }

    /// Test the player against every obstacle with forgiveness insets
    pub fn check_collision(&self, player: &Player) -> bool {
        self.collides_with(player.bounds())
    }

    /// Box-level collision query (insets applied here)
    pub fn collides_with(&self, player_box: Aabb) -> bool {
        let player_box = player_box.inset(self.tuning.player_inset);
        self.items.iter().any(|item| {
            let obstacle_box = self.bounds_of(item).inset(self.tuning.obstacle_inset);
            player_box.intersects(&obstacle_box)
        })
    }

    /// Unshrunk box around an obstacle
    pub fn bounds_of(&self, item: &Obstacle) -> Aabb {
        Aabb::from_center(item.position, Vec3::splat(self.tuning.size * 0.5))
    }

    /// Remove every obstacle and restart the spawn timer
    pub fn reset(&mut self, scene: &mut SceneGraph) {
        for item in self.items.drain(..) {
            scene.detach(item.node);
        }
        self.spawn_timer = 0.0;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scene::TemplateLibrary;
    use crate::tuning::PlayerTuning;
    use proptest::prelude::*;
    use rand::SeedableRng;
    use rand_pcg::Pcg32;

    fn field(tuning: ObstacleTuning) -> ObstacleField {
        ObstacleField::new(tuning, 3.0, TemplateLibrary::default().obstacle)
    }

    #[test]
    fn test_spawn_lanes_and_distance() {
        let mut scene = SceneGraph::new();
        let mut rng = Pcg32::seed_from_u64(1);
        let mut obstacles = field(ObstacleTuning::default());
        for _ in 0..300 {
            obstacles.spawn(&mut scene, &mut rng);
        }
        assert_eq!(obstacles.len(), 300);
        assert_eq!(scene.len(), 300);
        let mut seen = [false; 3];
        for item in obstacles.iter() {
            assert!([-3.0, 0.0, 3.0].contains(&item.position.x));
            assert_eq!(item.position.z, -100.0);
            assert!(item.active);
            seen[(item.lane.index() + 1) as usize] = true;
        }
        assert_eq!(seen, [true; 3], "all lanes should eventually be picked");
    }

    #[test]
    fn test_spawn_interval_floor_and_ramp() {
        let obstacles = field(ObstacleTuning::default());
        assert_eq!(obstacles.spawn_interval(10.0), 2.0);
        assert!((obstacles.spawn_interval(20.0) - 1.5).abs() < 1e-6);
        assert_eq!(obstacles.spawn_interval(100.0), 0.5);
        assert_eq!(obstacles.spawn_interval(1.0e6), 0.5);
    }

    #[test]
    fn test_spawn_uses_strict_threshold() {
        let mut scene = SceneGraph::new();
        let mut rng = Pcg32::seed_from_u64(2);
        let tuning = ObstacleTuning {
            ramp: 0.0,
            ..ObstacleTuning::default()
        };
        let mut obstacles = field(tuning);
        obstacles.update(2.0, 20.0, &mut scene, &mut rng);
        assert_eq!(obstacles.len(), 0, "exactly the interval is not enough");
        obstacles.update(0.01, 20.0, &mut scene, &mut rng);
        assert_eq!(obstacles.len(), 1);
        assert_eq!(obstacles.spawn_timer(), 0.0);
    }

    #[test]
    fn test_update_order_spawn_move_cleanup() {
        let mut scene = SceneGraph::new();
        let mut rng = Pcg32::seed_from_u64(3);
        let tuning = ObstacleTuning {
            spawn_z: 19.0,
            ..ObstacleTuning::default()
        };
        let mut obstacles = field(tuning);
        // Huge frame: spawns, then moves it past the threshold, then retires it
        obstacles.update(3.0, 20.0, &mut scene, &mut rng);
        assert_eq!(obstacles.spawned(), 1);
        assert!(obstacles.is_empty());
        assert!(scene.is_empty());

        // At speed 0 the interval is 2.5s; the new spawn does not move
        obstacles.update(2.6, 0.0, &mut scene, &mut rng);
        assert_eq!(obstacles.len(), 1);
        assert_eq!(obstacles.iter().next().unwrap().position.z, 19.0);
    }

    #[test]
    fn test_retire_past_near_plane() {
        let mut scene = SceneGraph::new();
        let mut rng = Pcg32::seed_from_u64(4);
        let mut obstacles = field(ObstacleTuning::default());
        obstacles.place(&mut scene, Lane::Left, 19.5);
        obstacles.place(&mut scene, Lane::Right, 0.0);
        obstacles.update(0.05, 20.0, &mut scene, &mut rng);
        assert_eq!(obstacles.len(), 1);
        assert_eq!(obstacles.iter().next().unwrap().lane, Lane::Right);
        assert_eq!(scene.len(), 1);
        let node = obstacles.iter().next().unwrap().node();
        assert_eq!(scene.get(node).unwrap().transform.translation.z, 1.0);
    }

    #[test]
    fn test_collision_with_player_in_lane() {
        let mut scene = SceneGraph::new();
        let templates = TemplateLibrary::default();
        let mut player = Player::new(&mut scene, &templates, PlayerTuning::default());
        let mut obstacles = field(ObstacleTuning::default());

        obstacles.place(&mut scene, Lane::Center, 0.0);
        assert!(obstacles.check_collision(&player));

        player.move_right();
        player.update(1.0, 0.0, &mut scene);
        assert!(!obstacles.check_collision(&player));
    }

    #[test]
    fn test_collision_forgiveness_margin() {
        let mut scene = SceneGraph::new();
        let mut obstacles = field(ObstacleTuning::default());
        obstacles.place(&mut scene, Lane::Center, -10.0);
        // Obstacle spans z in [-11, -9]; combined inset along z is 0.3
        let grazing = Aabb::from_center(Vec3::new(0.0, 1.0, -8.2), Vec3::new(0.5, 0.5, 1.0));
        assert!(!obstacles.collides_with(grazing), "0.2 overlap is forgiven");
        let solid = Aabb::from_center(Vec3::new(0.0, 1.0, -8.5), Vec3::new(0.5, 0.5, 1.0));
        assert!(obstacles.collides_with(solid), "0.5 overlap collides");
    }

    #[test]
    fn test_reset_releases_nodes() {
        let mut scene = SceneGraph::new();
        let mut rng = Pcg32::seed_from_u64(5);
        let mut obstacles = field(ObstacleTuning::default());
        for _ in 0..5 {
            obstacles.spawn(&mut scene, &mut rng);
        }
        obstacles.update(1.0, 20.0, &mut scene, &mut rng);
        obstacles.reset(&mut scene);
        assert!(obstacles.is_empty());
        assert!(scene.is_empty());
        assert_eq!(obstacles.spawn_timer(), 0.0);
    }

    proptest! {
        #[test]
        fn prop_spawn_interval_monotone(a in 0.0f32..500.0, b in 0.0f32..500.0) {
            let obstacles = field(ObstacleTuning::default());
            let (lo, hi) = if a <= b { (a, b) } else { (b, a) };
            prop_assert!(obstacles.spawn_interval(hi) <= obstacles.spawn_interval(lo));
            prop_assert!(obstacles.spawn_interval(hi) >= 0.5);
        }

        #[test]
        fn prop_nothing_past_threshold_survives(
            seed in any::<u64>(),
            frames in proptest::collection::vec((0.0f32..0.2, 0.0f32..120.0), 1..120),
        ) {
            let mut scene = SceneGraph::new();
            let mut rng = Pcg32::seed_from_u64(seed);
            let mut obstacles = field(ObstacleTuning::default());
            for (dt, speed) in frames {
                obstacles.update(dt, speed, &mut scene, &mut rng);
                prop_assert!(obstacles.iter().all(|o| o.position.z <= 20.0 && o.active));
                prop_assert_eq!(scene.len(), obstacles.len());
            }
        }

        #[test]
        fn prop_axis_overlap_vs_insets(axis in 0usize..3, overlap in 0.0f32..1.0) {
            // Player box faces the obstacle along one axis with a controlled
            // raw overlap and sits well inside it on the other two
            let mut scene = SceneGraph::new();
            let mut obstacles = field(ObstacleTuning::default());
            obstacles.place(&mut scene, Lane::Center, 0.0);
            let obstacle = obstacles.bounds_of(obstacles.iter().next().unwrap());

            let mut min = obstacle.min + Vec3::splat(0.4);
            let mut max = obstacle.max - Vec3::splat(0.4);
            min[axis] = obstacle.max[axis] - overlap;
            max[axis] = min[axis] + 2.0;
            let player = Aabb::new(min, max);

            let combined = 0.3;
            if overlap > combined + 1e-3 {
                prop_assert!(obstacles.collides_with(player));
            } else if overlap < combined - 1e-3 {
                prop_assert!(!obstacles.collides_with(player));
            }
        }
    }
}
