//! Player craft: lane state machine and presentation smoothing
//!
//! The lane is the simulation state and changes only on discrete input
//! steps. The hull's x position chases the lane's offset continuously, so
//! the craft glides between lanes instead of snapping.

use glam::{Quat, Vec3};
use serde::{Deserialize, Serialize};

use super::bounds::Aabb;
use crate::scene::{NodeId, SceneGraph, TemplateLibrary, Transform};
use crate::tuning::PlayerTuning;

/// Hull half extents used for collision (cone radius 0.5, length 2)
pub const HULL_HALF_EXTENTS: Vec3 = Vec3::new(0.5, 0.5, 1.0);
/// Engine glow offset behind the hull
pub const GLOW_OFFSET: Vec3 = Vec3::new(0.0, 0.0, 1.0);
/// Engine glow sphere radius at scale 1
pub const GLOW_RADIUS: f32 = 0.2;

/// One of the three track lanes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Lane {
    Left,
    #[default]
    Center,
    Right,
}

impl Lane {
    pub const ALL: [Lane; 3] = [Lane::Left, Lane::Center, Lane::Right];

    /// Signed lane index (-1, 0, 1)
    pub fn index(self) -> i8 {
        match self {
            Lane::Left => -1,
            Lane::Center => 0,
            Lane::Right => 1,
        }
    }

    /// Horizontal offset of the lane center
    pub fn offset(self, lane_width: f32) -> f32 {
        self.index() as f32 * lane_width
    }

    /// One lane to the left, saturating
    pub fn left(self) -> Self {
        match self {
            Lane::Right => Lane::Center,
            _ => Lane::Left,
        }
    }

    /// One lane to the right, saturating
    pub fn right(self) -> Self {
        match self {
            Lane::Left => Lane::Center,
            _ => Lane::Right,
        }
    }
}

/// Discrete steering input
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LaneStep {
    Left,
    Right,
}

/// Engine glow scale at wall-clock `time` seconds
#[inline]
pub fn engine_pulse(time: f64) -> f32 {
    1.0 + (time * 10.0).sin() as f32 * 0.2
}

/// The player's craft
#[derive(Debug)]
pub struct Player {
    lane: Lane,
    target_x: f32,
    /// Visual hull position
    position: Vec3,
    /// Roll around the scroll axis (radians)
    tilt: f32,
    glow_scale: f32,
    tuning: PlayerTuning,
    hull: NodeId,
    glow: NodeId,
}

impl Player {
    /// Create the craft at the center lane and attach its nodes
    pub fn new(scene: &mut SceneGraph, templates: &TemplateLibrary, tuning: PlayerTuning) -> Self {
        let position = Vec3::new(0.0, tuning.height, 0.0);
        let hull = scene.attach(
            templates.player_hull.clone(),
            Transform::from_translation(position),
        );
        let glow = scene.attach(
            templates.engine_glow.clone(),
            Transform::from_translation(position + GLOW_OFFSET),
        );
        Self {
            lane: Lane::Center,
            target_x: 0.0,
            position,
            tilt: 0.0,
            glow_scale: 1.0,
            tuning,
            hull,
            glow,
        }
    }

    pub fn lane(&self) -> Lane {
        self.lane
    }

    pub fn target_x(&self) -> f32 {
        self.target_x
    }

    pub fn position(&self) -> Vec3 {
        self.position
    }

    pub fn tilt(&self) -> f32 {
        self.tilt
    }

    pub fn glow_scale(&self) -> f32 {
        self.glow_scale
    }

    /// Step one lane left; returns false at the left edge
    pub fn move_left(&mut self) -> bool {
        self.set_lane(self.lane.left())
    }

    /// Step one lane right; returns false at the right edge
    pub fn move_right(&mut self) -> bool {
        self.set_lane(self.lane.right())
    }

    pub fn apply(&mut self, step: LaneStep) -> bool {
        match step {
            LaneStep::Left => self.move_left(),
            LaneStep::Right => self.move_right(),
        }
    }

    fn set_lane(&mut self, lane: Lane) -> bool {
        let changed = lane != self.lane;
        self.lane = lane;
        self.target_x = lane.offset(self.tuning.lane_width);
        changed
    }

    /// Back to the center lane with the hull snapped home
    pub fn reset(&mut self, scene: &mut SceneGraph) {
        self.set_lane(Lane::Center);
        self.position.x = 0.0;
        self.tilt = 0.0;
        self.sync(scene);
    }

    /// Ease toward the target lane and animate the engine
    ///
    /// `time` is wall-clock seconds and only drives the glow pulse.
    pub fn update(&mut self, dt: f32, time: f64, scene: &mut SceneGraph) {
        // Frame-rate independent: never overshoots, even for huge dt
        let alpha = 1.0 - (-self.tuning.smoothing * dt).exp();
        self.position.x += (self.target_x - self.position.x) * alpha;
        self.tilt = -(self.position.x - self.target_x) * self.tuning.tilt;
        self.glow_scale = engine_pulse(time);
        self.sync(scene);
    }

    /// Unshrunk collision box around the hull and the pulsing engine glow
    pub fn bounds(&self) -> Aabb {
        let hull = Aabb::from_center(self.position, HULL_HALF_EXTENTS);
        let glow = Aabb::from_center(
            self.position + GLOW_OFFSET,
            Vec3::splat(GLOW_RADIUS * self.glow_scale),
        );
        hull.union(&glow)
    }

    fn sync(&self, scene: &mut SceneGraph) {
        if let Some(t) = scene.transform_mut(self.hull) {
            t.translation = self.position;
            t.rotation = Quat::from_rotation_z(self.tilt);
        }
        if let Some(t) = scene.transform_mut(self.glow) {
            t.translation = self.position + GLOW_OFFSET;
            t.scale = Vec3::splat(self.glow_scale);
        }
    }

    /// Detach the craft's nodes
    pub fn dispose(&self, scene: &mut SceneGraph) {
        scene.detach(self.hull);
        scene.detach(self.glow);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn player() -> (SceneGraph, Player) {
        let mut scene = SceneGraph::new();
        let player = Player::new(&mut scene, &TemplateLibrary::default(), PlayerTuning::default());
        (scene, player)
    }

    #[test]
    fn test_clamps_at_both_edges() {
        let (_, mut player) = player();
        for _ in 0..50 {
            player.move_left();
        }
        assert_eq!(player.lane().index(), -1);
        assert_eq!(player.target_x(), -3.0);
        assert!(!player.move_left());

        for _ in 0..50 {
            player.move_right();
        }
        assert_eq!(player.lane().index(), 1);
        assert_eq!(player.target_x(), 3.0);
    }

    #[test]
    fn test_target_updates_immediately() {
        let (_, mut player) = player();
        assert!(player.move_right());
        assert_eq!(player.target_x(), 3.0);
        // Hull has not moved yet
        assert_eq!(player.position().x, 0.0);
    }

    #[test]
    fn test_converges_in_one_second() {
        let (mut scene, mut player) = player();
        player.move_right();
        player.update(1.0, 0.0, &mut scene);
        let x = player.position().x;
        assert!((x - 3.0).abs() <= 0.03, "x = {x}");
    }

    #[test]
    fn test_smoothing_is_continuous() {
        let (mut scene, mut player) = player();
        player.move_left();
        player.update(0.016, 0.0, &mut scene);
        let x = player.position().x;
        assert!(x < 0.0 && x > -1.0, "first frame should only start the glide: {x}");
        // Lagging to the right of the target rolls the hull negative
        assert!(player.tilt() < 0.0);
    }

    #[test]
    fn test_reset_centers_and_syncs_scene() {
        let (mut scene, mut player) = player();
        player.move_right();
        player.update(1.0, 0.0, &mut scene);
        player.reset(&mut scene);
        assert_eq!(player.lane(), Lane::Center);
        assert_eq!(player.position().x, 0.0);
        assert!(scene.iter().all(|(_, n)| n.transform.translation.x == 0.0));
    }

    #[test]
    fn test_engine_pulse_range() {
        for i in 0..100 {
            let s = engine_pulse(i as f64 * 0.037);
            assert!((0.8..=1.2).contains(&s));
        }
    }

    #[test]
    fn test_bounds_cover_engine_glow() {
        let (mut scene, mut player) = player();
        let b = player.bounds();
        assert_eq!(b.min, Vec3::new(-0.5, -0.5, -1.0) + player.position());
        assert!((b.max.z - (player.position().z + 1.2)).abs() < 1e-6);

        // Peak of the pulse
        player.update(0.016, std::f64::consts::PI / 20.0, &mut scene);
        let b = player.bounds();
        assert!((player.glow_scale() - 1.2).abs() < 1e-5);
        assert!((b.max.z - (player.position().z + 1.24)).abs() < 1e-5);
        assert_eq!(b.max.x - player.position().x, 0.5);
    }

    #[test]
    fn test_dispose_detaches_nodes() {
        let (mut scene, player) = player();
        assert_eq!(scene.len(), 2);
        player.dispose(&mut scene);
        assert!(scene.is_empty());
    }

    proptest! {
        #[test]
        fn prop_lane_stays_in_range(steps in proptest::collection::vec(any::<bool>(), 0..200)) {
            let (_, mut player) = player();
            for right in steps {
                player.apply(if right { LaneStep::Right } else { LaneStep::Left });
                let idx = player.lane().index();
                prop_assert!((-1..=1).contains(&idx));
                prop_assert_eq!(player.target_x(), idx as f32 * 3.0);
            }
        }
    }
}
