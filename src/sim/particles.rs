//! Crash debris
//!
//! Pure ballistic decay: every particle owns its velocity and remaining life
//! and never interacts with anything else.

use std::rc::Rc;

use glam::{Quat, Vec3};
use rand::Rng;

use crate::scene::{MeshTemplate, NodeId, SceneGraph, Transform};
use crate::tuning::ParticleTuning;

/// A debris particle
#[derive(Debug, Clone)]
pub struct Particle {
    pub pos: Vec3,
    pub vel: Vec3,
    /// Euler spin around x and y (radians)
    pub spin: f32,
    /// Seconds remaining
    pub life: f32,
    node: NodeId,
}

/// Owns all live debris
#[derive(Debug)]
pub struct ParticleSystem {
    particles: Vec<Particle>,
    tuning: ParticleTuning,
}

impl ParticleSystem {
    pub fn new(tuning: ParticleTuning) -> Self {
        Self {
            particles: Vec::new(),
            tuning,
        }
    }

    pub fn len(&self) -> usize {
        self.particles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.particles.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Particle> {
        self.particles.iter()
    }

    /// Release `count` particles at `origin`
    ///
    /// The whole burst shares one debris template of `color`.
    pub fn explode(
        &mut self,
        origin: Vec3,
        color: u32,
        count: usize,
        scene: &mut SceneGraph,
        rng: &mut impl Rng,
    ) {
        if count == 0 {
            return;
        }
        let template = Rc::new(MeshTemplate::debris(color));
        let spread = self.tuning.spread;
        self.particles.reserve(count);
        for _ in 0..count {
            let vel = Vec3::new(
                (rng.random::<f32>() - 0.5) * spread,
                (rng.random::<f32>() - 0.5) * spread,
                (rng.random::<f32>() - 0.5) * spread,
            );
            let node = scene.attach(template.clone(), Transform::from_translation(origin));
            self.particles.push(Particle {
                pos: origin,
                vel,
                spin: 0.0,
                life: self.tuning.life,
                node,
            });
        }
    }

    /// Integrate and expire debris
    pub fn update(&mut self, dt: f32, scene: &mut SceneGraph) {
        let spin_rate = self.tuning.spin;
        self.particles.retain_mut(|p| {
            p.life -= dt;
            p.pos += p.vel * dt;
            p.spin += spin_rate * dt;

            if p.life <= 0.0 {
                scene.detach(p.node);
                return false;
            }
            if let Some(t) = scene.transform_mut(p.node) {
                t.translation = p.pos;
                t.rotation = Quat::from_rotation_x(p.spin) * Quat::from_rotation_y(p.spin);
            }
            true
        });
    }

    /// Drop every particle immediately
    pub fn clear(&mut self, scene: &mut SceneGraph) {
        for p in self.particles.drain(..) {
            scene.detach(p.node);
        }
    }
}
