//! Simulation
//!
//! Gameplay logic and the game loop. Nothing in here touches the browser or
//! the GPU; the only outputs are scene node transforms and calls through the
//! injected HUD and lifecycle seams.

pub mod bounds;
pub mod camera;
pub mod obstacles;
pub mod particles;
pub mod player;
pub mod state;
pub mod tick;
pub mod world;

pub use bounds::Aabb;
pub use camera::Camera;
pub use obstacles::{Obstacle, ObstacleField};
pub use particles::{Particle, ParticleSystem};
pub use player::{Lane, LaneStep, Player, engine_pulse};
pub use state::{GamePhase, Session};
pub use tick::Game;
pub use world::World;
