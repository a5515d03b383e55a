//! Neon Runner - A lane-dodging endless runner
//!
//! Core modules:
//! - `sim`: Frame-driven simulation (track scroll, obstacles, player, particles)
//! - `scene`: Retained scene graph with shared mesh templates
//! - `renderer`: WebGPU rendering pipeline
//! - `ads`: Playable-ad network adapter (lifecycle hooks)
//! - `platform`: Browser/native platform abstraction
//! - `tuning`: Data-driven game balance

pub mod ads;
pub mod platform;
pub mod renderer;
pub mod scene;
pub mod settings;
pub mod sim;
pub mod tuning;
pub mod ui;

pub use settings::{QualityPreset, Settings};
pub use sim::Game;
pub use tuning::Tuning;

/// Game configuration constants (defaults for [`Tuning`])
pub mod consts {
    /// Distance between lane centers
    pub const LANE_WIDTH: f32 = 3.0;

    /// Speed at the start of every run (units/s)
    pub const BASE_SPEED: f32 = 20.0;
    /// Linear speed ramp while playing (units/s²)
    pub const SPEED_ACCELERATION: f32 = 0.5;
    /// Scroll speed of the backdrop while idle
    pub const IDLE_SPEED: f32 = 5.0;
    /// Score gained per unit travelled
    pub const SCORE_RATE: f32 = 0.1;

    /// Spawn interval at the reference speed (seconds)
    pub const SPAWN_BASE_INTERVAL: f32 = 2.0;
    /// Spawn interval never drops below this (seconds)
    pub const SPAWN_FLOOR_INTERVAL: f32 = 0.5;
    /// Interval reduction per unit of speed above the reference
    pub const SPAWN_RAMP: f32 = 0.05;
    /// Speed at which the spawn interval equals the base interval
    pub const SPAWN_REFERENCE_SPEED: f32 = 10.0;
    /// Scroll-axis position where obstacles appear
    pub const SPAWN_Z: f32 = -100.0;
    /// Obstacles past this scroll-axis position are retired
    pub const DESPAWN_Z: f32 = 20.0;
    /// Obstacle cube edge length
    pub const OBSTACLE_SIZE: f32 = 2.0;

    /// Player hull rest height
    pub const PLAYER_HEIGHT: f32 = 0.5;
    /// Exponential smoothing rate toward the target lane (1/s)
    pub const PLAYER_SMOOTHING: f32 = 10.0;
    /// Roll per unit of lateral lag
    pub const PLAYER_TILT: f32 = 0.1;

    /// Shrink applied to the player box before collision tests
    pub const PLAYER_INSET: f32 = 0.2;
    /// Shrink applied to obstacle boxes before collision tests
    pub const OBSTACLE_INSET: f32 = 0.1;

    /// Debris released when the player crashes
    pub const CRASH_BURST: usize = 50;
    /// Debris color on crash
    pub const CRASH_COLOR: u32 = 0x00ffff;
    /// Full width of the per-axis debris velocity range
    pub const PARTICLE_SPREAD: f32 = 10.0;
    /// Debris lifetime (seconds)
    pub const PARTICLE_LIFE: f32 = 1.0;
    /// Cosmetic debris spin (radians/s)
    pub const PARTICLE_SPIN: f32 = 5.0;

    /// Floor tile length along the scroll axis
    pub const TILE_LENGTH: f32 = 100.0;
    /// Grid lines per tile
    pub const TILE_DIVISIONS: u32 = 100;
    /// A tile reaching this scroll-axis position wraps behind the other
    pub const TILE_WRAP_Z: f32 = 50.0;
    /// Starfield cube edge length
    pub const STARFIELD_EXTENT: f32 = 2000.0;

    /// Largest frame delta the platform clock hands to the simulation
    pub const MAX_FRAME_DT: f32 = 0.1;
    /// Delta used for the very first frame
    pub const DEFAULT_FRAME_DT: f32 = 1.0 / 60.0;

    /// Store page opened by the install call-to-action
    pub const STORE_URL: &str = "https://play.google.com/store/apps/details?id=com.example.neonrunner";
}

/// Clamp a frame delta into a usable range (negative or NaN -> 0)
#[inline]
pub fn sanitize_delta(dt: f32) -> f32 {
    if dt.is_finite() && dt > 0.0 { dt } else { 0.0 }
}

/// Convert a 0xRRGGBB color to linear-ish RGBA floats
#[inline]
pub fn hex_to_rgba(hex: u32) -> [f32; 4] {
    [
        ((hex >> 16) & 0xff) as f32 / 255.0,
        ((hex >> 8) & 0xff) as f32 / 255.0,
        (hex & 0xff) as f32 / 255.0,
        1.0,
    ]
}
