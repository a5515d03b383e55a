//! Data-driven game balance
//!
//! Every value defaults to the matching constant in [`crate::consts`]; a JSON
//! document only needs to name the fields it overrides.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::consts::*;

/// Errors produced while loading a tuning document
#[derive(Debug, Error)]
pub enum TuningError {
    #[error("tuning parse error: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("invalid tuning: {0}")]
    Invalid(String),
}

/// Session pacing: speed ramp and scoring
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SessionTuning {
    pub base_speed: f32,
    pub acceleration: f32,
    pub idle_speed: f32,
    pub score_rate: f32,
    /// Debris count released on a crash
    pub crash_burst: usize,
    pub crash_color: u32,
}

impl Default for SessionTuning {
    fn default() -> Self {
        Self {
            base_speed: BASE_SPEED,
            acceleration: SPEED_ACCELERATION,
            idle_speed: IDLE_SPEED,
            score_rate: SCORE_RATE,
            crash_burst: CRASH_BURST,
            crash_color: CRASH_COLOR,
        }
    }
}

/// Obstacle spawning, movement and collision forgiveness
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ObstacleTuning {
    pub base_interval: f32,
    pub floor_interval: f32,
    pub ramp: f32,
    pub reference_speed: f32,
    pub spawn_z: f32,
    pub despawn_z: f32,
    pub size: f32,
    pub player_inset: f32,
    pub obstacle_inset: f32,
}

impl Default for ObstacleTuning {
    fn default() -> Self {
        Self {
            base_interval: SPAWN_BASE_INTERVAL,
            floor_interval: SPAWN_FLOOR_INTERVAL,
            ramp: SPAWN_RAMP,
            reference_speed: SPAWN_REFERENCE_SPEED,
            spawn_z: SPAWN_Z,
            despawn_z: DESPAWN_Z,
            size: OBSTACLE_SIZE,
            player_inset: PLAYER_INSET,
            obstacle_inset: OBSTACLE_INSET,
        }
    }
}

/// Player lane geometry and smoothing
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlayerTuning {
    pub lane_width: f32,
    pub height: f32,
    pub smoothing: f32,
    pub tilt: f32,
}

impl Default for PlayerTuning {
    fn default() -> Self {
        Self {
            lane_width: LANE_WIDTH,
            height: PLAYER_HEIGHT,
            smoothing: PLAYER_SMOOTHING,
            tilt: PLAYER_TILT,
        }
    }
}

/// Debris behaviour
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ParticleTuning {
    pub spread: f32,
    pub life: f32,
    pub spin: f32,
}

impl Default for ParticleTuning {
    fn default() -> Self {
        Self {
            spread: PARTICLE_SPREAD,
            life: PARTICLE_LIFE,
            spin: PARTICLE_SPIN,
        }
    }
}

/// Floor tiles and backdrop
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TrackTuning {
    pub tile_length: f32,
    pub tile_divisions: u32,
    pub wrap_z: f32,
    pub starfield_extent: f32,
}

impl Default for TrackTuning {
    fn default() -> Self {
        Self {
            tile_length: TILE_LENGTH,
            tile_divisions: TILE_DIVISIONS,
            wrap_z: TILE_WRAP_Z,
            starfield_extent: STARFIELD_EXTENT,
        }
    }
}

/// Ad adapter configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AdTuning {
    pub store_url: String,
}

impl Default for AdTuning {
    fn default() -> Self {
        Self {
            store_url: STORE_URL.to_string(),
        }
    }
}

/// Complete balance sheet
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Tuning {
    pub session: SessionTuning,
    pub obstacles: ObstacleTuning,
    pub player: PlayerTuning,
    pub particles: ParticleTuning,
    pub track: TrackTuning,
    pub ads: AdTuning,
}

impl Tuning {
    /// Parse a (possibly partial) JSON document and validate it
    pub fn from_json(json: &str) -> Result<Self, TuningError> {
        let tuning: Tuning = serde_json::from_str(json)?;
        tuning.validate()?;
        Ok(tuning)
    }

    /// Reject values that would stall or break the simulation
    pub fn validate(&self) -> Result<(), TuningError> {
        let positive = [
            ("obstacles.floor_interval", self.obstacles.floor_interval),
            ("obstacles.base_interval", self.obstacles.base_interval),
            ("obstacles.size", self.obstacles.size),
            ("player.lane_width", self.player.lane_width),
            ("player.smoothing", self.player.smoothing),
            ("particles.life", self.particles.life),
            ("track.tile_length", self.track.tile_length),
        ];
        for (name, value) in positive {
            if !(value.is_finite() && value > 0.0) {
                return Err(TuningError::Invalid(format!("{name} must be > 0, got {value}")));
            }
        }
        let speeds = [
            ("session.base_speed", self.session.base_speed),
            ("session.idle_speed", self.session.idle_speed),
        ];
        for (name, value) in speeds {
            if !(value.is_finite() && value >= 0.0) {
                return Err(TuningError::Invalid(format!("{name} must be >= 0, got {value}")));
            }
        }
        if self.obstacles.ramp < 0.0 || self.session.acceleration < 0.0 {
            return Err(TuningError::Invalid(
                "speed ramps must not be negative".to_string(),
            ));
        }
        if self.obstacles.despawn_z <= self.obstacles.spawn_z {
            return Err(TuningError::Invalid(
                "obstacles.despawn_z must lie ahead of obstacles.spawn_z".to_string(),
            ));
        }
        let min_inset = self.obstacles.player_inset.min(self.obstacles.obstacle_inset);
        if min_inset < 0.0 {
            return Err(TuningError::Invalid("collision insets must not be negative".to_string()));
        }
        Ok(())
    }

    /// Load an override document from the page (WASM only)
    ///
    /// Looks for `<script id="tuning" type="application/json">`; falls back to
    /// defaults when it is missing or malformed.
    #[cfg(target_arch = "wasm32")]
    pub fn load() -> Self {
        let text = web_sys::window()
            .and_then(|w| w.document())
            .and_then(|d| d.get_element_by_id("tuning"))
            .and_then(|el| el.text_content());

        match text {
            Some(json) if !json.trim().is_empty() => match Self::from_json(&json) {
                Ok(tuning) => {
                    log::info!("Loaded tuning overrides from page");
                    tuning
                }
                Err(e) => {
                    log::warn!("Ignoring tuning overrides: {}", e);
                    Self::default()
                }
            },
            _ => Self::default(),
        }
    }

    /// Native stub
    #[cfg(not(target_arch = "wasm32"))]
    pub fn load() -> Self {
        Self::default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partial_document_keeps_defaults() {
        let tuning = Tuning::from_json(r#"{ "session": { "base_speed": 30.0 } }"#).unwrap();
        assert_eq!(tuning.session.base_speed, 30.0);
        assert_eq!(tuning.session.acceleration, SPEED_ACCELERATION);
        assert_eq!(tuning.obstacles, ObstacleTuning::default());
        assert_eq!(tuning.ads.store_url, STORE_URL);
    }

    #[test]
    fn test_empty_document_is_default() {
        assert_eq!(Tuning::from_json("{}").unwrap(), Tuning::default());
    }

    #[test]
    fn test_rejects_zero_floor_interval() {
        let err = Tuning::from_json(r#"{ "obstacles": { "floor_interval": 0.0 } }"#).unwrap_err();
        assert!(matches!(err, TuningError::Invalid(_)));
    }

    #[test]
    fn test_rejects_negative_speeds() {
        let err = Tuning::from_json(r#"{ "session": { "base_speed": -20.0, "acceleration": 0.0 } }"#)
            .unwrap_err();
        assert!(err.to_string().contains("session.base_speed"));
        let err = Tuning::from_json(r#"{ "session": { "idle_speed": -5.0 } }"#).unwrap_err();
        assert!(err.to_string().contains("session.idle_speed"));
        assert!(Tuning::from_json(r#"{ "session": { "idle_speed": 0.0 } }"#).is_ok());
    }

    #[test]
    fn test_rejects_despawn_behind_spawn() {
        let err = Tuning::from_json(r#"{ "obstacles": { "despawn_z": -200.0 } }"#).unwrap_err();
        assert!(err.to_string().contains("despawn_z"));
    }

    #[test]
    fn test_parse_error() {
        let err = Tuning::from_json("{ not json").unwrap_err();
        assert!(matches!(err, TuningError::Parse(_)));
    }
}
