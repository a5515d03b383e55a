//! Session state
//!
//! Everything about the current run that only the game loop may change.

use serde::{Deserialize, Serialize};

/// Current phase of the game
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum GamePhase {
    /// Before the first start or after a crash; backdrop idles
    #[default]
    Idle,
    /// A run is live
    Playing,
}

/// Score and pacing of the current run
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Session {
    pub phase: GamePhase,
    /// Fractional score accumulator
    pub score: f32,
    /// Scroll speed (units/s)
    pub speed: f32,
    /// Seconds since the run started
    pub elapsed: f32,
    /// Runs started since the page loaded
    pub runs: u32,
}

impl Session {
    /// Begin a fresh run at `base_speed`
    pub fn begin(&mut self, base_speed: f32) {
        self.phase = GamePhase::Playing;
        self.score = 0.0;
        self.speed = base_speed;
        self.elapsed = 0.0;
        self.runs += 1;
    }

    pub fn is_playing(&self) -> bool {
        self.phase == GamePhase::Playing
    }

    /// Whole points shown on the HUD
    pub fn display_score(&self) -> u32 {
        self.score.max(0.0).floor() as u32
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_begin_resets_run() {
        let mut session = Session {
            phase: GamePhase::Idle,
            score: 123.7,
            speed: 55.0,
            elapsed: 70.0,
            runs: 2,
        };
        session.begin(20.0);
        assert!(session.is_playing());
        assert_eq!(session.score, 0.0);
        assert_eq!(session.speed, 20.0);
        assert_eq!(session.runs, 3);
    }

    #[test]
    fn test_display_score_floors() {
        let session = Session {
            score: 41.99,
            ..Session::default()
        };
        assert_eq!(session.display_score(), 41);
    }
}
