//! Frame timing

use crate::consts::{DEFAULT_FRAME_DT, MAX_FRAME_DT};

/// Turns animation-frame timestamps into simulation deltas
#[derive(Debug, Clone, Copy, Default)]
pub struct FrameClock {
    last_ms: Option<f64>,
}

impl FrameClock {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seconds since the previous frame, clamped to `[0, MAX_FRAME_DT]`
    ///
    /// The first frame has no predecessor and yields `DEFAULT_FRAME_DT`.
    pub fn frame(&mut self, now_ms: f64) -> f32 {
        let dt = match self.last_ms {
            Some(last) => ((now_ms - last) / 1000.0) as f32,
            None => DEFAULT_FRAME_DT,
        };
        self.last_ms = Some(now_ms);
        crate::sanitize_delta(dt).min(MAX_FRAME_DT)
    }

    /// Forget the previous timestamp; the next frame yields `DEFAULT_FRAME_DT`
    pub fn reset(&mut self) {
        self.last_ms = None;
    }
}
