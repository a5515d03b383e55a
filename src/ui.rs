//! HUD seam
//!
//! The game loop pushes score and panel visibility through [`Hud`]; the DOM
//! implementation lives in `platform::web`.

/// Overlay the game loop writes to
pub trait Hud {
    fn set_score(&mut self, score: u32);
    fn set_start_visible(&mut self, visible: bool);
    fn set_game_over_visible(&mut self, visible: bool);
}

/// Headless HUD
#[derive(Debug, Clone, Copy, Default)]
pub struct NullHud;

impl Hud for NullHud {
    fn set_score(&mut self, _score: u32) {}
    fn set_start_visible(&mut self, _visible: bool) {}
    fn set_game_over_visible(&mut self, _visible: bool) {}
}
