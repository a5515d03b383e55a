//! Keyboard and touch mapping

pub use crate::sim::LaneStep;

/// What a key press asks for
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyAction {
    Step(LaneStep),
    /// Cycle the graphics quality preset
    CycleQuality,
}

/// Map a `KeyboardEvent.code` to an action
pub fn action_for_key(code: &str) -> Option<KeyAction> {
    match code {
        "ArrowLeft" | "KeyA" => Some(KeyAction::Step(LaneStep::Left)),
        "ArrowRight" | "KeyD" => Some(KeyAction::Step(LaneStep::Right)),
        "KeyQ" => Some(KeyAction::CycleQuality),
        _ => None,
    }
}

/// Touches on the left half steer left, the rest steer right
pub fn step_for_touch(x: f32, viewport_width: f32) -> LaneStep {
    if x < viewport_width / 2.0 {
        LaneStep::Left
    } else {
        LaneStep::Right
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_key_mapping() {
        let left = Some(KeyAction::Step(LaneStep::Left));
        let right = Some(KeyAction::Step(LaneStep::Right));
        assert_eq!(action_for_key("ArrowLeft"), left);
        assert_eq!(action_for_key("KeyA"), left);
        assert_eq!(action_for_key("ArrowRight"), right);
        assert_eq!(action_for_key("KeyD"), right);
        assert_eq!(action_for_key("KeyQ"), Some(KeyAction::CycleQuality));
        assert_eq!(action_for_key("Space"), None);
    }

    #[test]
    fn test_touch_halves() {
        assert_eq!(step_for_touch(10.0, 400.0), LaneStep::Left);
        assert_eq!(step_for_touch(199.9, 400.0), LaneStep::Left);
        assert_eq!(step_for_touch(200.0, 400.0), LaneStep::Right);
        assert_eq!(step_for_touch(390.0, 400.0), LaneStep::Right);
    }
}
