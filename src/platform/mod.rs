//! Platform abstraction layer
//!
//! Handles browser/native differences for:
//! - Frame timing
//! - Input events
//! - DOM HUD, ad SDK globals and the frame loop (`web`, wasm only)

pub mod input;
pub mod time;

#[cfg(target_arch = "wasm32")]
pub mod web;

pub use input::{KeyAction, action_for_key, step_for_touch};
pub use time::FrameClock;
