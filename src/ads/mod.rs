//! Playable-ad integration
//!
//! The game loop only ever sees [`LifecycleSink`]. [`AdAdapter`] is the
//! production sink; it picks an ad network once at startup and talks to the
//! host page through an [`SdkBridge`].

mod adapter;
mod bridge;
mod network;

pub use adapter::AdAdapter;
pub use bridge::{BridgeError, LogBridge, SdkBridge};
pub use network::{AdNetwork, GlobalProbe, NoGlobals, detect_network};

/// One-way session milestones reported by the game loop
pub trait LifecycleSink {
    /// Scene is built and the first frame is about to run
    fn game_ready(&mut self);
    fn game_started(&mut self);
    fn game_ended(&mut self);
    /// Player pressed the call-to-action
    fn install_requested(&mut self);
}
