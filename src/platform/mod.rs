//! Platform abstraction layer
//!
//! Handles host-facing concerns for:
//! - Input events (held key codes)
//! - Time/ticks (fixed-step clock)
//! - Browser binding (wasm32 only)

pub mod clock;
pub mod input;
#[cfg(target_arch = "wasm32")]
pub mod web;

pub use clock::FixedStepClock;
pub use input::HeldKeys;
