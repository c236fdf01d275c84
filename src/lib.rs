//! Cloud Roll - a side-scrolling physics platformer core
//!
//! Core modules:
//! - `sim`: Fixed-step simulation (geometry, collisions, player, scene, tick)
//! - `sprite`: Sprite-sheet frame bookkeeping and scoped animation tasks
//! - `platform`: Held-key input, fixed-step clock, browser binding
//! - `level`: Level data loading and validation
//! - `tuning`: Data-driven physics balance
//! - `settings`: Player preferences (key bindings)

pub mod level;
pub mod platform;
pub mod settings;
pub mod sim;
pub mod sprite;
pub mod tuning;

pub use level::{LevelData, LevelError};
pub use settings::{Action, KeyBindings, Settings};
pub use tuning::{Tuning, TuningError};

/// Game configuration constants
pub mod consts {
    /// Fixed simulation timestep in milliseconds (50 Hz)
    pub const TICK_INTERVAL_MS: f32 = 20.0;
    /// Maximum ticks per frame to prevent spiral of death
    pub const MAX_SUBSTEPS: u32 = 8;

    /// Velocity components below this magnitude are snapped to zero before integrating
    pub const SNAP_THRESHOLD: f32 = 2.0;
    /// Steering strength numerator: curve = STEER_BASE / speed
    pub const STEER_BASE: f32 = 25.0;
    /// Added to vertical velocity on every tick without contact (y points down)
    pub const GRAVITY: f32 = 2.0;
    /// Subtracted from vertical velocity when jumping off a surface
    pub const JUMP_IMPULSE: f32 = 18.0;

    /// Horizontal velocity retained by a bounce
    pub const RESTITUTION_X: f32 = 0.7;
    /// Vertical velocity retained (and flipped) by a bounce
    pub const RESTITUTION_Y: f32 = 0.55;

    /// Units travelled per tick while riding a hook or pipe
    pub const TRACK_SPEED: f32 = 6.0;
    /// Ticks after leaving a ride or twine during which it can't re-attach
    pub const EXIT_GRACE_TICKS: u32 = 15;

    /// Default player extents and collision radius
    pub const PLAYER_SIZE: f32 = 32.0;
    pub const PLAYER_RADIUS: f32 = 14.0;
}

/// Sign of a value, with zero mapping to zero (unlike `f32::signum`)
#[inline]
pub fn sign(value: f32) -> f32 {
    if value > 0.0 {
        1.0
    } else if value < 0.0 {
        -1.0
    } else {
        0.0
    }
}

/// Angle of a direction relative to the +x axis, in (-π, π]
#[inline]
pub fn heading(delta: glam::Vec2) -> f32 {
    delta.y.atan2(delta.x)
}
