//! Data-driven physics balance
//!
//! Defaults come from `consts`; a level or host may override them with JSON.

use glam::Vec2;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::consts::*;

#[derive(Debug, Error)]
pub enum TuningError {
    #[error("invalid tuning: {0}")]
    Invalid(String),
    #[error("failed to parse tuning: {0}")]
    Parse(#[from] serde_json::Error),
}

/// Physics constants for one scene
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Tuning {
    /// Milliseconds of wall time per tick
    pub tick_interval_ms: f32,
    pub snap_threshold: f32,
    pub steer_base: f32,
    pub gravity: f32,
    pub jump_impulse: f32,
    pub restitution_x: f32,
    pub restitution_y: f32,
    pub track_speed: f32,
    pub exit_grace_ticks: u32,
}

impl Default for Tuning {
    fn default() -> Self {
        Self {
            tick_interval_ms: TICK_INTERVAL_MS,
            snap_threshold: SNAP_THRESHOLD,
            steer_base: STEER_BASE,
            gravity: GRAVITY,
            jump_impulse: JUMP_IMPULSE,
            restitution_x: RESTITUTION_X,
            restitution_y: RESTITUTION_Y,
            track_speed: TRACK_SPEED,
            exit_grace_ticks: EXIT_GRACE_TICKS,
        }
    }
}

impl Tuning {
    /// Parse and validate a JSON override (missing fields keep their defaults)
    pub fn from_json(json: &str) -> Result<Self, TuningError> {
        let tuning: Tuning = serde_json::from_str(json)?;
        tuning.validate()?;
        Ok(tuning)
    }

    #[inline]
    pub fn restitution(&self) -> Vec2 {
        Vec2::new(self.restitution_x, self.restitution_y)
    }

    pub fn validate(&self) -> Result<(), TuningError> {
        let positive = [
            ("tick_interval_ms", self.tick_interval_ms),
            ("steer_base", self.steer_base),
            ("track_speed", self.track_speed),
        ];
        for (name, value) in positive {
            if !value.is_finite() || value <= 0.0 {
                return Err(TuningError::Invalid(format!("{name} must be finite and > 0")));
            }
        }

        let non_negative = [
            ("snap_threshold", self.snap_threshold),
            ("gravity", self.gravity),
            ("jump_impulse", self.jump_impulse),
            ("restitution_x", self.restitution_x),
            ("restitution_y", self.restitution_y),
        ];
        for (name, value) in non_negative {
            if !value.is_finite() || value < 0.0 {
                return Err(TuningError::Invalid(format!("{name} must be finite and >= 0")));
            }
        }

        // Gravity below the snap threshold is erased before it can move anything
        if self.gravity > 0.0 && self.gravity < self.snap_threshold {
            return Err(TuningError::Invalid(
                "gravity must be 0 or >= snap_threshold".to_string(),
            ));
        }
        Ok(())
    }
}
