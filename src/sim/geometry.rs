//! Geometry primitives for straight-line levels
//!
//! A `Vector2D` is a directional delta with a cached angle and magnitude. The
//! cache is NOT refreshed automatically when the delta is edited in place;
//! call `recompute()` after a batch of edits (or use `set()`).

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::heading;

/// A directional delta with derived angle and magnitude
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Vector2D {
    /// Raw delta. Edit freely, then call `recompute()`
    pub delta: Vec2,
    angle: f32,
    magnitude: f32,
}

impl Default for Vector2D {
    fn default() -> Self {
        Self::new(Vec2::ZERO)
    }
}

impl Vector2D {
    pub fn new(delta: Vec2) -> Self {
        let mut vector = Self {
            delta,
            angle: 0.0,
            magnitude: 0.0,
        };
        vector.recompute();
        vector
    }

    /// Refresh the cached angle and magnitude from `delta`
    #[inline]
    pub fn recompute(&mut self) {
        self.angle = heading(self.delta);
        self.magnitude = self.delta.length();
    }

    /// Replace the delta and refresh the derived fields
    #[inline]
    pub fn set(&mut self, delta: Vec2) {
        self.delta = delta;
        self.recompute();
    }

    /// Angle in radians from the +x axis, as of the last recompute
    #[inline]
    pub fn angle(&self) -> f32 {
        self.angle
    }

    /// Length, as of the last recompute
    #[inline]
    pub fn magnitude(&self) -> f32 {
        self.magnitude
    }

    /// Unit-length copy of the delta (zero stays zero)
    pub fn unit(&self) -> Vec2 {
        if self.magnitude > 0.0 {
            self.delta / self.magnitude
        } else {
            Vec2::ZERO
        }
    }
}

/// A finite directed line segment: origin plus extent
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Segment {
    pub origin: Vec2,
    pub extent: Vector2D,
}

impl Segment {
    pub fn new(x: f32, y: f32, dx: f32, dy: f32) -> Self {
        Self {
            origin: Vec2::new(x, y),
            extent: Vector2D::new(Vec2::new(dx, dy)),
        }
    }

    /// Segment between two points
    pub fn between(start: Vec2, end: Vec2) -> Self {
        Self {
            origin: start,
            extent: Vector2D::new(end - start),
        }
    }

    #[inline]
    pub fn start(&self) -> Vec2 {
        self.origin
    }

    #[inline]
    pub fn end(&self) -> Vec2 {
        self.origin + self.extent.delta
    }

    #[inline]
    pub fn length(&self) -> f32 {
        self.extent.magnitude()
    }

    /// Surface angle used by the bounce response
    #[inline]
    pub fn angle(&self) -> f32 {
        self.extent.angle()
    }

    /// Same segment walked from the other end
    pub fn reversed(&self) -> Self {
        Self::between(self.end(), self.start())
    }
}

/// A circle (the player's collision volume)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Circle {
    pub center: Vec2,
    pub radius: f32,
}

impl Circle {
    pub fn new(x: f32, y: f32, radius: f32) -> Self {
        Self {
            center: Vec2::new(x, y),
            radius,
        }
    }
}
