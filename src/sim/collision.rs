//! Collision detection between the player's circle and line-segment surfaces
//!
//! A contact requires both that the circle reaches the segment's line
//! (perpendicular distance within the radius) and that the closest point on
//! that line lies on the finite segment.

use glam::Vec2;

use super::entity::EntityId;
use super::geometry::{Circle, Segment};

/// Slack for the on-segment test: a few ulps per unit of length
const SEGMENT_REL_TOLERANCE: f32 = 16.0 * f32::EPSILON;
/// Floor for short segments, where coordinate rounding dominates
const SEGMENT_ABS_TOLERANCE: f32 = 1e-4;

/// Result of a collision check
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CollisionResult {
    /// Whether a collision occurred
    pub hit: bool,
    /// Closest point on the surface's line to the circle center
    pub point: Vec2,
    /// Signed overlap depth (radius minus distance). Only meaningful when `hit`
    pub penetration: f32,
}

/// Who owns a collision surface
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SurfaceOwner {
    /// Bare static obstacle, always bounces
    Plain,
    /// Refers to an entity whose contact behavior runs before the bounce
    Owned(EntityId),
}

/// A segment registered with the scene, optionally tagged with its owner
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CollisionSurface {
    pub segment: Segment,
    pub owner: SurfaceOwner,
}

impl CollisionSurface {
    pub fn plain(segment: Segment) -> Self {
        Self {
            segment,
            owner: SurfaceOwner::Plain,
        }
    }

    pub fn owned(segment: Segment, owner: EntityId) -> Self {
        Self {
            segment,
            owner: SurfaceOwner::Owned(owner),
        }
    }
}

/// True if `point` lies on the finite segment (within rounding tolerance)
///
/// Uses the triangle inequality: the point is on the segment exactly when
/// |AP| + |PB| equals |AB|.
pub fn point_on_segment(segment: &Segment, point: Vec2) -> bool {
    let length = segment.start().distance(segment.end());
    let via_point = segment.start().distance(point) + point.distance(segment.end());
    length + SEGMENT_REL_TOLERANCE * length + SEGMENT_ABS_TOLERANCE >= via_point
}

/// Closest point to `point` on the infinite line through `segment`
///
/// A zero-length segment projects everything onto its origin.
pub fn project_point_onto_line(point: Vec2, segment: &Segment) -> Vec2 {
    let ab = segment.extent.delta;
    let ap = point - segment.origin;
    let len_sq = ab.length_squared();
    if len_sq == 0.0 {
        return segment.origin;
    }
    segment.origin + ab * (ab.dot(ap) / len_sq)
}

/// Check a circle against a finite segment
pub fn circle_segment_collision(circle: &Circle, segment: &Segment) -> CollisionResult {
    let closest = project_point_onto_line(circle.center, segment);
    let distance = circle.center.distance(closest);
    let hit = circle.radius >= distance && point_on_segment(segment, closest);

    CollisionResult {
        hit,
        point: closest,
        penetration: circle.radius - distance,
    }
}
