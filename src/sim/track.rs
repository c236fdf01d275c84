//! Track riding for hooks and pipes
//!
//! A ride walks the player's circle center along a polyline at a fixed speed
//! per tick. Several waypoints may be consumed in one tick when they are
//! closer together than the step.

use glam::Vec2;

/// Which kind of track is being ridden
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TrackKind {
    /// Player may jump off
    Hook,
    /// Player is carried to the end
    Pipe,
}

impl TrackKind {
    pub fn detachable(self) -> bool {
        self == TrackKind::Hook
    }
}

/// Outcome of advancing a ride by one tick
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TrackStep {
    /// New circle center
    pub center: Vec2,
    /// Unit direction of the last movement (zero if nothing moved yet)
    pub direction: Vec2,
    /// True once the last waypoint was reached
    pub finished: bool,
}

/// A ride in progress
#[derive(Debug, Clone, PartialEq)]
pub struct TrackRide {
    path: Vec<Vec2>,
    next: usize,
    direction: Vec2,
    pub kind: TrackKind,
}

impl TrackRide {
    pub fn new(path: Vec<Vec2>, kind: TrackKind) -> Self {
        Self {
            path,
            next: 0,
            direction: Vec2::ZERO,
            kind,
        }
    }

    /// Index of the waypoint being travelled to
    pub fn next_waypoint(&self) -> usize {
        self.next
    }

    /// Move `center` up to `speed` units along the remaining path
    pub fn advance(&mut self, center: Vec2, speed: f32) -> TrackStep {
        let mut current = center;
        let mut remaining = speed;

        while let Some(&target) = self.path.get(self.next) {
            let to_target = target - current;
            let distance = to_target.length();
            if distance > 0.0 {
                self.direction = to_target / distance;
            }

            if distance <= remaining {
                current = target;
                remaining -= distance;
                self.next += 1;
            } else {
                current += self.direction * remaining;
                return TrackStep {
                    center: current,
                    direction: self.direction,
                    finished: false,
                };
            }
        }

        TrackStep {
            center: current,
            direction: self.direction,
            finished: true,
        }
    }
}
