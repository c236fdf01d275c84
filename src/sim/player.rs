//! The player: a renderable body with a collision circle and a velocity
//!
//! Position and velocity are separate fields. The collision circle must
//! always sit at position + half extent, so every position change goes
//! through `update_position`.

use glam::Vec2;
use std::f32::consts::{FRAC_PI_2, PI};

use super::entity::{Body, BounceResponse, EntityId, Renderable, Visual};
use super::geometry::{Circle, Segment, Vector2D};
use super::track::TrackRide;
use crate::sign;

/// Animation the renderer should show, mapped onto sprite-sheet groups
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, serde::Serialize)]
pub enum AnimationState {
    #[default]
    Idle,
    RollRight,
    RollLeft,
    AirRight,
    AirUp,
    AirLeft,
    AirDown,
    Death,
}

impl AnimationState {
    /// Frame group index in the player's sprite sheet
    pub fn group(self) -> usize {
        match self {
            AnimationState::Idle => 0,
            AnimationState::RollRight => 1,
            AnimationState::RollLeft => 2,
            AnimationState::AirRight => 3,
            AnimationState::AirUp => 4,
            AnimationState::AirLeft => 5,
            AnimationState::AirDown => 6,
            AnimationState::Death => 7,
        }
    }

    /// Rolling animation from horizontal velocity
    pub fn from_roll(dx: f32) -> Self {
        if dx > 0.0 {
            AnimationState::RollRight
        } else if dx < 0.0 {
            AnimationState::RollLeft
        } else {
            AnimationState::Idle
        }
    }

    /// Track/air animation from the dominant travel direction (y points down)
    pub fn from_travel(direction: Vec2) -> Self {
        if direction == Vec2::ZERO {
            AnimationState::Idle
        } else if direction.x.abs() >= direction.y.abs() {
            if direction.x > 0.0 {
                AnimationState::AirRight
            } else {
                AnimationState::AirLeft
            }
        } else if direction.y < 0.0 {
            AnimationState::AirUp
        } else {
            AnimationState::AirDown
        }
    }
}

/// Cosmetic/gameplay mode toggled by berries and fish
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, serde::Serialize)]
pub enum PlayerMode {
    #[default]
    Standard,
    Cloud,
}

/// How the player is currently moving
#[derive(Debug, Clone, PartialEq, Default)]
pub enum Movement {
    /// Normal physics
    #[default]
    Free,
    /// Following a hook or pipe track
    Riding(TrackRide),
    /// Hanging on twine, gravity off
    Twine,
    /// Just left a ride or twine; tracks can't catch the player yet
    Exiting { ticks_left: u32 },
}

/// Flags written by contact hooks and read by the tick
#[derive(Debug, Clone, Default)]
pub struct PlayerStatus {
    pub mode: PlayerMode,
    pub movement: Movement,
    /// Touching ice this tick: steering ignored
    pub on_ice: bool,
    pub deaths: u32,
}

impl PlayerStatus {
    /// Whether a track or twine may take over movement now
    pub fn can_attach(&self) -> bool {
        !matches!(self.movement, Movement::Riding(_) | Movement::Exiting { .. })
    }

    pub fn is_riding(&self) -> bool {
        matches!(self.movement, Movement::Riding(_))
    }

    pub fn reset_after_death(&mut self) {
        self.movement = Movement::Free;
        self.on_ice = false;
        self.deaths += 1;
    }

    /// Count down the exit grace period
    pub fn tick_exit_grace(&mut self) {
        if let Movement::Exiting { ticks_left } = self.movement {
            self.movement = if ticks_left <= 1 {
                Movement::Free
            } else {
                Movement::Exiting {
                    ticks_left: ticks_left - 1,
                }
            };
        }
    }
}

/// The player character
#[derive(Debug, Clone)]
pub struct Player {
    pub id: EntityId,
    body: Body,
    pub visual: Visual,
    circle: Circle,
    /// Velocity in units per tick. Call `velocity.recompute()` after editing `delta`
    pub velocity: Vector2D,
    animation: AnimationState,
}

impl Player {
    pub fn new(id: EntityId, body: Body, visual: Visual, radius: f32) -> Self {
        let mut player = Self {
            id,
            body,
            visual,
            circle: Circle::new(0.0, 0.0, radius),
            velocity: Vector2D::default(),
            animation: AnimationState::Idle,
        };
        player.sync_collision_volume();
        player
    }

    /// Top-left position
    #[inline]
    pub fn position(&self) -> Vec2 {
        self.body.position
    }

    #[inline]
    pub fn circle(&self) -> &Circle {
        &self.circle
    }

    #[inline]
    pub fn animation(&self) -> AnimationState {
        self.animation
    }

    /// Move to `position` and re-sync the collision circle
    pub fn update_position(&mut self, position: Vec2) {
        self.body.position = position;
        self.sync_collision_volume();
    }

    /// Resize the body; the circle center follows the new half extent
    pub fn set_size(&mut self, size: Vec2) {
        self.body.size = size;
        self.sync_collision_volume();
    }

    /// Place the circle center at position + half extent
    pub fn sync_collision_volume(&mut self) {
        self.circle.center = self.body.position + self.body.half_extent();
    }

    /// Snap tiny velocity components to zero, then integrate one tick
    pub fn move_step(&mut self, snap_threshold: f32) {
        let v = &mut self.velocity.delta;
        if v.x.abs() < snap_threshold {
            v.x = 0.0;
        }
        if v.y.abs() < snap_threshold {
            v.y = 0.0;
        }
        self.velocity.recompute();
        self.update_position(self.body.position + self.velocity.delta);
    }

    /// Reflect the velocity off `surface`
    ///
    /// `restitution` scales the horizontal and vertical components; the
    /// penetration depth is fed back as a corrective impulse.
    pub fn bounce(
        &mut self,
        response: BounceResponse,
        surface: &Segment,
        penetration: f32,
        restitution: Vec2,
    ) {
        if response == BounceResponse::SuppressBounce {
            return;
        }

        let between = self.velocity.angle() - surface.angle();
        let final_angle = FRAC_PI_2 - (2.0 * between).abs() * sign(between) + PI;
        let reflection = Vec2::new(final_angle.cos(), final_angle.sin());

        let v = self.velocity.delta;
        let dx = v.x * Vec2::Y.dot(reflection) * restitution.x + penetration * reflection.x;
        let dy = (v.y + penetration) * -reflection.y * restitution.y;
        self.velocity.set(Vec2::new(dx, dy));
    }

    /// Teleport to `position` with zero velocity
    pub fn respawn(&mut self, position: Vec2) {
        self.update_position(position);
        self.velocity.set(Vec2::ZERO);
    }

    /// Switch animation, changing sprite-sheet group only on a real change
    pub fn set_animation(&mut self, state: AnimationState) {
        if self.animation == state {
            return;
        }
        self.animation = state;
        if let Visual::Animated(sprite) = &mut self.visual {
            if let Err(err) = sprite.switch_animation(state.group()) {
                log::warn!("Player sheet has no group for {:?}: {}", state, err);
            }
        }
    }
}

impl Renderable for Player {
    fn id(&self) -> EntityId {
        self.id
    }

    fn body(&self) -> &Body {
        &self.body
    }

    fn visual(&self) -> &Visual {
        &self.visual
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::consts::{RESTITUTION_X, RESTITUTION_Y, SNAP_THRESHOLD};
    use proptest::prelude::*;

    const RESTITUTION: Vec2 = Vec2::new(RESTITUTION_X, RESTITUTION_Y);

    fn player_at(x: f32, y: f32) -> Player {
        Player::new(
            EntityId(1),
            Body::new(Vec2::new(x, y), Vec2::new(32.0, 32.0)),
            Visual::Image("player".into()),
            14.0,
        )
    }

    #[test]
    fn test_circle_tracks_position() {
        let mut player = player_at(10.0, 20.0);
        assert_eq!(player.circle().center, Vec2::new(26.0, 36.0));

        player.update_position(Vec2::new(-4.0, 0.0));
        assert_eq!(player.circle().center, Vec2::new(12.0, 16.0));

        player.set_size(Vec2::new(10.0, 20.0));
        assert_eq!(player.circle().center, Vec2::new(1.0, 10.0));
    }

    #[test]
    fn test_move_step_integrates() {
        let mut player = player_at(0.0, 0.0);
        player.velocity.set(Vec2::new(5.0, -3.0));
        player.move_step(SNAP_THRESHOLD);
        assert_eq!(player.position(), Vec2::new(5.0, -3.0));
        assert_eq!(player.circle().center, Vec2::new(21.0, 13.0));
    }

    #[test]
    fn test_move_step_snaps_small_velocity() {
        let mut player = player_at(50.0, 50.0);
        player.velocity.set(Vec2::new(1.99, -1.5));
        player.move_step(SNAP_THRESHOLD);
        assert_eq!(player.position(), Vec2::new(50.0, 50.0));
        assert_eq!(player.velocity.delta, Vec2::ZERO);
        assert_eq!(player.velocity.magnitude(), 0.0);

        // Only the small component is snapped
        player.velocity.set(Vec2::new(4.0, 0.5));
        player.move_step(SNAP_THRESHOLD);
        assert_eq!(player.position(), Vec2::new(54.0, 50.0));
    }

    #[test]
    fn test_bounce_suppressed_is_noop() {
        let mut player = player_at(0.0, 0.0);
        player.velocity.set(Vec2::new(3.0, 9.0));
        let floor = Segment::new(0.0, 100.0, 200.0, 0.0);
        player.bounce(BounceResponse::SuppressBounce, &floor, 2.0, RESTITUTION);
        assert_eq!(player.velocity.delta, Vec2::new(3.0, 9.0));
    }

    #[test]
    fn test_bounce_straight_down_onto_floor() {
        let mut player = player_at(0.0, 0.0);
        player.velocity.set(Vec2::new(0.0, 10.0));
        let floor = Segment::new(0.0, 100.0, 200.0, 0.0);
        player.bounce(BounceResponse::ApplyBounce, &floor, 1.0, RESTITUTION);

        // Falling straight down comes straight back up, damped
        assert!(player.velocity.delta.x.abs() < 1e-4);
        assert!((player.velocity.delta.y - (-11.0 * RESTITUTION_Y)).abs() < 1e-4);
        assert!((player.velocity.magnitude() - 11.0 * RESTITUTION_Y).abs() < 1e-4);
    }

    #[test]
    fn test_bounce_ignores_floor_direction() {
        let forward = Segment::new(0.0, 100.0, 200.0, 0.0);
        let backward = forward.reversed();

        let mut a = player_at(0.0, 0.0);
        let mut b = player_at(0.0, 0.0);
        a.velocity.set(Vec2::new(0.0, 10.0));
        b.velocity.set(Vec2::new(0.0, 10.0));
        a.bounce(BounceResponse::ApplyBounce, &forward, 0.5, RESTITUTION);
        b.bounce(BounceResponse::ApplyBounce, &backward, 0.5, RESTITUTION);
        assert!((a.velocity.delta - b.velocity.delta).length() < 1e-4);
    }

    #[test]
    fn test_bounce_parallel_to_surface() {
        let mut player = player_at(0.0, 0.0);
        player.velocity.set(Vec2::new(10.0, 0.0));
        let floor = Segment::new(0.0, 100.0, 200.0, 0.0);
        player.bounce(BounceResponse::ApplyBounce, &floor, 1.0, RESTITUTION);

        // Reflection direction points straight up: horizontal is flipped and damped
        assert!((player.velocity.delta.x - (-10.0 * RESTITUTION_X)).abs() < 1e-4);
        assert!((player.velocity.delta.y - RESTITUTION_Y).abs() < 1e-4);
    }

    #[test]
    fn test_respawn_clears_velocity() {
        let mut player = player_at(0.0, 0.0);
        player.velocity.set(Vec2::new(10.0, 10.0));
        player.respawn(Vec2::new(300.0, 40.0));
        assert_eq!(player.position(), Vec2::new(300.0, 40.0));
        assert_eq!(player.circle().center, Vec2::new(316.0, 56.0));
        assert_eq!(player.velocity.magnitude(), 0.0);
    }

    #[test]
    fn test_animation_from_velocity() {
        assert_eq!(AnimationState::from_roll(3.0), AnimationState::RollRight);
        assert_eq!(AnimationState::from_roll(-0.1), AnimationState::RollLeft);
        assert_eq!(AnimationState::from_roll(0.0), AnimationState::Idle);
        assert_eq!(AnimationState::from_travel(Vec2::new(0.0, -5.0)), AnimationState::AirUp);
        assert_eq!(AnimationState::from_travel(Vec2::new(-5.0, 2.0)), AnimationState::AirLeft);
    }

    #[test]
    fn test_exit_grace_counts_down() {
        let mut status = PlayerStatus {
            movement: Movement::Exiting { ticks_left: 2 },
            ..Default::default()
        };
        assert!(!status.can_attach());
        status.tick_exit_grace();
        assert_eq!(status.movement, Movement::Exiting { ticks_left: 1 });
        status.tick_exit_grace();
        assert_eq!(status.movement, Movement::Free);
        assert!(status.can_attach());
    }

    proptest! {
        #[test]
        fn prop_bounce_stays_finite(
            vx in -200.0f32..200.0,
            vy in -200.0f32..200.0,
            sx in -500.0f32..500.0,
            sy in -500.0f32..500.0,
            penetration in -20.0f32..20.0,
            axis_aligned in 0u8..4,
        ) {
            // Also exercise exactly parallel/perpendicular and zero velocities
            let velocity = match axis_aligned {
                0 => Vec2::new(vx, vy),
                1 => Vec2::new(sx, sy),
                2 => Vec2::new(-sy, sx),
                _ => Vec2::ZERO,
            };
            let mut player = player_at(0.0, 0.0);
            player.velocity.set(velocity);
            let surface = Segment::new(0.0, 0.0, sx, sy);
            player.bounce(BounceResponse::ApplyBounce, &surface, penetration, RESTITUTION);

            prop_assert!(player.velocity.delta.is_finite());
            prop_assert!(player.velocity.magnitude().is_finite());
        }

        #[test]
        fn prop_sub_threshold_velocity_never_moves(
            x in -1000.0f32..1000.0,
            y in -1000.0f32..1000.0,
            vx in -1.999f32..1.999,
            vy in -1.999f32..1.999,
        ) {
            let mut player = player_at(x, y);
            player.velocity.set(Vec2::new(vx, vy));
            player.move_step(SNAP_THRESHOLD);
            prop_assert_eq!(player.position(), Vec2::new(x, y));
        }
    }
}
