//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Fixed timestep only, one tick per `tick` call
//! - Surfaces resolved in insertion order, entities iterated by id
//! - No rendering or platform dependencies

pub mod collision;
pub mod entity;
pub mod geometry;
pub mod player;
pub mod scene;
pub mod tick;
pub mod track;

pub use collision::{
    CollisionResult, CollisionSurface, SurfaceOwner, circle_segment_collision, point_on_segment,
    project_point_onto_line,
};
pub use entity::{
    Body, BounceResponse, ContactContext, Entity, EntityId, RenderItem, Renderable, SpecialKind,
    Visual,
};
pub use geometry::{Circle, Segment, Vector2D};
pub use player::{AnimationState, Movement, Player, PlayerMode, PlayerStatus};
pub use scene::{PlayerView, RenderSnapshot, Scene, SceneError};
pub use tick::{TickOutcome, steering_curve, tick};
pub use track::{TrackKind, TrackRide, TrackStep};
