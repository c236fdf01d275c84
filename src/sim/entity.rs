//! Scene entities and their contact behaviors
//!
//! An entity is a renderable body. Special entities additionally carry a
//! `SpecialKind` whose contact hook runs when the player strikes a surface
//! owned by that entity, before the generic bounce.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::player::{Movement, Player, PlayerMode, PlayerStatus};
use super::track::{TrackKind, TrackRide};
use crate::sprite::{AnimatedSprite, FrameRect};

/// Level-authored entity identifier (sparse, not necessarily contiguous)
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct EntityId(pub u32);

impl std::fmt::Display for EntityId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Whether the generic bounce still runs after a contact hook
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BounceResponse {
    ApplyBounce,
    /// The hook fully handled the contact
    SuppressBounce,
}

/// Position and size of anything drawn in the scene
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Body {
    /// Top-left corner
    pub position: Vec2,
    pub size: Vec2,
}

impl Body {
    pub fn new(position: Vec2, size: Vec2) -> Self {
        Self { position, size }
    }

    /// Offset from the top-left corner to the center
    #[inline]
    pub fn half_extent(&self) -> Vec2 {
        self.size * 0.5
    }
}

/// How a body is drawn
#[derive(Debug, Clone)]
pub enum Visual {
    /// Single image, drawn stretched over the body
    Image(String),
    /// Sprite sheet with frame groups
    Animated(AnimatedSprite),
}

impl Visual {
    pub fn image(&self) -> &str {
        match self {
            Visual::Image(image) => image,
            Visual::Animated(sprite) => &sprite.image,
        }
    }

    /// Source rectangle of the current frame (None draws the whole image)
    pub fn frame(&self) -> Option<FrameRect> {
        match self {
            Visual::Image(_) => None,
            Visual::Animated(sprite) => Some(sprite.current_frame()),
        }
    }

    /// Advance any running animation task
    pub fn advance(&mut self, dt_ms: f32) {
        if let Visual::Animated(sprite) = self {
            sprite.advance(dt_ms);
        }
    }
}

/// What the render consumer needs to draw one body
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RenderItem {
    pub id: EntityId,
    pub position: Vec2,
    pub size: Vec2,
    pub image: String,
    pub frame: Option<FrameRect>,
}

/// Anything the render loop can draw
pub trait Renderable {
    fn id(&self) -> EntityId;
    fn body(&self) -> &Body;
    fn visual(&self) -> &Visual;

    fn render_item(&self) -> RenderItem {
        let body = self.body();
        let visual = self.visual();
        RenderItem {
            id: self.id(),
            position: body.position,
            size: body.size,
            image: visual.image().to_string(),
            frame: visual.frame(),
        }
    }
}

/// Behaviors of special entities
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum SpecialKind {
    /// Kills the player
    Water,
    /// Switches the player to cloud mode
    CloudBerry,
    /// Switches the player back to standard mode
    Fish,
    /// Track the player rides and may jump off
    Hook { track: Vec<Vec2> },
    /// Track the player rides to the end
    Pipe { track: Vec<Vec2> },
    /// Disables steering while touched
    Ice,
    /// Disables gravity until the player jumps off
    Twine,
}

/// State a contact hook is allowed to touch
pub struct ContactContext<'a> {
    pub player: &'a mut Player,
    pub status: &'a mut PlayerStatus,
    pub respawn: Vec2,
}

impl SpecialKind {
    /// Run the contact behavior, returning whether the bounce should follow
    pub fn on_contact(&self, ctx: &mut ContactContext<'_>) -> BounceResponse {
        match self {
            SpecialKind::Water => {
                ctx.player.respawn(ctx.respawn);
                ctx.status.reset_after_death();
                log::info!("Player drowned (deaths: {})", ctx.status.deaths);
                BounceResponse::ApplyBounce
            }
            SpecialKind::CloudBerry => {
                set_mode(ctx.status, PlayerMode::Cloud);
                BounceResponse::SuppressBounce
            }
            SpecialKind::Fish => {
                set_mode(ctx.status, PlayerMode::Standard);
                BounceResponse::SuppressBounce
            }
            SpecialKind::Hook { track } => attach(ctx.status, track, TrackKind::Hook),
            SpecialKind::Pipe { track } => attach(ctx.status, track, TrackKind::Pipe),
            SpecialKind::Ice => {
                ctx.status.on_ice = true;
                BounceResponse::ApplyBounce
            }
            SpecialKind::Twine => {
                if ctx.status.can_attach() && ctx.status.movement != Movement::Twine {
                    log::debug!("Player caught twine");
                    ctx.status.movement = Movement::Twine;
                }
                BounceResponse::SuppressBounce
            }
        }
    }
}

fn set_mode(status: &mut PlayerStatus, mode: PlayerMode) {
    if status.mode != mode {
        log::info!("Player mode {:?} -> {:?}", status.mode, mode);
        status.mode = mode;
    }
}

fn attach(status: &mut PlayerStatus, track: &[Vec2], kind: TrackKind) -> BounceResponse {
    // Pass through while exiting so the player isn't caught again immediately
    if status.can_attach() {
        log::debug!("Player attached to {:?} track ({} points)", kind, track.len());
        status.movement = Movement::Riding(TrackRide::new(track.to_vec(), kind));
    }
    BounceResponse::SuppressBounce
}

/// A scene entity: renderable body plus optional contact behavior
#[derive(Debug, Clone)]
pub struct Entity {
    pub id: EntityId,
    pub body: Body,
    pub visual: Visual,
    pub special: Option<SpecialKind>,
}

impl Entity {
    pub fn new(id: EntityId, body: Body, visual: Visual) -> Self {
        Self {
            id,
            body,
            visual,
            special: None,
        }
    }

    pub fn special(id: EntityId, body: Body, visual: Visual, kind: SpecialKind) -> Self {
        Self {
            id,
            body,
            visual,
            special: Some(kind),
        }
    }
}

impl Renderable for Entity {
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
