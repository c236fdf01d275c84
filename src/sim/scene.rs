//! The scene: everything one level needs while it runs
//!
//! Owns the ordered collision surfaces, the sparse entity table, the single
//! player, held input and the camera. Surface order is resolution order.

use glam::Vec2;
use serde::Serialize;
use std::collections::BTreeMap;
use thiserror::Error;

use super::collision::{CollisionSurface, SurfaceOwner, circle_segment_collision};
use super::entity::{BounceResponse, ContactContext, Entity, EntityId, RenderItem, Renderable};
use super::player::{AnimationState, Player, PlayerMode, PlayerStatus};
use crate::platform::HeldKeys;
use crate::settings::KeyBindings;
use crate::tuning::Tuning;

/// Precondition failures while running a scene
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SceneError {
    #[error("scene has no player")]
    NoPlayer,
    #[error("surface {surface} refers to unknown entity {owner}")]
    UnknownOwner { surface: usize, owner: EntityId },
    #[error("surface {surface} refers to entity {owner}, which has no contact behavior")]
    NotSpecial { surface: usize, owner: EntityId },
}

/// Everything the render consumer needs for one frame
#[derive(Debug, Clone, Serialize)]
pub struct RenderSnapshot {
    pub camera: Vec2,
    pub tick: u64,
    pub player: Option<PlayerView>,
    pub entities: Vec<RenderItem>,
}

/// Player half of a render snapshot
#[derive(Debug, Clone, Serialize)]
pub struct PlayerView {
    pub item: RenderItem,
    pub animation: AnimationState,
    pub mode: PlayerMode,
    pub velocity: Vec2,
    pub deaths: u32,
}

/// A running level
#[derive(Debug, Clone)]
pub struct Scene {
    pub name: String,
    pub(super) collisions: Vec<CollisionSurface>,
    pub(super) entities: BTreeMap<EntityId, Entity>,
    pub(super) player: Option<Player>,
    pub status: PlayerStatus,
    pub held: HeldKeys,
    pub bindings: KeyBindings,
    pub tuning: Tuning,
    /// Where Water sends the player back to (top-left position)
    pub respawn: Vec2,
    pub camera: Vec2,
    pub elapsed_ms: f32,
    pub ticks: u64,
}

impl Scene {
    pub fn new(name: impl Into<String>, tuning: Tuning, respawn: Vec2) -> Self {
        Self {
            name: name.into(),
            collisions: Vec::new(),
            entities: BTreeMap::new(),
            player: None,
            status: PlayerStatus::default(),
            held: HeldKeys::new(),
            bindings: KeyBindings::default(),
            tuning,
            respawn,
            camera: Vec2::ZERO,
            elapsed_ms: 0.0,
            ticks: 0,
        }
    }

    /// Register a surface. Earlier surfaces are resolved first
    pub fn add_collision(&mut self, surface: CollisionSurface) {
        self.collisions.push(surface);
    }

    /// Register an entity, replacing (and returning) any with the same id
    pub fn add_entity(&mut self, entity: Entity) -> Option<Entity> {
        self.entities.insert(entity.id, entity)
    }

    /// Install the player, replacing any previous one
    pub fn set_player(&mut self, player: Player) {
        self.camera = player.circle().center;
        self.player = Some(player);
    }

    pub fn collisions(&self) -> &[CollisionSurface] {
        &self.collisions
    }

    pub fn entity(&self, id: EntityId) -> Option<&Entity> {
        self.entities.get(&id)
    }

    pub fn entities(&self) -> impl Iterator<Item = &Entity> {
        self.entities.values()
    }

    pub fn player(&self) -> Option<&Player> {
        self.player.as_ref()
    }

    pub fn player_mut(&mut self) -> Option<&mut Player> {
        self.player.as_mut()
    }

    pub fn key_down(&mut self, code: &str) {
        self.held.key_down(code);
    }

    pub fn key_up(&mut self, code: &str) {
        self.held.key_up(code);
    }

    /// Test every surface against the player and resolve the hits
    ///
    /// Returns true if any surface was touched. Every surface is checked and
    /// each hit bounces in turn, so the last bounce's velocity wins.
    pub fn do_collisions(&mut self) -> Result<bool, SceneError> {
        let player = self.player.as_mut().ok_or(SceneError::NoPlayer)?;
        let restitution = self.tuning.restitution();
        self.status.on_ice = false;

        let mut contact = false;
        for (index, surface) in self.collisions.iter().enumerate() {
            let result = circle_segment_collision(player.circle(), &surface.segment);
            if !result.hit {
                continue;
            }
            contact = true;

            let (response, result) = match surface.owner {
                SurfaceOwner::Plain => (BounceResponse::ApplyBounce, result),
                SurfaceOwner::Owned(owner) => {
                    let entity = self.entities.get(&owner).ok_or(SceneError::UnknownOwner {
                        surface: index,
                        owner,
                    })?;
                    let kind = entity.special.as_ref().ok_or(SceneError::NotSpecial {
                        surface: index,
                        owner,
                    })?;
                    log::debug!("Surface {} hit, running {:?} for {}", index, kind, owner);
                    let response = kind.on_contact(&mut ContactContext {
                        player: &mut *player,
                        status: &mut self.status,
                        respawn: self.respawn,
                    });
                    // The hook may have moved the player; bounce from where it is now
                    (response, circle_segment_collision(player.circle(), &surface.segment))
                }
            };

            if result.hit {
                player.bounce(response, &surface.segment, result.penetration, restitution);
            }
        }
        Ok(contact)
    }

    /// Advance every running animation by `dt_ms` of wall time
    pub fn advance_animations(&mut self, dt_ms: f32) {
        for entity in self.entities.values_mut() {
            entity.visual.advance(dt_ms);
        }
        if let Some(player) = self.player.as_mut() {
            player.visual.advance(dt_ms);
        }
    }

    /// Read-only view for the render loop
    ///
    /// Entities come in draw order: top to bottom by their bottom edge,
    /// ties in id order.
    pub fn render_snapshot(&self) -> RenderSnapshot {
        let mut entities: Vec<RenderItem> =
            self.entities.values().map(Renderable::render_item).collect();
        entities.sort_by(|a, b| (a.position.y + a.size.y).total_cmp(&(b.position.y + b.size.y)));

        RenderSnapshot {
            camera: self.camera,
            tick: self.ticks,
            player: self.player.as_ref().map(|player| PlayerView {
                item: player.render_item(),
                animation: player.animation(),
                mode: self.status.mode,
                velocity: player.velocity.delta,
                deaths: self.status.deaths,
            }),
            entities,
        }
    }
}
