//! Level data: the JSON authoring format and scene construction
//!
//! A level lists plain and owned surfaces, the entities that own them and
//! the player. Everything is validated before a `Scene` is built so a bad
//! level fails at load time instead of mid-game.

use glam::Vec2;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use thiserror::Error;

use crate::consts::{PLAYER_RADIUS, PLAYER_SIZE};
use crate::sim::{
    Body, CollisionSurface, Entity, EntityId, Player, Scene, Segment, SpecialKind, Visual,
};
use crate::sprite::{AnimatedSprite, SpriteSheet, SpriteSheetError};
use crate::tuning::{Tuning, TuningError};

/// The level shipped with the crate
pub const BUILTIN_LEVEL: &str = include_str!("../levels/meadow.json");

#[derive(Debug, Error)]
pub enum LevelError {
    #[error("failed to parse level: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("entity {0} is defined more than once")]
    DuplicateEntity(EntityId),
    #[error("surface {surface} refers to unknown entity {owner}")]
    UnknownOwner { surface: usize, owner: EntityId },
    #[error("surface {surface} refers to entity {owner}, which has no contact behavior")]
    NotSpecial { surface: usize, owner: EntityId },
    #[error("track of entity {0} has no points")]
    EmptyTrack(EntityId),
    #[error("bad sprite sheet for '{image}': {source}")]
    Sheet {
        image: String,
        #[source]
        source: SpriteSheetError,
    },
    #[error(transparent)]
    Tuning(#[from] TuningError),
}

/// Sheet geometry and frame groups for an animated visual
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SheetSpec {
    pub image_width: u32,
    pub image_height: u32,
    pub frame_width: u32,
    pub frame_height: u32,
    /// Frame indices of each group, in play order
    #[serde(default)]
    pub groups: Vec<Vec<usize>>,
    /// Start looping the first group at this interval
    #[serde(default)]
    pub animate_ms: Option<f32>,
}

impl SheetSpec {
    fn build(&self, image: &str) -> Result<AnimatedSprite, SpriteSheetError> {
        let mut sheet = SpriteSheet::new(
            self.image_width,
            self.image_height,
            self.frame_width,
            self.frame_height,
        )?;
        for group in &self.groups {
            sheet.create_frame_group(group)?;
        }

        let mut sprite = AnimatedSprite::new(image, sheet);
        if let Some(interval) = self.animate_ms {
            sprite.start_animation(false, interval);
        }
        Ok(sprite)
    }
}

fn build_visual(image: &str, sheet: Option<&SheetSpec>) -> Result<Visual, LevelError> {
    match sheet {
        None => Ok(Visual::Image(image.to_string())),
        Some(spec) => spec
            .build(image)
            .map(Visual::Animated)
            .map_err(|source| LevelError::Sheet {
                image: image.to_string(),
                source,
            }),
    }
}

fn default_player_size() -> Vec2 {
    Vec2::splat(PLAYER_SIZE)
}

fn default_player_radius() -> f32 {
    PLAYER_RADIUS
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlayerSpec {
    #[serde(default)]
    pub id: EntityId,
    /// Top-left start position
    pub position: Vec2,
    #[serde(default = "default_player_size")]
    pub size: Vec2,
    #[serde(default = "default_player_radius")]
    pub radius: f32,
    pub image: String,
    #[serde(default)]
    pub sheet: Option<SheetSpec>,
}

/// A surface segment, optionally owned by an entity
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SurfaceSpec {
    pub x: f32,
    pub y: f32,
    pub dx: f32,
    pub dy: f32,
    #[serde(default)]
    pub owner: Option<EntityId>,
}

impl SurfaceSpec {
    fn surface(&self) -> CollisionSurface {
        let segment = Segment::new(self.x, self.y, self.dx, self.dy);
        match self.owner {
            Some(owner) => CollisionSurface::owned(segment, owner),
            None => CollisionSurface::plain(segment),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EntitySpec {
    pub id: EntityId,
    pub position: Vec2,
    pub size: Vec2,
    pub image: String,
    #[serde(default)]
    pub sheet: Option<SheetSpec>,
    #[serde(default)]
    pub special: Option<SpecialKind>,
}

/// A complete level as authored
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LevelData {
    pub name: String,
    /// Where Water sends the player back to (top-left position)
    pub respawn: Vec2,
    pub player: PlayerSpec,
    #[serde(default)]
    pub surfaces: Vec<SurfaceSpec>,
    #[serde(default)]
    pub entities: Vec<EntitySpec>,
    #[serde(default)]
    pub tuning: Option<Tuning>,
}

impl LevelData {
    /// Parse and validate a level
    pub fn from_json(json: &str) -> Result<Self, LevelError> {
        let level: LevelData = serde_json::from_str(json)?;
        level.validate()?;
        Ok(level)
    }

    /// The embedded default level
    pub fn builtin() -> Result<Self, LevelError> {
        Self::from_json(BUILTIN_LEVEL)
    }

    /// Check ids, owner references, tracks and tuning
    pub fn validate(&self) -> Result<(), LevelError> {
        if let Some(tuning) = &self.tuning {
            tuning.validate()?;
        }

        let mut ids = BTreeSet::new();
        for entity in &self.entities {
            if !ids.insert(entity.id) {
                return Err(LevelError::DuplicateEntity(entity.id));
            }
            if let Some(SpecialKind::Hook { track } | SpecialKind::Pipe { track }) = &entity.special
            {
                if track.is_empty() {
                    return Err(LevelError::EmptyTrack(entity.id));
                }
            }
        }

        for (surface, spec) in self.surfaces.iter().enumerate() {
            let Some(owner) = spec.owner else {
                continue;
            };
            let entity = self
                .entities
                .iter()
                .find(|e| e.id == owner)
                .ok_or(LevelError::UnknownOwner { surface, owner })?;
            if entity.special.is_none() {
                return Err(LevelError::NotSpecial { surface, owner });
            }
        }
        Ok(())
    }

    /// Build a ready-to-run scene
    pub fn build_scene(&self) -> Result<Scene, LevelError> {
        self.validate()?;
        let tuning = self.tuning.unwrap_or_default();
        let mut scene = Scene::new(self.name.clone(), tuning, self.respawn);

        for spec in &self.surfaces {
            scene.add_collision(spec.surface());
        }

        for spec in &self.entities {
            let body = Body::new(spec.position, spec.size);
            let visual = build_visual(&spec.image, spec.sheet.as_ref())?;
            let entity = match &spec.special {
                Some(kind) => Entity::special(spec.id, body, visual, kind.clone()),
                None => Entity::new(spec.id, body, visual),
            };
            scene.add_entity(entity);
        }

        let player = &self.player;
        let visual = build_visual(&player.image, player.sheet.as_ref())?;
        if let Visual::Animated(sprite) = &visual {
            if sprite.sheet.group_count() < 8 {
                log::warn!(
                    "Player sheet '{}' has {} groups; missing animations will keep the current frame",
                    player.image,
                    sprite.sheet.group_count()
                );
            }
        }
        scene.set_player(Player::new(
            player.id,
            Body::new(player.position, player.size),
            visual,
            player.radius,
        ));

        log::info!(
            "Loaded level '{}': {} surfaces, {} entities",
            self.name,
            self.surfaces.len(),
            self.entities.len()
        );
        Ok(scene)
    }
}

impl Scene {
    /// Build a scene from authored level data
    pub fn from_level(level: &LevelData) -> Result<Self, LevelError> {
        level.build_scene()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::{Movement, PlayerMode, Renderable, tick};

    fn minimal(extra_surfaces: &str, entities: &str) -> String {
        format!(
            r#"{{
                "name": "test",
                "respawn": [0.0, 0.0],
                "player": {{ "position": [84.0, 71.0], "image": "hero" }},
                "surfaces": [ {{ "x": 0.0, "y": 100.0, "dx": 400.0, "dy": 0.0 }} {extra_surfaces} ],
                "entities": [ {entities} ]
            }}"#
        )
    }

    #[test]
    fn test_builtin_level_loads() {
        let level = LevelData::builtin().expect("builtin level");
        let scene = Scene::from_level(&level).expect("scene");
        assert_eq!(scene.collisions().len(), level.surfaces.len());
        assert_eq!(scene.entities().count(), level.entities.len());
        assert!(scene.player().is_some());
        assert_eq!(scene.camera, scene.player().expect("player").circle().center);
    }

    #[test]
    fn test_builtin_level_runs() {
        let mut scene = LevelData::builtin()
            .and_then(|level| level.build_scene())
            .expect("scene");
        scene.key_down("ArrowRight");
        for _ in 0..500 {
            tick(&mut scene).expect("tick");
            scene.advance_animations(scene.tuning.tick_interval_ms);
        }
        let player = scene.player().expect("player");
        assert!(player.position().is_finite());
        assert!(player.velocity.delta.is_finite());
        assert!(serde_json::to_string(&scene.render_snapshot()).is_ok());
    }

    #[test]
    fn test_player_defaults() {
        let level = LevelData::from_json(&minimal("", "")).expect("level");
        assert_eq!(level.player.size, Vec2::splat(PLAYER_SIZE));
        assert_eq!(level.player.radius, PLAYER_RADIUS);
        assert_eq!(level.tuning, None);

        let scene = level.build_scene().expect("scene");
        let player = scene.player().expect("player");
        assert_eq!(player.circle().center, Vec2::new(100.0, 87.0));
        assert_eq!(player.body().size, Vec2::splat(PLAYER_SIZE));
    }

    #[test]
    fn test_owned_surfaces_resolve_to_entities() {
        let json = minimal(
            r#", { "x": 0.0, "y": 60.0, "dx": 0.0, "dy": 40.0, "owner": 4 }"#,
            r#"{ "id": 4, "position": [0.0, 60.0], "size": [8.0, 40.0], "image": "berry",
                 "special": { "kind": "cloud_berry" } }"#,
        );
        let mut scene = LevelData::from_json(&json)
            .and_then(|level| level.build_scene())
            .expect("scene");
        scene
            .player_mut()
            .expect("player")
            .update_position(Vec2::new(-10.0, 64.0));
        tick(&mut scene).expect("tick");
        assert_eq!(scene.status.mode, PlayerMode::Cloud);
        assert_eq!(scene.status.movement, Movement::Free);
    }

    #[test]
    fn test_duplicate_entity_rejected() {
        let json = minimal(
            "",
            r#"{ "id": 1, "position": [0.0, 0.0], "size": [1.0, 1.0], "image": "a" },
               { "id": 1, "position": [5.0, 0.0], "size": [1.0, 1.0], "image": "b" }"#,
        );
        assert!(matches!(
            LevelData::from_json(&json),
            Err(LevelError::DuplicateEntity(EntityId(1)))
        ));
    }

    #[test]
    fn test_unknown_owner_rejected() {
        let json = minimal(r#", { "x": 0.0, "y": 0.0, "dx": 1.0, "dy": 0.0, "owner": 9 }"#, "");
        assert!(matches!(
            LevelData::from_json(&json),
            Err(LevelError::UnknownOwner {
                surface: 1,
                owner: EntityId(9)
            })
        ));
    }

    #[test]
    fn test_plain_owner_rejected() {
        let json = minimal(
            r#", { "x": 0.0, "y": 0.0, "dx": 1.0, "dy": 0.0, "owner": 2 }"#,
            r#"{ "id": 2, "position": [0.0, 0.0], "size": [1.0, 1.0], "image": "rock" }"#,
        );
        assert!(matches!(
            LevelData::from_json(&json),
            Err(LevelError::NotSpecial {
                surface: 1,
                owner: EntityId(2)
            })
        ));
    }

    #[test]
    fn test_empty_track_rejected() {
        let json = minimal(
            "",
            r#"{ "id": 3, "position": [0.0, 0.0], "size": [1.0, 1.0], "image": "hook",
                 "special": { "kind": "hook", "track": [] } }"#,
        );
        assert!(matches!(
            LevelData::from_json(&json),
            Err(LevelError::EmptyTrack(EntityId(3)))
        ));
    }

    #[test]
    fn test_bad_sheet_rejected_at_build() {
        let json = minimal(
            "",
            r#"{ "id": 5, "position": [0.0, 0.0], "size": [32.0, 32.0], "image": "water",
                 "sheet": { "image_width": 100, "image_height": 32,
                            "frame_width": 32, "frame_height": 32 } }"#,
        );
        let level = LevelData::from_json(&json).expect("geometry is checked at build");
        match level.build_scene() {
            Err(LevelError::Sheet { image, source }) => {
                assert_eq!(image, "water");
                assert!(matches!(source, SpriteSheetError::UnevenFrames { .. }));
            }
            other => panic!("expected a sheet error, got {other:?}"),
        }
    }

    #[test]
    fn test_animated_entity_starts_looping() {
        let json = minimal(
            "",
            r#"{ "id": 5, "position": [0.0, 0.0], "size": [32.0, 32.0], "image": "water",
                 "sheet": { "image_width": 128, "image_height": 32,
                            "frame_width": 32, "frame_height": 32,
                            "groups": [[0, 1, 2, 3]], "animate_ms": 100.0 } }"#,
        );
        let mut scene = LevelData::from_json(&json)
            .and_then(|level| level.build_scene())
            .expect("scene");
        scene.advance_animations(250.0);
        let water = scene.entity(EntityId(5)).expect("water");
        assert_eq!(water.visual.frame().map(|f| f.x), Some(64));
    }

    #[test]
    fn test_invalid_tuning_rejected() {
        let mut level = LevelData::from_json(&minimal("", "")).expect("level");
        level.tuning = Some(Tuning {
            track_speed: 0.0,
            ..Tuning::default()
        });
        assert!(matches!(level.build_scene(), Err(LevelError::Tuning(_))));
    }

    #[test]
    fn test_garbage_is_parse_error() {
        assert!(matches!(
            LevelData::from_json("{\"name\": 3}"),
            Err(LevelError::Parse(_))
        ));
    }
}
