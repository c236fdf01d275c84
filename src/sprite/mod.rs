//! Sprite-sheet bookkeeping for the render consumer
//!
//! Decoding and drawing images is the host's job; this module only tracks
//! which frame of which sheet is current.

pub mod animation;
pub mod sheet;

pub use animation::{AnimatedSprite, AnimationTask};
pub use sheet::{FrameRect, SpriteSheet, SpriteSheetError};
