//! Animated sprites and their scoped animation tasks
//!
//! A running animation is an `AnimationTask` owned by the sprite. Stopping
//! the animation (or dropping the sprite) releases it; nothing keeps ticking
//! in the background. The render loop drives tasks through `advance`.

use super::sheet::{FrameRect, SpriteSheet, SpriteSheetError};

/// A periodic frame-stepping task
#[derive(Debug, Clone, PartialEq)]
pub struct AnimationTask {
    interval_ms: f32,
    reverse: bool,
    elapsed_ms: f32,
    /// Frames left before the task ends on its own (None runs until stopped)
    remaining_frames: Option<u32>,
}

impl AnimationTask {
    pub fn new(interval_ms: f32, reverse: bool) -> Self {
        Self {
            interval_ms: interval_ms.max(1.0),
            reverse,
            elapsed_ms: 0.0,
            remaining_frames: None,
        }
    }

    pub fn with_frame_budget(mut self, frames: u32) -> Self {
        self.remaining_frames = Some(frames);
        self
    }

    pub fn interval_ms(&self) -> f32 {
        self.interval_ms
    }

    pub fn reverse(&self) -> bool {
        self.reverse
    }
}

/// A sprite drawn from a sprite sheet
#[derive(Debug, Clone)]
pub struct AnimatedSprite {
    /// Asset key of the sheet image
    pub image: String,
    pub sheet: SpriteSheet,
    /// Counterclockwise rotation in radians
    pub rotation: f32,
    task: Option<AnimationTask>,
}

impl AnimatedSprite {
    pub fn new(image: impl Into<String>, sheet: SpriteSheet) -> Self {
        Self {
            image: image.into(),
            sheet,
            rotation: 0.0,
            task: None,
        }
    }

    pub fn current_frame(&self) -> FrameRect {
        self.sheet.current_frame()
    }

    pub fn is_animating(&self) -> bool {
        self.task.is_some()
    }

    pub fn task(&self) -> Option<&AnimationTask> {
        self.task.as_ref()
    }

    /// Play the active group on a loop, replacing any running task
    pub fn start_animation(&mut self, reverse: bool, interval_ms: f32) -> &mut Self {
        self.task = Some(AnimationTask::new(interval_ms, reverse));
        self
    }

    /// Play the active group `reps` times, then stop
    pub fn loop_animation(&mut self, reps: u32, interval_ms: f32, reverse: bool) -> &mut Self {
        let frames = reps.saturating_mul(self.sheet.current_group_len() as u32);
        if frames == 0 {
            self.task = None;
        } else {
            self.task = Some(AnimationTask::new(interval_ms, reverse).with_frame_budget(frames));
        }
        self
    }

    /// Release the running task
    pub fn stop_animation(&mut self) -> &mut Self {
        self.task = None;
        self
    }

    /// Switch to `group` at its first frame
    pub fn switch_animation(&mut self, group: usize) -> Result<&mut Self, SpriteSheetError> {
        self.sheet.switch_group(group)?;
        Ok(self)
    }

    /// Jump to `frame`, optionally in another group
    pub fn to_frame(
        &mut self,
        frame: usize,
        group: Option<usize>,
    ) -> Result<&mut Self, SpriteSheetError> {
        if let Some(group) = group {
            self.sheet.switch_group(group)?;
        }
        self.sheet.to_frame(frame)?;
        Ok(self)
    }

    /// Let `dt_ms` of wall time pass for the running task
    pub fn advance(&mut self, dt_ms: f32) {
        let Some(task) = self.task.as_mut() else {
            return;
        };

        task.elapsed_ms += dt_ms;
        while task.elapsed_ms >= task.interval_ms {
            task.elapsed_ms -= task.interval_ms;
            if task.reverse {
                self.sheet.previous_frame();
            } else {
                self.sheet.next_frame();
            }

            if let Some(remaining) = task.remaining_frames.as_mut() {
                *remaining -= 1;
                if *remaining == 0 {
                    self.task = None;
                    return;
                }
            }
        }
    }
}
