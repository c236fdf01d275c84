//! Sprite-sheet frame grid and frame groups
//!
//! Frames are numbered row-major from the top-left. A frame group is an
//! ordered list of frame indices played as one animation.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors building or navigating a sprite sheet
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SpriteSheetError {
    #[error("frame size must be non-zero, got {width}x{height}")]
    ZeroFrameSize { width: u32, height: u32 },

    #[error("image {image_width}x{image_height} is too small for {frame_width}x{frame_height} frames")]
    TooSmall {
        image_width: u32,
        image_height: u32,
        frame_width: u32,
        frame_height: u32,
    },

    #[error(
        "frame size {frame_width}x{frame_height} does not evenly divide image {image_width}x{image_height}"
    )]
    UnevenFrames {
        image_width: u32,
        image_height: u32,
        frame_width: u32,
        frame_height: u32,
    },

    #[error("frame {index} out of range ({count} available)")]
    FrameOutOfRange { index: usize, count: usize },

    #[error("frame group {index} out of range ({count} defined)")]
    GroupOutOfRange { index: usize, count: usize },

    #[error("frame group must contain at least one frame")]
    EmptyGroup,
}

/// Source rectangle of one frame in the sheet image
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct FrameRect {
    pub x: u32,
    pub y: u32,
    pub width: u32,
    pub height: u32,
}

/// A grid of equally sized frames cut from one image
#[derive(Debug, Clone)]
pub struct SpriteSheet {
    frame_width: u32,
    frame_height: u32,
    columns: u32,
    rows: u32,
    frames: Vec<FrameRect>,
    groups: Vec<Vec<usize>>,
    current_group: usize,
    current_index: usize,
}

impl SpriteSheet {
    /// Cut an `image_width` x `image_height` image into frames
    ///
    /// The frame size must tile the image exactly.
    pub fn new(
        image_width: u32,
        image_height: u32,
        frame_width: u32,
        frame_height: u32,
    ) -> Result<Self, SpriteSheetError> {
        if frame_width == 0 || frame_height == 0 {
            return Err(SpriteSheetError::ZeroFrameSize {
                width: frame_width,
                height: frame_height,
            });
        }

        let columns = image_width / frame_width;
        let rows = image_height / frame_height;
        if columns == 0 || rows == 0 {
            return Err(SpriteSheetError::TooSmall {
                image_width,
                image_height,
                frame_width,
                frame_height,
            });
        }
        if image_width % frame_width != 0 || image_height % frame_height != 0 {
            return Err(SpriteSheetError::UnevenFrames {
                image_width,
                image_height,
                frame_width,
                frame_height,
            });
        }

        let frames = (0..rows)
            .flat_map(|row| {
                (0..columns).map(move |column| FrameRect {
                    x: column * frame_width,
                    y: row * frame_height,
                    width: frame_width,
                    height: frame_height,
                })
            })
            .collect();

        Ok(Self {
            frame_width,
            frame_height,
            columns,
            rows,
            frames,
            groups: Vec::new(),
            current_group: 0,
            current_index: 0,
        })
    }

    pub fn frame_size(&self) -> (u32, u32) {
        (self.frame_width, self.frame_height)
    }

    pub fn columns(&self) -> u32 {
        self.columns
    }

    pub fn rows(&self) -> u32 {
        self.rows
    }

    pub fn frame_count(&self) -> usize {
        self.frames.len()
    }

    pub fn group_count(&self) -> usize {
        self.groups.len()
    }

    pub fn current_group(&self) -> usize {
        self.current_group
    }

    pub fn current_index(&self) -> usize {
        self.current_index
    }

    /// Length of the active group (0 when no groups are defined)
    pub fn current_group_len(&self) -> usize {
        self.groups.get(self.current_group).map_or(0, Vec::len)
    }

    /// Define a group from explicit frame indices, returning its index
    pub fn create_frame_group(&mut self, frames: &[usize]) -> Result<usize, SpriteSheetError> {
        if frames.is_empty() {
            return Err(SpriteSheetError::EmptyGroup);
        }
        if let Some(&index) = frames.iter().find(|&&i| i >= self.frames.len()) {
            return Err(SpriteSheetError::FrameOutOfRange {
                index,
                count: self.frames.len(),
            });
        }
        self.groups.push(frames.to_vec());
        Ok(self.groups.len() - 1)
    }

    /// Define a group from the inclusive range `start..=end`
    pub fn create_frame_group_in_range(
        &mut self,
        start: usize,
        end: usize,
    ) -> Result<usize, SpriteSheetError> {
        let frames: Vec<usize> = (start..=end).collect();
        self.create_frame_group(&frames)
    }

    /// Frame currently shown. Without groups this is the first frame
    pub fn current_frame(&self) -> FrameRect {
        let index = self
            .groups
            .get(self.current_group)
            .and_then(|group| group.get(self.current_index))
            .copied()
            .unwrap_or(0);
        self.frames[index]
    }

    /// Jump to position `index` within the active group
    pub fn to_frame(&mut self, index: usize) -> Result<(), SpriteSheetError> {
        let count = self.current_group_len();
        if index >= count {
            return Err(SpriteSheetError::FrameOutOfRange { index, count });
        }
        self.current_index = index;
        Ok(())
    }

    /// Activate group `index` at its first frame
    pub fn switch_group(&mut self, index: usize) -> Result<(), SpriteSheetError> {
        if index >= self.groups.len() {
            return Err(SpriteSheetError::GroupOutOfRange {
                index,
                count: self.groups.len(),
            });
        }
        self.current_group = index;
        self.current_index = 0;
        Ok(())
    }

    /// Step forward; returns true when the group wrapped back to its start
    pub fn next_frame(&mut self) -> bool {
        let len = self.current_group_len();
        if len == 0 {
            return false;
        }
        self.current_index = (self.current_index + 1) % len;
        self.current_index == 0
    }

    /// Step backward; returns true when the group wrapped around to its end
    pub fn previous_frame(&mut self) -> bool {
        let len = self.current_group_len();
        if len == 0 {
            return false;
        }
        if self.current_index == 0 {
            self.current_index = len - 1;
            true
        } else {
            self.current_index -= 1;
            false
        }
    }
}
