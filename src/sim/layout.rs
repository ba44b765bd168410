//! Field geometry derived from sprite dimensions
//!
//! The simulation never touches pixels: it only needs the size of each
//! sprite, scaled by the ratio between the field and the background height.

use glam::Vec2;

use super::rect::Rect;
use crate::consts::*;

/// Pixel dimensions of one sprite (or one sprite-sheet frame)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SpriteDims {
    pub width: u32,
    pub height: u32,
}

impl SpriteDims {
    pub const fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }
}

/// Dimensions of the six game sprites
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AssetDims {
    pub background: SpriteDims,
    pub floor: SpriteDims,
    pub start_prompt: SpriteDims,
    /// One frame of the player sprite sheet
    pub player_frame: SpriteDims,
    pub top_obstacle: SpriteDims,
    pub bottom_obstacle: SpriteDims,
}

/// Fixed regions of the play field, all in field pixels
#[derive(Debug, Clone, PartialEq)]
pub struct FieldLayout {
    /// Side length of the square field
    pub field_size: f32,
    /// Integer upscale from sprite pixels to field pixels
    pub scale: f32,
    /// First background tile at scroll offset zero
    pub background: Rect,
    /// First floor tile at scroll offset zero; its top edge is the floor line
    pub floor: Rect,
    pub start_prompt: Rect,
    /// Player at its rest position
    pub player_rest: Rect,
    /// Size of each obstacle region
    pub obstacle_size: Vec2,
}

impl FieldLayout {
    pub fn new(field_size: u32, dims: &AssetDims) -> Self {
        // Integer ratio, matching how the sprites were authored
        let scale = (field_size / dims.background.height.max(1)).max(1) as f32;
        let size = field_size as f32;
        let scaled = |d: SpriteDims| Vec2::new(d.width as f32 * scale, d.height as f32 * scale);

        let background = scaled(dims.background);
        let floor = scaled(dims.floor);
        let prompt = scaled(dims.start_prompt);
        let player = scaled(dims.player_frame);
        let obstacle_size = scaled(dims.top_obstacle);

        Self {
            field_size: size,
            scale,
            background: Rect::new(0.0, 0.0, background.x, background.y),
            floor: Rect::new(0.0, size - floor.y, floor.x, floor.y),
            start_prompt: Rect::new(
                size / 2.0 - prompt.x / 2.0,
                size / 2.0 - prompt.y / 2.0,
                prompt.x,
                prompt.y,
            ),
            player_rest: Rect::new(
                size / 2.0 - player.x * 3.0,
                size / 2.0 - player.y / 2.0,
                player.x,
                player.y,
            ),
            obstacle_size,
        }
    }

    /// Layout for the default field size
    pub fn for_assets(dims: &AssetDims) -> Self {
        Self::new(FIELD_SIZE, dims)
    }

    /// Top edge of the floor; touching it ends the run
    #[inline]
    pub fn floor_line(&self) -> f32 {
        self.field_size - self.floor.height()
    }

    /// Left edge of obstacle slot `index` in the start layout
    pub fn obstacle_start_x(&self, index: usize) -> f32 {
        self.field_size + self.obstacle_size.x + index as f32 * OBSTACLE_STAGGER
    }

    /// Left edge for an obstacle recycled past the right edge
    pub fn obstacle_recycle_x(&self) -> f32 {
        self.field_size + self.obstacle_size.x + OBSTACLE_RECYCLE_MARGIN
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;

    /// Sprite dimensions at 1x, with tiles wide enough to cover the field
    pub(crate) fn classic_dims() -> AssetDims {
        AssetDims {
            background: SpriteDims::new(256, 256),
            floor: SpriteDims::new(256, 56),
            start_prompt: SpriteDims::new(92, 25),
            player_frame: SpriteDims::new(17, 12),
            top_obstacle: SpriteDims::new(26, 160),
            bottom_obstacle: SpriteDims::new(26, 160),
        }
    }

    #[test]
    fn test_scale_from_background_height() {
        let layout = FieldLayout::for_assets(&classic_dims());
        assert_eq!(layout.scale, 2.0);
        assert_eq!(layout.background, Rect::new(0.0, 0.0, 512.0, 512.0));
        assert_eq!(layout.obstacle_size, Vec2::new(52.0, 320.0));
    }

    #[test]
    fn test_floor_sits_on_bottom_edge() {
        let layout = FieldLayout::for_assets(&classic_dims());
        assert_eq!(layout.floor, Rect::new(0.0, 400.0, 512.0, 112.0));
        assert_eq!(layout.floor_line(), 400.0);
    }

    #[test]
    fn test_player_rest_position() {
        let layout = FieldLayout::for_assets(&classic_dims());
        // 34x24 player, three widths left of center, vertically centered
        assert_eq!(layout.player_rest, Rect::new(154.0, 244.0, 34.0, 24.0));
    }

    #[test]
    fn test_prompt_is_centered() {
        let layout = FieldLayout::for_assets(&classic_dims());
        let p = layout.start_prompt;
        assert_eq!(p.x() + p.width() / 2.0, 256.0);
        assert_eq!(p.y() + p.height() / 2.0, 256.0);
    }

    #[test]
    fn test_obstacle_x_positions() {
        let layout = FieldLayout::for_assets(&classic_dims());
        assert_eq!(layout.obstacle_start_x(0), 564.0);
        assert_eq!(layout.obstacle_start_x(3), 564.0 + 3.0 * 170.0);
        assert_eq!(layout.obstacle_recycle_x(), 512.0 + 52.0 + 65.0);
    }

    #[test]
    fn test_oversized_background_keeps_unit_scale() {
        let mut dims = classic_dims();
        dims.background = SpriteDims::new(1024, 1024);
        let layout = FieldLayout::for_assets(&dims);
        assert_eq!(layout.scale, 1.0);
    }
}
