//! Software compositing into an RGBA frame
//!
//! Sprites are scaled once, up front, to the size of the region they are
//! drawn into, so per-frame work is alpha blits only.

use glam::Vec2;
use image::imageops::{self, FilterType};
use image::{Rgba, RgbaImage};

use crate::sim::Rect;

/// Clear color behind the background tiles
pub const CLEAR_COLOR: Rgba<u8> = Rgba([0, 0, 0, 255]);

/// A sprite pre-scaled to its on-screen size
#[derive(Debug, Clone)]
pub struct ScaledSprite {
    image: RgbaImage,
}

impl ScaledSprite {
    /// Nearest-neighbour scale, keeping the pixel-art look
    pub fn new(source: &RgbaImage, size: Vec2) -> Self {
        let w = size.x.round().max(1.0) as u32;
        let h = size.y.round().max(1.0) as u32;
        let image = if source.dimensions() == (w, h) {
            source.clone()
        } else {
            imageops::resize(source, w, h, FilterType::Nearest)
        };
        Self { image }
    }

    pub fn width(&self) -> f32 {
        self.image.width() as f32
    }
}

/// The frame being composited
#[derive(Debug, Clone)]
pub struct Canvas {
    frame: RgbaImage,
}

impl Canvas {
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            frame: RgbaImage::from_pixel(width, height, CLEAR_COLOR),
        }
    }

    pub fn clear(&mut self) {
        for pixel in self.frame.pixels_mut() {
            *pixel = CLEAR_COLOR;
        }
    }

    /// Alpha-blend `sprite` with its top-left corner at (x, y), clipped to the frame
    pub fn blit(&mut self, sprite: &ScaledSprite, x: f32, y: f32) {
        imageops::overlay(&mut self.frame, &sprite.image, x.floor() as i64, y.floor() as i64);
    }

    /// Blit at a region's position. The sprite must already be scaled to the region.
    pub fn blit_at(&mut self, sprite: &ScaledSprite, region: &Rect) {
        debug_assert!(region.width() >= 0.0 && region.height() >= 0.0);
        self.blit(sprite, region.x(), region.y());
    }

    /// Two copies side by side starting at `x`, for seamless horizontal scroll
    pub fn blit_tiled_pair(&mut self, sprite: &ScaledSprite, x: f32, y: f32) {
        self.blit(sprite, x, y);
        self.blit(sprite, x + sprite.width(), y);
    }

    pub fn frame(&self) -> &RgbaImage {
        &self.frame
    }

    pub fn frame_mut(&mut self) -> &mut RgbaImage {
        &mut self.frame
    }
}
