//! Gated obstacles: a top and bottom blocking region with an opening between

use rand::Rng;

use super::rect::Rect;
use crate::consts::*;

/// A pair of vertically-offset blocking regions scrolling left as one unit.
///
/// Obstacles live in a fixed slot array and are recycled in place; only
/// `reset_to_new_position` moves one back to the right of the field.
#[derive(Debug, Clone, PartialEq)]
pub struct Obstacle {
    /// Left edge, shared by both regions
    pub x: f32,
    pub width: f32,
    /// Height of each region
    pub height: f32,
    /// Vertical opening between `top` and `bottom`
    pub gap: f32,
    pub top: Rect,
    pub bottom: Rect,
    /// Set by the caller once the pass-by has been scored
    pub passed: bool,
}

impl Obstacle {
    pub fn new(width: f32, height: f32) -> Self {
        Self::with_gap(width, height, OBSTACLE_GAP)
    }

    pub fn with_gap(width: f32, height: f32, gap: f32) -> Self {
        Self {
            x: 0.0,
            width,
            height,
            gap,
            top: Rect::new(0.0, 0.0, width, height),
            bottom: Rect::new(0.0, height + gap, width, height),
            passed: false,
        }
    }

    /// Move to `new_x` with a freshly drawn vertical offset and clear `passed`.
    ///
    /// The top region is lifted between 100 and 239 pixels above the field's
    /// top edge; the bottom region follows at `height + gap` below it.
    pub fn reset_to_new_position<R: Rng>(&mut self, new_x: f32, rng: &mut R) {
        self.x = new_x;
        self.top.pos.x = new_x;
        self.bottom.pos.x = new_x;

        let offset = rng.random_range(OBSTACLE_OFFSET_MIN..OBSTACLE_OFFSET_MAX);
        self.top.pos.y = -(offset as f32);
        self.bottom.pos.y = self.top.pos.y + self.height + self.gap;
        self.passed = false;

        debug_assert!(self.gap_invariant_holds());
    }

    /// True if `region` overlaps either blocking region
    pub fn intersects(&self, region: &Rect) -> bool {
        region.intersects(&self.top) || region.intersects(&self.bottom)
    }

    /// True exactly when `region` has cleared the trailing edge and this
    /// obstacle has not been scored yet. The caller sets `passed`.
    pub fn has_been_passed_by(&self, region: &Rect) -> bool {
        region.x() > self.x + self.width && !self.passed
    }

    /// Shift left by `dx`
    pub fn advance(&mut self, dx: f32) {
        debug_assert!(dx >= 0.0, "obstacles only scroll left");
        self.x -= dx;
        self.top.pos.x -= dx;
        self.bottom.pos.x -= dx;
    }

    /// True once the trailing edge has scrolled past the left edge of the field
    #[inline]
    pub fn is_off_screen(&self) -> bool {
        self.x + self.width < 0.0
    }

    fn gap_invariant_holds(&self) -> bool {
        (self.bottom.y() - self.top.y() - (self.height + self.gap)).abs() < f32::EPSILON * 1024.0
    }
}
