//! Render step: composite one frame from a state snapshot
//!
//! Layers, back to front:
//! 1. Background, two tiles at `background_scroll_x`
//! 2. Obstacles (top and bottom region of each)
//! 3. Floor, two tiles at `floor_scroll_x`
//! 4. Player, current animation frame
//! 5. Start prompt (menu only)
//! 6. Text: best score in the menu, live score while playing

use image::{Rgba, RgbaImage};

use super::canvas::{Canvas, ScaledSprite};
use super::text;
use crate::assets::Assets;
use crate::consts::PLAYER_FRAMES;
use crate::sim::{FieldLayout, GameState};

pub const TEXT_COLOR: Rgba<u8> = Rgba([255, 255, 0, 255]);

/// Distance of the live score from the right edge
const SCORE_RIGHT_INSET: f32 = 80.0;
/// Left margin and baseline of the score text
const TEXT_MARGIN: f32 = 10.0;
const TEXT_BASELINE: f32 = 35.0;
/// Font size per unit of sprite scale
const TEXT_SIZE: f32 = 16.0;

/// Sprites scaled for one field layout plus the frame they draw into
pub struct SceneRenderer {
    canvas: Canvas,
    background: ScaledSprite,
    floor: ScaledSprite,
    start_prompt: ScaledSprite,
    player_frames: [ScaledSprite; PLAYER_FRAMES],
    top_obstacle: ScaledSprite,
    bottom_obstacle: ScaledSprite,
    /// Score font size in pixels
    text_size: f32,
}

impl SceneRenderer {
    pub fn new(assets: &Assets, layout: &FieldLayout) -> Self {
        let size = layout.field_size as u32;
        let player_size = layout.player_rest.size;
        log::info!(
            "Scene renderer: {}x{} field, sprite scale {}",
            size,
            size,
            layout.scale
        );

        Self {
            canvas: Canvas::new(size, size),
            background: ScaledSprite::new(&assets.background, layout.background.size),
            floor: ScaledSprite::new(&assets.floor, layout.floor.size),
            start_prompt: ScaledSprite::new(&assets.start_prompt, layout.start_prompt.size),
            player_frames: std::array::from_fn(|i| {
                ScaledSprite::new(&assets.player_frames[i], player_size)
            }),
            top_obstacle: ScaledSprite::new(&assets.top_obstacle, layout.obstacle_size),
            bottom_obstacle: ScaledSprite::new(&assets.bottom_obstacle, layout.obstacle_size),
            text_size: TEXT_SIZE * layout.scale,
        }
    }

    /// Composite `state` and return the finished frame
    pub fn render(&mut self, state: &GameState, fps: Option<u32>) -> &RgbaImage {
        let layout = &state.layout;
        self.canvas.clear();

        self.canvas
            .blit_tiled_pair(&self.background, state.background_scroll_x, layout.background.y());

        for obstacle in state.obstacles.iter() {
            self.canvas.blit_at(&self.top_obstacle, &obstacle.top);
            self.canvas.blit_at(&self.bottom_obstacle, &obstacle.bottom);
        }

        self.canvas
            .blit_tiled_pair(&self.floor, state.floor_scroll_x, layout.floor.y());

        let frame = &self.player_frames[state.player_frame % PLAYER_FRAMES];
        self.canvas.blit_at(frame, &state.player);

        if !state.is_active() {
            self.canvas.blit_at(&self.start_prompt, &layout.start_prompt);
        }

        self.draw_score(state);
        if let Some(fps) = fps {
            self.draw_fps(fps, layout.field_size);
        }

        self.canvas.frame()
    }

    fn draw_score(&mut self, state: &GameState) {
        let size = self.text_size;
        let (label, x) = if state.is_active() {
            let label = state.score.to_string();
            // Long scores slide left instead of running off the edge
            let width = text::text_width(&label, size);
            let x = (state.layout.field_size - SCORE_RIGHT_INSET)
                .min(state.layout.field_size - TEXT_MARGIN - width);
            (label, x)
        } else {
            (format!("Record: {}", state.best_score), TEXT_MARGIN)
        };
        text::draw_text(
            self.canvas.frame_mut(),
            &label,
            x,
            TEXT_BASELINE,
            size,
            TEXT_COLOR,
        );
    }

    fn draw_fps(&mut self, fps: u32, field_size: f32) {
        text::draw_text(
            self.canvas.frame_mut(),
            &format!("FPS {}", fps),
            TEXT_MARGIN,
            field_size - TEXT_MARGIN,
            self.text_size / 2.0,
            TEXT_COLOR,
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::assets::tests::synthetic_assets;
    use crate::sim::tick;

    const BACKGROUND: Rgba<u8> = Rgba([10, 20, 30, 255]);
    const FLOOR: Rgba<u8> = Rgba([200, 150, 100, 255]);
    const PROMPT: Rgba<u8> = Rgba([255, 255, 255, 255]);
    const PLAYER_FRAME_0: Rgba<u8> = Rgba([255, 0, 0, 255]);
    const BOTTOM_OBSTACLE: Rgba<u8> = Rgba([0, 96, 0, 255]);

    fn setup() -> (SceneRenderer, GameState) {
        let assets = synthetic_assets();
        let layout = FieldLayout::for_assets(&assets.dims());
        (SceneRenderer::new(&assets, &layout), GameState::new(layout, 4))
    }

    fn px(frame: &RgbaImage, x: u32, y: u32) -> Rgba<u8> {
        *frame.get_pixel(x, y)
    }

    /// Text-colored pixels with `x0 <= x < x1` and `y0 <= y < y1`
    fn text_pixels(frame: &RgbaImage, x0: u32, x1: u32, y0: u32, y1: u32) -> usize {
        frame
            .enumerate_pixels()
            .filter(|(x, y, p)| (x0..x1).contains(x) && (y0..y1).contains(y) && **p == TEXT_COLOR)
            .count()
    }

    #[test]
    fn test_menu_frame_layers() {
        let (mut renderer, state) = setup();
        let frame = renderer.render(&state, None);

        assert_eq!(frame.dimensions(), (512, 512));
        assert_eq!(px(frame, 300, 100), BACKGROUND);
        assert_eq!(px(frame, 300, 450), FLOOR);
        // Player rest region starts at (154, 244)
        assert_eq!(px(frame, 160, 250), PLAYER_FRAME_0);
        // Prompt is centered and drawn over everything but text
        assert_eq!(px(frame, 256, 256), PROMPT);
        // "Record: 0" sits on the baseline at y = 35, starting at x = 10
        assert!(text_pixels(frame, 10, 200, 0, 36) > 50);
        assert_eq!(text_pixels(frame, 0, 10, 0, 512), 0);
        assert_eq!(text_pixels(frame, 0, 512, 40, 512), 0);
    }

    #[test]
    fn test_playing_frame_hides_prompt_and_record() {
        let (mut renderer, mut state) = setup();
        state.start();
        let frame = renderer.render(&state, None);

        assert_eq!(px(frame, 256, 256), BACKGROUND);
        // Score "0" starts at field - 80 and the record is hidden
        assert!(text_pixels(frame, 432, 502, 0, 36) > 20);
        assert_eq!(text_pixels(frame, 0, 432, 0, 512), 0);
    }

    #[test]
    fn test_long_score_slides_left() {
        let (mut renderer, mut state) = setup();
        state.start();
        state.best_score = 1_234_567;
        state.score = 1_234_567;
        let frame = renderer.render(&state, None);

        assert!(text_pixels(frame, 0, 432, 0, 36) > 0);
        // Right edge stays inside the margin
        assert_eq!(text_pixels(frame, 503, 512, 0, 512), 0);
    }

    #[test]
    fn test_obstacles_draw_under_floor() {
        let (mut renderer, mut state) = setup();
        let o = &mut state.obstacles[0];
        o.advance(o.x - 300.0);
        let bottom_y = state.obstacles[0].bottom.y() as u32;
        let frame = renderer.render(&state, None);

        assert!(bottom_y < 390);
        assert_eq!(px(frame, 310, 390), BOTTOM_OBSTACLE);
        assert_eq!(px(frame, 310, 410), FLOOR);
    }

    #[test]
    fn test_player_frame_follows_animation() {
        let (mut renderer, mut state) = setup();
        tick(&mut state);
        assert_eq!(state.player_frame, 1);
        let frame = renderer.render(&state, None);
        assert_eq!(px(frame, 160, 250), Rgba([0, 255, 0, 255]));
    }

    #[test]
    fn test_fps_overlay_is_optional() {
        let (mut renderer, state) = setup();
        // Half-size text on the baseline 10px above the bottom edge
        let without = text_pixels(renderer.render(&state, None), 10, 200, 470, 503);
        assert_eq!(without, 0);
        let with = text_pixels(renderer.render(&state, Some(60)), 10, 200, 470, 503);
        assert!(with > 10);
        assert_eq!(px(renderer.render(&state, Some(60)), 300, 450), FLOOR);
    }
}
