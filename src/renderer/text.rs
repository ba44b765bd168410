//! Overlay text
//!
//! Glyphs are rasterized from an embedded TrueType font and blended into the
//! frame by coverage.

use std::sync::OnceLock;

use image::{Pixel, Rgba, RgbaImage};
use rusttype::{Font, Scale, point};

const FONT_DATA: &[u8] = include_bytes!("../../assets/fonts/DejaVuSans-Bold.ttf");

/// Coverage at or below this leaves the pixel untouched
const MIN_COVERAGE: f32 = 0.1;

fn font() -> Option<&'static Font<'static>> {
    static FONT: OnceLock<Option<Font<'static>>> = OnceLock::new();
    FONT.get_or_init(|| {
        let font = Font::try_from_bytes(FONT_DATA);
        if font.is_none() {
            log::error!("Embedded font failed to parse; overlay text disabled");
        }
        font
    })
    .as_ref()
}

/// Advance width of `text` at `size` pixels
pub fn text_width(text: &str, size: f32) -> f32 {
    let Some(font) = font() else {
        return 0.0;
    };
    font.layout(text, Scale::uniform(size), point(0.0, 0.0))
        .last()
        .map(|g| g.position().x + g.unpositioned().h_metrics().advance_width)
        .unwrap_or(0.0)
}

/// Draw `text` with its baseline at `baseline_y`, starting at `x`. Glyph
/// pixels outside the frame are clipped.
pub fn draw_text(
    frame: &mut RgbaImage,
    text: &str,
    x: f32,
    baseline_y: f32,
    size: f32,
    color: Rgba<u8>,
) {
    let Some(font) = font() else {
        return;
    };
    let (width, height) = (frame.width() as i32, frame.height() as i32);

    for glyph in font.layout(text, Scale::uniform(size), point(x, baseline_y)) {
        let Some(bb) = glyph.pixel_bounding_box() else {
            continue;
        };
        glyph.draw(|gx, gy, coverage| {
            let px = bb.min.x + gx as i32;
            let py = bb.min.y + gy as i32;
            if px < 0 || py < 0 || px >= width || py >= height || coverage <= MIN_COVERAGE {
                return;
            }
            let mut src = color;
            src[3] = (color[3] as f32 * coverage.min(1.0)).round() as u8;
            frame.get_pixel_mut(px as u32, py as u32).blend(&src);
        });
    }
}
