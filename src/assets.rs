//! Sprite loading
//!
//! Six images are read once at startup. Any failure is fatal: the game
//! cannot lay out the field without every sprite's dimensions.

use std::path::{Path, PathBuf};

use image::{RgbaImage, imageops};
use thiserror::Error;

use crate::consts::PLAYER_FRAMES;
use crate::sim::{AssetDims, SpriteDims};

#[derive(Error, Debug)]
pub enum AssetError {
    #[error("failed to read {}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to decode {name:?}")]
    Decode {
        name: AssetName,
        #[source]
        source: image::ImageError,
    },
    #[error("asset {0:?} was not provided")]
    Missing(AssetName),
    #[error("sprite sheet is {width}px wide, too narrow for {frames} frames")]
    SheetTooNarrow { width: u32, frames: usize },
}

/// The six sprites, by role
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AssetName {
    Background,
    Floor,
    StartPrompt,
    PlayerSheet,
    TopObstacle,
    BottomObstacle,
}

impl AssetName {
    pub const ALL: [AssetName; 6] = [
        AssetName::Background,
        AssetName::Floor,
        AssetName::StartPrompt,
        AssetName::PlayerSheet,
        AssetName::TopObstacle,
        AssetName::BottomObstacle,
    ];

    pub fn file_name(&self) -> &'static str {
        match self {
            AssetName::Background => "background.png",
            AssetName::Floor => "floor.png",
            AssetName::StartPrompt => "tap_to_start_the_game.png",
            AssetName::PlayerSheet => "flappy_sprite_sheet.png",
            AssetName::TopObstacle => "top_pipe.png",
            AssetName::BottomObstacle => "bottom_pipe.png",
        }
    }
}

/// Decoded sprites at their authored (unscaled) size
#[derive(Debug, Clone)]
pub struct Assets {
    pub background: RgbaImage,
    pub floor: RgbaImage,
    pub start_prompt: RgbaImage,
    /// Player animation frames, sliced from the sprite sheet
    pub player_frames: [RgbaImage; PLAYER_FRAMES],
    pub top_obstacle: RgbaImage,
    pub bottom_obstacle: RgbaImage,
}

impl Assets {
    /// Load all sprites from a directory
    pub fn load_dir(dir: &Path) -> Result<Self, AssetError> {
        log::info!("Loading assets from {}", dir.display());
        Self::from_encoded(|name| {
            let path = dir.join(name.file_name());
            std::fs::read(&path).map_err(|source| AssetError::Io { path, source })
        })
    }

    /// Decode all sprites from encoded bytes supplied per asset
    pub fn from_encoded<F>(mut read: F) -> Result<Self, AssetError>
    where
        F: FnMut(AssetName) -> Result<Vec<u8>, AssetError>,
    {
        let mut decode = |name: AssetName| -> Result<RgbaImage, AssetError> {
            let bytes = read(name)?;
            let image = image::load_from_memory(&bytes)
                .map_err(|source| AssetError::Decode { name, source })?;
            log::debug!("Decoded {:?}: {}x{}", name, image.width(), image.height());
            Ok(image.to_rgba8())
        };

        Self::from_images(
            decode(AssetName::Background)?,
            decode(AssetName::Floor)?,
            decode(AssetName::StartPrompt)?,
            &decode(AssetName::PlayerSheet)?,
            decode(AssetName::TopObstacle)?,
            decode(AssetName::BottomObstacle)?,
        )
    }

    /// Assemble from decoded images, slicing the player sheet into frames
    pub fn from_images(
        background: RgbaImage,
        floor: RgbaImage,
        start_prompt: RgbaImage,
        player_sheet: &RgbaImage,
        top_obstacle: RgbaImage,
        bottom_obstacle: RgbaImage,
    ) -> Result<Self, AssetError> {
        Ok(Self {
            background,
            floor,
            start_prompt,
            player_frames: slice_frames(player_sheet)?,
            top_obstacle,
            bottom_obstacle,
        })
    }

    /// Dimensions the simulation lays the field out from
    pub fn dims(&self) -> AssetDims {
        let d = |img: &RgbaImage| SpriteDims::new(img.width(), img.height());
        AssetDims {
            background: d(&self.background),
            floor: d(&self.floor),
            start_prompt: d(&self.start_prompt),
            player_frame: d(&self.player_frames[0]),
            top_obstacle: d(&self.top_obstacle),
            bottom_obstacle: d(&self.bottom_obstacle),
        }
    }
}

/// Cut a horizontal strip into equal-width frames (any remainder is ignored)
fn slice_frames(sheet: &RgbaImage) -> Result<[RgbaImage; PLAYER_FRAMES], AssetError> {
    let frame_width = sheet.width() / PLAYER_FRAMES as u32;
    if frame_width == 0 || sheet.height() == 0 {
        return Err(AssetError::SheetTooNarrow {
            width: sheet.width(),
            frames: PLAYER_FRAMES,
        });
    }
    Ok(std::array::from_fn(|i| {
        imageops::crop_imm(sheet, i as u32 * frame_width, 0, frame_width, sheet.height()).to_image()
    }))
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use image::Rgba;

    pub(crate) fn solid(w: u32, h: u32, color: [u8; 4]) -> RgbaImage {
        RgbaImage::from_pixel(w, h, Rgba(color))
    }

    /// Test sprite set with one flat color per sprite
    pub(crate) fn synthetic_assets() -> Assets {
        let mut sheet = solid(51, 12, [255, 0, 0, 255]);
        for y in 0..12 {
            for x in 17..34 {
                sheet.put_pixel(x, y, Rgba([0, 255, 0, 255]));
            }
            for x in 34..51 {
                sheet.put_pixel(x, y, Rgba([0, 0, 255, 255]));
            }
        }
        Assets::from_images(
            solid(256, 256, [10, 20, 30, 255]),
            solid(256, 56, [200, 150, 100, 255]),
            solid(92, 25, [255, 255, 255, 255]),
            &sheet,
            solid(26, 160, [0, 128, 0, 255]),
            solid(26, 160, [0, 96, 0, 255]),
        )
        .unwrap()
    }

    #[test]
    fn test_sheet_slices_into_frames() {
        let assets = synthetic_assets();
        assert_eq!(assets.player_frames[0].dimensions(), (17, 12));
        assert_eq!(assets.player_frames[0].get_pixel(0, 0).0, [255, 0, 0, 255]);
        assert_eq!(assets.player_frames[1].get_pixel(0, 0).0, [0, 255, 0, 255]);
        assert_eq!(assets.player_frames[2].get_pixel(16, 11).0, [0, 0, 255, 255]);
    }

    #[test]
    fn test_dims_feed_layout() {
        let dims = synthetic_assets().dims();
        assert_eq!(dims, crate::sim::layout::tests::classic_dims());
    }

    #[test]
    fn test_narrow_sheet_is_rejected() {
        let narrow = solid(2, 12, [0, 0, 0, 255]);
        let err = slice_frames(&narrow).unwrap_err();
        assert!(matches!(err, AssetError::SheetTooNarrow { width: 2, frames: 3 }));
    }

    #[test]
    fn test_garbage_bytes_fail_to_decode() {
        let err = Assets::from_encoded(|_| Ok(vec![0, 1, 2, 3])).unwrap_err();
        assert!(matches!(
            err,
            AssetError::Decode {
                name: AssetName::Background,
                ..
            }
        ));
    }

    #[test]
    fn test_missing_directory_is_io_error() {
        let err = Assets::load_dir(Path::new("/nonexistent/flappy-assets")).unwrap_err();
        match err {
            AssetError::Io { path, .. } => assert!(path.ends_with("background.png")),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_bundled_placeholders_load() {
        let dir = Path::new(env!("CARGO_MANIFEST_DIR")).join("assets");
        let assets = Assets::load_dir(&dir).unwrap();
        assert_eq!(assets.dims(), crate::sim::layout::tests::classic_dims());
        assert_eq!(assets.player_frames[2].dimensions(), (17, 12));
    }

    #[test]
    fn test_decodes_png_bytes() {
        let mut png = Vec::new();
        solid(4, 6, [1, 2, 3, 255])
            .write_to(&mut std::io::Cursor::new(&mut png), image::ImageFormat::Png)
            .unwrap();
        let mut sheet_png = Vec::new();
        solid(9, 3, [9, 9, 9, 255])
            .write_to(&mut std::io::Cursor::new(&mut sheet_png), image::ImageFormat::Png)
            .unwrap();

        let assets = Assets::from_encoded(|name| match name {
            AssetName::PlayerSheet => Ok(sheet_png.clone()),
            _ => Ok(png.clone()),
        })
        .unwrap();
        assert_eq!(assets.background.dimensions(), (4, 6));
        assert_eq!(assets.player_frames[2].dimensions(), (3, 3));
    }
}
