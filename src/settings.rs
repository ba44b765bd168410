//! Game settings and preferences
//!
//! Presentation preferences only; physics tuning lives in `consts`.
//! Native builds read a JSON file, web builds use LocalStorage.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::consts::FIELD_SIZE;

/// Game settings/preferences
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Directory (native) or URL prefix (web) holding the six sprites
    pub asset_dir: PathBuf,
    /// Initial window size as a multiple of the field size
    pub window_scale: f32,
    /// Wait for vertical blank when presenting
    pub vsync: bool,
    /// Show FPS counter
    pub show_fps: bool,
    /// Fixed RNG seed; `None` seeds from the clock
    pub seed: Option<u64>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            asset_dir: PathBuf::from("assets"),
            window_scale: 1.0,
            vsync: true,
            show_fps: false,
            seed: None,
        }
    }
}

impl Settings {
    /// Parse settings JSON; absent fields take their defaults
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str::<Self>(json).map(Self::sanitized)
    }

    /// Initial window edge length in logical pixels
    pub fn window_size(&self) -> u32 {
        (FIELD_SIZE as f32 * self.window_scale).round() as u32
    }

    fn sanitized(mut self) -> Self {
        if !self.window_scale.is_finite() || self.window_scale <= 0.0 {
            log::warn!(
                "Ignoring window_scale {}; using {}",
                self.window_scale,
                Self::default().window_scale
            );
            self.window_scale = Self::default().window_scale;
        }
        self
    }

    /// Default settings file
    pub const FILE_NAME: &'static str = "flappy.json";

    /// Load settings from a JSON file (native only). A missing file gives
    /// the defaults; a malformed one is reported and ignored.
    #[cfg(not(target_arch = "wasm32"))]
    pub fn load_from(path: &std::path::Path) -> Self {
        let json = match std::fs::read_to_string(path) {
            Ok(json) => json,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                log::info!("No {}, using default settings", path.display());
                return Self::default();
            }
            Err(e) => {
                log::warn!("Could not read {}: {}", path.display(), e);
                return Self::default();
            }
        };

        match Self::from_json(&json) {
            Ok(settings) => {
                log::info!("Loaded settings from {}", path.display());
                settings
            }
            Err(e) => {
                log::warn!("Malformed {}: {}; using defaults", path.display(), e);
                Self::default()
            }
        }
    }

    /// LocalStorage key
    #[cfg(target_arch = "wasm32")]
    const STORAGE_KEY: &'static str = "flappy_settings";

    /// Load settings from LocalStorage (WASM only)
    #[cfg(target_arch = "wasm32")]
    pub fn load() -> Self {
        let storage = web_sys::window()
            .and_then(|w| w.local_storage().ok())
            .flatten();

        if let Some(storage) = storage {
            if let Ok(Some(json)) = storage.get_item(Self::STORAGE_KEY) {
                match Self::from_json(&json) {
                    Ok(settings) => {
                        log::info!("Loaded settings from LocalStorage");
                        return settings;
                    }
                    Err(e) => log::warn!("Malformed stored settings: {}", e),
                }
            }
        }

        log::info!("Using default settings");
        Self::default()
    }

    /// Save settings to LocalStorage (WASM only)
    #[cfg(target_arch = "wasm32")]
    pub fn save(&self) {
        let storage = web_sys::window()
            .and_then(|w| w.local_storage().ok())
            .flatten();

        if let Some(storage) = storage {
            if let Ok(json) = serde_json::to_string(self) {
                let _ = storage.set_item(Self::STORAGE_KEY, &json);
                log::info!("Settings saved");
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_object_gives_defaults() {
        assert_eq!(Settings::from_json("{}").unwrap(), Settings::default());
    }

    #[test]
    fn test_partial_json_overrides_named_fields() {
        let s = Settings::from_json(r#"{"show_fps": true, "seed": 42}"#).unwrap();
        assert!(s.show_fps);
        assert_eq!(s.seed, Some(42));
        assert!(s.vsync);
        assert_eq!(s.asset_dir, PathBuf::from("assets"));
    }

    #[test]
    fn test_malformed_json_is_an_error() {
        assert!(Settings::from_json("{show_fps: yes").is_err());
        assert!(Settings::from_json(r#"{"vsync": "sometimes"}"#).is_err());
    }

    #[test]
    fn test_bad_window_scale_is_reset() {
        let s = Settings::from_json(r#"{"window_scale": -2.0}"#).unwrap();
        assert_eq!(s.window_scale, 1.0);
        assert_eq!(s.window_size(), 512);
    }

    #[test]
    fn test_window_size_scales_field() {
        let s = Settings {
            window_scale: 1.5,
            ..Default::default()
        };
        assert_eq!(s.window_size(), 768);
    }

    #[test]
    fn test_round_trip_through_json() {
        let s = Settings {
            asset_dir: PathBuf::from("/tmp/sprites"),
            window_scale: 2.0,
            vsync: false,
            show_fps: true,
            seed: Some(7),
        };
        let json = serde_json::to_string(&s).unwrap();
        assert_eq!(Settings::from_json(&json).unwrap(), s);
    }

    #[cfg(not(target_arch = "wasm32"))]
    #[test]
    fn test_missing_file_gives_defaults() {
        let s = Settings::load_from(std::path::Path::new("/nonexistent/flappy.json"));
        assert_eq!(s, Settings::default());
    }
}
